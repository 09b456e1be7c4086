use std::error::Error;
use std::fmt;

use super::ast::{Command, CommandPipeline, RedirectMode, RedirectSpec};
use super::lexer::{Lexer, RedirectOp, Token};

/// Errors are fatal to the statement that produced them, never to the
/// stream: after returning one the parser has already skipped the rest of
/// the offending line and the next pull resumes on fresh input.
#[derive(Debug, PartialEq, Clone)]
pub enum ParseError {
    /// The tokenizer found input it could not lex: an unterminated quote or
    /// a lone `&`. Carries the offending line.
    Lexical { line: String },
    /// A grammar violation: what the parser expected and the token it saw.
    Syntax {
        expected: &'static str,
        found: String,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Lexical { line } => {
                write!(f, "unexpected token in {:?}", line)
            }
            ParseError::Syntax { expected, found } => {
                write!(f, "syntax error: expected {}, found {}", expected, found)
            }
        }
    }
}

impl Error for ParseError {}

/// Pull-based LL(1) parser producing one `CommandPipeline` per statement.
///
/// The grammar, in precedence order:
///
/// ```text
/// program   := statement (separator statement)* separator?
/// statement := pipeline redirect*
/// pipeline  := command ('|' command)*
/// command   := WORD WORD*
/// redirect  := '<' WORD | '>' WORD | '>>' WORD
/// separator := ';' | NEWLINE
/// ```
///
/// The only mutable state is the single lookahead token, empty until the
/// first pull; consuming the end-of-input token fuses the iterator. Tokens
/// are consumed exactly once, left to right, with no backtracking.
pub struct Parser<I: Iterator<Item = String>> {
    lexer: Lexer<I>,
    current: Option<Token>,
    exhausted: bool,
}

impl<I: Iterator<Item = String>> Parser<I> {
    pub fn new(lexer: Lexer<I>) -> Self {
        Self {
            lexer,
            current: None,
            exhausted: false,
        }
    }

    fn advance(&mut self) {
        self.current = Some(self.lexer.next_token());
    }

    fn lookahead(&mut self) -> &Token {
        let lexer = &mut self.lexer;
        self.current.get_or_insert_with(|| lexer.next_token())
    }

    fn parse_statement(&mut self) -> Result<CommandPipeline, ParseError> {
        let mut commands = vec![self.parse_command()?];

        while matches!(self.lookahead(), Token::Pipe) {
            self.advance();
            commands.push(self.parse_command()?);
        }

        let mut redirects = RedirectSpec::default();
        loop {
            let op = match self.lookahead() {
                Token::Redirect(op) => op.clone(),
                _ => break,
            };
            self.advance();
            let file = self.expect_word("a file name after the redirection operator")?;
            // Repeated redirects of the same direction overwrite: last wins.
            match op {
                RedirectOp::Input => redirects.input = Some(file),
                RedirectOp::Output => {
                    redirects.output = Some(file);
                    redirects.mode = RedirectMode::Truncate;
                }
                RedirectOp::Append => {
                    redirects.output = Some(file);
                    redirects.mode = RedirectMode::Append;
                }
            }
        }

        // The terminating separator stays in the lookahead; the next pull
        // steps over it.
        match self.lookahead() {
            Token::Semi | Token::Newline | Token::Eos => {
                Ok(CommandPipeline { commands, redirects })
            }
            _ => Err(self.unexpected("`;`, a newline or end of input")),
        }
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let name = self.expect_word("a command name")?;
        let mut command = Command {
            name,
            args: Vec::new(),
        };

        while let Token::Word(word) = self.lookahead() {
            command.args.push(word.clone());
            self.advance();
        }

        Ok(command)
    }

    fn expect_word(&mut self, expected: &'static str) -> Result<String, ParseError> {
        match self.lookahead() {
            Token::Word(word) => {
                let word = word.clone();
                self.advance();
                Ok(word)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        match self.lookahead() {
            Token::Unexpected(line) => ParseError::Lexical { line: line.clone() },
            found => ParseError::Syntax {
                expected,
                found: found.to_string(),
            },
        }
    }

    /// Discard tokens up to and including the next end of line, so one bad
    /// statement never poisons later lines.
    fn recover(&mut self) {
        loop {
            match self.lookahead() {
                Token::Newline => {
                    self.advance();
                    break;
                }
                Token::Eos => {
                    self.exhausted = true;
                    break;
                }
                _ => self.advance(),
            }
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for Parser<I> {
    type Item = Result<CommandPipeline, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        // Empty statements (runs of separators) never yield a pipeline.
        while matches!(self.lookahead(), Token::Semi | Token::Newline) {
            self.advance();
        }
        if matches!(self.lookahead(), Token::Eos) {
            self.exhausted = true;
            return None;
        }

        match self.parse_statement() {
            Ok(pipeline) => Some(Ok(pipeline)),
            Err(err) => {
                self.recover();
                Some(Err(err))
            }
        }
    }
}
