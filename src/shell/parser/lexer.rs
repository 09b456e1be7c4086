use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

#[derive(Debug, PartialEq, Clone)]
pub enum Token {
    Word(String),
    Pipe,
    Redirect(RedirectOp),
    And,
    Or,
    Semi,
    Newline,
    /// Input the lexer could not assign a meaning to: a lone `&` or an
    /// unterminated quote. Carries the offending line for diagnostics.
    Unexpected(String),
    Eos,
}

#[derive(Debug, PartialEq, Clone)]
pub enum RedirectOp {
    Input,  // <
    Output, // >
    Append, // >>
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(word) => write!(f, "word {:?}", word),
            Token::Pipe => write!(f, "`|`"),
            Token::Redirect(RedirectOp::Input) => write!(f, "`<`"),
            Token::Redirect(RedirectOp::Output) => write!(f, "`>`"),
            Token::Redirect(RedirectOp::Append) => write!(f, "`>>`"),
            Token::And => write!(f, "`&&`"),
            Token::Or => write!(f, "`||`"),
            Token::Semi => write!(f, "`;`"),
            Token::Newline => write!(f, "end of line"),
            Token::Unexpected(text) => write!(f, "unexpected input {:?}", text),
            Token::Eos => write!(f, "end of input"),
        }
    }
}

/// Characters that terminate a word: everything that can start an operator
/// token. Quotes are handled separately inside `read_word`.
const WORD_BREAKERS: &str = ";<>|&";

/// Streaming tokenizer over an ordered source of text lines.
///
/// Lines are pulled on demand. Each line produces its tokens followed by one
/// `Newline` token; the end of the source produces `Eos`. The lexer performs
/// no grammar validation: `| | |` tokenizes fine, rejecting it is the
/// parser's job.
pub struct Lexer<I: Iterator<Item = String>> {
    lines: I,
    chars: Option<Peekable<IntoIter<char>>>,
    line: String,
}

impl<I: Iterator<Item = String>> Lexer<I> {
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            chars: None,
            line: String::new(),
        }
    }

    pub fn next_token(&mut self) -> Token {
        loop {
            if self.chars.is_none() {
                match self.lines.next() {
                    Some(line) => self.set_line(line),
                    None => return Token::Eos,
                }
            }
            self.skip_blank();

            match self.peek_char() {
                None => {
                    // Line exhausted: exactly one separator per source line,
                    // whether or not the line carried its own terminator.
                    self.chars = None;
                    return Token::Newline;
                }
                Some(c) => match c {
                    '\n' => {
                        self.read_char();
                        return Token::Newline;
                    }
                    ';' => {
                        self.read_char();
                        return Token::Semi;
                    }
                    '<' => {
                        self.read_char();
                        return Token::Redirect(RedirectOp::Input);
                    }
                    '>' => {
                        self.read_char();
                        if self.peek_char() == Some('>') {
                            self.read_char();
                            return Token::Redirect(RedirectOp::Append);
                        }
                        return Token::Redirect(RedirectOp::Output);
                    }
                    '|' => {
                        self.read_char();
                        if self.peek_char() == Some('|') {
                            self.read_char();
                            return Token::Or;
                        }
                        return Token::Pipe;
                    }
                    '&' => {
                        self.read_char();
                        if self.peek_char() == Some('&') {
                            self.read_char();
                            return Token::And;
                        }
                        // A bare `&` has no single-character meaning here.
                        return Token::Unexpected(self.line.clone());
                    }
                    _ => return self.read_word(),
                },
            }
        }
    }

    fn set_line(&mut self, line: String) {
        let trimmed = line.strip_suffix('\n').unwrap_or(&line);
        let trimmed = trimmed.strip_suffix('\r').unwrap_or(trimmed);
        self.line = trimmed.to_string();
        self.chars = Some(self.line.chars().collect::<Vec<_>>().into_iter().peekable());
    }

    fn read_char(&mut self) -> Option<char> {
        self.chars.as_mut()?.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.as_mut()?.peek().copied()
    }

    fn skip_blank(&mut self) {
        while let Some(c) = self.peek_char() {
            if c != ' ' && c != '\t' {
                break;
            }
            self.read_char();
        }
    }

    fn read_word(&mut self) -> Token {
        let mut word = String::new();

        while let Some(c) = self.peek_char() {
            if c == '\'' || c == '"' {
                self.read_char();
                match self.read_quoted(c) {
                    Some(quoted) => {
                        // Quoted segments join adjacent unquoted text into
                        // one word literal: foo"bar baz" is a single word.
                        word.push_str(&quoted);
                        continue;
                    }
                    None => return Token::Unexpected(self.line.clone()),
                }
            }
            if c.is_whitespace() || WORD_BREAKERS.contains(c) {
                break;
            }
            word.push(self.read_char().unwrap_or_default());
        }

        Token::Word(word)
    }

    /// Consume verbatim up to the matching close quote. `None` means the
    /// quote never closed; the rest of the line is already consumed.
    fn read_quoted(&mut self, quote: char) -> Option<String> {
        let mut text = String::new();

        while let Some(c) = self.read_char() {
            if c == quote {
                return Some(text);
            }
            text.push(c);
        }

        None
    }
}
