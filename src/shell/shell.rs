use log::{debug, error, warn};
use std::error::Error;
use std::io::{self, BufRead, BufReader, Write};

use crate::shell::executor::Executor;
use crate::shell::parser::{Lexer, Parser};
use crate::shell::readline::{ReadlineError, ReadlineManager};
use crate::shell::signals;
use crate::utils::config::Config;
use crate::utils::theme::Theme;

pub struct Shell<'a> {
    theme: Theme,
    readline: ReadlineManager<'a>,
    executor: Executor,
}

impl<'a> Shell<'a> {
    pub fn new(config: &'a Config) -> Result<Self, Box<dyn Error>> {
        Ok(Self {
            theme: Theme::load(&config.theme),
            readline: ReadlineManager::new(config)?,
            executor: Executor::new(),
        })
    }

    /// Interactive session. Every submitted line runs through a fresh
    /// lexer/parser pair; a bad line reports and the prompt comes back.
    pub fn run(&mut self) -> Result<(), Box<dyn Error>> {
        debug!("starting interactive session");
        signals::ignore_interactive_signals();
        self.readline.load_history()?;

        println!(
            "{}",
            (self.theme.success_style)(self.theme.get_message("welcome"))
        );

        self.run_loop()?;
        self.readline.save_history()?;

        debug!("interactive session over");
        Ok(())
    }

    fn run_loop(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            io::stdout().flush()?;
            let prompt = self.theme.prompt();

            match self.readline.readline(&prompt) {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if line.trim() == "exit" {
                        println!(
                            "{}",
                            (self.theme.success_style)(self.theme.get_message("exit"))
                        );
                        break;
                    }
                    self.readline.add_history(line.clone())?;
                    self.run_source(std::iter::once(line));
                }
                Err(ReadlineError::Eof) => {
                    warn!("eof, leaving the session");
                    println!(
                        "\n{}",
                        (self.theme.warning_style)(self.theme.get_message("eof_signal"))
                    );
                    break;
                }
                Err(ReadlineError::Interrupted) => {
                    println!(
                        "\n{}",
                        (self.theme.warning_style)(self.theme.get_message("interrupt_signal"))
                    );
                }
                Err(err) => {
                    error!("readline failed: {}", err);
                    eprintln!(
                        "{}: {}",
                        (self.theme.error_style)(self.theme.get_message("error")),
                        err
                    );
                }
            }
        }
        Ok(())
    }

    /// Batch session: the whole reader becomes one token stream. Parse
    /// errors report to stderr and parsing resumes on the next line.
    pub fn run_batch<R: io::Read>(&mut self, input: R) -> Result<(), Box<dyn Error>> {
        let lines = BufReader::new(input).lines().map_while(|line| match line {
            Ok(line) => Some(line),
            Err(err) => {
                error!("cannot read input: {}", err);
                None
            }
        });
        self.run_source(lines);
        Ok(())
    }

    /// Tokenize, parse and execute every statement of one line source.
    fn run_source<I: Iterator<Item = String>>(&mut self, lines: I) {
        let parser = Parser::new(Lexer::new(lines));
        for statement in parser {
            match statement {
                Ok(pipeline) => {
                    debug!("parsed {:?}", pipeline);
                    if let Err(err) = self.executor.execute(&pipeline) {
                        self.report(&err.to_string());
                    }
                }
                Err(err) => {
                    warn!("parse error: {}", err);
                    self.report(&err.to_string());
                }
            }
        }
    }

    fn report(&self, message: &str) {
        eprintln!(
            "{} {}",
            (self.theme.error_style)(self.theme.get_message("error_symbol")),
            (self.theme.error_style)(message.to_string())
        );
    }
}
