use colored::Colorize;
use std::collections::HashMap;

use crate::utils::path;

pub struct Theme {
    messages: HashMap<&'static str, String>,
    pub prompt_style: Box<dyn Fn(String) -> String>,
    pub success_style: Box<dyn Fn(String) -> String>,
    pub warning_style: Box<dyn Fn(String) -> String>,
    pub error_style: Box<dyn Fn(String) -> String>,
}

impl Theme {
    pub fn load(name: &str) -> Theme {
        match name {
            "plain" => Theme::plain(),
            _ => Theme::colored(),
        }
    }

    fn base_messages() -> HashMap<&'static str, String> {
        let mut messages = HashMap::new();
        messages.insert("welcome", String::from("whelk, a small shell. `exit` or Ctrl-D leaves."));
        messages.insert("exit", String::from("bye"));
        messages.insert("eof_signal", String::from("eof, leaving"));
        messages.insert("interrupt_signal", String::from("interrupted"));
        messages.insert("error", String::from("error"));
        messages.insert("error_symbol", String::from("✗"));
        messages
    }

    fn colored() -> Theme {
        Theme {
            messages: Self::base_messages(),
            prompt_style: Box::new(|s| s.bright_cyan().to_string()),
            success_style: Box::new(|s| s.green().to_string()),
            warning_style: Box::new(|s| s.yellow().to_string()),
            error_style: Box::new(|s| s.bright_red().to_string()),
        }
    }

    fn plain() -> Theme {
        Theme {
            messages: Self::base_messages(),
            prompt_style: Box::new(|s| s),
            success_style: Box::new(|s| s),
            warning_style: Box::new(|s| s),
            error_style: Box::new(|s| s),
        }
    }

    pub fn get_message(&self, key: &str) -> String {
        self.messages.get(key).cloned().unwrap_or_default()
    }

    /// Prompt shows the basename of the working directory.
    pub fn prompt(&self) -> String {
        let dir = path::current_dir();
        let base = path::basename(&dir);
        (self.prompt_style)(format!("{}> ", base))
    }
}
