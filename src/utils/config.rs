use dotenv::dotenv;
use rustyline::EditMode;
use std::env;
use std::fs;
use std::path::PathBuf;

pub struct Config {
    pub name: String,
    pub config_dir: PathBuf,
    pub theme: String,
    pub history_file: PathBuf,
    pub editor_mode: String,
    pub logger_level: String,
    pub logger_dir: PathBuf,
}

impl Config {
    fn get_config_dir() -> PathBuf {
        if let Ok(home) = env::var("HOME") {
            PathBuf::from(home).join(".config/whelk")
        } else {
            PathBuf::from("tmp")
        }
    }

    fn default() -> Self {
        let config_dir = Self::get_config_dir();
        Config {
            name: String::from("whelk"),
            theme: String::from("default"),
            history_file: config_dir.join("history"),
            editor_mode: String::from("vi"),
            logger_level: String::from("warn"),
            logger_dir: config_dir.join("logs"),
            config_dir,
        }
    }

    pub fn new() -> Self {
        if cfg!(debug_assertions) {
            dotenv::from_filename(".env.development").ok();
        } else {
            dotenv().ok();
        }

        let mut config = Config::default();

        if let Ok(theme) = env::var("WHELK_THEME") {
            config.theme = theme;
        }

        if let Ok(editor) = env::var("WHELK_EDITOR") {
            config.editor_mode = editor;
        }

        if let Ok(history) = env::var("WHELK_HISTORY") {
            config.history_file = PathBuf::from(history);
        }

        if let Ok(level) = env::var("WHELK_LOG_LEVEL") {
            config.logger_level = level;
        }

        if let Ok(dir) = env::var("WHELK_LOG_DIR") {
            config.logger_dir = PathBuf::from(dir);
        }

        if let Some(parent) = config.history_file.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                eprintln!("whelk: cannot create {}: {}", parent.display(), err);
            }
        }

        config
    }

    pub fn get_edit_mode(&self) -> EditMode {
        match self.editor_mode.to_lowercase().as_str() {
            "emacs" => EditMode::Emacs,
            _ => EditMode::Vi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_mode_defaults_to_vi() {
        let mut config = Config::default();
        config.editor_mode = String::from("unknown");
        assert_eq!(config.get_edit_mode(), EditMode::Vi);

        config.editor_mode = String::from("Emacs");
        assert_eq!(config.get_edit_mode(), EditMode::Emacs);
    }
}
