use std::collections::HashMap;
use std::env;
use std::io::{self, Write};
use std::process;

use once_cell::sync::Lazy;

use crate::utils::path::find_file_in_path;

/// A builtin runs in the shell process itself and writes to whatever output
/// the executor hands it (the terminal, or a redirect target).
pub type Builtin = fn(&[String], &mut dyn Write) -> io::Result<()>;

static REGISTRY: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut registry: HashMap<&'static str, Builtin> = HashMap::new();
    registry.insert("cd", builtin_cd);
    registry.insert("pwd", builtin_pwd);
    registry.insert("which", builtin_which);
    registry.insert("exit", builtin_exit);
    registry
});

pub fn lookup(name: &str) -> Option<Builtin> {
    REGISTRY.get(name).copied()
}

fn builtin_cd(args: &[String], _out: &mut dyn Write) -> io::Result<()> {
    let path = args.first().map(|arg| arg.as_str()).unwrap_or("~");
    let path = shellexpand::tilde(path);
    env::set_current_dir(path.as_ref())
}

fn builtin_pwd(_args: &[String], out: &mut dyn Write) -> io::Result<()> {
    let dir = env::current_dir()?;
    writeln!(out, "{}", dir.display())
}

fn builtin_which(args: &[String], out: &mut dyn Write) -> io::Result<()> {
    for name in args {
        let found = find_file_in_path(name, true);
        if found.is_empty() {
            writeln!(out, "{} not found", name)?;
        } else {
            writeln!(out, "{}", found)?;
        }
    }
    Ok(())
}

fn builtin_exit(args: &[String], _out: &mut dyn Write) -> io::Result<()> {
    let code = match args.first() {
        Some(arg) => arg.parse::<i32>().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("exit: {}: numeric argument required", arg),
            )
        })?,
        None => 0,
    };
    process::exit(code)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        assert!(lookup("cd").is_some());
        assert!(lookup("pwd").is_some());
        assert!(lookup("exit").is_some());
        assert!(lookup("ls").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_pwd_writes_current_dir() {
        let mut out = Vec::new();
        builtin_pwd(&[], &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.ends_with('\n'));
        assert!(!printed.trim().is_empty());
    }

    #[test]
    fn test_exit_rejects_non_numeric_argument() {
        let mut out = Vec::new();
        let err = builtin_exit(&["nope".to_string()], &mut out).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_which_reports_missing_commands() {
        let mut out = Vec::new();
        builtin_which(&["surely-not-installed-anywhere".to_string()], &mut out).unwrap();
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("not found"));
    }
}
