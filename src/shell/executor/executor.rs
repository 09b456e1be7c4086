use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::shell::parser::ast::{Command as ShellCommand, CommandPipeline, RedirectMode};
use crate::shell::signals;

use super::builtins;

/// Interprets parsed pipelines: builtins run in-process against an explicit
/// output stream, everything else spawns as an OS-level pipe chain.
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(&mut self, pipeline: &CommandPipeline) -> io::Result<()> {
        // A builtin only dispatches as the sole command of a statement; in
        // the middle of a pipe chain the word means an external program.
        if let [command] = pipeline.commands.as_slice() {
            if let Some(handler) = builtins::lookup(&command.name) {
                debug!("running builtin: {:?}", command);
                return self.run_builtin(handler, command, pipeline);
            }
        }

        debug!("running pipeline: {:?}", pipeline);
        let status = self.run_pipeline(pipeline)?;
        if status.success() {
            Ok(())
        } else {
            Err(io::Error::new(
                io::ErrorKind::Other,
                format!("exit code {}", status.code().unwrap_or(1)),
            ))
        }
    }

    fn run_builtin(
        &self,
        handler: builtins::Builtin,
        command: &ShellCommand,
        pipeline: &CommandPipeline,
    ) -> io::Result<()> {
        match &pipeline.redirects.output {
            Some(path) => {
                let mut file = open_output(path, pipeline.redirects.mode)?;
                handler(&command.args, &mut file)?;
                file.flush()
            }
            None => {
                let stdout = io::stdout();
                let mut out = stdout.lock();
                handler(&command.args, &mut out)?;
                out.flush()
            }
        }
    }

    fn run_pipeline(&self, pipeline: &CommandPipeline) -> io::Result<ExitStatus> {
        let last = pipeline.commands.len().saturating_sub(1);
        let mut children: Vec<Child> = Vec::with_capacity(pipeline.commands.len());

        for (i, command) in pipeline.commands.iter().enumerate() {
            let mut process = Command::new(&command.name);
            process.args(&command.args);

            if i == 0 {
                match &pipeline.redirects.input {
                    Some(path) => process.stdin(File::open(path)?),
                    None => process.stdin(Stdio::inherit()),
                };
            } else {
                match children.last_mut().and_then(|child| child.stdout.take()) {
                    Some(stdout) => process.stdin(Stdio::from(stdout)),
                    None => process.stdin(Stdio::null()),
                };
            }

            if i == last {
                match &pipeline.redirects.output {
                    Some(path) => {
                        process.stdout(open_output(path, pipeline.redirects.mode)?);
                    }
                    None => {
                        process.stdout(Stdio::inherit());
                    }
                };
            } else {
                process.stdout(Stdio::piped());
            }

            // The shell ignores job-control signals; children must not.
            unsafe {
                process.pre_exec(signals::restore_default_signals);
            }

            let child = process.spawn().map_err(|err| match err.kind() {
                io::ErrorKind::NotFound => io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{}: command not found", command.name),
                ),
                _ => err,
            })?;
            children.push(child);
        }

        // Every stage gets reaped; the pipeline reports the last status.
        let mut status = None;
        for mut child in children {
            status = Some(child.wait()?);
        }
        status.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty pipeline"))
    }
}

fn open_output(path: &str, mode: RedirectMode) -> io::Result<File> {
    match mode {
        RedirectMode::Truncate => File::create(path),
        RedirectMode::Append => OpenOptions::new().create(true).append(true).open(path),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::shell::parser::ast::RedirectSpec;
    use std::fs;
    use std::path::PathBuf;

    fn command(name: &str, args: &[&str]) -> ShellCommand {
        ShellCommand {
            name: name.to_string(),
            args: args.iter().map(|arg| arg.to_string()).collect(),
        }
    }

    fn temp_file(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("whelk-executor-{}-{}", tag, std::process::id()))
    }

    #[test]
    fn test_output_redirect_truncates() {
        let path = temp_file("truncate");
        let pipeline = CommandPipeline {
            commands: vec![command("echo", &["hello"])],
            redirects: RedirectSpec {
                output: Some(path.display().to_string()),
                ..RedirectSpec::default()
            },
        };

        let mut executor = Executor::new();
        executor.execute(&pipeline).unwrap();
        executor.execute(&pipeline).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_output_redirect_appends() {
        let path = temp_file("append");
        let _ = fs::remove_file(&path);
        let pipeline = CommandPipeline {
            commands: vec![command("echo", &["line"])],
            redirects: RedirectSpec {
                output: Some(path.display().to_string()),
                mode: RedirectMode::Append,
                ..RedirectSpec::default()
            },
        };

        let mut executor = Executor::new();
        executor.execute(&pipeline).unwrap();
        executor.execute(&pipeline).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "line\nline\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_commands_chain_through_pipes() {
        let path = temp_file("chain");
        let pipeline = CommandPipeline {
            commands: vec![command("echo", &["pipework"]), command("cat", &[])],
            redirects: RedirectSpec {
                output: Some(path.display().to_string()),
                ..RedirectSpec::default()
            },
        };

        Executor::new().execute(&pipeline).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "pipework\n");
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_input_redirect_feeds_first_command() {
        let input = temp_file("input-src");
        let output = temp_file("input-dst");
        fs::write(&input, "from a file\n").unwrap();
        let pipeline = CommandPipeline {
            commands: vec![command("cat", &[])],
            redirects: RedirectSpec {
                input: Some(input.display().to_string()),
                output: Some(output.display().to_string()),
                ..RedirectSpec::default()
            },
        };

        Executor::new().execute(&pipeline).unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap(), "from a file\n");
        fs::remove_file(&input).unwrap();
        fs::remove_file(&output).unwrap();
    }

    #[test]
    fn test_unknown_command_reports_not_found() {
        let pipeline = CommandPipeline {
            commands: vec![command("whelk-no-such-program", &[])],
            redirects: RedirectSpec::default(),
        };

        let err = Executor::new().execute(&pipeline).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("command not found"));
    }

    #[test]
    fn test_failing_command_maps_to_error() {
        let pipeline = CommandPipeline {
            commands: vec![command("false", &[])],
            redirects: RedirectSpec::default(),
        };

        let err = Executor::new().execute(&pipeline).unwrap_err();
        assert!(err.to_string().contains("exit code"));
    }

    #[test]
    fn test_builtin_output_honours_redirect() {
        let path = temp_file("builtin");
        let pipeline = CommandPipeline {
            commands: vec![command("pwd", &[])],
            redirects: RedirectSpec {
                output: Some(path.display().to_string()),
                ..RedirectSpec::default()
            },
        };

        Executor::new().execute(&pipeline).unwrap();

        assert!(!fs::read_to_string(&path).unwrap().trim().is_empty());
        fs::remove_file(&path).unwrap();
    }
}
