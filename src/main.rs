use log::debug;
use std::env;
use std::error::Error;
use std::fs::File;
use std::io;

use whelk::shell::Shell;
use whelk::utils::config::Config;
use whelk::utils::log::init_logger;

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::new();
    init_logger(&config);
    debug!("configuration loaded from {}", config.config_dir.display());

    let mut shell = Shell::new(&config)?;

    // First positional argument is a script to run; piped input runs in
    // batch mode; a terminal gets the interactive prompt.
    match env::args().nth(1) {
        Some(path) => {
            debug!("running script {}", path);
            shell.run_batch(File::open(&path)?)
        }
        None if stdin_is_tty() => shell.run(),
        None => shell.run_batch(io::stdin()),
    }
}

fn stdin_is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) == 1 }
}
