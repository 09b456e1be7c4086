use std::io;

use log::warn;
use nix::sys::signal::{signal, SigHandler, Signal};

/// The interactive shell must survive Ctrl-C and Ctrl-\ aimed at whatever is
/// running in the foreground.
pub fn ignore_interactive_signals() {
    for sig in [Signal::SIGINT, Signal::SIGQUIT] {
        if let Err(err) = unsafe { signal(sig, SigHandler::SigIgn) } {
            warn!("failed to ignore {}: {}", sig, err);
        }
    }
}

/// Runs in a spawned child between fork and exec: children take the default
/// dispositions back, so Ctrl-C still interrupts them.
pub fn restore_default_signals() -> io::Result<()> {
    for sig in [Signal::SIGINT, Signal::SIGQUIT] {
        unsafe { signal(sig, SigHandler::SigDfl) }.map_err(io::Error::from)?;
    }
    Ok(())
}
