use std::borrow::Cow;
use std::env;
use std::fs::read_dir;
use std::io::ErrorKind;
use std::os::unix::fs::PermissionsExt;

use log::error;

pub fn basename(path: &str) -> Cow<'_, str> {
    let mut pieces = path.rsplit('/');
    match pieces.next() {
        Some(p) => p.into(),
        None => path.into(),
    }
}

/// Walk $PATH looking for `filename`; with `exec` set, only files with an
/// execute bit count. Returns an empty string when nothing matches.
pub fn find_file_in_path(filename: &str, exec: bool) -> String {
    let env_path = match env::var("PATH") {
        Ok(x) => x,
        Err(e) => {
            error!("whelk: error with env PATH: {:?}", e);
            return String::new();
        }
    };
    for p in env_path.split(':') {
        match read_dir(p) {
            Ok(list) => {
                for entry in list.flatten() {
                    if let Ok(name) = entry.file_name().into_string() {
                        if name != filename {
                            continue;
                        }

                        if exec {
                            let metadata = match entry.metadata() {
                                Ok(x) => x,
                                Err(e) => {
                                    error!("whelk: metadata error: {:?}", e);
                                    continue;
                                }
                            };
                            let mode = metadata.permissions().mode();
                            if mode & 0o111 == 0 {
                                // not executable
                                continue;
                            }
                        }

                        return entry.path().to_string_lossy().to_string();
                    }
                }
            }
            Err(e) => {
                if e.kind() == ErrorKind::NotFound {
                    continue;
                }
                error!("whelk: fs read_dir error: {}: {}", p, e);
            }
        }
    }
    String::new()
}

pub fn current_dir() -> String {
    let current_dir = match env::current_dir() {
        Ok(x) => x,
        Err(e) => {
            error!("whelk: env current_dir error: {}", e);
            return String::new();
        }
    };

    current_dir.to_string_lossy().to_string()
}
