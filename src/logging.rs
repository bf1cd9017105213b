//! Logger setup
//!
//! log4rs when its YAML file is present, otherwise env_logger honouring
//! `RUST_LOG`. Neither writes to the terminal by default, so log lines do not
//! interleave with the interactive prompts.

use std::fs::OpenOptions;
use std::path::Path;

use crate::config::LoggingConfig;

/// Install the process-wide logger. Call once, before anything logs.
pub fn init(logging: &LoggingConfig) {
    if Path::new(&logging.config_file).exists() {
        match log4rs::init_file(&logging.config_file, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Failed to load log config {}: {}", logging.config_file, e),
        }
    }
    env_logger::Builder::from_default_env()
        .target(fallback_target(&logging.fallback_file))
        .init();
}

/// Append to `path`, or stderr when it cannot be opened
pub fn fallback_target<P: AsRef<Path>>(path: P) -> env_logger::Target {
    let path = path.as_ref();
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => env_logger::Target::Pipe(Box::new(file)),
        Err(e) => {
            eprintln!("Cannot open log file {}: {}. Logging to stderr.", path.display(), e);
            env_logger::Target::Stderr
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_fallback_target_uses_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("book_log.log");

        let target = fallback_target(&path);
        assert!(matches!(target, env_logger::Target::Pipe(_)));
        assert!(path.exists());
    }

    #[test]
    fn test_fallback_target_unopenable_uses_stderr() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened for appending
        let target = fallback_target(dir.path());
        assert!(matches!(target, env_logger::Target::Stderr));
    }
}
