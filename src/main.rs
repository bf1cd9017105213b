use log::{error, info, warn};
use std::io;
use std::process::ExitCode;

use book_log::config::AppConfig;
use book_log::console::Session;
use book_log::logging;

fn main() -> ExitCode {
    let config_path = AppConfig::config_path();
    let mut config = match AppConfig::from_file(&config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // The logger is configured from the file, so it can only start now
    logging::init(&config.logging);
    if config_path.exists() {
        info!("Loaded configuration from {}", config_path.display());
    } else {
        warn!("Config file {} not found, using defaults", config_path.display());
    }
    config.apply_env();
    info!("Starting book log with {:?} store at {}", config.database.backend, config.database.path);

    let store = match config.database.create_store() {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open book store: {}", e);
            eprintln!("Could not open the book log: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut session = Session::new(&*store, stdin.lock(), io::stdout());
    if let Err(e) = session.run() {
        warn!("Console session aborted: {}", e);
        eprintln!("Console error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
