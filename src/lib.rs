// OledSense Library - Public API

// Re-export error types
pub mod error;
pub use error::{OledSenseError, Result};

// Module declarations
pub mod core;
pub mod gamesense;
pub mod platform;

// Re-export commonly used types
pub use core::config::Settings;

// Initialize logging
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}
