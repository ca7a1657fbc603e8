//! Error handling for the Fruitcut CLI

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Fruitcut core error: {0}")]
    Core(#[from] fruitcut_core::FruitcutError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
