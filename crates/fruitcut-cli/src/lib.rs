//! Fruitcut CLI library
//!
//! Argument parsing, configuration loading and the session runner behind the
//! `fruitcut` binary.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;

pub use app::FruitcutApp;
pub use cli::Cli;
pub use config::AppConfig;
pub use error::{CliError, Result};
