//! Error types for the CLI application.
//!
//! Every command handler returns `Result<(), CliError>`; [`crate::run`] maps
//! the variant to an exit code.

use crate::config::ConfigError;
use noughts_ai::AdvisorError;
use noughts_engine::errors::GameError;
use std::fmt;

/// Custom error type for CLI operations.
#[derive(Debug)]
pub enum CliError {
    /// I/O error (stdin reads, stdout/stderr writes)
    Io(std::io::Error),

    /// Invalid user input or command-line arguments
    InvalidInput(String),

    /// Configuration error
    Config(String),

    /// Engine or advisor rejected the request
    Engine(String),

    /// Input ended before the command could finish
    Interrupted(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Io(e) => write!(f, "I/O error: {}", e),
            CliError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Engine(msg) => write!(f, "Engine error: {}", msg),
            CliError::Interrupted(msg) => write!(f, "Interrupted: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<ConfigError> for CliError {
    fn from(error: ConfigError) -> Self {
        CliError::Config(error.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(error: GameError) -> Self {
        match error {
            GameError::InvalidBoard(msg) => CliError::InvalidInput(msg),
            other => CliError::Engine(other.to_string()),
        }
    }
}

impl From<AdvisorError> for CliError {
    fn from(error: AdvisorError) -> Self {
        match error {
            AdvisorError::UnknownAdvisor(_) => CliError::Config(error.to_string()),
            other => CliError::Engine(other.to_string()),
        }
    }
}
