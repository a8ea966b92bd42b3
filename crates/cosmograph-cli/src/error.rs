//! Error types for the CLI application.

use cosmograph_extractor::{ExtractorError, PatternConfigError};
use cosmograph_llm::LlmError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Extraction error
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Pattern configuration error
    #[error(transparent)]
    Pattern(#[from] PatternConfigError),

    /// Language-model provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nothing matched the input
    #[error("No files matching '{pattern}' in {dir}")]
    NoInput {
        /// File name pattern
        pattern: String,
        /// Directory searched
        dir: String,
    },
}
