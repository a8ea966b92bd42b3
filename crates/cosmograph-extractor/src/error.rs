//! Error types for the extractors

use cosmograph_llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input file could not be read
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Pattern configuration rejected at load time
    #[error(transparent)]
    Pattern(#[from] PatternConfigError),

    /// PDF requires a password
    #[error("PDF is password-protected: {file}")]
    PdfEncrypted {
        /// File name
        file: String,
    },

    /// PDF has no text layer (likely a scan)
    #[error("PDF appears to be scanned (no extractable text): {file}")]
    PdfNoText {
        /// File name
        file: String,
    },

    /// PDF could not be parsed
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Language-model provider error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The operator declined the cost estimate
    #[error("Extraction declined by operator")]
    Declined,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Strategy name not recognized
    #[error("Unknown extraction strategy: {0}")]
    UnknownStrategy(String),

    /// Strategy cannot process this file type
    #[error("Strategy '{strategy}' does not support {file}")]
    UnsupportedFile {
        /// Strategy name
        strategy: String,
        /// File name
        file: String,
    },
}

impl ExtractorError {
    /// Whether the pipeline stopped because the operator declined
    ///
    /// A decline is a normal termination, not a failure.
    pub fn is_declined(&self) -> bool {
        matches!(self, ExtractorError::Declined)
    }
}

/// Errors raised while loading a pattern configuration
#[derive(Error, Debug)]
pub enum PatternConfigError {
    /// The file has no content
    #[error("Pattern configuration is empty: {path}")]
    Empty {
        /// Origin of the configuration
        path: String,
    },

    /// The document is not valid TOML/JSON or misses required fields
    #[error("Malformed pattern configuration {path}: {reason}")]
    Malformed {
        /// Origin of the configuration
        path: String,
        /// Parser message
        reason: String,
    },

    /// A pattern does not compile
    #[error("Invalid regex in pattern '{name}': {reason}")]
    InvalidRegex {
        /// Pattern name
        name: String,
        /// Compiler message
        reason: String,
    },

    /// A pattern does not have exactly one capture group
    #[error("Pattern '{name}' must have exactly one capture group, got {found}")]
    CaptureGroups {
        /// Pattern name
        name: String,
        /// Number of capture groups found
        found: usize,
    },

    /// A relationship trigger pattern does not compile
    #[error("Invalid trigger pattern in '{name}': {reason}")]
    InvalidTrigger {
        /// Trigger name
        name: String,
        /// Compiler message
        reason: String,
    },

    /// A scalar setting is out of range
    #[error("Invalid pattern configuration: {0}")]
    Invalid(String),

    /// The file could not be read
    #[error("Failed to read pattern configuration {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}
