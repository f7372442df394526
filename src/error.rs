//! Error types for the journal compiler
//!
//! Two families live here:
//! - [`JournalError`]: compile diagnostics. Their `Display` output is the
//!   human-readable error string handed to downstream tools, so the wording
//!   is part of the external contract.
//! - [`Error`]: infrastructure failures (I/O, configuration, walking).

use thiserror::Error;

/// Result type for infrastructure operations
pub type Result<T> = std::result::Result<T, Error>;

/// A single compile diagnostic for one component of a journal document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JournalError {
    #[error("Error: First component expected to be /meta component")]
    MetaNotFirst,

    #[error("Error: Second component expected to be /introduction component")]
    IntroductionNotSecond,

    #[error("Error: Tokenizer for \"{0}\" not implemented")]
    TokenizerNotImplemented(String),

    /// A second `/meta` or `/introduction` component
    #[error("Error: {0} component may appear only once")]
    DuplicateComponent(String),

    /// A property line (or content line) that could not be tokenized
    #[error("Error in {header} properties: {message}: \"{line}\"")]
    Property {
        header: String,
        message: String,
        line: String,
    },

    /// An inline property value that does not match its micro-grammar
    #[error("Error in {header} properties: {hint}")]
    InlineSyntax { header: String, hint: String },

    /// A token map that failed record construction
    #[error("Error in {component}: {message}: \"{target}\"")]
    Validation {
        component: String,
        message: String,
        target: String,
    },
}

/// Infrastructure errors
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::ser::Error),
}
