use std::path::PathBuf;

use thiserror::Error;

/// Reasons a monetary string could not be parsed, converted or totalled.
///
/// The lenient formatting API never returns these; it renders a zero amount
/// instead. They surface through the `render_*` and `try_*` entry points.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurrencyError {
    #[error("input is empty")]
    Empty,
    #[error("input does not start with an amount")]
    NoAmount,
    #[error("`{lexeme}` is not a valid number")]
    InvalidNumber {
        lexeme: String,
        /// Currency code that followed the malformed amount, if any.
        currency: String,
    },
    #[error("unexpected trailing input `{rest}`")]
    TrailingInput { rest: String },
    #[error("amount has no currency code")]
    MissingCurrency,
    #[error("no conversion from `{from}` to `{to}`")]
    UnsupportedConversion { from: String, to: String },
    #[error("total is not a finite number")]
    NonFiniteTotal,
}

/// Failures raised by report persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Backend error: {0}")]
    Backend(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Store file `{}` is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("Update of `{key}` aborted: {reason}")]
    Transform { key: String, reason: String },
}

/// Errors surfaced while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
