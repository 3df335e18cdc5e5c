use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown convention name: {name} (known: {})", .known.join(", "))]
    UnknownConvention { name: String, known: Vec<String> },

    #[error("'{input}' does not match template '{template}'")]
    ParseMismatch { template: String, input: String },

    #[error("Path '{}' {reason}", .path.display())]
    PathShapeMismatch { path: PathBuf, reason: String },

    #[error("Ambiguous template '{pattern}': {{{first}}} and {{{second}}} have no literal text between them")]
    AmbiguousTemplate {
        pattern: String,
        first: String,
        second: String,
    },

    #[error("Invalid template '{pattern}': {reason}")]
    InvalidTemplate { pattern: String, reason: String },

    #[error("Cannot decode date '{value}': {reason}")]
    DateFormat { value: String, reason: String },

    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
