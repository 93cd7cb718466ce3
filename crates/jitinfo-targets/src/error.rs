//! Errors raised while loading or checking target descriptions.

use std::path::PathBuf;

/// Failures of the target-description layer. Registration itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum TargetError {
    /// Malformed `.target.toml` contents.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A description path that does not exist.
    #[error("target file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Neither a built-in preset nor a readable file.
    #[error("unknown target: '{name}'")]
    UnknownTarget { name: String },

    /// A description that loaded but is inconsistent.
    #[error("invalid target description: {detail}")]
    Validation { detail: String },
}

pub type Result<T> = std::result::Result<T, TargetError>;
