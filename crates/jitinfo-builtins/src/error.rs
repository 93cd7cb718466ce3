//! Built-in error types.

/// Errors raised while translating types or reading built-in prototypes.
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    /// A floating type reached the width fallback with a width no portable
    /// tag exists for. The target description is broken; not recoverable.
    #[error("unsupported floating-point width: {bytes} bytes")]
    UnsupportedFloatWidth { bytes: u64 },

    /// A catalogue prototype could not be read.
    #[error("invalid built-in prototype: {detail}")]
    InvalidPrototype { detail: String },

    /// A prototype names a type the back end does not define.
    #[error("unknown type name '{name}'")]
    UnknownTypedef { name: String },
}

/// Result type alias for built-in operations.
pub type Result<T> = std::result::Result<T, BuiltinError>;
