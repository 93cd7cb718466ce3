//! Session error types.

use jitinfo_builtins::BuiltinError;
use jitinfo_targets::TargetError;

/// Errors raised by the compile-request lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// A new registration began before the previous request's target info was taken.
    #[error("target info of the previous request was never taken")]
    UnconsumedTargetInfo,

    /// `enter_playback` was called on a request already in playback.
    #[error("request is already in the playback pass")]
    AlreadyInPlayback,

    #[error(transparent)]
    Target(#[from] TargetError),

    #[error(transparent)]
    Builtin(#[from] BuiltinError),
}

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
