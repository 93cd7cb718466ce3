//! Compile-request lifecycle for the JIT back end.
//!
//! A [`JitBackend`] registers the target's architecture, features and
//! supported types into a single live slot, then hands them to a
//! [`CompileRequest`] by move. The request answers the embedding client's
//! queries and resolves built-in signatures through its own cache.

pub mod backend;
pub mod error;
pub mod lifecycle;
pub mod request;

pub use backend::JitBackend;
pub use error::{Result, SessionError};
pub use lifecycle::TargetInfoSlot;
pub use request::{CompileRequest, Pass};
