//! Built-in functions of the JIT back end, as seen by embedding clients.
//!
//! Translates internal types into portable tags ([`TypeTranslator`]),
//! reads the back end's built-in catalogue ([`catalog`]) and caches the
//! translated signatures per request ([`BuiltinCache`]).

pub mod cache;
pub mod catalog;
pub mod decl;
pub mod error;
pub mod prototype;
pub mod translate;

pub use cache::{BuiltinCache, CacheStats};
pub use catalog::CatalogEntry;
pub use decl::{BuiltinDecl, BuiltinSignature};
pub use error::{BuiltinError, Result};
pub use prototype::{ProtoType, Prototype, TypeNames};
pub use translate::TypeTranslator;
