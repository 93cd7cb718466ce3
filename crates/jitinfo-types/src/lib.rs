//! Type descriptions for the jitinfo back-end interface.
//!
//! Two layers live here:
//! - **Portable tags** ([`PortableType`]): the closed set of descriptors
//!   exposed to embedding clients.
//! - **Internal types** ([`TypeArena`]): the back end's own,
//!   architecture-dependent representation, with identity-bearing
//!   canonical nodes ([`CanonicalTypes`]) laid out per [`DataModel`].

pub mod canonical;
pub mod internal;
pub mod model;
pub mod portable;

pub use canonical::CanonicalTypes;
pub use internal::{
    FunctionType, LaneCount, ParamTerminator, Qualifiers, TypeArena, TypeId, TypeKind, TypeNode,
};
pub use model::DataModel;
pub use portable::{FloatWidth, IntWidth, PortableType, Signedness};
