//! OKL IR - source-level type model.
//!
//! This crate contains the data structures the semantic analyzer hands to
//! the export engine:
//! - Spans for source locations
//! - Builtin kinds of the host language
//! - The resolved source type pool (`TypePool`, `TypeRef`, `TypeKind`)
//! - Declarations with linkage (`VarDecl`)
//!
//! Types are arena-allocated and referenced by 32-bit indices; a `TypeRef`
//! is stable for the lifetime of its pool and cheap to copy and hash.

mod builtin;
mod source_type;
mod span;

pub use builtin::Builtin;
pub use source_type::{
    FieldDef, Linkage, RecordDef, TypeKind, TypePool, TypeRef, VarDecl,
};
pub use span::Span;
