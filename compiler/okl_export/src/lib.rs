//! Export-type graph builder and validator.
//!
//! Given a resolved source type from `okl_ir`, this crate decides whether
//! the type may cross the host/device ABI boundary, builds a canonical,
//! deduplicated representation of it, and computes its ABI layout for
//! code generation and reflection.
//!
//! The pipeline, leaves first:
//! - [`name`]: derive a stable canonical name for any source type (the
//!   dedup key).
//! - [`validate`]: recursive structural exportability check; rejections
//!   flow into the diagnostics sink and propagate as `None`.
//! - [`gate`]: a second ruleset enforcing target-API gating and the
//!   restricted dialect on declarations being exported.
//! - [`ExportContext`]: the per-unit registry owning the node arena and
//!   the canonical-name memo table, plus the per-class factories.
//! - [`layout`]: lazy ABI materialization (store size, alloc size, field
//!   offsets) against the target data-layout provider.
//! - [`reflect`]: flattening a node into a target-neutral reflection
//!   descriptor.
//!
//! The engine is single-threaded and pass-oriented: one unit, one
//! declaration at a time. A failed declaration never aborts the unit;
//! the unit fails iff the diagnostics sink recorded any error once all
//! declarations were processed.

mod builtin_map;
mod data_type;
mod factory;
pub mod gate;
pub mod layout;
pub mod name;
mod node;
pub mod reflect;
mod registry;
pub mod validate;

pub use builtin_map::{builtin_info, BuiltinEntry, SpecificTypes};
pub use data_type::{Category, DataType, ReflectionType, REFLECTION_TABLE};
pub use gate::{MIN_API_OBJECT_IN_COMPOSITE, MIN_API_VEC3_FIELD};
pub use layout::{AbiType, DataLayout, StructLayout, TargetLayout, TargetWidth};
pub use node::{ExportNode, Field, NodeClass, NodeId, NodeKind};
pub use reflect::ReflectionData;
pub use registry::{ExportContext, TargetConfig};
