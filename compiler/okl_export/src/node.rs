//! Export graph nodes.
//!
//! Every exported type materializes as an [`ExportNode`] held in the
//! [`ExportContext`](crate::registry::ExportContext) arena and addressed
//! by [`NodeId`]. The node variants form a closed sum: primitives
//! (including vectors, matrices, and device objects), pointers, constant
//! arrays, and records.

use smallvec::SmallVec;

use crate::data_type::DataType;
use crate::layout::AbiType;

/// Handle to a node in the export arena.
///
/// Ids are dense indices; equality of ids implies identity of nodes
/// within one context, but named types are additionally deduplicated by
/// name so the converse usually holds as well.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Wrap a raw arena index.
    #[inline]
    pub const fn from_raw(raw: u32) -> NodeId {
        NodeId(raw)
    }

    /// The raw arena index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Coarse classification of a node, one per variant of [`NodeKind`]
/// with primitives split out by their payload.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum NodeClass {
    Primitive,
    Vector,
    Matrix,
    Pointer,
    ConstantArray,
    Record,
}

impl std::fmt::Display for NodeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            NodeClass::Primitive => "primitive",
            NodeClass::Vector => "vector",
            NodeClass::Matrix => "matrix",
            NodeClass::Pointer => "pointer",
            NodeClass::ConstantArray => "constant array",
            NodeClass::Record => "record",
        };
        f.write_str(s)
    }
}

/// A named, typed member of an exported record.
#[derive(Clone, Debug)]
pub struct Field {
    pub name: String,
    pub ty: NodeId,
    /// Byte offset within the record, computed at construction time
    /// from the target layout.
    pub offset: u64,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: NodeId, offset: u64) -> Field {
        Field {
            name: name.into(),
            ty,
            offset,
        }
    }
}

/// The payload of an export node.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// A scalar or device-object type with a wire-stable tag.
    Primitive { data_type: DataType },
    /// A short vector of a scalar primitive.
    Vector { data_type: DataType, len: u32 },
    /// A square float matrix (2x2, 3x3, or 4x4).
    Matrix { data_type: DataType },
    /// A pointer; only legal at the top level of an exported variable.
    Pointer { pointee: NodeId },
    /// A constant-length array.
    ConstantArray { elem: NodeId, len: u32 },
    /// A struct with laid-out fields.
    Record {
        fields: SmallVec<[Field; 4]>,
        /// True when field offsets ignore natural alignment.
        packed: bool,
        /// True when the record was synthesized rather than written by
        /// the user (unions that passed validation are re-exported this
        /// way in some frontends; kept for reflection consumers).
        artificial: bool,
        /// Bytes written when a value is stored, without tail padding.
        store_size: u64,
        /// Stride between consecutive values, with tail padding.
        alloc_size: u64,
    },
}

/// A node in the export graph: a canonical name, the payload, and a
/// memoized ABI materialization.
#[derive(Clone, Debug)]
pub struct ExportNode {
    name: String,
    kind: NodeKind,
    /// Lazily materialized ABI type; cleared when the node is marked
    /// kept so later passes re-materialize against current state.
    abi: Option<AbiType>,
    /// Marked by pruning passes when the node is resurrected as live.
    kept: bool,
}

impl ExportNode {
    pub(crate) fn new(name: String, kind: NodeKind) -> ExportNode {
        ExportNode {
            name,
            kind,
            abi: None,
            kept: false,
        }
    }

    /// Canonical name of the node. Dummy names (angle-bracketed) mark
    /// nodes that are not registered in the name table.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Coarse class of the node.
    pub fn class(&self) -> NodeClass {
        match &self.kind {
            NodeKind::Primitive { .. } => NodeClass::Primitive,
            NodeKind::Vector { .. } => NodeClass::Vector,
            NodeKind::Matrix { .. } => NodeClass::Matrix,
            NodeKind::Pointer { .. } => NodeClass::Pointer,
            NodeKind::ConstantArray { .. } => NodeClass::ConstantArray,
            NodeKind::Record { .. } => NodeClass::Record,
        }
    }

    /// The wire-stable tag of a primitive, vector, or matrix node.
    pub fn data_type(&self) -> Option<DataType> {
        match self.kind {
            NodeKind::Primitive { data_type }
            | NodeKind::Vector { data_type, .. }
            | NodeKind::Matrix { data_type } => Some(data_type),
            _ => None,
        }
    }

    /// Matrix dimension (2, 3, or 4) of a matrix node.
    pub fn matrix_dim(&self) -> Option<u32> {
        match self.kind {
            NodeKind::Matrix { data_type } => data_type.matrix_dim(),
            _ => None,
        }
    }

    /// Vector width; `1` for non-vector nodes, matching how reflection
    /// consumers treat scalars.
    pub fn vector_len(&self) -> u32 {
        match self.kind {
            NodeKind::Vector { len, .. } => len,
            _ => 1,
        }
    }

    #[inline]
    pub(crate) fn abi(&self) -> Option<&AbiType> {
        self.abi.as_ref()
    }

    #[inline]
    pub(crate) fn set_abi(&mut self, abi: AbiType) {
        self.abi = Some(abi);
    }

    /// Whether the node was marked live by a pruning pass.
    #[inline]
    pub fn is_kept(&self) -> bool {
        self.kept
    }

    #[inline]
    pub(crate) fn mark_kept(&mut self) {
        self.kept = true;
        self.abi = None;
    }
}

#[cfg(test)]
mod tests;
