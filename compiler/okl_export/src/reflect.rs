//! Target-neutral reflection descriptors.
//!
//! Flattening reduces a node to one reflection-table row plus three
//! modifiers. It is total over every node class except records, which
//! the external reflector walks field by field instead.

use crate::data_type::ReflectionType;
use crate::node::{NodeId, NodeKind};
use crate::registry::ExportContext;

/// Flattened description of a non-record node.
#[derive(Copy, Clone, Debug)]
pub struct ReflectionData {
    /// The reflection-table row of the base kind.
    pub ty: &'static ReflectionType,
    /// Vector width; `1` for scalars.
    pub vec_size: u32,
    pub is_pointer: bool,
    /// Array length; `0` when the node is not an array. Never nested:
    /// arrays of arrays cannot be exported.
    pub array_size: u32,
}

/// Flatten a node into a reflection descriptor.
///
/// Records return `None`; everything else flattens to its base row.
pub fn flatten(cx: &ExportContext, id: NodeId) -> Option<ReflectionData> {
    match *cx.node(id).kind() {
        NodeKind::Primitive { data_type } | NodeKind::Matrix { data_type } => {
            Some(ReflectionData {
                ty: data_type.reflection(),
                vec_size: 1,
                is_pointer: false,
                array_size: 0,
            })
        }
        NodeKind::Vector { data_type, len } => Some(ReflectionData {
            ty: data_type.reflection(),
            vec_size: len,
            is_pointer: false,
            array_size: 0,
        }),
        NodeKind::Pointer { pointee } => {
            let mut data = flatten(cx, pointee)?;
            data.is_pointer = true;
            Some(data)
        }
        NodeKind::ConstantArray { elem, len } => {
            let mut data = flatten(cx, elem)?;
            data.array_size = len;
            Some(data)
        }
        NodeKind::Record { .. } => None,
    }
}
