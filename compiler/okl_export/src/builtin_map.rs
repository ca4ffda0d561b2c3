//! Mapping from source builtins and device-specific record names to
//! [`DataType`] kinds.
//!
//! Device-specific types (`okl_matrix2x2`, `okl_allocation`, ...) are
//! ordinary record declarations in the headers the kernel includes; the
//! engine recognizes them by name. The name table is built once per
//! [`crate::ExportContext`] rather than kept in process-wide static
//! state, so contexts stay independent and testable in isolation.

use okl_ir::{Builtin, TypeKind, TypePool, TypeRef};
use rustc_hash::FxHashMap;

use crate::DataType;

/// Export info for one exportable builtin kind: its `DataType` and the
/// canonical scalar/vector spellings (`float`, `float2`, `float3`,
/// `float4`).
#[derive(Copy, Clone, Debug)]
pub struct BuiltinEntry {
    pub data_type: DataType,
    pub names: [&'static str; 4],
}

const fn entry(data_type: DataType, names: [&'static str; 4]) -> BuiltinEntry {
    BuiltinEntry { data_type, names }
}

/// Export info for a builtin kind, or `None` if the kind cannot cross
/// the ABI boundary (platform-dependent width).
pub const fn builtin_info(b: Builtin) -> Option<BuiltinEntry> {
    Some(match b {
        Builtin::Bool => entry(DataType::Boolean, ["bool", "bool2", "bool3", "bool4"]),
        Builtin::Char => entry(DataType::Signed8, ["char", "char2", "char3", "char4"]),
        Builtin::UChar => entry(DataType::Unsigned8, ["uchar", "uchar2", "uchar3", "uchar4"]),
        Builtin::Short => entry(DataType::Signed16, ["short", "short2", "short3", "short4"]),
        Builtin::UShort => entry(
            DataType::Unsigned16,
            ["ushort", "ushort2", "ushort3", "ushort4"],
        ),
        Builtin::Int => entry(DataType::Signed32, ["int", "int2", "int3", "int4"]),
        Builtin::UInt => entry(DataType::Unsigned32, ["uint", "uint2", "uint3", "uint4"]),
        Builtin::Long => entry(DataType::Signed64, ["long", "long2", "long3", "long4"]),
        Builtin::ULong => entry(
            DataType::Unsigned64,
            ["ulong", "ulong2", "ulong3", "ulong4"],
        ),
        Builtin::Half => entry(DataType::Float16, ["half", "half2", "half3", "half4"]),
        Builtin::Float => entry(DataType::Float32, ["float", "float2", "float3", "float4"]),
        Builtin::Double => entry(
            DataType::Float64,
            ["double", "double2", "double3", "double4"],
        ),
        Builtin::LongDouble | Builtin::WChar => return None,
    })
}

/// Names of the device-specific record types the engine recognizes.
const SPECIFIC_TYPE_NAMES: [(&str, DataType); 15] = [
    ("okl_matrix2x2", DataType::Matrix2x2),
    ("okl_matrix3x3", DataType::Matrix3x3),
    ("okl_matrix4x4", DataType::Matrix4x4),
    ("okl_element", DataType::Element),
    ("okl_type", DataType::Type),
    ("okl_allocation", DataType::Allocation),
    ("okl_sampler", DataType::Sampler),
    ("okl_script", DataType::Script),
    ("okl_mesh", DataType::Mesh),
    ("okl_path", DataType::Path),
    ("okl_program_fragment", DataType::ProgramFragment),
    ("okl_program_vertex", DataType::ProgramVertex),
    ("okl_program_raster", DataType::ProgramRaster),
    ("okl_program_store", DataType::ProgramStore),
    ("okl_font", DataType::Font),
];

/// Lookup table for device-specific record types, built per context.
#[derive(Debug)]
pub struct SpecificTypes {
    by_name: FxHashMap<&'static str, DataType>,
}

impl SpecificTypes {
    /// Build the name table.
    pub fn new() -> Self {
        let mut by_name = FxHashMap::default();
        for (name, dt) in SPECIFIC_TYPE_NAMES {
            by_name.insert(name, dt);
        }
        SpecificTypes { by_name }
    }

    /// Look up a device-specific kind by type name.
    pub fn by_name(&self, name: &str) -> Option<DataType> {
        self.by_name.get(name).copied()
    }

    /// Look up the device-specific kind of a source type, if it is a
    /// record whose resolved name is one of the recognized names.
    pub fn of_type(&self, pool: &TypePool, ty: TypeRef) -> Option<DataType> {
        match pool.kind(ty) {
            TypeKind::Record(def) => def.resolved_name().and_then(|n| self.by_name(n)),
            _ => None,
        }
    }

    /// Check if a source type is an opaque device object handle.
    pub fn is_object_type(&self, pool: &TypePool, ty: TypeRef) -> bool {
        self.of_type(pool, ty).is_some_and(DataType::is_object)
    }
}

impl Default for SpecificTypes {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okl_ir::RecordDef;
    use pretty_assertions::assert_eq;

    #[test]
    fn exportable_builtins_have_entries() {
        for b in Builtin::ALL {
            let info = builtin_info(b);
            match b {
                Builtin::LongDouble | Builtin::WChar => assert!(info.is_none()),
                _ => assert!(info.is_some(), "missing entry for {b}"),
            }
        }
    }

    #[test]
    fn builtin_widths_agree_with_table() {
        for b in Builtin::ALL {
            let (Some(info), Some(bits)) = (builtin_info(b), b.bit_width()) else {
                continue;
            };
            assert_eq!(info.data_type.size_in_bits(), bits, "width mismatch for {b}");
        }
    }

    #[test]
    fn specific_names_resolve() {
        let specific = SpecificTypes::new();
        assert_eq!(
            specific.by_name("okl_matrix3x3"),
            Some(DataType::Matrix3x3)
        );
        assert_eq!(
            specific.by_name("okl_allocation"),
            Some(DataType::Allocation)
        );
        assert_eq!(specific.by_name("my_struct"), None);
    }

    #[test]
    fn recognizes_object_records_by_resolved_name() {
        let specific = SpecificTypes::new();
        let mut pool = TypePool::new();
        let alloc = pool.record(RecordDef::strukt("okl_allocation", vec![]));
        let matrix = pool.record(RecordDef::strukt("okl_matrix2x2", vec![]));
        let user = pool.record(RecordDef::strukt("Point", vec![]));

        assert!(specific.is_object_type(&pool, alloc));
        assert!(!specific.is_object_type(&pool, matrix));
        assert_eq!(specific.of_type(&pool, matrix), Some(DataType::Matrix2x2));
        assert_eq!(specific.of_type(&pool, user), None);
    }
}
