//! ABI-level types and the target data-layout provider.
//!
//! An [`AbiType`] is the materialized, layout-queryable form of an export
//! node. The [`DataLayout`] trait is the interface the engine needs from
//! a target: store size (bytes actually written), alloc size (stride
//! including padding), and field byte offsets. [`TargetLayout`] is the
//! in-tree provider with C-like natural alignment rules.

/// Target pointer width.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TargetWidth {
    W32,
    W64,
}

impl TargetWidth {
    /// Pointer size in bytes.
    #[inline]
    pub const fn pointer_bytes(self) -> u64 {
        match self {
            TargetWidth::W32 => 4,
            TargetWidth::W64 => 8,
        }
    }

    /// Check if this is a 64-bit target.
    #[inline]
    pub const fn is_64(self) -> bool {
        matches!(self, TargetWidth::W64)
    }
}

/// A materialized ABI type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AbiType {
    /// Integer of the given bit width (bools are 1-bit).
    Int { bits: u32 },
    /// IEEE float of the given bit width (16, 32, or 64).
    Float { bits: u32 },
    /// Pointer; width comes from the target.
    Pointer,
    /// SIMD vector.
    Vector { elem: Box<AbiType>, len: u32 },
    /// Constant-length array.
    Array { elem: Box<AbiType>, len: u64 },
    /// Struct with ordered fields.
    Struct { fields: Vec<AbiType>, packed: bool },
}

impl AbiType {
    /// Shorthand for an integer type.
    pub const fn int(bits: u32) -> AbiType {
        AbiType::Int { bits }
    }

    /// Shorthand for a float type.
    pub const fn float(bits: u32) -> AbiType {
        AbiType::Float { bits }
    }

    /// Shorthand for a vector type.
    pub fn vector(elem: AbiType, len: u32) -> AbiType {
        AbiType::Vector {
            elem: Box::new(elem),
            len,
        }
    }

    /// Shorthand for an array type.
    pub fn array(elem: AbiType, len: u64) -> AbiType {
        AbiType::Array {
            elem: Box::new(elem),
            len,
        }
    }
}

/// Struct layout computed by a provider: per-field byte offsets plus the
/// store size (no tail padding) and alloc size (with tail padding).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructLayout {
    pub offsets: Vec<u64>,
    pub store_size: u64,
    pub alloc_size: u64,
    pub align: u64,
}

/// The target data-layout provider interface.
///
/// `store_size` is the number of bytes actually written when a value of
/// the type is stored; `alloc_size` is the distance in bytes between
/// successive array elements of the type, including padding.
pub trait DataLayout {
    /// Bytes written when storing a value of the type.
    fn store_size(&self, ty: &AbiType) -> u64;
    /// Stride in bytes between successive elements, including padding.
    fn alloc_size(&self, ty: &AbiType) -> u64;
    /// ABI alignment of the type in bytes.
    fn abi_align(&self, ty: &AbiType) -> u64;
    /// Byte offset of field `index` of a struct type, or `None` when the
    /// type is not a struct or the index is out of range.
    fn field_offset(&self, ty: &AbiType, index: usize) -> Option<u64>;
}

/// The in-tree data-layout provider.
///
/// Rules: scalars align to their (power-of-two-rounded) size; vectors
/// align and allocate at the
/// power of two not less than their store size, so a 3-wide float vector
/// stores 12 bytes but allocates 16; arrays inherit their element's
/// alignment; struct fields are padded to their natural alignment unless
/// the struct is packed.
#[derive(Copy, Clone, Debug)]
pub struct TargetLayout {
    width: TargetWidth,
}

fn align_to(offset: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}

impl TargetLayout {
    /// Create a provider for the given target width.
    pub const fn new(width: TargetWidth) -> Self {
        TargetLayout { width }
    }

    /// The target width this provider lays out for.
    pub const fn width(&self) -> TargetWidth {
        self.width
    }

    /// Compute the full layout of a struct from its field types.
    pub fn struct_layout(&self, fields: &[AbiType], packed: bool) -> StructLayout {
        let mut offsets = Vec::with_capacity(fields.len());
        let mut offset = 0u64;
        let mut align = 1u64;

        for field in fields {
            let field_align = if packed { 1 } else { self.abi_align(field) };
            align = align.max(field_align);
            offset = align_to(offset, field_align);
            offsets.push(offset);
            offset += self.alloc_size(field);
        }

        StructLayout {
            offsets,
            store_size: offset,
            alloc_size: align_to(offset, align),
            align,
        }
    }
}

impl DataLayout for TargetLayout {
    fn store_size(&self, ty: &AbiType) -> u64 {
        match ty {
            AbiType::Int { bits } | AbiType::Float { bits } => u64::from(bits.div_ceil(8)),
            AbiType::Pointer => self.width.pointer_bytes(),
            AbiType::Vector { elem, len } => self.store_size(elem) * u64::from(*len),
            AbiType::Array { elem, len } => self.alloc_size(elem) * len,
            AbiType::Struct { fields, packed } => {
                self.struct_layout(fields, *packed).store_size
            }
        }
    }

    fn alloc_size(&self, ty: &AbiType) -> u64 {
        match ty {
            AbiType::Int { .. } | AbiType::Float { .. } | AbiType::Pointer => {
                self.store_size(ty)
            }
            // Vectors allocate at the next power of two: vec3 pads to 4
            // element slots.
            AbiType::Vector { .. } => self.store_size(ty).next_power_of_two(),
            AbiType::Array { elem, len } => self.alloc_size(elem) * len,
            AbiType::Struct { fields, packed } => {
                self.struct_layout(fields, *packed).alloc_size
            }
        }
    }

    fn abi_align(&self, ty: &AbiType) -> u64 {
        match ty {
            AbiType::Int { bits } => u64::from(bits.div_ceil(8)).next_power_of_two(),
            AbiType::Float { bits } => u64::from(*bits / 8),
            AbiType::Pointer => self.width.pointer_bytes(),
            AbiType::Vector { .. } => self.alloc_size(ty),
            AbiType::Array { elem, .. } => self.abi_align(elem),
            AbiType::Struct { fields, packed } => self.struct_layout(fields, *packed).align,
        }
    }

    fn field_offset(&self, ty: &AbiType, index: usize) -> Option<u64> {
        let AbiType::Struct { fields, packed } = ty else {
            return None;
        };
        self.struct_layout(fields, *packed).offsets.get(index).copied()
    }
}
