//! The closed, wire-stable enumeration of exportable kinds and the
//! canonical reflection table.
//!
//! Compiled artifacts embed `DataType` ordinals as plain integers, so the
//! values here are a wire contract: new kinds may only be appended, and
//! an ordinal is never renumbered or reused. The reflection table holds
//! exactly one row per kind, at the same index as the kind's ordinal.

use std::fmt;

/// Broad grouping of the exportable kinds.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Category {
    Primitive,
    Matrix,
    Object,
}

/// Exportable scalar/object kinds.
///
/// Ordinals are embedded in compiled artifacts; append only.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u32)]
pub enum DataType {
    Float16 = 0,
    Float32 = 1,
    Float64 = 2,
    Signed8 = 3,
    Signed16 = 4,
    Signed32 = 5,
    Signed64 = 6,
    Unsigned8 = 7,
    Unsigned16 = 8,
    Unsigned32 = 9,
    Unsigned64 = 10,
    Boolean = 11,
    Packed565 = 12,
    Packed5551 = 13,
    Packed4444 = 14,

    Matrix2x2 = 15,
    Matrix3x3 = 16,
    Matrix4x4 = 17,

    Element = 18,
    Type = 19,
    Allocation = 20,
    Sampler = 21,
    Script = 22,
    Mesh = 23,
    Path = 24,
    ProgramFragment = 25,
    ProgramVertex = 26,
    ProgramRaster = 27,
    ProgramStore = 28,
    Font = 29,
}

/// One row of the canonical reflection table.
///
/// The `size_in_bits` entry is authoritative for every category except
/// device objects, whose effective wire width depends on the target bit
/// width (see `ExportContext::get_size`); the table holds the 32-bit
/// legacy value for those.
#[derive(Debug)]
pub struct ReflectionType {
    pub category: Category,
    /// Canonical wire name embedded in compiled artifacts.
    pub wire_name: &'static str,
    /// Short mnemonic used in generated element names.
    pub short_name: Option<&'static str>,
    pub size_in_bits: u32,
    /// Host-language type name.
    pub c_name: Option<&'static str>,
    /// Alternate (reflected) host type name.
    pub alt_name: Option<&'static str>,
    /// Vector name prefix in the host language.
    pub c_vector_prefix: Option<&'static str>,
    /// Vector name prefix in the reflected host language.
    pub alt_vector_prefix: Option<&'static str>,
    /// Whether the reflected host type must be wider than the natural
    /// width to stay unsigned.
    pub promoted: bool,
}

/// One static row per `DataType`, at the kind's ordinal index.
pub static REFLECTION_TABLE: [ReflectionType; DataType::COUNT] = [
    row(Category::Primitive, "FLOAT_16", Some("F16"), 16, Some("half"), Some("half"), Some("Half"), Some("Half"), false),
    row(Category::Primitive, "FLOAT_32", Some("F32"), 32, Some("float"), Some("float"), Some("Float"), Some("Float"), false),
    row(Category::Primitive, "FLOAT_64", Some("F64"), 64, Some("double"), Some("double"), Some("Double"), Some("Double"), false),
    row(Category::Primitive, "SIGNED_8", Some("I8"), 8, Some("int8_t"), Some("byte"), Some("Byte"), Some("Byte"), false),
    row(Category::Primitive, "SIGNED_16", Some("I16"), 16, Some("int16_t"), Some("short"), Some("Short"), Some("Short"), false),
    row(Category::Primitive, "SIGNED_32", Some("I32"), 32, Some("int32_t"), Some("int"), Some("Int"), Some("Int"), false),
    row(Category::Primitive, "SIGNED_64", Some("I64"), 64, Some("int64_t"), Some("long"), Some("Long"), Some("Long"), false),
    row(Category::Primitive, "UNSIGNED_8", Some("U8"), 8, Some("uint8_t"), Some("short"), Some("UByte"), Some("Short"), true),
    row(Category::Primitive, "UNSIGNED_16", Some("U16"), 16, Some("uint16_t"), Some("int"), Some("UShort"), Some("Int"), true),
    row(Category::Primitive, "UNSIGNED_32", Some("U32"), 32, Some("uint32_t"), Some("long"), Some("UInt"), Some("Long"), true),
    row(Category::Primitive, "UNSIGNED_64", Some("U64"), 64, Some("uint64_t"), Some("long"), Some("ULong"), Some("Long"), false),
    row(Category::Primitive, "BOOLEAN", Some("BOOLEAN"), 8, Some("bool"), Some("boolean"), None, None, false),
    row(Category::Primitive, "UNSIGNED_5_6_5", None, 16, None, None, None, None, false),
    row(Category::Primitive, "UNSIGNED_5_5_5_1", None, 16, None, None, None, None, false),
    row(Category::Primitive, "UNSIGNED_4_4_4_4", None, 16, None, None, None, None, false),
    row(Category::Matrix, "MATRIX_2X2", None, 4 * 32, Some("okl_matrix2x2"), Some("Matrix2f"), None, None, false),
    row(Category::Matrix, "MATRIX_3X3", None, 9 * 32, Some("okl_matrix3x3"), Some("Matrix3f"), None, None, false),
    row(Category::Matrix, "MATRIX_4X4", None, 16 * 32, Some("okl_matrix4x4"), Some("Matrix4f"), None, None, false),
    // Device objects are 32 bits on a 32-bit target but 256 bits on a
    // 64-bit target; the table keeps the legacy 32-bit value and the
    // width is evaluated at query time.
    row(Category::Object, "ELEMENT", Some("ELEMENT"), 32, Some("Element"), Some("Element"), None, None, false),
    row(Category::Object, "TYPE", Some("TYPE"), 32, Some("Type"), Some("Type"), None, None, false),
    row(Category::Object, "ALLOCATION", Some("ALLOCATION"), 32, Some("Allocation"), Some("Allocation"), None, None, false),
    row(Category::Object, "SAMPLER", Some("SAMPLER"), 32, Some("Sampler"), Some("Sampler"), None, None, false),
    row(Category::Object, "SCRIPT", Some("SCRIPT"), 32, Some("Script"), Some("Script"), None, None, false),
    row(Category::Object, "MESH", Some("MESH"), 32, Some("Mesh"), Some("Mesh"), None, None, false),
    row(Category::Object, "PATH", Some("PATH"), 32, Some("Path"), Some("Path"), None, None, false),
    row(Category::Object, "PROGRAM_FRAGMENT", Some("PROGRAM_FRAGMENT"), 32, Some("ProgramFragment"), Some("ProgramFragment"), None, None, false),
    row(Category::Object, "PROGRAM_VERTEX", Some("PROGRAM_VERTEX"), 32, Some("ProgramVertex"), Some("ProgramVertex"), None, None, false),
    row(Category::Object, "PROGRAM_RASTER", Some("PROGRAM_RASTER"), 32, Some("ProgramRaster"), Some("ProgramRaster"), None, None, false),
    row(Category::Object, "PROGRAM_STORE", Some("PROGRAM_STORE"), 32, Some("ProgramStore"), Some("ProgramStore"), None, None, false),
    row(Category::Object, "FONT", Some("FONT"), 32, Some("Font"), Some("Font"), None, None, false),
];

#[expect(clippy::too_many_arguments, reason = "const table row constructor")]
const fn row(
    category: Category,
    wire_name: &'static str,
    short_name: Option<&'static str>,
    size_in_bits: u32,
    c_name: Option<&'static str>,
    alt_name: Option<&'static str>,
    c_vector_prefix: Option<&'static str>,
    alt_vector_prefix: Option<&'static str>,
    promoted: bool,
) -> ReflectionType {
    ReflectionType {
        category,
        wire_name,
        short_name,
        size_in_bits,
        c_name,
        alt_name,
        c_vector_prefix,
        alt_vector_prefix,
        promoted,
    }
}

impl DataType {
    /// Number of kinds (and reflection table rows).
    pub const COUNT: usize = 30;

    /// The wire ordinal of the kind.
    #[inline]
    pub const fn ordinal(self) -> u32 {
        self as u32
    }

    /// Recover a kind from its wire ordinal.
    pub const fn from_ordinal(ordinal: u32) -> Option<DataType> {
        Some(match ordinal {
            0 => DataType::Float16,
            1 => DataType::Float32,
            2 => DataType::Float64,
            3 => DataType::Signed8,
            4 => DataType::Signed16,
            5 => DataType::Signed32,
            6 => DataType::Signed64,
            7 => DataType::Unsigned8,
            8 => DataType::Unsigned16,
            9 => DataType::Unsigned32,
            10 => DataType::Unsigned64,
            11 => DataType::Boolean,
            12 => DataType::Packed565,
            13 => DataType::Packed5551,
            14 => DataType::Packed4444,
            15 => DataType::Matrix2x2,
            16 => DataType::Matrix3x3,
            17 => DataType::Matrix4x4,
            18 => DataType::Element,
            19 => DataType::Type,
            20 => DataType::Allocation,
            21 => DataType::Sampler,
            22 => DataType::Script,
            23 => DataType::Mesh,
            24 => DataType::Path,
            25 => DataType::ProgramFragment,
            26 => DataType::ProgramVertex,
            27 => DataType::ProgramRaster,
            28 => DataType::ProgramStore,
            29 => DataType::Font,
            _ => return None,
        })
    }

    /// The canonical reflection row for the kind.
    #[inline]
    pub fn reflection(self) -> &'static ReflectionType {
        &REFLECTION_TABLE[self.ordinal() as usize]
    }

    /// The category of the kind.
    #[inline]
    pub fn category(self) -> Category {
        self.reflection().category
    }

    /// Declared bit width from the reflection table.
    ///
    /// For device objects this is the 32-bit legacy value; the effective
    /// wire width is target-dependent and evaluated by the layout layer.
    #[inline]
    pub fn size_in_bits(self) -> u32 {
        self.reflection().size_in_bits
    }

    /// Check if the kind is a square float matrix.
    pub fn is_matrix(self) -> bool {
        self.category() == Category::Matrix
    }

    /// Check if the kind is an opaque device object handle.
    pub fn is_object(self) -> bool {
        self.category() == Category::Object
    }

    /// The matrix kind for a square dimension in `2..=4`.
    pub const fn matrix_of_dim(dim: u32) -> Option<DataType> {
        match dim {
            2 => Some(DataType::Matrix2x2),
            3 => Some(DataType::Matrix3x3),
            4 => Some(DataType::Matrix4x4),
            _ => None,
        }
    }

    /// The square dimension of a matrix kind.
    pub const fn matrix_dim(self) -> Option<u32> {
        match self {
            DataType::Matrix2x2 => Some(2),
            DataType::Matrix3x3 => Some(3),
            DataType::Matrix4x4 => Some(4),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reflection().wire_name)
    }
}
