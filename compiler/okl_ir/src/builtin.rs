//! Builtin kinds of the host language.

use std::fmt;

/// The host language's builtin scalar kinds, as resolved by the semantic
/// analyzer.
///
/// `WChar` and `LongDouble` have platform-dependent widths and are never
/// exportable across the host/device boundary; they are still part of the
/// source model because declarations may mention them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    Bool,
    Char,
    UChar,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Half,
    Float,
    Double,
    LongDouble,
    WChar,
}

impl Builtin {
    /// All builtin kinds, in pre-interning order (see `TypePool::new`).
    pub const ALL: [Builtin; 14] = [
        Builtin::Bool,
        Builtin::Char,
        Builtin::UChar,
        Builtin::Short,
        Builtin::UShort,
        Builtin::Int,
        Builtin::UInt,
        Builtin::Long,
        Builtin::ULong,
        Builtin::Half,
        Builtin::Float,
        Builtin::Double,
        Builtin::LongDouble,
        Builtin::WChar,
    ];

    /// Position of the kind within [`Builtin::ALL`].
    pub const fn index(self) -> u32 {
        match self {
            Builtin::Bool => 0,
            Builtin::Char => 1,
            Builtin::UChar => 2,
            Builtin::Short => 3,
            Builtin::UShort => 4,
            Builtin::Int => 5,
            Builtin::UInt => 6,
            Builtin::Long => 7,
            Builtin::ULong => 8,
            Builtin::Half => 9,
            Builtin::Float => 10,
            Builtin::Double => 11,
            Builtin::LongDouble => 12,
            Builtin::WChar => 13,
        }
    }

    /// Fixed bit width of the kind, or `None` for platform-dependent kinds.
    pub const fn bit_width(self) -> Option<u32> {
        match self {
            Builtin::Bool | Builtin::Char | Builtin::UChar => Some(8),
            Builtin::Short | Builtin::UShort | Builtin::Half => Some(16),
            Builtin::Int | Builtin::UInt | Builtin::Float => Some(32),
            Builtin::Long | Builtin::ULong | Builtin::Double => Some(64),
            Builtin::LongDouble | Builtin::WChar => None,
        }
    }

    /// Whether the kind is wider than 32 bits (or of unbounded width).
    ///
    /// These are the kinds the restricted dialect forbids.
    pub const fn is_wide(self) -> bool {
        match self.bit_width() {
            Some(w) => w > 32,
            None => true,
        }
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Builtin::Bool => "bool",
            Builtin::Char => "char",
            Builtin::UChar => "uchar",
            Builtin::Short => "short",
            Builtin::UShort => "ushort",
            Builtin::Int => "int",
            Builtin::UInt => "uint",
            Builtin::Long => "long",
            Builtin::ULong => "ulong",
            Builtin::Half => "half",
            Builtin::Float => "float",
            Builtin::Double => "double",
            Builtin::LongDouble => "long double",
            Builtin::WChar => "wchar",
        };
        f.write_str(name)
    }
}
