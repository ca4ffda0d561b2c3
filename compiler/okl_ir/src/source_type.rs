//! Resolved source types, arena-allocated.
//!
//! The semantic analyzer produces one `TypePool` per compilation unit and
//! hands out `TypeRef` handles into it. The pool is append-only; a handle
//! never dangles while its pool is alive.

use std::fmt;

use crate::{Builtin, Span};

/// A 32-bit handle into a [`TypePool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct TypeRef(u32);

impl TypeRef {
    /// Create a handle from a raw index.
    ///
    /// The caller must ensure the index is valid in its pool.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeRef({})", self.0)
    }
}

/// Linkage of a top-level declaration.
///
/// Only externally-linked declarations are visible across the host/device
/// boundary; `Internal` (static) declarations are private to the unit.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Linkage {
    External,
    Internal,
}

/// A record field, with its declared bit width when it is a bitfield.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    /// `Some(width)` when the field is a bitfield.
    pub bit_width: Option<u32>,
    pub span: Span,
}

impl FieldDef {
    /// Create a plain (non-bitfield) field.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            bit_width: None,
            span: Span::DUMMY,
        }
    }

    /// Create a bitfield of the given width.
    pub fn bitfield(name: impl Into<String>, ty: TypeRef, width: u32) -> Self {
        FieldDef {
            name: name.into(),
            ty,
            bit_width: Some(width),
            span: Span::DUMMY,
        }
    }

    /// Check if the field is a bitfield.
    pub const fn is_bitfield(&self) -> bool {
        self.bit_width.is_some()
    }
}

/// A resolved struct or union definition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordDef {
    /// Declared tag name; empty for anonymous records.
    pub name: String,
    /// Typedef alias naming an otherwise anonymous record.
    pub typedef_name: Option<String>,
    /// Names found on alternate declarations of the same entity.
    pub alias_names: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub is_union: bool,
    pub is_packed: bool,
    /// Trailing flexible array member (`T x[];`).
    pub has_flexible_array: bool,
    /// Whether a complete definition was seen in this unit.
    pub is_definition: bool,
    pub span: Span,
}

impl RecordDef {
    /// Create a complete, named struct definition.
    pub fn strukt(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        RecordDef {
            name: name.into(),
            typedef_name: None,
            alias_names: Vec::new(),
            fields,
            is_union: false,
            is_packed: false,
            has_flexible_array: false,
            is_definition: true,
            span: Span::DUMMY,
        }
    }

    /// Create a complete union definition.
    pub fn union(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        RecordDef {
            is_union: true,
            ..RecordDef::strukt(name, fields)
        }
    }

    /// Resolve the record's name: declared tag, then typedef alias, then
    /// the first named alternate declaration.
    pub fn resolved_name(&self) -> Option<&str> {
        if !self.name.is_empty() {
            return Some(&self.name);
        }
        if let Some(alias) = self.typedef_name.as_deref() {
            if !alias.is_empty() {
                return Some(alias);
            }
        }
        self.alias_names
            .iter()
            .map(String::as_str)
            .find(|n| !n.is_empty())
    }
}

/// The class tag and payload of a resolved source type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Builtin(Builtin),
    Record(RecordDef),
    Pointer(TypeRef),
    /// Fixed-width vector over a builtin element type.
    Vector { elem: TypeRef, len: u32 },
    /// Constant-length array.
    Array { elem: TypeRef, len: u64 },
    Enum { name: String },
}

/// A top-level variable declaration prepared for export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarDecl {
    pub name: String,
    pub ty: TypeRef,
    pub span: Span,
    pub linkage: Linkage,
}

impl VarDecl {
    /// Create an externally-linked declaration.
    pub fn external(name: impl Into<String>, ty: TypeRef) -> Self {
        VarDecl {
            name: name.into(),
            ty,
            span: Span::DUMMY,
            linkage: Linkage::External,
        }
    }

    /// Create an internally-linked (static) declaration.
    pub fn internal(name: impl Into<String>, ty: TypeRef) -> Self {
        VarDecl {
            linkage: Linkage::Internal,
            ..VarDecl::external(name, ty)
        }
    }
}

/// Append-only arena of resolved source types.
#[derive(Debug)]
pub struct TypePool {
    types: Vec<TypeKind>,
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl TypePool {
    /// Create a pool with all builtin kinds pre-interned at fixed indices.
    ///
    /// Pre-interning lets [`TypePool::builtin_ref`] hand out a handle
    /// without mutating the pool, which the export engine relies on when
    /// re-typing enums to the canonical `int`.
    pub fn new() -> Self {
        let mut pool = TypePool {
            types: Vec::with_capacity(64),
        };
        for b in Builtin::ALL {
            pool.types.push(TypeKind::Builtin(b));
        }
        pool
    }

    /// The pre-interned handle for a builtin kind.
    #[inline]
    pub const fn builtin_ref(b: Builtin) -> TypeRef {
        TypeRef::from_raw(b.index())
    }

    /// Allocate a type in the pool.
    ///
    /// # Panics
    /// Panics if the pool exceeds `u32::MAX` entries.
    pub fn alloc(&mut self, kind: TypeKind) -> TypeRef {
        let raw = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32::MAX entries"));
        self.types.push(kind);
        TypeRef::from_raw(raw)
    }

    /// Look up the kind of a handle.
    ///
    /// # Panics
    /// Panics if the handle was not created by this pool.
    pub fn kind(&self, ty: TypeRef) -> &TypeKind {
        &self.types[ty.raw() as usize]
    }

    /// Number of types in the pool.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the pool holds only pre-interned builtins.
    pub fn is_empty(&self) -> bool {
        self.types.len() <= Builtin::ALL.len()
    }

    // Convenience constructors, used pervasively by the semantic analyzer
    // and by engine tests.

    /// The handle for a builtin type (pre-interned, no allocation).
    pub fn builtin(&self, b: Builtin) -> TypeRef {
        Self::builtin_ref(b)
    }

    /// Allocate a pointer type.
    pub fn pointer(&mut self, pointee: TypeRef) -> TypeRef {
        self.alloc(TypeKind::Pointer(pointee))
    }

    /// Allocate a fixed-width vector type.
    pub fn vector(&mut self, elem: TypeRef, len: u32) -> TypeRef {
        self.alloc(TypeKind::Vector { elem, len })
    }

    /// Allocate a constant-length array type.
    pub fn array(&mut self, elem: TypeRef, len: u64) -> TypeRef {
        self.alloc(TypeKind::Array { elem, len })
    }

    /// Allocate a record type.
    pub fn record(&mut self, def: RecordDef) -> TypeRef {
        self.alloc(TypeKind::Record(def))
    }

    /// Allocate an enum type.
    pub fn enumeration(&mut self, name: impl Into<String>) -> TypeRef {
        self.alloc(TypeKind::Enum { name: name.into() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtins_pre_interned_at_fixed_indices() {
        let pool = TypePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.len(), Builtin::ALL.len());
        for b in Builtin::ALL {
            let handle = TypePool::builtin_ref(b);
            assert_eq!(pool.kind(handle), &TypeKind::Builtin(b));
        }
    }

    #[test]
    fn pool_allocates_sequential_handles() {
        let mut pool = TypePool::new();
        let int = pool.builtin(Builtin::Int);
        let ptr = pool.pointer(int);
        let vec4 = pool.vector(pool.builtin(Builtin::Float), 4);
        assert_eq!(ptr.raw(), Builtin::ALL.len() as u32);
        assert_eq!(vec4.raw(), ptr.raw() + 1);
        assert_eq!(pool.kind(ptr), &TypeKind::Pointer(int));
        assert!(!pool.is_empty());
    }

    #[test]
    fn resolved_name_falls_back_to_typedef_then_alias() {
        let mut def = RecordDef::strukt("", vec![]);
        assert_eq!(def.resolved_name(), None);

        def.alias_names.push("FromRedecl".into());
        assert_eq!(def.resolved_name(), Some("FromRedecl"));

        def.typedef_name = Some("FromTypedef".into());
        assert_eq!(def.resolved_name(), Some("FromTypedef"));

        def.name = "Tag".into();
        assert_eq!(def.resolved_name(), Some("Tag"));
    }
}
