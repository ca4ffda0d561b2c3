//! Structural exportability rules.
//!
//! [`Validator::type_exportable`] is a recursive descent over the source
//! type, keyed by type class. Every rejection reports exactly one
//! diagnostic and propagates as `None`; the caller decides whether to
//! continue with the next declaration. The rules here are purely
//! structural; policy and API gating live in [`gate`](crate::gate).

use rustc_hash::FxHashSet;

use okl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use okl_ir::{Builtin, Span, TypeKind, TypePool, TypeRef};

use crate::builtin_map::{builtin_info, SpecificTypes};
use crate::name;

/// Check whether a type is, or contains by value (through arrays and
/// struct fields), a device-object type. Pointers do not count: a
/// pointer to an object is a plain pointer on the wire.
pub fn contains_object_type(specifics: &SpecificTypes, pool: &TypePool, ty: TypeRef) -> bool {
    if specifics.is_object_type(pool, ty) {
        return true;
    }
    match pool.kind(ty) {
        TypeKind::Array { elem, .. } => contains_object_type(specifics, pool, *elem),
        TypeKind::Record(def) => def
            .fields
            .iter()
            .any(|f| contains_object_type(specifics, pool, f.ty)),
        _ => false,
    }
}

/// The structural validator.
///
/// Holds the per-unit type pool and the per-context device-type name
/// table; all walk state (the visited set) is passed explicitly so the
/// recursion guard is visible at every call site.
pub struct Validator<'a> {
    pool: &'a TypePool,
    specifics: &'a SpecificTypes,
}

impl<'a> Validator<'a> {
    pub fn new(pool: &'a TypePool, specifics: &'a SpecificTypes) -> Self {
        Validator { pool, specifics }
    }

    /// Check whether a type may cross the host/device boundary.
    ///
    /// Returns the canonicalized type on success: usually the input
    /// handle, but enums come back re-typed as the pre-interned `int`.
    /// `visited` carries the records already validated in this
    /// declaration; a record found in the set is accepted without
    /// re-descending.
    pub fn type_exportable(
        &self,
        ty: TypeRef,
        span: Span,
        visited: &mut FxHashSet<TypeRef>,
        sink: &mut DiagnosticQueue,
    ) -> Option<TypeRef> {
        self.exportable(ty, span, visited, sink, None)
    }

    /// Validate and derive the canonical name in one step.
    ///
    /// Rejects shapes that validate structurally but have no derivable
    /// name (they could not be registered or reflected).
    pub fn normalize_type(
        &self,
        ty: TypeRef,
        span: Span,
        visited: &mut FxHashSet<TypeRef>,
        sink: &mut DiagnosticQueue,
    ) -> Option<(TypeRef, String)> {
        let normalized = self.type_exportable(ty, span, visited, sink)?;
        match name::type_name(self.pool, normalized) {
            Some(n) => Some((normalized, n)),
            None => {
                sink.add(
                    Diagnostic::error(ErrorCode::E2011)
                        .with_message("type has no derivable name and cannot be exported")
                        .with_label(span, "used here"),
                );
                None
            }
        }
    }

    /// `enclosing` is the resolved name of the record currently being
    /// descended into, if any; pointers are only legal outside one.
    fn exportable(
        &self,
        ty: TypeRef,
        span: Span,
        visited: &mut FxHashSet<TypeRef>,
        sink: &mut DiagnosticQueue,
        enclosing: Option<&str>,
    ) -> Option<TypeRef> {
        match self.pool.kind(ty) {
            TypeKind::Builtin(b) => {
                if builtin_info(*b).is_some() {
                    Some(ty)
                } else {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2012)
                            .with_message(format!("type '{b}' cannot be exported"))
                            .with_label(span, "used here")
                            .with_note("its width depends on the host platform"),
                    );
                    None
                }
            }
            TypeKind::Record(def) => {
                // Recognized device-object and matrix spellings skip the
                // struct rules; their shape is re-checked by their own
                // factory.
                if self.specifics.of_type(self.pool, ty).is_some() {
                    return Some(ty);
                }
                if def.is_union {
                    let shown = def.resolved_name().unwrap_or("<anonymous>");
                    sink.add(
                        Diagnostic::error(ErrorCode::E2001)
                            .with_message(format!("unions cannot be exported: '{shown}'"))
                            .with_label(def.span, "declared here"),
                    );
                    return None;
                }
                let Some(record_name) = def.resolved_name() else {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2002)
                            .with_message("anonymous structs cannot be exported")
                            .with_label(span, "used here"),
                    );
                    return None;
                };
                if !def.is_definition {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2003)
                            .with_message(format!(
                                "struct '{record_name}' is not defined in this module"
                            ))
                            .with_label(span, "used here"),
                    );
                    return None;
                }
                if def.has_flexible_array {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2017)
                            .with_message(format!(
                                "structs with a flexible array member cannot be exported: \
                                 '{record_name}'"
                            ))
                            .with_label(def.span, "declared here"),
                    );
                    return None;
                }
                if !visited.insert(ty) {
                    // Already validated on this path.
                    return Some(ty);
                }
                for field in &def.fields {
                    if field.is_bitfield() {
                        sink.add(
                            Diagnostic::error(ErrorCode::E2004)
                                .with_message(format!(
                                    "bit fields cannot be exported: '{record_name}.{}'",
                                    field.name
                                ))
                                .with_label(field.span, "declared here"),
                        );
                        return None;
                    }
                    self.exportable(field.ty, field.span, visited, sink, Some(record_name))?;
                }
                Some(ty)
            }
            TypeKind::Pointer(pointee) => {
                if let Some(record_name) = enclosing {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2005)
                            .with_message(format!(
                                "structs containing pointers cannot be exported: '{record_name}'"
                            ))
                            .with_label(span, "pointer field here"),
                    );
                    return None;
                }
                match self.pool.kind(*pointee) {
                    TypeKind::Pointer(_) => {
                        sink.add(
                            Diagnostic::error(ErrorCode::E2006)
                                .with_message(
                                    "multiple levels of pointers cannot be exported",
                                )
                                .with_label(span, "used here"),
                        );
                        None
                    }
                    TypeKind::Array { .. } => {
                        sink.add(
                            Diagnostic::error(ErrorCode::E2007)
                                .with_message("pointers to arrays cannot be exported")
                                .with_label(span, "used here"),
                        );
                        None
                    }
                    _ => {
                        self.exportable(*pointee, span, visited, sink, None)?;
                        Some(ty)
                    }
                }
            }
            TypeKind::Vector { elem, len } => {
                if !(2..=4).contains(len) {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2010)
                            .with_message(format!(
                                "vectors of width {len} cannot be exported"
                            ))
                            .with_label(span, "used here")
                            .with_note("vector widths 2, 3, and 4 are supported"),
                    );
                    return None;
                }
                let elem_ok = matches!(
                    self.pool.kind(*elem),
                    TypeKind::Builtin(b) if builtin_info(*b).is_some()
                );
                if !elem_ok {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2010)
                            .with_message("vectors of non-primitive types cannot be exported")
                            .with_label(span, "used here"),
                    );
                    return None;
                }
                Some(ty)
            }
            TypeKind::Array { elem, len } => {
                if matches!(self.pool.kind(*elem), TypeKind::Array { .. }) {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2008)
                            .with_message("multidimensional arrays cannot be exported")
                            .with_label(span, "used here"),
                    );
                    return None;
                }
                if u32::try_from(*len).is_err() {
                    sink.add(
                        Diagnostic::error(ErrorCode::E2015)
                            .with_message(format!(
                                "array of {len} elements is too large to be exported"
                            ))
                            .with_label(span, "used here"),
                    );
                    return None;
                }
                // vec3 values occupy four element slots, so only a
                // single-element array lines up with scalar addressing.
                if let TypeKind::Vector { len: 3, .. } = self.pool.kind(*elem) {
                    if *len != 1 {
                        sink.add(
                            Diagnostic::error(ErrorCode::E2009)
                                .with_message(
                                    "arrays of width-3 vectors cannot be exported",
                                )
                                .with_label(span, "used here")
                                .with_note(
                                    "width-3 vectors are padded to four elements; \
                                     only a length-1 array is allowed",
                                ),
                        );
                        return None;
                    }
                }
                self.exportable(*elem, span, visited, sink, enclosing)?;
                Some(ty)
            }
            // Enums cross the boundary as the canonical signed 32-bit
            // integer; they never get their own node or wire tag.
            TypeKind::Enum { .. } => Some(self.pool.builtin(Builtin::Int)),
        }
    }
}
