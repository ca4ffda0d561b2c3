//! Dialect and API-level gating.
//!
//! These rules run on exported declarations in addition to the
//! structural checks in [`validate`](crate::validate): the structural
//! rules decide whether a shape can cross the boundary at all, the gate
//! decides whether this target (API level, dialect) permits it.

use rustc_hash::FxHashSet;

use okl_diagnostic::{Diagnostic, DiagnosticQueue, ErrorCode};
use okl_ir::{Linkage, Span, TypeKind, TypePool, TypeRef, VarDecl};

use crate::builtin_map::SpecificTypes;
use crate::validate::contains_object_type;

/// Minimum target API level for a device-object type appearing in (or
/// as) an externally-linked declaration's type.
pub const MIN_API_OBJECT_IN_COMPOSITE: u32 = 16;

/// Minimum target API level for a width-3 vector field in an
/// externally-linked struct.
pub const MIN_API_VEC3_FIELD: u32 = 14;

/// The dialect/API gate for one target configuration.
pub struct Gate<'a> {
    pool: &'a TypePool,
    specifics: &'a SpecificTypes,
    api_level: u32,
    restricted: bool,
}

impl<'a> Gate<'a> {
    pub fn new(
        pool: &'a TypePool,
        specifics: &'a SpecificTypes,
        api_level: u32,
        restricted: bool,
    ) -> Self {
        Gate {
            pool,
            specifics,
            api_level,
            restricted,
        }
    }

    /// Gate an exported declaration. Returns `false` after reporting a
    /// diagnostic when the target forbids the declaration's type.
    pub fn validate_decl(&self, decl: &VarDecl, sink: &mut DiagnosticQueue) -> bool {
        self.validate_type(decl.ty, decl.span, &decl.name, decl.linkage, sink)
    }

    /// Gate a type as if declared with the given name and linkage.
    pub fn validate_type(
        &self,
        ty: TypeRef,
        span: Span,
        decl_name: &str,
        linkage: Linkage,
        sink: &mut DiagnosticQueue,
    ) -> bool {
        if linkage == Linkage::External
            && self.api_level < MIN_API_OBJECT_IN_COMPOSITE
            && contains_object_type(self.specifics, self.pool, ty)
        {
            sink.add(
                Diagnostic::error(ErrorCode::E4001)
                    .with_message(format!(
                        "declarations of device object types cannot be exported: '{decl_name}'"
                    ))
                    .with_label(span, "declared here")
                    .with_required_api(MIN_API_OBJECT_IN_COMPOSITE),
            );
            return false;
        }
        let mut visited = FxHashSet::default();
        self.walk(ty, span, decl_name, linkage, &mut visited, sink)
    }

    fn walk(
        &self,
        ty: TypeRef,
        span: Span,
        decl_name: &str,
        linkage: Linkage,
        visited: &mut FxHashSet<TypeRef>,
        sink: &mut DiagnosticQueue,
    ) -> bool {
        match self.pool.kind(ty) {
            TypeKind::Builtin(b) => {
                if self.restricted && b.is_wide() {
                    sink.add(
                        Diagnostic::error(ErrorCode::E3002)
                            .with_message(format!(
                                "64-bit types are forbidden in the restricted dialect: \
                                 '{decl_name}'"
                            ))
                            .with_label(span, "declared here"),
                    );
                    return false;
                }
                true
            }
            TypeKind::Pointer(pointee) => {
                if self.restricted {
                    sink.add(
                        Diagnostic::error(ErrorCode::E3001)
                            .with_message(format!(
                                "pointers are forbidden in the restricted dialect: '{decl_name}'"
                            ))
                            .with_label(span, "declared here"),
                    );
                    return false;
                }
                // A pointer resets containment: a pointed-to object is a
                // plain pointer on the wire.
                self.walk(*pointee, span, decl_name, linkage, visited, sink)
            }
            TypeKind::Record(def) => {
                if self.specifics.of_type(self.pool, ty).is_some() {
                    // Device-object and matrix handles were gated above
                    // and have no fields of their own to walk.
                    return true;
                }
                if !visited.insert(ty) {
                    return true;
                }
                if def.is_union {
                    let has_object = def
                        .fields
                        .iter()
                        .any(|f| contains_object_type(self.specifics, self.pool, f.ty));
                    if has_object {
                        let shown = def.resolved_name().unwrap_or("<anonymous>");
                        sink.add(
                            Diagnostic::error(ErrorCode::E2016)
                                .with_message(format!(
                                    "unions containing device object types cannot be \
                                     exported: '{shown}'"
                                ))
                                .with_label(def.span, "declared here"),
                        );
                        return false;
                    }
                }
                for field in &def.fields {
                    if linkage == Linkage::External
                        && self.api_level < MIN_API_VEC3_FIELD
                        && matches!(
                            self.pool.kind(field.ty),
                            TypeKind::Vector { len: 3, .. }
                        )
                    {
                        sink.add(
                            Diagnostic::error(ErrorCode::E4002)
                                .with_message(format!(
                                    "structs containing width-3 vectors cannot be \
                                     exported: '{decl_name}.{}'",
                                    field.name
                                ))
                                .with_label(field.span, "declared here")
                                .with_required_api(MIN_API_VEC3_FIELD),
                        );
                        return false;
                    }
                    if !self.walk(field.ty, field.span, decl_name, linkage, visited, sink) {
                        return false;
                    }
                }
                true
            }
            TypeKind::Vector { elem, .. } | TypeKind::Array { elem, .. } => {
                self.walk(*elem, span, decl_name, linkage, visited, sink)
            }
            TypeKind::Enum { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests;
