//! Per-class node factories.
//!
//! Each factory re-derives the shape its class requires instead of
//! trusting the validator's earlier pass, and reports its own diagnostic
//! when the shape it sees directly is wrong. Children are always
//! exported (and therefore fully validated and registered) before the
//! parent node is built.

use smallvec::SmallVec;

use okl_diagnostic::{Diagnostic, ErrorCode};
use okl_ir::{Builtin, RecordDef, Span, TypeKind, TypePool, TypeRef};

use crate::builtin_map::builtin_info;
use crate::data_type::DataType;
use crate::node::{Field, NodeId, NodeKind};
use crate::registry::ExportContext;

pub(crate) fn create_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    ty: TypeRef,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    match pool.kind(ty) {
        TypeKind::Builtin(b) => match builtin_info(*b) {
            Some(entry) => Some(cx.intern_node(
                canonical,
                NodeKind::Primitive {
                    data_type: entry.data_type,
                },
            )),
            None => {
                report(cx, ErrorCode::E2012, span, format!("type '{b}' cannot be exported"));
                None
            }
        },
        TypeKind::Record(def) => match cx.specifics().of_type(pool, ty) {
            Some(dt) if dt.is_matrix() => matrix_node(cx, pool, def, dt, canonical, span),
            Some(dt) => Some(cx.intern_node(canonical, NodeKind::Primitive { data_type: dt })),
            None => record_node(cx, pool, def, canonical, span),
        },
        TypeKind::Pointer(pointee) => pointer_node(cx, pool, *pointee, canonical, span),
        TypeKind::Vector { elem, len } => vector_node(cx, pool, *elem, *len, canonical, span),
        TypeKind::Array { elem, len } => array_node(cx, pool, *elem, *len, canonical, span),
        // Enums are re-typed to `int` during normalization; one reaching
        // a factory means the caller skipped normalization, which is a
        // bug in the engine rather than in the input.
        TypeKind::Enum { .. } => unreachable!("enum types are normalized before construction"),
    }
}

/// A matrix is spelled as a specific struct: exactly one field, a
/// constant array of `float` of length N*N.
fn matrix_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    def: &RecordDef,
    dt: DataType,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    let dim = u64::from(dt.matrix_dim().unwrap_or(0));
    let well_formed = match def.fields.as_slice() {
        [only] => match pool.kind(only.ty) {
            TypeKind::Array { elem, len } => {
                *len == dim * dim
                    && matches!(pool.kind(*elem), TypeKind::Builtin(Builtin::Float))
            }
            _ => false,
        },
        _ => false,
    };
    if !well_formed {
        report(
            cx,
            ErrorCode::E2014,
            span,
            format!(
                "'{canonical}' must be a struct with a single float array of {n} elements",
                n = dim * dim
            ),
        );
        return None;
    }
    Some(cx.intern_node(canonical, NodeKind::Matrix { data_type: dt }))
}

fn pointer_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    pointee: TypeRef,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    match pool.kind(pointee) {
        TypeKind::Pointer(_) => {
            report(
                cx,
                ErrorCode::E2006,
                span,
                "multiple levels of pointers cannot be exported".to_owned(),
            );
            None
        }
        TypeKind::Array { .. } => {
            report(
                cx,
                ErrorCode::E2007,
                span,
                "pointers to arrays cannot be exported".to_owned(),
            );
            None
        }
        _ => {
            let pointee = cx.export_type(pool, pointee, span)?;
            Some(cx.intern_node(canonical, NodeKind::Pointer { pointee }))
        }
    }
}

fn vector_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    elem: TypeRef,
    len: u32,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    let entry = match pool.kind(elem) {
        TypeKind::Builtin(b) if (2..=4).contains(&len) => builtin_info(*b),
        _ => None,
    };
    match entry {
        Some(entry) => Some(cx.intern_node(
            canonical,
            NodeKind::Vector {
                data_type: entry.data_type,
                len,
            },
        )),
        None => {
            report(
                cx,
                ErrorCode::E2010,
                span,
                format!("vector type '{canonical}' cannot be exported"),
            );
            None
        }
    }
}

fn array_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    elem: TypeRef,
    len: u64,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    let Ok(len) = u32::try_from(len) else {
        report(
            cx,
            ErrorCode::E2015,
            span,
            format!("array of {len} elements is too large to be exported"),
        );
        return None;
    };
    if len == 0 {
        report(
            cx,
            ErrorCode::E2015,
            span,
            "zero-length arrays cannot be exported".to_owned(),
        );
        return None;
    }
    let elem = cx.export_type(pool, elem, span)?;
    Some(cx.intern_node(canonical, NodeKind::ConstantArray { elem, len }))
}

/// Builds a record node: every field exported first, offsets assigned
/// from the target layout provider, store/alloc sizes computed eagerly.
fn record_node(
    cx: &mut ExportContext,
    pool: &TypePool,
    def: &RecordDef,
    canonical: String,
    span: Span,
) -> Option<NodeId> {
    if !def.is_definition {
        report(
            cx,
            ErrorCode::E2003,
            span,
            format!("struct '{canonical}' is not defined in this module"),
        );
        return None;
    }
    let mut fields: SmallVec<[Field; 4]> = SmallVec::with_capacity(def.fields.len());
    let mut abis = Vec::with_capacity(def.fields.len());
    for field_def in &def.fields {
        let Some(child) = cx.export_type(pool, field_def.ty, field_def.span) else {
            cx.diagnostics().add(
                Diagnostic::error(ErrorCode::E2013)
                    .with_message(format!(
                        "field '{canonical}.{}' cannot be exported",
                        field_def.name
                    ))
                    .with_label(field_def.span, "declared here"),
            );
            return None;
        };
        abis.push(cx.abi_of(child));
        fields.push(Field::new(field_def.name.clone(), child, 0));
    }
    let layout = cx.layout().struct_layout(&abis, def.is_packed);
    for (field, offset) in fields.iter_mut().zip(&layout.offsets) {
        field.offset = *offset;
    }
    Some(cx.intern_node(
        canonical,
        NodeKind::Record {
            fields,
            packed: def.is_packed,
            artificial: false,
            store_size: layout.store_size,
            alloc_size: layout.alloc_size,
        },
    ))
}

fn report(cx: &mut ExportContext, code: ErrorCode, span: Span, message: String) {
    cx.diagnostics().add(Diagnostic::error(code).with_message(message).with_label(span, "here"));
}
