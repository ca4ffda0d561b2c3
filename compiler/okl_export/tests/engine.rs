#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test code — panics provide clear failure messages"
)]

//! End-to-end tests of the export pipeline through its public surface:
//! declaration in, canonical node (or diagnostic) out.

use pretty_assertions::assert_eq;

use okl_diagnostic::ErrorCode;
use okl_export::{
    reflect, DataType, ExportContext, NodeClass, TargetConfig, TargetWidth,
    MIN_API_OBJECT_IN_COMPOSITE, REFLECTION_TABLE,
};
use okl_ir::{Builtin, FieldDef, RecordDef, Span, TypePool, VarDecl};

fn context() -> ExportContext {
    ExportContext::new(TargetConfig::new(TargetWidth::W64, 24))
}

#[test]
fn reflection_table_rows_match_ordinals() {
    assert_eq!(REFLECTION_TABLE.len(), DataType::COUNT);
    for ordinal in 0..DataType::COUNT as u32 {
        let dt = DataType::from_ordinal(ordinal).unwrap();
        assert_eq!(dt.ordinal(), ordinal);
        assert!(std::ptr::eq(dt.reflection(), &REFLECTION_TABLE[ordinal as usize]));
    }
}

#[test]
fn exporting_two_variables_of_one_struct_dedups() {
    let mut pool = TypePool::new();
    let float = pool.builtin(Builtin::Float);
    let v2 = pool.vector(float, 2);
    let s = pool.record(RecordDef::strukt(
        "Particle",
        vec![FieldDef::new("pos", v2), FieldDef::new("mass", float)],
    ));
    let mut cx = context();
    let a = cx.export_decl(&pool, &VarDecl::external("p0", s)).unwrap();
    let b = cx.export_decl(&pool, &VarDecl::external("p1", s)).unwrap();
    assert_eq!(a, b);
    assert_eq!(cx.node(a).name(), "Particle");
    assert!(!cx.has_errors());
}

#[test]
fn unit_fails_iff_any_declaration_failed() {
    let mut pool = TypePool::new();
    let int = pool.builtin(Builtin::Int);
    let anon = pool.record(RecordDef::strukt("", vec![FieldDef::new("x", int)]));
    let mut cx = context();
    assert!(cx.export_decl(&pool, &VarDecl::external("bad", anon)).is_none());
    assert!(cx.export_decl(&pool, &VarDecl::external("ok", int)).is_some());
    assert!(cx.has_errors());
    let diags = cx.flush_diagnostics();
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].code, ErrorCode::E2002);
    assert!(!cx.has_errors());
}

#[test]
fn object_fields_gate_on_api_and_linkage() {
    let mut pool = TypePool::new();
    let obj = pool.record(RecordDef::strukt("okl_allocation", vec![]));
    let holder = pool.record(RecordDef::strukt(
        "Holder",
        vec![FieldDef::new("buf", obj)],
    ));

    let mut old = ExportContext::new(TargetConfig::new(
        TargetWidth::W64,
        MIN_API_OBJECT_IN_COMPOSITE - 1,
    ));
    assert!(old.export_decl(&pool, &VarDecl::external("h", holder)).is_none());
    assert_eq!(old.flush_diagnostics()[0].required_api, Some(MIN_API_OBJECT_IN_COMPOSITE));
    // The same struct passes with internal linkage or a new enough API.
    assert!(old.export_decl(&pool, &VarDecl::internal("h", holder)).is_some());

    let mut new = context();
    assert!(new.export_decl(&pool, &VarDecl::external("h", holder)).is_some());
}

#[test]
fn restricted_dialect_declarations() {
    let mut pool = TypePool::new();
    let float = pool.builtin(Builtin::Float);
    let double = pool.builtin(Builtin::Double);
    let p = pool.pointer(float);
    let target = TargetConfig::new(TargetWidth::W32, 24).restricted();

    let mut cx = ExportContext::new(target);
    assert!(cx.export_decl(&pool, &VarDecl::external("f", float)).is_some());
    assert!(cx.export_decl(&pool, &VarDecl::external("d", double)).is_none());
    assert!(cx.export_decl(&pool, &VarDecl::external("p", p)).is_none());
    let codes: Vec<_> = cx.flush_diagnostics().into_iter().map(|d| d.code).collect();
    assert_eq!(codes, vec![ErrorCode::E3002, ErrorCode::E3001]);
}

#[test]
fn pointer_nodes_flatten_with_their_pointee_row() {
    let mut pool = TypePool::new();
    let uchar = pool.builtin(Builtin::UChar);
    let p = pool.pointer(uchar);
    let mut cx = context();
    let id = cx.export_decl(&pool, &VarDecl::external("data", p)).unwrap();
    assert_eq!(cx.node(id).class(), NodeClass::Pointer);
    assert_eq!(cx.node(id).name(), "*uchar");
    let data = reflect::flatten(&cx, id).unwrap();
    assert_eq!(data.ty.wire_name, "UNSIGNED_8");
    assert!(data.is_pointer);
}

#[test]
fn sizes_across_target_widths() {
    let mut pool = TypePool::new();
    let float = pool.builtin(Builtin::Float);
    let obj = pool.record(RecordDef::strukt("okl_element", vec![]));
    let p = pool.pointer(float);

    for (width, ptr_bytes, obj_bytes) in
        [(TargetWidth::W32, 4, 4), (TargetWidth::W64, 8, 32)]
    {
        let mut cx = ExportContext::new(TargetConfig::new(width, 24));
        let p_id = cx.export_type(&pool, p, Span::DUMMY).unwrap();
        let o_id = cx.export_type(&pool, obj, Span::DUMMY).unwrap();
        assert_eq!(cx.get_size(p_id), ptr_bytes);
        assert_eq!(cx.get_size(o_id), obj_bytes);
    }
}

#[test]
fn mixed_struct_layout_with_vectors() {
    let mut pool = TypePool::new();
    let float = pool.builtin(Builtin::Float);
    let uchar = pool.builtin(Builtin::UChar);
    let v3 = pool.vector(float, 3);
    // { uchar tag; float3 v; } -> v aligns to 16, store 28, alloc 32.
    let s = pool.record(RecordDef::strukt(
        "Mixed",
        vec![FieldDef::new("tag", uchar), FieldDef::new("v", v3)],
    ));
    let mut cx = context();
    let id = cx.export_decl(&pool, &VarDecl::external("m", s)).unwrap();
    assert_eq!(cx.store_size(id), 28);
    assert_eq!(cx.alloc_size(id), 32);
}
