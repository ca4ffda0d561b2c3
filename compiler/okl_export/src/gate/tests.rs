use pretty_assertions::assert_eq;

use okl_diagnostic::{DiagnosticQueue, ErrorCode};
use okl_ir::{Builtin, FieldDef, RecordDef, TypePool, VarDecl};

use crate::builtin_map::SpecificTypes;
use crate::gate::{Gate, MIN_API_OBJECT_IN_COMPOSITE, MIN_API_VEC3_FIELD};

fn gate_decl(
    pool: &TypePool,
    decl: &VarDecl,
    api_level: u32,
    restricted: bool,
) -> Result<(), ErrorCode> {
    let specifics = SpecificTypes::new();
    let gate = Gate::new(pool, &specifics, api_level, restricted);
    let mut sink = DiagnosticQueue::new();
    if gate.validate_decl(decl, &mut sink) {
        Ok(())
    } else {
        Err(sink.flush().swap_remove(0).code)
    }
}

#[test]
fn restricted_dialect_rejects_pointers_and_wide_builtins() {
    let mut pool = TypePool::new();
    let int = pool.builtin(Builtin::Int);
    let p = pool.pointer(int);
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("p", p), 20, true),
        Err(ErrorCode::E3001)
    );
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("d", pool.builtin(Builtin::Double)), 20, true),
        Err(ErrorCode::E3002)
    );
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("l", pool.builtin(Builtin::Long)), 20, true),
        Err(ErrorCode::E3002)
    );
    // The same declarations pass in the full dialect.
    assert_eq!(gate_decl(&pool, &VarDecl::external("p", p), 20, false), Ok(()));
    // float and int stay legal in the restricted dialect.
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("f", pool.builtin(Builtin::Float)), 20, true),
        Ok(())
    );
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("i", int), 20, true),
        Ok(())
    );
}

#[test]
fn device_objects_are_gated_by_api_level() {
    let mut pool = TypePool::new();
    let obj = pool.record(RecordDef::strukt("okl_allocation", vec![]));
    let holder = pool.record(RecordDef::strukt("Holder", vec![FieldDef::new("a", obj)]));

    let below = MIN_API_OBJECT_IN_COMPOSITE - 1;
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("h", holder), below, false),
        Err(ErrorCode::E4001)
    );
    assert_eq!(
        gate_decl(
            &pool,
            &VarDecl::external("h", holder),
            MIN_API_OBJECT_IN_COMPOSITE,
            false
        ),
        Ok(())
    );
    // Static declarations are never gated.
    assert_eq!(
        gate_decl(&pool, &VarDecl::internal("h", holder), below, false),
        Ok(())
    );
}

#[test]
fn pointed_to_objects_are_not_gated() {
    let mut pool = TypePool::new();
    let obj = pool.record(RecordDef::strukt("okl_element", vec![]));
    let p = pool.pointer(obj);
    assert_eq!(gate_decl(&pool, &VarDecl::external("p", p), 1, false), Ok(()));
}

#[test]
fn vec3_struct_fields_are_gated_by_api_level() {
    let mut pool = TypePool::new();
    let float = pool.builtin(Builtin::Float);
    let v3 = pool.vector(float, 3);
    let s = pool.record(RecordDef::strukt("V", vec![FieldDef::new("v", v3)]));

    let below = MIN_API_VEC3_FIELD - 1;
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("s", s), below, false),
        Err(ErrorCode::E4002)
    );
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("s", s), MIN_API_VEC3_FIELD, false),
        Ok(())
    );
    assert_eq!(
        gate_decl(&pool, &VarDecl::internal("s", s), below, false),
        Ok(())
    );
    // A bare vec3 declaration is not field-gated.
    assert_eq!(
        gate_decl(&pool, &VarDecl::external("v", v3), below, false),
        Ok(())
    );
}

#[test]
fn unions_with_object_members_are_rejected_at_any_api_level() {
    let mut pool = TypePool::new();
    let obj = pool.record(RecordDef::strukt("okl_sampler", vec![]));
    let u = pool.record(RecordDef::union("U", vec![FieldDef::new("s", obj)]));
    assert_eq!(
        gate_decl(&pool, &VarDecl::internal("u", u), 99, false),
        Err(ErrorCode::E2016)
    );
}
