//! Canonical names for source types.
//!
//! The canonical name is the export registry's dedup key. Builtins map to
//! a fixed mnemonic, records use their resolved name, pointers synthesize
//! `*<pointee>`, fixed vectors synthesize `<base><n>`. Constant arrays
//! always name to the `<ConstantArray>` sentinel: arrays are structurally
//! unique per use and are never looked up by name.
//!
//! Shapes whose real name would be too complicated to construct get a
//! *dummy* name of the form `<kind:hint>`; dummy-named nodes are never
//! inserted into the registry because they cannot be safely deduplicated.

use okl_ir::{TypeKind, TypePool, TypeRef};

use crate::builtin_map::builtin_info;

/// Sentinel name for constant arrays.
pub const CONSTANT_ARRAY_NAME: &str = "<ConstantArray>";

/// Make a name for shapes that are too complicated to name for real.
pub fn dummy_name(kind: &str, hint: &str) -> String {
    if hint.is_empty() {
        format!("<{kind}>")
    } else {
        format!("<{kind}:{hint}>")
    }
}

/// Check if a name is a dummy name (and must stay out of the registry).
pub fn is_dummy_name(name: &str) -> bool {
    name.starts_with('<')
}

/// Derive the canonical name of a source type.
///
/// Returns `None` when no name can be derived (an anonymous record with
/// no typedef alias, or a pointer to such a shape).
pub fn type_name(pool: &TypePool, ty: TypeRef) -> Option<String> {
    match pool.kind(ty) {
        TypeKind::Builtin(b) => builtin_info(*b).map(|info| info.names[0].to_owned()),
        TypeKind::Record(def) => def.resolved_name().map(str::to_owned),
        TypeKind::Pointer(pointee) => {
            let pointee_name = type_name(pool, *pointee)?;
            Some(format!("*{pointee_name}"))
        }
        TypeKind::Vector { elem, len } => vector_type_name(pool, *elem, *len),
        TypeKind::Array { .. } => Some(CONSTANT_ARRAY_NAME.to_owned()),
        // Enums are re-typed to the canonical signed 32-bit integer
        // before any node is created; name them accordingly.
        TypeKind::Enum { .. } => type_name(pool, TypePool::builtin_ref(okl_ir::Builtin::Int)),
    }
}

/// The canonical name of a fixed vector (`float4`, `uint2`, ...).
///
/// Returns `None` when the element is not an exportable builtin or the
/// width is outside `2..=4`.
pub fn vector_type_name(pool: &TypePool, elem: TypeRef, len: u32) -> Option<String> {
    if !(2..=4).contains(&len) {
        return None;
    }
    let TypeKind::Builtin(b) = pool.kind(elem) else {
        return None;
    };
    let info = builtin_info(*b)?;
    Some(info.names[(len - 1) as usize].to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use okl_ir::{Builtin, FieldDef, RecordDef};
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_and_vector_names() {
        let mut pool = TypePool::new();
        let float = pool.builtin(Builtin::Float);
        let float3 = pool.vector(float, 3);
        assert_eq!(type_name(&pool, float).as_deref(), Some("float"));
        assert_eq!(type_name(&pool, float3).as_deref(), Some("float3"));

        let float5 = pool.vector(float, 5);
        assert_eq!(type_name(&pool, float5), None);
    }

    #[test]
    fn record_name_with_typedef_fallback() {
        let mut pool = TypePool::new();
        let int = pool.builtin(Builtin::Int);
        let named = pool.record(RecordDef::strukt("Point", vec![FieldDef::new("x", int)]));
        assert_eq!(type_name(&pool, named).as_deref(), Some("Point"));

        let mut anon = RecordDef::strukt("", vec![FieldDef::new("x", int)]);
        anon.typedef_name = Some("Aliased".into());
        let aliased = pool.record(anon);
        assert_eq!(type_name(&pool, aliased).as_deref(), Some("Aliased"));

        let nameless = pool.record(RecordDef::strukt("", vec![]));
        assert_eq!(type_name(&pool, nameless), None);
    }

    #[test]
    fn pointer_names_prefix_pointee() {
        let mut pool = TypePool::new();
        let int = pool.builtin(Builtin::Int);
        let ptr = pool.pointer(int);
        assert_eq!(type_name(&pool, ptr).as_deref(), Some("*int"));

        let anon = pool.record(RecordDef::strukt("", vec![]));
        let anon_ptr = pool.pointer(anon);
        assert_eq!(type_name(&pool, anon_ptr), None);
    }

    #[test]
    fn arrays_use_the_sentinel_and_stay_dummy() {
        let mut pool = TypePool::new();
        let int = pool.builtin(Builtin::Int);
        let arr = pool.array(int, 8);
        let name = type_name(&pool, arr);
        assert_eq!(name.as_deref(), Some(CONSTANT_ARRAY_NAME));
        assert!(is_dummy_name(CONSTANT_ARRAY_NAME));
    }

    #[test]
    fn enums_name_as_int() {
        let mut pool = TypePool::new();
        let e = pool.enumeration("Mode");
        assert_eq!(type_name(&pool, e).as_deref(), Some("int"));
    }

    #[test]
    fn dummy_names_are_bracketed() {
        assert_eq!(dummy_name("Record", "hint"), "<Record:hint>");
        assert_eq!(dummy_name("Pointer", ""), "<Pointer>");
        assert!(is_dummy_name("<Record:hint>"));
        assert!(!is_dummy_name("Point"));
    }
}
