//! The per-unit export registry.
//!
//! [`ExportContext`] owns the node arena, the canonical-name memo table,
//! the target configuration, and the diagnostics sink. One context is
//! created per compilation unit and dropped with it; every node handle
//! ([`NodeId`]) is scoped to its context.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use okl_diagnostic::{Diagnostic, DiagnosticQueue};
use okl_ir::{Span, TypePool, TypeRef, VarDecl};

use crate::builtin_map::SpecificTypes;
use crate::data_type::{Category, DataType};
use crate::factory;
use crate::gate::Gate;
use crate::layout::{AbiType, DataLayout, TargetLayout, TargetWidth};
use crate::name;
use crate::node::{ExportNode, NodeId, NodeKind};
use crate::validate::Validator;

/// Target environment for one compilation unit.
#[derive(Copy, Clone, Debug)]
pub struct TargetConfig {
    pub width: TargetWidth,
    /// Target API integer level used by the gating rules.
    pub api_level: u32,
    /// Whether the restricted dialect is in effect.
    pub restricted: bool,
}

impl TargetConfig {
    pub const fn new(width: TargetWidth, api_level: u32) -> Self {
        TargetConfig {
            width,
            api_level,
            restricted: false,
        }
    }

    /// Enable the restricted dialect.
    pub const fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }
}

/// Registry and engine entry point for one compilation unit.
///
/// `export_decl` is the main operation: gate the declaration, validate
/// its type, and build (or find) the canonical node for it. A failed
/// declaration reports through the sink and returns `None`; the caller
/// keeps going with the next declaration and checks
/// [`ExportContext::has_errors`] at the end of the unit.
pub struct ExportContext {
    target: TargetConfig,
    layout: TargetLayout,
    specifics: SpecificTypes,
    nodes: Vec<ExportNode>,
    by_name: FxHashMap<String, NodeId>,
    sink: DiagnosticQueue,
}

impl ExportContext {
    pub fn new(target: TargetConfig) -> Self {
        ExportContext {
            target,
            layout: TargetLayout::new(target.width),
            specifics: SpecificTypes::new(),
            nodes: Vec::new(),
            by_name: FxHashMap::default(),
            sink: DiagnosticQueue::new(),
        }
    }

    pub const fn target(&self) -> &TargetConfig {
        &self.target
    }

    pub const fn layout(&self) -> &TargetLayout {
        &self.layout
    }

    pub(crate) const fn specifics(&self) -> &SpecificTypes {
        &self.specifics
    }

    /// Look up a node by handle.
    ///
    /// # Panics
    /// Panics if the handle was not created by this context.
    pub fn node(&self, id: NodeId) -> &ExportNode {
        &self.nodes[id.index()]
    }

    /// The canonical node registered under a name, if any.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Iterate all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &ExportNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::from_raw(i as u32), n))
    }

    pub fn has_errors(&self) -> bool {
        self.sink.has_errors()
    }

    pub fn diagnostics(&mut self) -> &mut DiagnosticQueue {
        &mut self.sink
    }

    /// Drain the accumulated diagnostics, sorted by source position.
    pub fn flush_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.sink.flush()
    }

    /// Allocate a node, registering it under its canonical name unless
    /// the name is a dummy (dummy-named shapes cannot be deduplicated).
    pub(crate) fn intern_node(&mut self, node_name: String, kind: NodeKind) -> NodeId {
        let id = NodeId::from_raw(self.nodes.len() as u32);
        let register = !name::is_dummy_name(&node_name);
        if register {
            self.by_name.insert(node_name.clone(), id);
        }
        self.nodes.push(ExportNode::new(node_name, kind));
        id
    }

    /// Export a top-level declaration: dialect/API gate plus the full
    /// structural pipeline of [`ExportContext::export_type`].
    pub fn export_decl(&mut self, pool: &TypePool, decl: &VarDecl) -> Option<NodeId> {
        debug!(name = %decl.name, "exporting declaration");
        let gate = Gate::new(
            pool,
            &self.specifics,
            self.target.api_level,
            self.target.restricted,
        );
        if !gate.validate_decl(decl, &mut self.sink) {
            return None;
        }
        self.export_type(pool, decl.ty, decl.span)
    }

    /// Export a type: validate, canonicalize, and return the node for
    /// it, reusing a previously built node with the same canonical name.
    pub fn export_type(&mut self, pool: &TypePool, ty: TypeRef, span: Span) -> Option<NodeId> {
        let validator = Validator::new(pool, &self.specifics);
        let mut visited = FxHashSet::default();
        let (normalized, canonical) =
            validator.normalize_type(ty, span, &mut visited, &mut self.sink)?;
        if let Some(id) = self.by_name.get(&canonical) {
            return Some(*id);
        }
        let id = factory::create_node(self, pool, normalized, canonical, span)?;
        debug!(node = %id, name = %self.node(id).name(), "created export node");
        Some(id)
    }

    /// The memoized ABI materialization of a node.
    pub fn abi_of(&mut self, id: NodeId) -> AbiType {
        if let Some(abi) = self.nodes[id.index()].abi() {
            return abi.clone();
        }
        let abi = self.compute_abi(id);
        self.nodes[id.index()].set_abi(abi.clone());
        abi
    }

    fn compute_abi(&mut self, id: NodeId) -> AbiType {
        // Kinds are cloned out so child materialization can re-borrow
        // the arena; the graph is acyclic (pointers never appear inside
        // aggregates), so the recursion terminates.
        match self.nodes[id.index()].kind().clone() {
            NodeKind::Primitive { data_type } => self.primitive_abi(data_type),
            NodeKind::Vector { data_type, len } => {
                AbiType::vector(scalar_abi(data_type), len)
            }
            NodeKind::Matrix { data_type } => {
                let dim = u64::from(data_type.matrix_dim().unwrap_or(0));
                AbiType::Struct {
                    fields: vec![AbiType::array(AbiType::float(32), dim * dim)],
                    packed: false,
                }
            }
            NodeKind::Pointer { .. } => AbiType::Pointer,
            NodeKind::ConstantArray { elem, len } => {
                AbiType::array(self.abi_of(elem), u64::from(len))
            }
            NodeKind::Record { fields, packed, .. } => {
                let fields = fields.into_iter().map(|f| self.abi_of(f.ty)).collect();
                AbiType::Struct { fields, packed }
            }
        }
    }

    fn primitive_abi(&self, data_type: DataType) -> AbiType {
        if data_type.category() == Category::Object {
            // Opaque handle: one word on a 32-bit target, a packed
            // 256-bit block on a 64-bit target. Evaluated from the
            // target width; the reflection table only holds the legacy
            // 32-bit entry.
            return match self.target.width {
                TargetWidth::W32 => AbiType::int(32),
                TargetWidth::W64 => AbiType::Struct {
                    fields: vec![AbiType::int(64); 4],
                    packed: true,
                },
            };
        }
        scalar_abi(data_type)
    }

    /// Bytes actually written when a value of the node's type is stored.
    pub fn store_size(&mut self, id: NodeId) -> u64 {
        if let NodeKind::Record { store_size, .. } = self.nodes[id.index()].kind() {
            // Records lay out eagerly at construction time.
            return *store_size;
        }
        let abi = self.abi_of(id);
        self.layout.store_size(&abi)
    }

    /// Stride in bytes between successive values, including padding.
    pub fn alloc_size(&mut self, id: NodeId) -> u64 {
        if let NodeKind::Record { alloc_size, .. } = self.nodes[id.index()].kind() {
            return *alloc_size;
        }
        let abi = self.abi_of(id);
        self.layout.alloc_size(&abi)
    }

    /// Logical size in bytes as consumers of the wire format see it.
    ///
    /// For most kinds this equals the store size; device objects are
    /// the exception, reporting their target-dependent handle width
    /// regardless of the reflection table's legacy entry.
    pub fn get_size(&mut self, id: NodeId) -> u64 {
        match self.nodes[id.index()].kind().clone() {
            NodeKind::Primitive { data_type } => {
                if data_type.category() == Category::Object {
                    if self.target.width.is_64() {
                        32
                    } else {
                        4
                    }
                } else {
                    u64::from(data_type.size_in_bits() / 8)
                }
            }
            NodeKind::Vector { data_type, len } => {
                u64::from(len) * u64::from(data_type.size_in_bits() / 8)
            }
            NodeKind::Matrix { data_type } => {
                let dim = u64::from(data_type.matrix_dim().unwrap_or(0));
                dim * dim * 4
            }
            NodeKind::Pointer { .. } => self.target.width.pointer_bytes(),
            NodeKind::ConstantArray { elem, len } => u64::from(len) * self.get_size(elem),
            NodeKind::Record { store_size, .. } => store_size,
        }
    }

    /// Mark a node (and everything it references) live for a later
    /// pass, dropping their memoized ABI materializations.
    pub fn keep(&mut self, id: NodeId) {
        self.nodes[id.index()].mark_kept();
        match self.nodes[id.index()].kind().clone() {
            NodeKind::Pointer { pointee } => self.keep(pointee),
            NodeKind::ConstantArray { elem, .. } => self.keep(elem),
            NodeKind::Record { fields, .. } => {
                for field in fields {
                    self.keep(field.ty);
                }
            }
            NodeKind::Primitive { .. } | NodeKind::Vector { .. } | NodeKind::Matrix { .. } => {}
        }
    }

    /// Structural equality between two nodes of this context.
    pub fn equals(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        match (self.node(a).kind(), self.node(b).kind()) {
            (
                NodeKind::Primitive { data_type: da },
                NodeKind::Primitive { data_type: db },
            )
            | (NodeKind::Matrix { data_type: da }, NodeKind::Matrix { data_type: db }) => {
                da == db
            }
            (
                NodeKind::Vector {
                    data_type: da,
                    len: la,
                },
                NodeKind::Vector {
                    data_type: db,
                    len: lb,
                },
            ) => da == db && la == lb,
            (NodeKind::Pointer { pointee: pa }, NodeKind::Pointer { pointee: pb }) => {
                self.equals(*pa, *pb)
            }
            (
                NodeKind::ConstantArray { elem: ea, len: la },
                NodeKind::ConstantArray { elem: eb, len: lb },
            ) => la == lb && self.equals(*ea, *eb),
            (
                NodeKind::Record {
                    fields: fa,
                    packed: pa,
                    ..
                },
                NodeKind::Record {
                    fields: fb,
                    packed: pb,
                    ..
                },
            ) => {
                pa == pb
                    && fa.len() == fb.len()
                    && fa.iter().zip(fb.iter()).all(|(x, y)| {
                        x.name == y.name && x.offset == y.offset && self.equals(x.ty, y.ty)
                    })
            }
            _ => false,
        }
    }

    /// Short mnemonic used by the glue-code generator to name runtime
    /// elements built for this node.
    pub fn element_name(&self, id: NodeId) -> String {
        let node = self.node(id);
        match node.kind() {
            NodeKind::Primitive { data_type } | NodeKind::Matrix { data_type } => {
                let row = data_type.reflection();
                row.short_name.unwrap_or(row.wire_name).to_owned()
            }
            NodeKind::Vector { data_type, len } => {
                let row = data_type.reflection();
                format!("{}_{len}", row.short_name.unwrap_or(row.wire_name))
            }
            NodeKind::Pointer { pointee } => self.element_name(*pointee),
            NodeKind::ConstantArray { elem, .. } => self.element_name(*elem),
            NodeKind::Record { .. } => format!("Field_{}", node.name()),
        }
    }
}

fn scalar_abi(data_type: DataType) -> AbiType {
    match data_type {
        DataType::Float16 | DataType::Float32 | DataType::Float64 => {
            AbiType::float(data_type.size_in_bits())
        }
        // Booleans are 1-bit values stored in a byte.
        DataType::Boolean => AbiType::int(1),
        _ => AbiType::int(data_type.size_in_bits()),
    }
}
