use pretty_assertions::assert_eq;
use smallvec::smallvec;

use crate::data_type::DataType;
use crate::node::{ExportNode, Field, NodeClass, NodeId, NodeKind};

#[test]
fn class_splits_matrices_from_scalar_primitives() {
    let scalar = ExportNode::new(
        "float".into(),
        NodeKind::Primitive {
            data_type: DataType::Float32,
        },
    );
    let matrix = ExportNode::new(
        "okl_matrix4x4".into(),
        NodeKind::Matrix {
            data_type: DataType::Matrix4x4,
        },
    );
    assert_eq!(scalar.class(), NodeClass::Primitive);
    assert_eq!(matrix.class(), NodeClass::Matrix);
    assert_eq!(matrix.matrix_dim(), Some(4));
}

#[test]
fn vector_len_defaults_to_one_for_non_vectors() {
    let vec = ExportNode::new(
        "float4".into(),
        NodeKind::Vector {
            data_type: DataType::Float32,
            len: 4,
        },
    );
    let rec = ExportNode::new(
        "P".into(),
        NodeKind::Record {
            fields: smallvec![Field::new("x", NodeId::from_raw(0), 0)],
            packed: false,
            artificial: false,
            store_size: 4,
            alloc_size: 4,
        },
    );
    assert_eq!(vec.vector_len(), 4);
    assert_eq!(rec.vector_len(), 1);
    assert_eq!(vec.data_type(), Some(DataType::Float32));
    assert_eq!(rec.data_type(), None);
}

#[test]
fn node_id_is_a_dense_index() {
    let id = NodeId::from_raw(7);
    assert_eq!(id.raw(), 7);
    assert_eq!(id.to_string(), "n7");
}
