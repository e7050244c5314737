//! Shared test fixtures
//!
//! Builds tiny ONNX classifiers in memory so the real tract loading and
//! execution path can run without shipping model files:
//!
//! ```text
//! input [1,128,128,3] -> ReduceMean(axes 1,2) [1,3] -> MatMul W [3,K] -> Add b [K]
//!     -> Softmax(axis 1) [1,K] (-> Squeeze(axis 0) [K] when `squeeze_batch`)
//! ```
//!
//! With a solid-colour image the mean is the RGB colour in [0, 1], so the
//! output is predictable.

#![allow(dead_code)]

use prost::Message;
use std::path::{Path, PathBuf};
use tract_onnx::pb::{
    AttributeProto, GraphProto, ModelProto, NodeProto, OperatorSetIdProto, TensorProto,
    TensorShapeProto, TypeProto, ValueInfoProto, attribute_proto::AttributeType,
    tensor_proto::DataType, tensor_shape_proto, type_proto,
};

const OPSET: i64 = 11;
const IR_VERSION: i64 = 7;

fn float_value_info(name: &str, dims: Option<&[i64]>) -> ValueInfoProto {
    let shape = dims.map(|dims| TensorShapeProto {
        dim: dims
            .iter()
            .map(|d| tensor_shape_proto::Dimension {
                value: Some(tensor_shape_proto::dimension::Value::DimValue(*d)),
                ..Default::default()
            })
            .collect(),
    });

    ValueInfoProto {
        name: name.to_string(),
        r#type: Some(TypeProto {
            value: Some(type_proto::Value::TensorType(type_proto::Tensor {
                elem_type: DataType::Float as i32,
                shape,
            })),
            ..Default::default()
        }),
        ..Default::default()
    }
}

fn float_initializer(name: &str, dims: &[i64], data: Vec<f32>) -> TensorProto {
    TensorProto {
        name: name.to_string(),
        dims: dims.to_vec(),
        data_type: DataType::Float as i32,
        float_data: data,
        ..Default::default()
    }
}

fn ints_attr(name: &str, ints: Vec<i64>) -> AttributeProto {
    AttributeProto {
        name: name.to_string(),
        r#type: AttributeType::Ints as i32,
        ints,
        ..Default::default()
    }
}

fn int_attr(name: &str, i: i64) -> AttributeProto {
    AttributeProto {
        name: name.to_string(),
        r#type: AttributeType::Int as i32,
        i,
        ..Default::default()
    }
}

fn node(op_type: &str, inputs: &[&str], output: &str, attribute: Vec<AttributeProto>) -> NodeProto {
    NodeProto {
        op_type: op_type.to_string(),
        name: output.to_string(),
        input: inputs.iter().map(|s| s.to_string()).collect(),
        output: vec![output.to_string()],
        attribute,
        ..Default::default()
    }
}

/// Serialized ONNX model mapping mean RGB to `classes` softmax scores.
///
/// `weights` is row-major `[3, classes]`, `bias` has `classes` entries.
pub fn classifier_onnx(weights: &[f32], bias: &[f32], squeeze_batch: bool) -> Vec<u8> {
    let classes = bias.len() as i64;
    assert_eq!(weights.len() as i64, 3 * classes);

    let mut nodes = vec![
        node(
            "ReduceMean",
            &["input"],
            "mean",
            vec![ints_attr("axes", vec![1, 2]), int_attr("keepdims", 0)],
        ),
        node("MatMul", &["mean", "weights"], "logits", vec![]),
        node("Add", &["logits", "bias"], "biased", vec![]),
        node("Softmax", &["biased"], "probs", vec![int_attr("axis", 1)]),
    ];
    let output = if squeeze_batch {
        nodes.push(node("Squeeze", &["probs"], "row", vec![ints_attr("axes", vec![0])]));
        "row"
    } else {
        "probs"
    };

    let graph = GraphProto {
        name: "tiny_classifier".to_string(),
        node: nodes,
        initializer: vec![
            float_initializer("weights", &[3, classes], weights.to_vec()),
            float_initializer("bias", &[classes], bias.to_vec()),
        ],
        input: vec![float_value_info("input", Some(&[1, 128, 128, 3]))],
        output: vec![float_value_info(output, None)],
        ..Default::default()
    };

    ModelProto {
        ir_version: IR_VERSION,
        opset_import: vec![OperatorSetIdProto {
            domain: String::new(),
            version: OPSET,
        }],
        producer_name: "mri-classifier-tests".to_string(),
        graph: Some(graph),
        ..Default::default()
    }
    .encode_to_vec()
}

/// Four classes, red favours the first class, green the second, blue the third
pub fn four_class_onnx() -> Vec<u8> {
    #[rustfmt::skip]
    let weights = [
        2.0, 0.0, 0.0, 0.5,
        0.0, 2.0, 0.0, 0.5,
        0.0, 0.0, 2.0, 0.5,
    ];
    classifier_onnx(&weights, &[0.0; 4], false)
}

/// Three classes with a rank-1 output row
pub fn three_class_flat_onnx() -> Vec<u8> {
    #[rustfmt::skip]
    let weights = [
        1.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 1.0,
    ];
    classifier_onnx(&weights, &[0.0; 3], true)
}

/// Write `bytes` to `dir/name` and return the path
pub fn write_model(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write model fixture");
    path
}
