// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Core data types that flow between nodes.
//!
//! Every payload is a [`Value`]. The set of shapes is deliberately closed so that
//! content fingerprinting (see [`crate::fingerprint`]) can treat each category
//! with a bounded-cost rule:
//! - array-like: [`Value::Tensor`]
//! - sequence-like: [`Value::List`]
//! - scalar-like: everything else

use crate::error::WireKitError;
use crate::fingerprint::TENSOR_SAMPLE_LEN;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of a [`Tensor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    Float32,
    Int64,
    Uint8,
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Float32 => "float32",
            Self::Int64 => "int64",
            Self::Uint8 => "uint8",
        };
        f.write_str(name)
    }
}

/// Flattened (row-major) tensor storage.
#[derive(Debug, Clone, PartialEq)]
pub enum TensorData {
    Float32(Vec<f32>),
    Int64(Vec<i64>),
    Uint8(Vec<u8>),
}

impl TensorData {
    pub fn len(&self) -> usize {
        match self {
            Self::Float32(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Uint8(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub const fn element_type(&self) -> ElementType {
        match self {
            Self::Float32(_) => ElementType::Float32,
            Self::Int64(_) => ElementType::Int64,
            Self::Uint8(_) => ElementType::Uint8,
        }
    }

    /// Formats at most `limit` leading elements as `[a, b, ...]`.
    fn leading(&self, limit: usize) -> String {
        let items: Vec<String> = match self {
            Self::Float32(v) => v.iter().take(limit).map(|x| format!("{x:?}")).collect(),
            Self::Int64(v) => v.iter().take(limit).map(ToString::to_string).collect(),
            Self::Uint8(v) => v.iter().take(limit).map(ToString::to_string).collect(),
        };
        format!("[{}]", items.join(", "))
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Float32(v) => serde_json::json!(v),
            Self::Int64(v) => serde_json::json!(v),
            Self::Uint8(v) => serde_json::json!(v),
        }
    }
}

/// A dense n-dimensional array.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    shape: Vec<usize>,
    data: TensorData,
}

impl Tensor {
    /// Creates a tensor, checking that `shape` describes exactly `data.len()` elements.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` if the element count does not match the shape,
    /// or if the shape describes more elements than `usize` can count.
    pub fn new(shape: Vec<usize>, data: TensorData) -> Result<Self, WireKitError> {
        let Some(expected) = shape.iter().try_fold(1usize, |acc, d| acc.checked_mul(*d)) else {
            return Err(WireKitError::Configuration(format!(
                "Tensor shape {shape:?} describes more elements than can be addressed"
            )));
        };
        if expected != data.len() {
            return Err(WireKitError::Configuration(format!(
                "Tensor shape {shape:?} describes {expected} elements but {} were provided",
                data.len()
            )));
        }
        Ok(Self { shape, data })
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub const fn dtype(&self) -> ElementType {
        self.data.element_type()
    }

    pub const fn data(&self) -> &TensorData {
        &self.data
    }

    pub fn numel(&self) -> usize {
        self.data.len()
    }

    /// The first `limit` elements of the flattened tensor, formatted as a list.
    pub fn sample(&self, limit: usize) -> String {
        self.data.leading(limit)
    }

    /// Like [`Tensor::sample`], with a trailing `...` when elements were left out.
    pub fn preview(&self, limit: usize) -> String {
        let mut text = self.data.leading(limit);
        if self.numel() > limit {
            text.insert_str(text.len() - 1, ", ...");
        }
        text
    }

    fn from_literal(literal: TensorLiteral) -> Option<Self> {
        let data = match literal.dtype {
            #[allow(clippy::cast_possible_truncation)]
            ElementType::Float32 => TensorData::Float32(
                literal.data.iter().map(|n| n.as_f64().map(|x| x as f32)).collect::<Option<_>>()?,
            ),
            ElementType::Int64 => TensorData::Int64(
                literal.data.iter().map(serde_json::Number::as_i64).collect::<Option<_>>()?,
            ),
            ElementType::Uint8 => TensorData::Uint8(
                literal
                    .data
                    .iter()
                    .map(|n| n.as_u64().and_then(|x| u8::try_from(x).ok()))
                    .collect::<Option<_>>()?,
            ),
        };
        Self::new(literal.shape, data).ok()
    }
}

/// Literal form of a tensor inside a graph definition:
/// `{ shape: [2, 2], dtype: float32, data: [...] }`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TensorLiteral {
    shape: Vec<usize>,
    #[serde(default)]
    dtype: ElementType,
    data: Vec<serde_json::Number>,
}

/// A value carried on a node output, a graph literal, or a wireless channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Value>),
    Tensor(Tensor),
    /// Structured literal that is neither a list nor a tensor.
    Json(serde_json::Value),
}

impl Value {
    /// Converts a literal from a graph definition into a value.
    ///
    /// Objects with exactly `shape` and `data` (and optionally `dtype`) keys become tensors;
    /// other objects are kept as [`Value::Json`].
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::None,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => {
                n.as_i64().map_or_else(|| Self::Float(n.as_f64().unwrap_or(f64::NAN)), Self::Int)
            },
            serde_json::Value::String(s) => Self::Text(s.clone()),
            serde_json::Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            serde_json::Value::Object(_) => serde_json::from_value::<TensorLiteral>(json.clone())
                .ok()
                .and_then(Tensor::from_literal)
                .map_or_else(|| Self::Json(json.clone()), Self::Tensor),
        }
    }

    /// JSON rendering used by reports and the CLI summary.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::None => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Int(i) => serde_json::json!(i),
            Self::Float(f) => serde_json::json!(f),
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::List(items) => serde_json::Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Tensor(t) => serde_json::json!({
                "shape": t.shape(),
                "dtype": t.dtype().to_string(),
                "data": t.data().to_json(),
            }),
            Self::Json(v) => v.clone(),
        }
    }

    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Tensor(_) => "tensor",
            Self::Json(_) => "json",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    match item {
                        Self::Text(s) => write!(f, "{s:?}")?,
                        other => write!(f, "{other}")?,
                    }
                }
                f.write_str("]")
            },
            Self::Tensor(t) => write!(
                f,
                "tensor(shape={:?}, dtype={}, data={})",
                t.shape(),
                t.dtype(),
                t.preview(TENSOR_SAMPLE_LEN)
            ),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

impl From<Tensor> for Value {
    fn from(t: Tensor) -> Self {
        Self::Tensor(t)
    }
}
