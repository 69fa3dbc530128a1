// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Cheap, approximate content fingerprints.
//!
//! Fingerprints are change hints for cache invalidation, never correctness guarantees.
//! Collisions are tolerated. Cost is bounded per value category:
//! - tensors contribute shape, element type and the first [`TENSOR_SAMPLE_LEN`] elements
//! - everything else contributes its string form, truncated to [`STRING_SAMPLE_LEN`] chars

use crate::types::Value;
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};

/// Number of leading flattened elements sampled from a tensor.
pub const TENSOR_SAMPLE_LEN: usize = 20;

/// Maximum number of characters of a value's string form that are hashed.
pub const STRING_SAMPLE_LEN: usize = 1000;

/// Returned by hash lookups for channels that were never written.
pub const HASH_NOT_FOUND: &str = "not_found";

/// Hex-encoded SHA-256 of `text`.
pub fn digest(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Structural signature of a value, bounded in size regardless of payload size.
pub fn signature(value: &Value) -> String {
    match value {
        Value::Tensor(t) => {
            format!("{:?}_{}_{}", t.shape(), t.dtype(), t.sample(TENSOR_SAMPLE_LEN))
        },
        other => {
            let mut out = BoundedWriter::new(STRING_SAMPLE_LEN);
            // Err only means the limit was reached; the prefix is what gets hashed.
            let _ = write!(out, "{other}");
            out.buf
        },
    }
}

/// `fmt::Write` sink that keeps the first `remaining` chars and then refuses further writes,
/// which stops the formatter early.
struct BoundedWriter {
    buf: String,
    remaining: usize,
}

impl BoundedWriter {
    const fn new(limit: usize) -> Self {
        Self { buf: String::new(), remaining: limit }
    }
}

impl fmt::Write for BoundedWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            if self.remaining == 0 {
                return Err(fmt::Error);
            }
            self.buf.push(ch);
            self.remaining -= 1;
        }
        Ok(())
    }
}

/// Fingerprint of `value` as stored on `channel`.
///
/// The channel id is mixed in so identical payloads on different channels hash differently.
pub fn content_hash(channel: &str, value: &Value) -> String {
    digest(&format!("{channel}_{}", signature(value)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Tensor, TensorData};

    #[test]
    fn hash_depends_on_channel() {
        let v = Value::Int(7);
        assert_ne!(content_hash("a", &v), content_hash("b", &v));
        assert_eq!(content_hash("a", &v), content_hash("a", &Value::Int(7)));
    }

    #[test]
    fn tensor_signature_uses_shape_dtype_and_prefix() {
        let a = Tensor::new(vec![2, 3], TensorData::Float32(vec![0.0; 6])).unwrap();
        let b = Tensor::new(vec![3, 2], TensorData::Float32(vec![0.0; 6])).unwrap();
        let c = Tensor::new(vec![2, 3], TensorData::Int64(vec![0; 6])).unwrap();
        let ha = content_hash("img", &Value::Tensor(a));
        assert_ne!(ha, content_hash("img", &Value::Tensor(b)));
        assert_ne!(ha, content_hash("img", &Value::Tensor(c)));
    }

    #[test]
    fn tensor_signature_ignores_elements_past_sample() {
        let mut tail_a = vec![0_i64; TENSOR_SAMPLE_LEN + 5];
        let mut tail_b = tail_a.clone();
        tail_a[TENSOR_SAMPLE_LEN + 1] = 1;
        tail_b[TENSOR_SAMPLE_LEN + 1] = 2;
        let len = tail_a.len();
        let a = Tensor::new(vec![len], TensorData::Int64(tail_a)).unwrap();
        let b = Tensor::new(vec![len], TensorData::Int64(tail_b)).unwrap();
        // Accepted approximation: differences beyond the sampled prefix are invisible.
        assert_eq!(signature(&Value::Tensor(a)), signature(&Value::Tensor(b)));
    }

    #[test]
    fn long_strings_are_truncated() {
        let long = "é".repeat(STRING_SAMPLE_LEN * 2);
        let sig = signature(&Value::Text(long));
        assert_eq!(sig.chars().count(), STRING_SAMPLE_LEN);
    }

    #[test]
    fn nested_tensors_are_not_rendered_in_full() {
        let len = 2_000_000;
        let big = Tensor::new(vec![len], TensorData::Float32(vec![0.5; len])).unwrap();
        let list = Value::List(vec![Value::Int(1), Value::Tensor(big)]);

        let mut out = BoundedWriter::new(usize::MAX);
        write!(out, "{list}").unwrap();
        assert!(out.buf.len() < 500, "list rendered {} chars", out.buf.len());

        let sig = signature(&list);
        assert!(sig.starts_with("[1, tensor(shape=[2000000], dtype=float32, data=[0.5, 0.5"));
        assert!(sig.ends_with(", ...])]"), "{sig}");
    }

    #[test]
    fn bounded_writer_stops_at_limit() {
        let long = Value::List((0..10_000).map(Value::Int).collect());
        let mut out = BoundedWriter::new(16);
        assert!(write!(out, "{long}").is_err());
        assert_eq!(out.buf, "[0, 1, 2, 3, 4, ");
    }

    #[test]
    fn digest_is_hex_sha256() {
        let d = digest("abc");
        assert_eq!(d.len(), 64);
        assert_eq!(&d[..8], "ba7816bf");
    }
}
