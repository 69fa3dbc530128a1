// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless channel registry.
//!
//! A [`ChannelRegistry`] lets two nodes exchange a value without a visible graph edge:
//! a transmitter calls [`ChannelRegistry::store`] and a receiver sharing the same channel
//! id calls [`ChannelRegistry::retrieve`]. The engine guarantees the transmitter runs first
//! (see `wirekit_engine::wireless_order`); the registry itself only stores values.
//!
//! Semantics:
//! - last write wins per channel, values are replaced and never merged
//! - entries live until [`ChannelRegistry::clear`]; there is no per-channel removal
//! - state spans runs, so a reused channel id reads the previous run's value until
//!   it is overwritten or the registry is cleared

use crate::fingerprint::{content_hash, HASH_NOT_FOUND};
use crate::types::Value;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

/// Errors surfaced to the node that called into the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The channel id was empty or whitespace only.
    #[error("Wireless channel id cannot be empty")]
    InvalidChannel,

    /// No transmitter has stored a value on this channel.
    #[error("{}", not_found_message(.channel, .known))]
    ChannelNotFound { channel: String, known: Vec<String> },
}

fn not_found_message(channel: &str, known: &[String]) -> String {
    if known.is_empty() {
        format!(
            "No wireless data found for channel '{channel}'. No wireless transmitters have executed yet."
        )
    } else {
        format!(
            "No wireless data found for channel '{channel}'. Available channels: {}",
            known.join(", ")
        )
    }
}

#[derive(Debug)]
struct ChannelEntry {
    value: Arc<Value>,
    content_hash: String,
    written: bool,
}

/// Read-only diagnostic snapshot of the registry.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct RegistryInfo {
    pub count: usize,
    pub ids: Vec<String>,
    pub hashes: BTreeMap<String, String>,
    pub written: BTreeMap<String, bool>,
}

/// Process-wide store of the most recent value transmitted on each channel.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    entries: RwLock<IndexMap<String, ChannelEntry>>,
}

fn normalize(channel: &str) -> Result<&str, ChannelError> {
    let trimmed = channel.trim();
    if trimmed.is_empty() {
        Err(ChannelError::InvalidChannel)
    } else {
        Ok(trimmed)
    }
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` on `channel`, replacing any previous value, and returns it unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidChannel`] if `channel` is empty after trimming.
    /// The registry is not modified in that case.
    pub fn store(&self, channel: &str, value: Arc<Value>) -> Result<Arc<Value>, ChannelError> {
        let channel = normalize(channel)?;
        let hash = content_hash(channel, &value);

        let total = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries.insert(
                channel.to_string(),
                ChannelEntry {
                    value: Arc::clone(&value),
                    content_hash: hash.clone(),
                    written: true,
                },
            );
            entries.len()
        };

        tracing::debug!(
            channel,
            value_type = value.type_name(),
            hash = &hash[..8],
            total,
            "Stored wireless data"
        );
        Ok(value)
    }

    /// Returns the value most recently stored on `channel` (the same `Arc`, not a copy).
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::InvalidChannel`] for an empty id, or
    /// [`ChannelError::ChannelNotFound`] (listing the known channels) if nothing was stored.
    pub fn retrieve(&self, channel: &str) -> Result<Arc<Value>, ChannelError> {
        let channel = normalize(channel)?;
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);

        let Some(entry) = entries.get(channel) else {
            let known: Vec<String> = entries.keys().cloned().collect();
            tracing::warn!(channel, ?known, "Wireless channel not found");
            return Err(ChannelError::ChannelNotFound { channel: channel.to_string(), known });
        };

        tracing::debug!(
            channel,
            value_type = entry.value.type_name(),
            hash = &entry.content_hash[..8],
            "Retrieved wireless data"
        );
        Ok(Arc::clone(&entry.value))
    }

    /// Content hash of the value on `channel`, or [`HASH_NOT_FOUND`] if absent. Never fails.
    pub fn get_hash(&self, channel: &str) -> String {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(channel.trim())
            .map_or_else(|| HASH_NOT_FOUND.to_string(), |e| e.content_hash.clone())
    }

    /// Snapshot of populated channel ids, in first-store order.
    pub fn list_ids(&self) -> Vec<String> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).keys().cloned().collect()
    }

    /// Whether at least one store has happened on `channel` since the last clear.
    pub fn is_written(&self, channel: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(channel.trim())
            .is_some_and(|e| e.written)
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every entry, hash and written flag. Returns the number of removed channels.
    pub fn clear(&self) -> usize {
        let removed = {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            let n = entries.len();
            entries.clear();
            n
        };
        tracing::info!(removed, "Wireless registry cleared");
        removed
    }

    pub fn info(&self) -> RegistryInfo {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        RegistryInfo {
            count: entries.len(),
            ids: entries.keys().cloned().collect(),
            hashes: entries.iter().map(|(k, e)| (k.clone(), e.content_hash.clone())).collect(),
            written: entries.iter().map(|(k, e)| (k.clone(), e.written)).collect(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Tensor, TensorData};

    fn value(v: impl Into<Value>) -> Arc<Value> {
        Arc::new(v.into())
    }

    #[test]
    fn retrieve_after_store_returns_same_value() {
        let registry = ChannelRegistry::new();
        let stored = registry.store("x", value(42_i64)).unwrap();
        let got = registry.retrieve("x").unwrap();
        assert_eq!(*got, Value::Int(42));
        assert!(Arc::ptr_eq(&stored, &got));
    }

    #[test]
    fn store_returns_input_for_passthrough() {
        let registry = ChannelRegistry::new();
        let v = value("payload");
        let out = registry.store("ch", Arc::clone(&v)).unwrap();
        assert!(Arc::ptr_eq(&v, &out));
    }

    #[test]
    fn ids_are_trimmed() {
        let registry = ChannelRegistry::new();
        registry.store("  x  ", value(1_i64)).unwrap();
        assert_eq!(registry.list_ids(), vec!["x".to_string()]);
        assert_eq!(*registry.retrieve("x ").unwrap(), Value::Int(1));
        assert_ne!(registry.get_hash(" x"), HASH_NOT_FOUND);
    }

    #[test]
    fn missing_channel_lists_known_ids() {
        let registry = ChannelRegistry::new();
        let err = registry.retrieve("x").unwrap_err();
        assert_eq!(err, ChannelError::ChannelNotFound { channel: "x".into(), known: vec![] });
        assert!(err.to_string().contains("No wireless transmitters have executed yet"));

        registry.store("a", value(1_i64)).unwrap();
        registry.store("b", value(2_i64)).unwrap();
        let err = registry.retrieve("x").unwrap_err();
        assert_eq!(
            err,
            ChannelError::ChannelNotFound {
                channel: "x".into(),
                known: vec!["a".to_string(), "b".to_string()]
            }
        );
        assert!(err.to_string().contains("Available channels: a, b"));
    }

    #[test]
    fn last_write_wins() {
        let registry = ChannelRegistry::new();
        registry.store("c", value("v1")).unwrap();
        registry.store("c", value("v2")).unwrap();
        assert_eq!(*registry.retrieve("c").unwrap(), Value::from("v2"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn hash_changes_with_content_and_has_sentinel() {
        let registry = ChannelRegistry::new();
        assert_eq!(registry.get_hash("c"), HASH_NOT_FOUND);

        let t1 = Tensor::new(vec![2, 2], TensorData::Float32(vec![1.0; 4])).unwrap();
        let t2 = Tensor::new(vec![4], TensorData::Float32(vec![1.0; 4])).unwrap();
        registry.store("c", value(t1)).unwrap();
        let h1 = registry.get_hash("c");
        registry.store("c", value(t2)).unwrap();
        let h2 = registry.get_hash("c");
        assert_ne!(h1, h2);
        assert_ne!(h2, HASH_NOT_FOUND);
    }

    #[test]
    fn clear_removes_everything() {
        let registry = ChannelRegistry::new();
        registry.store("a", value(1_i64)).unwrap();
        registry.store("b", value(2_i64)).unwrap();
        assert!(registry.is_written("a"));

        assert_eq!(registry.clear(), 2);
        assert!(registry.list_ids().is_empty());
        assert!(!registry.is_written("a"));
        assert_eq!(registry.get_hash("a"), HASH_NOT_FOUND);
        for id in ["a", "b"] {
            assert!(matches!(
                registry.retrieve(id),
                Err(ChannelError::ChannelNotFound { .. })
            ));
        }
        assert_eq!(registry.info(), RegistryInfo::default());
    }

    #[test]
    fn blank_ids_are_rejected_without_mutation() {
        let registry = ChannelRegistry::new();
        registry.store("keep", value(1_i64)).unwrap();
        let before = registry.info();

        for id in ["", "   ", "\t\n"] {
            assert_eq!(registry.store(id, value(9_i64)).unwrap_err(), ChannelError::InvalidChannel);
            assert_eq!(registry.retrieve(id).unwrap_err(), ChannelError::InvalidChannel);
        }
        assert_eq!(registry.info(), before);
    }

    #[test]
    fn info_reports_hashes_and_flags() {
        let registry = ChannelRegistry::new();
        registry.store("b", value(1_i64)).unwrap();
        registry.store("a", value(2_i64)).unwrap();
        let info = registry.info();
        assert_eq!(info.count, 2);
        assert_eq!(info.ids, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(info.hashes["a"], registry.get_hash("a"));
        assert_eq!(info.written.get("b"), Some(&true));
    }
}
