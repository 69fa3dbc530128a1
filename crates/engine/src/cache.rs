// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Outputs kept between runs so unchanged nodes are not executed again.

use std::collections::HashMap;
use wirekit_core::NodeOutputs;

#[derive(Debug)]
struct CachedOutputs {
    signature: String,
    outputs: NodeOutputs,
}

/// Last outputs of each node id, keyed by the signature they were computed under.
#[derive(Debug, Default)]
pub struct OutputCache {
    entries: HashMap<String, CachedOutputs>,
}

impl OutputCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Outputs of `node_id` if they were produced under `signature`.
    pub fn lookup(&self, node_id: &str, signature: &str) -> Option<NodeOutputs> {
        self.entries
            .get(node_id)
            .filter(|cached| cached.signature == signature)
            .map(|cached| cached.outputs.clone())
    }

    pub fn insert(&mut self, node_id: &str, signature: String, outputs: NodeOutputs) {
        self.entries.insert(node_id.to_string(), CachedOutputs { signature, outputs });
    }

    /// Drops the entry for a node that must not be reused (for instance, one that always runs).
    pub fn invalidate(&mut self, node_id: &str) {
        self.entries.remove(node_id);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
