// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! The scheduler's pending set and blocking structure.
//!
//! [`ExecutionList`] is built by adding the graph's output nodes; each addition pulls in
//! every node it links to and records a visible dependency edge per link. After every
//! addition the hooks registered in [`ScheduleExtensions`] may add further edges through
//! the [`DependencyTable`] interface. Nodes are then staged one at a time in dependency
//! order.

use crate::wireless_order::AugmentationSkipped;
use indexmap::IndexSet;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use wirekit_api::{GraphDefinition, NodeSpec};
use wirekit_core::WireKitError;

/// What a pending-set hook may see and change.
///
/// Hooks can only add edges; nothing here removes a dependency.
pub trait DependencyTable {
    /// Ids of every node currently pending, in insertion order.
    fn pending_ids(&self) -> Vec<String>;

    /// The declaration of a pending node.
    fn node_spec(&self, node_id: &str) -> Option<&NodeSpec>;

    /// Whether `consumer` is currently blocked on `producer`.
    fn is_blocking(&self, producer: &str, consumer: &str) -> bool;

    /// Blocks `consumer` on `producer`. Returns false (and changes nothing) if the edge
    /// already exists or either node is not pending.
    fn add_block(&mut self, producer: &str, consumer: &str) -> bool;
}

/// Runs after a node (and the nodes it links to) has been added to the pending set.
pub trait PendingSetHook: Send + Sync {
    fn name(&self) -> &'static str;

    /// Returns the number of edges added.
    ///
    /// # Errors
    ///
    /// Returns [`AugmentationSkipped`] when the table does not look the way the hook
    /// expects. The scheduler logs it and carries on with the edges it already has.
    fn after_add(&self, table: &mut dyn DependencyTable) -> Result<usize, AugmentationSkipped>;
}

/// Hooks run after every pending-set addition, each installed at most once.
#[derive(Clone, Default)]
pub struct ScheduleExtensions {
    hooks: Vec<Arc<dyn PendingSetHook>>,
    markers: HashSet<&'static str>,
}

impl ScheduleExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `hook` unless a hook was already installed under `marker`.
    /// Returns whether the hook was added.
    pub fn install(&mut self, marker: &'static str, hook: Arc<dyn PendingSetHook>) -> bool {
        if !self.markers.insert(marker) {
            tracing::debug!(marker, "Schedule extension already installed");
            return false;
        }
        tracing::debug!(marker, hook = hook.name(), "Installed schedule extension");
        self.hooks.push(hook);
        true
    }

    pub fn is_installed(&self, marker: &str) -> bool {
        self.markers.contains(marker)
    }

    pub fn hooks(&self) -> &[Arc<dyn PendingSetHook>] {
        &self.hooks
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl std::fmt::Debug for ScheduleExtensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleExtensions")
            .field("hooks", &self.hooks.iter().map(|h| h.name()).collect::<Vec<_>>())
            .finish()
    }
}

/// Pending nodes of one run and the dependencies between them.
pub struct ExecutionList<'g> {
    graph: &'g GraphDefinition,
    extensions: Arc<ScheduleExtensions>,
    pending: IndexSet<String>,
    completed: HashSet<String>,
    /// consumer -> number of producers it still waits on
    block_count: HashMap<String, usize>,
    /// producer -> consumers waiting on it
    blocking: HashMap<String, HashSet<String>>,
    hook_edges: usize,
}

impl<'g> ExecutionList<'g> {
    pub fn new(graph: &'g GraphDefinition, extensions: Arc<ScheduleExtensions>) -> Self {
        Self {
            graph,
            extensions,
            pending: IndexSet::new(),
            completed: HashSet::new(),
            block_count: HashMap::new(),
            blocking: HashMap::new(),
            hook_edges: 0,
        }
    }

    /// Adds `node_id` and, recursively, every node it links to. Hooks run after each
    /// addition, once its upstream nodes are in place.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` if `node_id` (or a node it links to) is not
    /// part of the graph.
    pub fn add_node(&mut self, node_id: &str) -> Result<(), WireKitError> {
        if self.pending.contains(node_id) || self.completed.contains(node_id) {
            return Ok(());
        }
        let graph = self.graph;
        let spec = graph.node(node_id).ok_or_else(|| {
            WireKitError::Configuration(format!("Node '{node_id}' not found in graph"))
        })?;

        self.pending.insert(node_id.to_string());
        for (_, link) in spec.links() {
            self.add_strong_link(&link.node, node_id)?;
        }

        self.run_hooks();
        Ok(())
    }

    /// Visible edge from a link. Producers that already completed do not block.
    fn add_strong_link(&mut self, producer: &str, consumer: &str) -> Result<(), WireKitError> {
        if self.completed.contains(producer) {
            return Ok(());
        }
        self.add_node(producer)?;
        self.insert_edge(producer, consumer);
        Ok(())
    }

    fn insert_edge(&mut self, producer: &str, consumer: &str) -> bool {
        let inserted = self
            .blocking
            .entry(producer.to_string())
            .or_default()
            .insert(consumer.to_string());
        if inserted {
            *self.block_count.entry(consumer.to_string()).or_insert(0) += 1;
        }
        inserted
    }

    fn run_hooks(&mut self) {
        let extensions = Arc::clone(&self.extensions);
        for hook in extensions.hooks() {
            match hook.after_add(self) {
                Ok(0) => {},
                Ok(added) => {
                    self.hook_edges += added;
                    tracing::debug!(hook = hook.name(), added, "Hook added dependency edges");
                },
                Err(e) => {
                    tracing::warn!(
                        hook = hook.name(),
                        error = %e,
                        "Pending-set hook skipped; continuing with visible dependencies only"
                    );
                },
            }
        }
    }

    /// Returns the first pending node that is not blocked, or `None` once every node
    /// has completed.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` when nodes are pending but every one of them
    /// is blocked, i.e. the dependencies (visible or added by hooks) form a cycle.
    pub fn stage_next(&self) -> Result<Option<String>, WireKitError> {
        if self.pending.is_empty() {
            return Ok(None);
        }
        if let Some(ready) = self.pending.iter().find(|id| self.blocks_on(id) == 0) {
            return Ok(Some(ready.clone()));
        }

        let waits: Vec<String> = self
            .pending
            .iter()
            .map(|id| {
                let mut producers: Vec<&str> = self
                    .blocking
                    .iter()
                    .filter(|(_, consumers)| consumers.contains(id))
                    .map(|(producer, _)| producer.as_str())
                    .collect();
                producers.sort_unstable();
                format!("{id} (waits on {})", producers.join(", "))
            })
            .collect();
        Err(WireKitError::Configuration(format!(
            "Dependency cycle detected among pending nodes: {}",
            waits.join("; ")
        )))
    }

    /// Marks `node_id` as executed and releases the nodes waiting on it.
    pub fn complete(&mut self, node_id: &str) {
        if !self.pending.shift_remove(node_id) {
            tracing::warn!(node_id, "Completed a node that was not pending");
            return;
        }
        self.completed.insert(node_id.to_string());
        if let Some(consumers) = self.blocking.remove(node_id) {
            for consumer in consumers {
                if let Some(count) = self.block_count.get_mut(&consumer) {
                    *count = count.saturating_sub(1);
                }
            }
        }
    }

    /// Number of producers `node_id` still waits on.
    pub fn blocks_on(&self, node_id: &str) -> usize {
        self.block_count.get(node_id).copied().unwrap_or(0)
    }

    /// Consumers currently waiting on `producer`, sorted.
    pub fn blocked_by(&self, producer: &str) -> Vec<String> {
        let mut consumers: Vec<String> =
            self.blocking.get(producer).map(|c| c.iter().cloned().collect()).unwrap_or_default();
        consumers.sort();
        consumers
    }

    pub fn is_pending(&self, node_id: &str) -> bool {
        self.pending.contains(node_id)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Edges added by hooks over the lifetime of this list.
    pub const fn hook_edges(&self) -> usize {
        self.hook_edges
    }
}

impl DependencyTable for ExecutionList<'_> {
    fn pending_ids(&self) -> Vec<String> {
        self.pending.iter().cloned().collect()
    }

    fn node_spec(&self, node_id: &str) -> Option<&NodeSpec> {
        if self.pending.contains(node_id) {
            self.graph.node(node_id)
        } else {
            None
        }
    }

    fn is_blocking(&self, producer: &str, consumer: &str) -> bool {
        self.blocking.get(producer).is_some_and(|consumers| consumers.contains(consumer))
    }

    fn add_block(&mut self, producer: &str, consumer: &str) -> bool {
        if producer == consumer || !self.pending.contains(producer) || !self.pending.contains(consumer)
        {
            return false;
        }
        self.insert_edge(producer, consumer)
    }
}
