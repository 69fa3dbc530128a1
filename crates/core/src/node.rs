// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Core node abstractions and the ExecutableNode trait.
//!
//! - [`ExecutableNode`]: the interface every node kind implements
//! - [`NodeContext`]: resolved inputs plus the shared channel registry
//! - [`CachePolicy`]: how the executor decides whether cached outputs may be reused

use crate::channels::ChannelRegistry;
use crate::error::WireKitError;
use crate::pins::{InputPin, OutputPin};
use crate::types::Value;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// Values produced by one execution, indexed by output slot.
pub type NodeOutputs = Vec<Arc<Value>>;

/// Factory invoked once per graph node with the node's literal inputs as a JSON object.
pub type NodeFactory = Arc<
    dyn Fn(Option<&serde_json::Value>) -> Result<Box<dyn ExecutableNode>, WireKitError>
        + Send
        + Sync,
>;

/// Change-detection answer a node gives the executor right before it would run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachePolicy {
    /// Reuse cached outputs when the kind and all inputs are unchanged.
    Inputs,
    /// As `Inputs`, but the token is also part of the cache key.
    /// Receivers use the channel's content hash here.
    Token(String),
    /// Always execute (side-effecting nodes such as transmitters).
    Never,
}

/// The context the executor hands to a node for one execution.
pub struct NodeContext {
    pub node_id: String,
    pub kind: String,
    pub inputs: HashMap<String, Arc<Value>>,
    pub channels: Arc<ChannelRegistry>,
}

impl NodeContext {
    pub fn new(
        node_id: impl Into<String>,
        kind: impl Into<String>,
        channels: Arc<ChannelRegistry>,
    ) -> Self {
        Self { node_id: node_id.into(), kind: kind.into(), inputs: HashMap::new(), channels }
    }

    #[must_use]
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Arc<Value>>) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    pub fn input(&self, name: &str) -> Option<&Arc<Value>> {
        self.inputs.get(name)
    }

    /// Returns the named input.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` if the input was not bound.
    pub fn require_input(&self, name: &str) -> Result<Arc<Value>, WireKitError> {
        self.inputs.get(name).cloned().ok_or_else(|| {
            WireKitError::Configuration(format!(
                "Node '{}' ({}) is missing required input '{name}'",
                self.node_id, self.kind
            ))
        })
    }
}

/// A node kind the executor can run.
///
/// Nodes are executed one at a time, in dependency order, on the executor's task.
#[async_trait]
pub trait ExecutableNode: Send + Sync {
    fn input_pins(&self) -> Vec<InputPin>;

    fn output_pins(&self) -> Vec<OutputPin>;

    /// Called after the node's dependencies have executed and before it would run.
    fn cache_policy(&self, _ctx: &NodeContext) -> CachePolicy {
        CachePolicy::Inputs
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError>;
}
