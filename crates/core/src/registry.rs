// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Node factory registry and discovery.
//!
//! - [`NodeRegistry`]: central registry of all available node kinds
//! - [`NodeDefinition`]: serializable node metadata for listing and docs

use crate::error::WireKitError;
use crate::node::{ExecutableNode, NodeFactory};
use crate::pins::{InputPin, OutputPin};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A serializable representation of a node's definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NodeDefinition {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub param_schema: serde_json::Value,
    pub inputs: Vec<InputPin>,
    pub outputs: Vec<OutputPin>,
    /// Hierarchical categories for UI grouping (e.g., `["wireless"]`)
    pub categories: Vec<String>,
    /// Output nodes are the roots the scheduler starts building the pending set from.
    #[serde(default)]
    pub output_node: bool,
}

/// Static pin configuration, as declared at registration time.
#[derive(Clone)]
pub struct StaticPins {
    pub inputs: Vec<InputPin>,
    pub outputs: Vec<OutputPin>,
}

#[derive(Clone)]
struct NodeInfo {
    factory: NodeFactory,
    param_schema: serde_json::Value,
    pins: StaticPins,
    categories: Vec<String>,
    output_node: bool,
    description: Option<String>,
}

/// Holds all node kinds the engine can construct.
#[derive(Clone, Default)]
pub struct NodeRegistry {
    info: HashMap<String, NodeInfo>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node kind.
    pub fn register<F>(
        &mut self,
        kind: &str,
        factory: F,
        param_schema: serde_json::Value,
        pins: StaticPins,
        categories: Vec<String>,
        output_node: bool,
    ) where
        F: Fn(Option<&serde_json::Value>) -> Result<Box<dyn ExecutableNode>, WireKitError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(kind, Arc::new(factory), param_schema, pins, categories, output_node, None);
    }

    /// Registers a node kind with a human-readable description.
    #[allow(clippy::too_many_arguments)]
    pub fn register_with_description<F>(
        &mut self,
        kind: &str,
        factory: F,
        param_schema: serde_json::Value,
        pins: StaticPins,
        categories: Vec<String>,
        output_node: bool,
        description: impl Into<String>,
    ) where
        F: Fn(Option<&serde_json::Value>) -> Result<Box<dyn ExecutableNode>, WireKitError>
            + Send
            + Sync
            + 'static,
    {
        self.insert(
            kind,
            Arc::new(factory),
            param_schema,
            pins,
            categories,
            output_node,
            Some(description.into()),
        );
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        kind: &str,
        factory: NodeFactory,
        param_schema: serde_json::Value,
        pins: StaticPins,
        categories: Vec<String>,
        output_node: bool,
        description: Option<String>,
    ) {
        if self.info.contains_key(kind) {
            tracing::warn!(kind, "Replacing existing node registration");
        }
        self.info.insert(
            kind.to_string(),
            NodeInfo { factory, param_schema, pins, categories, output_node, description },
        );
    }

    /// Creates an instance of a node kind, passing in its literal parameters.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` if the kind is not registered,
    /// or whatever the node's factory returns when the parameters are invalid.
    pub fn create_node(
        &self,
        kind: &str,
        params: Option<&serde_json::Value>,
    ) -> Result<Box<dyn ExecutableNode>, WireKitError> {
        self.info.get(kind).map_or_else(
            || {
                Err(WireKitError::Configuration(format!(
                    "Node type '{kind}' not found in registry"
                )))
            },
            |info| (info.factory)(params),
        )
    }

    /// Definitions of all registered kinds, sorted by kind.
    pub fn definitions(&self) -> Vec<NodeDefinition> {
        let mut defs: Vec<NodeDefinition> = self
            .info
            .iter()
            .map(|(kind, info)| NodeDefinition {
                kind: kind.clone(),
                description: info.description.clone(),
                param_schema: info.param_schema.clone(),
                inputs: info.pins.inputs.clone(),
                outputs: info.pins.outputs.clone(),
                categories: info.categories.clone(),
                output_node: info.output_node,
            })
            .collect();
        defs.sort_by(|a, b| a.kind.cmp(&b.kind));
        defs
    }

    pub fn is_output_node(&self, kind: &str) -> bool {
        self.info.get(kind).is_some_and(|info| info.output_node)
    }

    /// Removes a node kind. Returns true if it was registered.
    pub fn unregister(&mut self, kind: &str) -> bool {
        self.info.remove(kind).is_some()
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.info.contains_key(kind)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::node::{NodeContext, NodeOutputs};
    use crate::types::Value;
    use async_trait::async_trait;

    struct Const;

    #[async_trait]
    impl ExecutableNode for Const {
        fn input_pins(&self) -> Vec<InputPin> {
            Vec::new()
        }

        fn output_pins(&self) -> Vec<OutputPin> {
            vec![OutputPin::new("out")]
        }

        async fn execute(&self, _ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
            Ok(vec![Arc::new(Value::Int(1))])
        }
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register(
            "test::const",
            |_| Ok(Box::new(Const)),
            serde_json::json!({}),
            StaticPins { inputs: Vec::new(), outputs: Const.output_pins() },
            vec!["test".to_string()],
            true,
        );
        registry
    }

    #[test]
    fn create_known_and_unknown_kinds() {
        let registry = registry();
        assert!(registry.create_node("test::const", None).is_ok());
        let err = registry.create_node("test::missing", None).err().unwrap();
        assert!(err.to_string().contains("'test::missing' not found"));
    }

    #[test]
    fn definitions_expose_output_flag() {
        let mut registry = registry();
        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert!(defs[0].output_node);
        assert_eq!(defs[0].outputs, vec![OutputPin::new("out")]);
        assert!(registry.is_output_node("test::const"));

        assert!(registry.unregister("test::const"));
        assert!(!registry.contains("test::const"));
        assert!(!registry.is_output_node("test::const"));
    }
}
