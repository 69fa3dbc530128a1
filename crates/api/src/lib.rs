// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! api: The graph definition format executed by the WireKit engine.
//!
//! A graph is a map of node ids to [`NodeSpec`]s. Each input of a node is either a
//! literal value or a [`LinkRef`] to an output slot of another node. Wireless nodes
//! carry their channel id as a literal `id` input; they have no visible link between
//! transmitter and receiver.
//!
//! ```yaml
//! name: wireless-demo
//! nodes:
//!   source:
//!     kind: core::constant
//!     inputs:
//!       value: 42
//!   tx:
//!     kind: wireless::input
//!     inputs:
//!       id: x
//!       data: { node: source }
//!   rx:
//!     kind: wireless::output
//!     inputs:
//!       id: x
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub mod yaml;

pub use yaml::{load_json, load_path, load_yaml};

/// Reference to an output slot of another node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkRef {
    pub node: String,
    #[serde(default)]
    pub output: usize,
}

/// How a single node input is bound.
///
/// `untagged`: a two-key `{ node, output }` object is a link, anything else is a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputBinding {
    Link(LinkRef),
    Literal(serde_json::Value),
}

impl InputBinding {
    pub const fn as_link(&self) -> Option<&LinkRef> {
        match self {
            Self::Link(link) => Some(link),
            Self::Literal(_) => None,
        }
    }

    pub const fn as_literal(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Literal(v) => Some(v),
            Self::Link(_) => None,
        }
    }
}

/// A node as declared in the graph: its kind plus bound inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    #[serde(default)]
    pub inputs: IndexMap<String, InputBinding>,
}

impl NodeSpec {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), inputs: IndexMap::new() }
    }

    #[must_use]
    pub fn literal(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.inputs.insert(name.into(), InputBinding::Literal(value));
        self
    }

    #[must_use]
    pub fn link(mut self, name: impl Into<String>, node: impl Into<String>, output: usize) -> Self {
        self.inputs.insert(name.into(), InputBinding::Link(LinkRef { node: node.into(), output }));
        self
    }

    /// The literal string bound to `name`, trimmed. `None` when the input is missing,
    /// linked, not a string, or blank.
    pub fn literal_str(&self, name: &str) -> Option<&str> {
        match self.inputs.get(name)? {
            InputBinding::Literal(serde_json::Value::String(s)) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            },
            _ => None,
        }
    }

    /// All literal inputs as a JSON object; this is what node factories receive.
    pub fn literal_params(&self) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = self
            .inputs
            .iter()
            .filter_map(|(name, binding)| binding.as_literal().map(|v| (name.clone(), v.clone())))
            .collect();
        serde_json::Value::Object(map)
    }

    /// Iterator over `(input name, link)` pairs.
    pub fn links(&self) -> impl Iterator<Item = (&str, &LinkRef)> + '_ {
        self.inputs.iter().filter_map(|(name, binding)| binding.as_link().map(|l| (name.as_str(), l)))
    }
}

/// A complete graph ("prompt") submitted for execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub nodes: IndexMap<String, NodeSpec>,
}

impl GraphDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_node(mut self, id: impl Into<String>, spec: NodeSpec) -> Self {
        self.nodes.insert(id.into(), spec);
        self
    }

    pub fn node(&self, id: &str) -> Option<&NodeSpec> {
        self.nodes.get(id)
    }

    /// Checks the visible structure of the graph.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first problem found: an empty kind, a link to an
    /// unknown node, or a cycle through visible links.
    pub fn validate(&self) -> Result<(), String> {
        for (id, spec) in &self.nodes {
            if spec.kind.trim().is_empty() {
                return Err(format!("Node '{id}' has an empty kind"));
            }
            for (input, link) in spec.links() {
                if !self.nodes.contains_key(&link.node) {
                    return Err(format!(
                        "Node '{id}' input '{input}' links to non-existent node '{}'",
                        link.node
                    ));
                }
            }
        }
        yaml::detect_cycles(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn literal_str_trims_and_skips_links() {
        let spec = NodeSpec::new("wireless::input")
            .literal("id", json!("  x "))
            .literal("blank", json!("   "))
            .literal("num", json!(3))
            .link("data", "src", 0);
        assert_eq!(spec.literal_str("id"), Some("x"));
        assert_eq!(spec.literal_str("blank"), None);
        assert_eq!(spec.literal_str("num"), None);
        assert_eq!(spec.literal_str("data"), None);
        assert_eq!(spec.literal_str("missing"), None);
    }

    #[test]
    fn literal_params_excludes_links() {
        let spec =
            NodeSpec::new("wireless::input").literal("id", json!("x")).link("data", "src", 1);
        assert_eq!(spec.literal_params(), json!({"id": "x"}));
        let links: Vec<_> = spec.links().collect();
        assert_eq!(links, vec![("data", &LinkRef { node: "src".into(), output: 1 })]);
    }

    #[test]
    fn binding_untagged_parsing() {
        let link: InputBinding = serde_json::from_value(json!({"node": "a"})).unwrap();
        assert_eq!(link, InputBinding::Link(LinkRef { node: "a".into(), output: 0 }));

        let lit: InputBinding =
            serde_json::from_value(json!({"node": "a", "extra": true})).unwrap();
        assert!(matches!(lit, InputBinding::Literal(_)));
    }

    #[test]
    fn validate_rejects_dangling_links() {
        let graph = GraphDefinition::new()
            .with_node("b", NodeSpec::new("core::debug").link("input", "missing", 0));
        let err = graph.validate().unwrap_err();
        assert!(err.contains("non-existent node 'missing'"), "{err}");
    }

    #[test]
    fn validate_rejects_empty_kind() {
        let graph = GraphDefinition::new().with_node("a", NodeSpec::new(" "));
        assert!(graph.validate().unwrap_err().contains("empty kind"));
    }
}
