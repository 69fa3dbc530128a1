// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless manager node
//!
//! Administrative access to the channel registry. The optional `trigger` input exists only
//! to order the manager after some other node.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wirekit_core::{
    config_helpers, CachePolicy, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin,
    Value, WireKitError,
};

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ManagerAction {
    #[default]
    ListIds,
    ClearRegistry,
    CountEntries,
}

#[derive(Deserialize, Debug, Default, JsonSchema)]
#[serde(default)]
pub struct ManagerConfig {
    pub action: ManagerAction,
}

#[derive(Debug)]
pub struct WirelessManagerNode {
    action: ManagerAction,
}

impl WirelessManagerNode {
    /// Creates a new manager node.
    ///
    /// # Errors
    ///
    /// Returns an error if `action` is not one of `list_ids`, `clear_registry`, `count_entries`.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let config: ManagerConfig = match params {
            Some(p) => config_helpers::parse_config_with_context(Some(p), "wireless::manager")?,
            None => ManagerConfig::default(),
        };
        Ok(Self { action: config.action })
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::optional("trigger")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("info")]
    }
}

#[async_trait]
impl ExecutableNode for WirelessManagerNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    fn cache_policy(&self, _ctx: &NodeContext) -> CachePolicy {
        CachePolicy::Never
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        let info = match self.action {
            ManagerAction::ListIds => {
                let ids = ctx.channels.list_ids();
                if ids.is_empty() {
                    "No active wireless connections".to_string()
                } else {
                    format!("Active wireless IDs: {}", ids.join(", "))
                }
            },
            ManagerAction::ClearRegistry => {
                let removed = ctx.channels.clear();
                format!("Cleared {removed} wireless entries")
            },
            ManagerAction::CountEntries => {
                format!("Wireless registry contains {} entries", ctx.channels.len())
            },
        };
        tracing::info!(node_id = %ctx.node_id, action = ?self.action, "{info}");
        Ok(vec![Arc::new(Value::Text(info))])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wirekit_core::ChannelRegistry;

    async fn run(action: &str, channels: &Arc<ChannelRegistry>) -> String {
        let node = WirelessManagerNode::new(Some(&json!({ "action": action }))).unwrap();
        let ctx = NodeContext::new("mgr", "wireless::manager", Arc::clone(channels));
        let outputs = node.execute(&ctx).await.unwrap();
        outputs[0].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_actions_report_registry_state() {
        let channels = Arc::new(ChannelRegistry::new());
        assert_eq!(run("list_ids", &channels).await, "No active wireless connections");

        channels.store("a", Arc::new(Value::Int(1))).unwrap();
        channels.store("b", Arc::new(Value::Int(2))).unwrap();
        assert_eq!(run("list_ids", &channels).await, "Active wireless IDs: a, b");
        assert_eq!(run("count_entries", &channels).await, "Wireless registry contains 2 entries");
        assert_eq!(run("clear_registry", &channels).await, "Cleared 2 wireless entries");
        assert!(channels.is_empty());
    }

    #[test]
    fn test_unknown_action_is_rejected() {
        assert!(WirelessManagerNode::new(Some(&json!({"action": "explode"}))).is_err());
        assert_eq!(WirelessManagerNode::new(None).unwrap().action, ManagerAction::ListIds);
    }
}
