// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Constant node
//!
//! Emits the `value` it was declared with, or the value linked to it.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use wirekit_core::{
    config_helpers, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin, Value,
    WireKitError,
};

#[derive(Deserialize, Debug, Default, JsonSchema)]
#[serde(default)]
pub struct ConstantConfig {
    /// Any JSON value. `{shape, dtype, data}` objects are read as tensors.
    pub value: serde_json::Value,
}

#[derive(Debug)]
pub struct ConstantNode {
    value: Arc<Value>,
}

impl ConstantNode {
    /// Creates a new constant node.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration parameters cannot be parsed.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let config: ConstantConfig = config_helpers::parse_config_optional(params)?;
        Ok(Self { value: Arc::new(Value::from_json(&config.value)) })
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::optional("value")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("value")]
    }
}

#[async_trait]
impl ExecutableNode for ConstantNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        // A linked `value` wins over the declared literal.
        Ok(vec![ctx.input("value").cloned().unwrap_or_else(|| Arc::clone(&self.value))])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wirekit_core::ChannelRegistry;

    #[tokio::test]
    async fn test_emits_literal_and_tensor_values() {
        let ctx = NodeContext::new("c", "core::constant", Arc::new(ChannelRegistry::new()));

        let node = ConstantNode::new(Some(&json!({"value": 42}))).unwrap();
        assert_eq!(*node.execute(&ctx).await.unwrap()[0], Value::Int(42));

        let node = ConstantNode::new(Some(&json!({
            "value": {"shape": [2], "dtype": "int64", "data": [1, 2]}
        })))
        .unwrap();
        let out = node.execute(&ctx).await.unwrap();
        assert_eq!(out[0].type_name(), "tensor");

        let node = ConstantNode::new(None).unwrap();
        assert!(node.execute(&ctx).await.unwrap()[0].is_none());
    }
}
