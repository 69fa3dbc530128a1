// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Debug node
//!
//! Logs whatever reaches its `input` and outputs a one-line description of it.

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
pub struct DebugConfig {
    /// Optional label prepended to the description.
    pub label: Option<String>,
}

#[derive(Debug, Default)]
pub struct DebugNode {
    label: Option<String>,
}

impl DebugNode {
    /// Creates a new debug node.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration parameters cannot be parsed.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let config: DebugConfig = config_helpers::parse_config_optional(params)?;
        Ok(Self { label: config.label })
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::required("input")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("text")]
    }
}

#[async_trait]
impl ExecutableNode for DebugNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        let input = ctx.require_input("input")?;
        let description = match &self.label {
            Some(label) => format!("{label}: {} {input}", input.type_name()),
            None => format!("{} {input}", input.type_name()),
        };
        tracing::info!(node_id = %ctx.node_id, "{description}");
        Ok(vec![Arc::new(Value::Text(description))])
    }
}
