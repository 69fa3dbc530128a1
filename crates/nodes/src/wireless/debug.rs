// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless debug node
//!
//! Renders a snapshot of the channel registry as a text block.

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use std::fmt::Write as _;
use std::sync::Arc;
use wirekit_core::{
    config_helpers, CachePolicy, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin,
    RegistryInfo, Value, WireKitError,
};

/// Number of hash characters shown per channel.
const HASH_PREFIX_LEN: usize = 12;

#[derive(Deserialize, Debug, Default, JsonSchema)]
#[serde(default)]
pub struct WirelessDebugConfig {}

#[derive(Debug, Default)]
pub struct WirelessDebugNode;

impl WirelessDebugNode {
    /// Creates a new debug node.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration parameters cannot be parsed.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let _config: WirelessDebugConfig = config_helpers::parse_config_optional(params)?;
        Ok(Self)
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::optional("trigger")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("debug_info")]
    }
}

pub fn render(info: &RegistryInfo) -> String {
    let mut out = String::from("=== WIRELESS DEBUG INFO ===\n");
    let _ = writeln!(out, "Total Entries: {}", info.count);
    if info.ids.is_empty() {
        out.push_str("Active IDs: None\nRegistry State: Empty\n");
    } else {
        let _ = writeln!(out, "Active IDs: {}", info.ids.join(", "));
        out.push_str("Registry State: Populated\n");
        for id in &info.ids {
            let hash = info.hashes.get(id).map_or("", String::as_str);
            let shown = hash.get(..HASH_PREFIX_LEN).unwrap_or(hash);
            let _ = writeln!(out, "  {id}: {shown}");
        }
    }
    out.push_str("===========================");
    out
}

#[async_trait]
impl ExecutableNode for WirelessDebugNode {
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
        let text = render(&ctx.channels.info());
        tracing::info!(node_id = %ctx.node_id, "\n{text}");
        Ok(vec![Arc::new(Value::Text(text))])
    }
}
