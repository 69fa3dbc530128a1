// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless input node
//!
//! Stores its `data` input on channel `id` and emits the same value on `data`.

use super::{channel_id, ChannelConfig};
use async_trait::async_trait;
use wirekit_core::{
    config_helpers, CachePolicy, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin,
    WireKitError,
};

#[derive(Debug, Default)]
pub struct WirelessInputNode;

impl WirelessInputNode {
    /// Creates a new wireless input node.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration parameters cannot be parsed.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let _config: ChannelConfig = config_helpers::parse_config_optional(params)?;
        Ok(Self)
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::required("id"), InputPin::required("data")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("data")]
    }
}

#[async_trait]
impl ExecutableNode for WirelessInputNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    // Storing is a side effect; reusing cached outputs would leave the channel stale.
    fn cache_policy(&self, _ctx: &NodeContext) -> CachePolicy {
        CachePolicy::Never
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        let channel = channel_id(ctx)?;
        let data = ctx.require_input("data")?;
        let stored = ctx.channels.store(&channel, data)?;
        tracing::info!(
            node_id = %ctx.node_id,
            channel = %channel.trim(),
            value_type = stored.type_name(),
            "Transmitted wireless data"
        );
        Ok(vec![stored])
    }
}
