// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless output node
//!
//! Retrieves channel `id` and emits the stored value on `data`. Its cache token is the
//! channel's content hash, so it re-runs only when a transmitter stored something new.

use super::{channel_id, ChannelConfig};
use async_trait::async_trait;
use wirekit_core::{
    config_helpers, CachePolicy, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin,
    WireKitError,
};

#[derive(Debug, Default)]
pub struct WirelessOutputNode;

impl WirelessOutputNode {
    /// Creates a new wireless output node.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration parameters cannot be parsed.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let _config: ChannelConfig = config_helpers::parse_config_optional(params)?;
        Ok(Self)
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::required("id")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("data")]
    }
}

/// Token for nodes that read `channel`: changes whenever the stored content changes.
pub(crate) fn channel_token(ctx: &NodeContext) -> CachePolicy {
    match channel_id(ctx) {
        Ok(channel) => CachePolicy::Token(ctx.channels.get_hash(&channel)),
        // Let execute() report the error.
        Err(_) => CachePolicy::Never,
    }
}

#[async_trait]
impl ExecutableNode for WirelessOutputNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    fn cache_policy(&self, ctx: &NodeContext) -> CachePolicy {
        channel_token(ctx)
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        let channel = channel_id(ctx)?;
        let value = ctx.channels.retrieve(&channel)?;
        tracing::info!(
            node_id = %ctx.node_id,
            channel = %channel.trim(),
            value_type = value.type_name(),
            "Received wireless data"
        );
        Ok(vec![value])
    }
}
