// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless relay node
//!
//! One node kind for both ends of a channel. In `transmit` mode it behaves like
//! `wireless::input` (and requires `data`); in `receive` mode like `wireless::output`.

use super::channel_id;
use super::output::channel_token;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use wirekit_core::{
    config_helpers, CachePolicy, ExecutableNode, InputPin, NodeContext, NodeOutputs, OutputPin,
    WireKitError,
};

#[derive(Deserialize, Serialize, Debug, Default, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    #[default]
    Transmit,
    Receive,
}

/// Only `mode` is read at construction. The channel id is checked when the node runs,
/// as for the other wireless nodes, since it may arrive through a link.
#[derive(Deserialize, Debug, Default, JsonSchema)]
#[serde(default)]
pub struct RelayConfig {
    pub mode: RelayMode,
}

#[derive(Debug)]
pub struct WirelessRelayNode {
    mode: RelayMode,
}

impl WirelessRelayNode {
    /// Creates a new relay node.
    ///
    /// # Errors
    ///
    /// Returns an error if `mode` is neither `transmit` nor `receive`.
    pub fn new(params: Option<&serde_json::Value>) -> Result<Self, WireKitError> {
        let config: RelayConfig = match params {
            Some(p) => config_helpers::parse_config_with_context(Some(p), "wireless::relay")?,
            None => RelayConfig::default(),
        };
        Ok(Self { mode: config.mode })
    }

    pub const fn mode(&self) -> RelayMode {
        self.mode
    }

    pub fn input_pins() -> Vec<InputPin> {
        vec![InputPin::required("id"), InputPin::optional("data")]
    }

    pub fn output_pins() -> Vec<OutputPin> {
        vec![OutputPin::new("output")]
    }
}

#[async_trait]
impl ExecutableNode for WirelessRelayNode {
    fn input_pins(&self) -> Vec<InputPin> {
        Self::input_pins()
    }

    fn output_pins(&self) -> Vec<OutputPin> {
        Self::output_pins()
    }

    fn cache_policy(&self, ctx: &NodeContext) -> CachePolicy {
        match self.mode {
            RelayMode::Transmit => CachePolicy::Never,
            RelayMode::Receive => channel_token(ctx),
        }
    }

    async fn execute(&self, ctx: &NodeContext) -> Result<NodeOutputs, WireKitError> {
        let channel = channel_id(ctx)?;
        let value = match self.mode {
            RelayMode::Transmit => {
                let data = ctx
                    .input("data")
                    .filter(|v| !v.is_none())
                    .cloned()
                    .ok_or_else(|| {
                        WireKitError::Configuration(
                            "Data input is required in transmit mode".to_string(),
                        )
                    })?;
                ctx.channels.store(&channel, data)?
            },
            RelayMode::Receive => ctx.channels.retrieve(&channel)?,
        };
        tracing::debug!(
            node_id = %ctx.node_id,
            mode = ?self.mode,
            channel = %channel.trim(),
            "Relayed wireless data"
        );
        Ok(vec![value])
    }
}
