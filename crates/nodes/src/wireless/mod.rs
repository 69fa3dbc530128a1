// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless nodes: exchange values through the engine's channel registry instead of links.
//!
//! - `wireless::input` stores its `data` on channel `id` and passes it through
//! - `wireless::output` retrieves channel `id`
//! - `wireless::relay` does either, selected by `mode`
//! - `wireless::manager` and `wireless::debug` inspect or reset the registry
//!
//! The engine orders every retrieving node after the storing nodes on the same channel,
//! as long as the channel id is a literal in the graph.

use schemars::JsonSchema;
use serde::Deserialize;
use wirekit_core::registry::StaticPins;
use wirekit_core::{wireless_kinds, NodeContext, NodeRegistry, WireKitError};

pub mod debug;
pub mod input;
pub mod manager;
pub mod output;
pub mod relay;

/// Parameters shared by the nodes that address a single channel.
#[derive(Deserialize, Debug, Default, JsonSchema)]
#[serde(default)]
pub struct ChannelConfig {
    /// Channel id. Leading and trailing whitespace is ignored.
    pub id: Option<String>,
}

/// The channel id bound to `id`, literal or linked.
///
/// Emptiness is left to the registry, which rejects blank ids before any lookup.
pub(crate) fn channel_id(ctx: &NodeContext) -> Result<String, WireKitError> {
    let value = ctx.require_input(wireless_kinds::CHANNEL_INPUT)?;
    value.as_str().map(str::to_string).ok_or_else(|| {
        WireKitError::Configuration(format!(
            "Node '{}' ({}): channel id must be text, got {}",
            ctx.node_id,
            ctx.kind,
            value.type_name()
        ))
    })
}

/// Registers every wireless node kind.
///
/// # Panics
///
/// Panics if config schemas cannot be serialized to JSON (should never happen).
#[allow(clippy::expect_used)] // Schema serialization should never fail for valid types
pub fn register_wireless_nodes(registry: &mut NodeRegistry) {
    use schemars::schema_for;

    let channel_schema = serde_json::to_value(schema_for!(ChannelConfig))
        .expect("ChannelConfig schema should serialize to JSON");

    registry.register_with_description(
        wireless_kinds::INPUT,
        |params| Ok(Box::new(input::WirelessInputNode::new(params)?)),
        channel_schema.clone(),
        StaticPins {
            inputs: input::WirelessInputNode::input_pins(),
            outputs: input::WirelessInputNode::output_pins(),
        },
        vec!["wireless".to_string()],
        true,
        "Stores its data input on a wireless channel and passes it through. \
         Always executes so receivers see this run's value.",
    );

    registry.register_with_description(
        wireless_kinds::OUTPUT,
        |params| Ok(Box::new(output::WirelessOutputNode::new(params)?)),
        channel_schema,
        StaticPins {
            inputs: output::WirelessOutputNode::input_pins(),
            outputs: output::WirelessOutputNode::output_pins(),
        },
        vec!["wireless".to_string()],
        false,
        "Retrieves the latest value stored on a wireless channel. \
         Fails if no transmitter has stored on the channel.",
    );

    registry.register_with_description(
        wireless_kinds::RELAY,
        |params| Ok(Box::new(relay::WirelessRelayNode::new(params)?)),
        serde_json::to_value(schema_for!(relay::RelayConfig))
            .expect("RelayConfig schema should serialize to JSON"),
        StaticPins {
            inputs: relay::WirelessRelayNode::input_pins(),
            outputs: relay::WirelessRelayNode::output_pins(),
        },
        vec!["wireless".to_string()],
        false,
        "Transmits (stores and passes through) or receives a wireless channel, \
         depending on its mode.",
    );

    registry.register_with_description(
        wireless_kinds::MANAGER,
        |params| Ok(Box::new(manager::WirelessManagerNode::new(params)?)),
        serde_json::to_value(schema_for!(manager::ManagerConfig))
            .expect("ManagerConfig schema should serialize to JSON"),
        StaticPins {
            inputs: manager::WirelessManagerNode::input_pins(),
            outputs: manager::WirelessManagerNode::output_pins(),
        },
        vec!["wireless".to_string(), "development".to_string()],
        true,
        "Lists, counts or clears the wireless channels and reports the result as text.",
    );

    registry.register_with_description(
        wireless_kinds::DEBUG,
        |params| Ok(Box::new(debug::WirelessDebugNode::new(params)?)),
        serde_json::to_value(schema_for!(debug::WirelessDebugConfig))
            .expect("WirelessDebugConfig schema should serialize to JSON"),
        StaticPins {
            inputs: debug::WirelessDebugNode::input_pins(),
            outputs: debug::WirelessDebugNode::output_pins(),
        },
        vec!["wireless".to_string(), "development".to_string()],
        true,
        "Renders the wireless registry state (channels, content hashes) as text.",
    );
}
