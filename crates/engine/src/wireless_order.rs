// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Wireless ordering: dependency edges for channels that have no visible link.
//!
//! A transmitter stores a value on a channel and a receiver retrieves it, but the graph
//! holds no link between the two. This module installs a [`PendingSetHook`] that, after
//! every pending-set addition, scans all pending nodes and blocks each receiver on every
//! pending transmitter sharing its channel id.
//!
//! Roles:
//!
//! | kind               | `mode`     | role        |
//! |--------------------|------------|-------------|
//! | `wireless::input`  |            | transmitter |
//! | `wireless::output` |            | receiver    |
//! | `wireless::relay`  | `transmit` | transmitter |
//! | `wireless::relay`  | `receive`  | receiver    |
//!
//! Only literal channel ids are considered; a channel bound through a link is not known
//! until run time and the node is left unordered.
//!
//! With several transmitters on one channel the receiver waits for all of them; which
//! value it reads is whichever was stored last.

use crate::constants::WIRELESS_ORDER_MARKER;
use crate::topology::{DependencyTable, PendingSetHook, ScheduleExtensions};
use std::sync::Arc;
use thiserror::Error;
use wirekit_api::NodeSpec;
use wirekit_core::wireless_kinds;

/// The hook could not make sense of the pending set; no edges were added.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AugmentationSkipped {
    #[error("pending node '{node_id}' has no declaration")]
    MissingDescriptor { node_id: String },
}

/// How a pending node takes part in wireless exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WirelessRole {
    /// Stores on the channel.
    Transmitter(String),
    /// Retrieves from the channel.
    Receiver(String),
    Untagged,
}

impl WirelessRole {
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Transmitter(ch) | Self::Receiver(ch) => Some(ch),
            Self::Untagged => None,
        }
    }
}

/// Result of [`install`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Patched,
    AlreadyPatched,
}

const RELAY_TRANSMIT: &str = "transmit";
const RELAY_RECEIVE: &str = "receive";

pub fn classify(spec: &NodeSpec) -> WirelessRole {
    let transmits = match spec.kind.as_str() {
        wireless_kinds::INPUT => true,
        wireless_kinds::OUTPUT => false,
        wireless_kinds::RELAY => match spec.literal_str(wireless_kinds::MODE_INPUT) {
            None | Some(RELAY_TRANSMIT) => true,
            Some(RELAY_RECEIVE) => false,
            Some(mode) => {
                tracing::debug!(mode, "Relay with unknown mode is not ordered");
                return WirelessRole::Untagged;
            },
        },
        _ => return WirelessRole::Untagged,
    };

    let Some(channel) = spec.literal_str(wireless_kinds::CHANNEL_INPUT) else {
        tracing::debug!(
            kind = %spec.kind,
            "Wireless node has no literal channel id; it is not ordered"
        );
        return WirelessRole::Untagged;
    };

    if transmits {
        WirelessRole::Transmitter(channel.to_string())
    } else {
        WirelessRole::Receiver(channel.to_string())
    }
}

/// Blocks every pending receiver on every pending transmitter with the same channel id.
///
/// Safe to run repeatedly over a growing pending set: existing edges are left alone.
/// Can also be run once over a fully built table instead of being installed as a hook.
///
/// # Errors
///
/// Returns [`AugmentationSkipped`] before touching the table if a pending node has no
/// declaration.
pub fn link_wireless_dependencies(
    table: &mut dyn DependencyTable,
) -> Result<usize, AugmentationSkipped> {
    let mut transmitters: Vec<(String, String)> = Vec::new();
    let mut receivers: Vec<(String, String)> = Vec::new();

    for node_id in table.pending_ids() {
        let spec = table
            .node_spec(&node_id)
            .ok_or_else(|| AugmentationSkipped::MissingDescriptor { node_id: node_id.clone() })?;
        match classify(spec) {
            WirelessRole::Transmitter(channel) => transmitters.push((node_id, channel)),
            WirelessRole::Receiver(channel) => receivers.push((node_id, channel)),
            WirelessRole::Untagged => {},
        }
    }

    let mut added = 0;
    for (receiver, channel) in &receivers {
        for (transmitter, tx_channel) in &transmitters {
            if tx_channel != channel || transmitter == receiver {
                continue;
            }
            if table.add_block(transmitter, receiver) {
                added += 1;
                tracing::debug!(
                    channel = %channel,
                    transmitter = %transmitter,
                    receiver = %receiver,
                    "Added wireless dependency"
                );
            }
        }
    }
    Ok(added)
}

/// The pending-set hook running [`link_wireless_dependencies`].
#[derive(Debug, Default)]
pub struct WirelessOrderHook;

impl PendingSetHook for WirelessOrderHook {
    fn name(&self) -> &'static str {
        "wireless_order"
    }

    fn after_add(&self, table: &mut dyn DependencyTable) -> Result<usize, AugmentationSkipped> {
        link_wireless_dependencies(table)
    }
}

/// Installs [`WirelessOrderHook`]. Further calls are no-ops.
pub fn install(extensions: &mut ScheduleExtensions) -> InstallOutcome {
    if extensions.install(WIRELESS_ORDER_MARKER, Arc::new(WirelessOrderHook)) {
        tracing::info!("Wireless ordering enabled");
        InstallOutcome::Patched
    } else {
        InstallOutcome::AlreadyPatched
    }
}
