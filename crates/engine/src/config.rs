// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Configuration for the graph executor.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Engine behaviour switches, loaded from the `[engine]` section of the runner config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct EngineConfig {
    /// Install the hook that orders wireless transmitters before their receivers (default: true).
    /// Without it, receivers can run before the value they read was stored.
    pub wireless_ordering: bool,
    /// Clear the channel registry at the start of every run (default: false).
    /// Channels otherwise keep the previous run's values until overwritten.
    pub clear_channels_before_run: bool,
    /// Reuse outputs of nodes whose inputs are unchanged since the previous run (default: true).
    pub output_cache: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { wireless_ordering: true, clear_channels_before_run: false, output_cache: true }
    }
}
