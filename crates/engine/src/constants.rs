// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Shared names and defaults for the executor and its scheduling extensions.

// === Scheduling Extensions ===

/// Install marker for the wireless ordering hook.
///
/// [`crate::ScheduleExtensions::install`] refuses a second hook under the same marker,
/// so installing wireless ordering twice leaves a single hook in place.
pub const WIRELESS_ORDER_MARKER: &str = "wirekit.wireless_order";

// === Telemetry ===

/// Meter name used for every engine instrument.
pub const METER_NAME: &str = "wirekit_engine";

/// Histogram of per-node execution time, in seconds. Cache hits are not recorded.
pub const NODE_DURATION_METRIC: &str = "node.execution.duration";

/// Counter of dependency edges added by the wireless ordering hook.
pub const WIRELESS_EDGES_METRIC: &str = "wireless.edges.injected";

// === Change Detection ===

/// Separator between the parts of a node's cache signature before digesting.
pub const SIGNATURE_SEPARATOR: &str = "\u{1f}";
