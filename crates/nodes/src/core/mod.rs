// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use wirekit_core::registry::StaticPins;
use wirekit_core::NodeRegistry;

pub mod constant;
pub mod debug;

/// Registers the general-purpose core nodes.
///
/// # Panics
///
/// Panics if config schemas cannot be serialized to JSON (should never happen).
#[allow(clippy::expect_used)] // Schema serialization should never fail for valid types
pub fn register_core_nodes(registry: &mut NodeRegistry) {
    use schemars::schema_for;

    // --- Register ConstantNode ---
    registry.register_with_description(
        "core::constant",
        |params| Ok(Box::new(constant::ConstantNode::new(params)?)),
        serde_json::to_value(schema_for!(constant::ConstantConfig))
            .expect("ConstantConfig schema should serialize to JSON"),
        StaticPins {
            inputs: constant::ConstantNode::input_pins(),
            outputs: constant::ConstantNode::output_pins(),
        },
        vec!["core".to_string()],
        false,
        "Emits its `value` literal. Objects with `shape`, `dtype` and `data` become tensors.",
    );

    // --- Register DebugNode ---
    registry.register_with_description(
        "core::debug",
        |params| Ok(Box::new(debug::DebugNode::new(params)?)),
        serde_json::to_value(schema_for!(debug::DebugConfig))
            .expect("DebugConfig schema should serialize to JSON"),
        StaticPins { inputs: debug::DebugNode::input_pins(), outputs: debug::DebugNode::output_pins() },
        vec!["core".to_string(), "observability".to_string()],
        true,
        "Logs the type and value of its input and outputs the same description as text.",
    );
}
