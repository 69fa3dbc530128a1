// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

use wirekit_core::NodeRegistry;

// Declare the top-level feature modules directly.
pub mod core;
pub mod wireless;

/// A single function to register all built-in nodes.
pub fn register_nodes(registry: &mut NodeRegistry) {
    core::register_core_nodes(registry);
    wireless::register_wireless_nodes(registry);

    tracing::info!("Finished registering built-in nodes.");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use wirekit_core::wireless_kinds;

    #[test]
    fn test_register_nodes_exposes_wireless_kinds() {
        let mut registry = NodeRegistry::new();
        register_nodes(&mut registry);

        for kind in [
            wireless_kinds::INPUT,
            wireless_kinds::OUTPUT,
            wireless_kinds::RELAY,
            wireless_kinds::MANAGER,
            wireless_kinds::DEBUG,
            "core::constant",
            "core::debug",
        ] {
            assert!(registry.contains(kind), "{kind} not registered");
        }
        assert!(registry.is_output_node(wireless_kinds::INPUT));
        assert!(!registry.is_output_node(wireless_kinds::OUTPUT));
        assert!(registry.is_output_node("core::debug"));

        let defs = registry.definitions();
        let relay = defs.iter().find(|d| d.kind == wireless_kinds::RELAY).unwrap();
        assert!(relay.param_schema.to_string().contains("transmit"));
    }
}
