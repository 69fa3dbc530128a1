// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

#![allow(clippy::unwrap_used)] // Tests use unwrap for assertions

use crate::topology::{DependencyTable, ExecutionList, PendingSetHook, ScheduleExtensions};
use crate::wireless_order::{self, link_wireless_dependencies, AugmentationSkipped};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use wirekit_api::{GraphDefinition, NodeSpec};
use wirekit_core::{wireless_kinds, WireKitError};

fn transmitter(channel: &str) -> NodeSpec {
    NodeSpec::new(wireless_kinds::INPUT).literal("id", json!(channel)).literal("data", json!(42))
}

fn receiver(channel: &str) -> NodeSpec {
    NodeSpec::new(wireless_kinds::OUTPUT).literal("id", json!(channel))
}

fn plain() -> NodeSpec {
    NodeSpec::new("core::debug").literal("input", json!("z"))
}

fn with_wireless_ordering() -> Arc<ScheduleExtensions> {
    let mut extensions = ScheduleExtensions::new();
    wireless_order::install(&mut extensions);
    Arc::new(extensions)
}

/// Every (producer, consumer) edge plus every block counter, for whole-table comparisons.
fn snapshot(list: &ExecutionList<'_>, ids: &[&str]) -> Vec<(String, usize, Vec<String>)> {
    ids.iter().map(|id| (id.to_string(), list.blocks_on(id), list.blocked_by(id))).collect()
}

#[test]
fn test_receiver_blocked_on_transmitter_only() {
    let graph = GraphDefinition::new()
        .with_node("b", receiver("x"))
        .with_node("a", transmitter("x"))
        .with_node("z", plain());
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    for id in ["b", "a", "z"] {
        list.add_node(id).unwrap();
    }

    assert!(list.is_blocking("a", "b"));
    assert_eq!(list.blocks_on("b"), 1);
    assert_eq!(list.blocks_on("a"), 0);
    assert_eq!(list.blocks_on("z"), 0);
    assert!(list.blocked_by("z").is_empty());
    assert!(list.blocked_by("b").is_empty());
    assert_eq!(list.hook_edges(), 1);

    // "b" was added first but must wait for "a".
    assert_eq!(list.stage_next().unwrap().as_deref(), Some("a"));
    list.complete("a");
    assert_eq!(list.blocks_on("b"), 0);
    assert_eq!(list.stage_next().unwrap().as_deref(), Some("b"));
    list.complete("b");
    assert_eq!(list.stage_next().unwrap().as_deref(), Some("z"));
    list.complete("z");
    assert_eq!(list.stage_next().unwrap(), None);
}

#[test]
fn test_rescanning_does_not_duplicate_edges() {
    let graph = GraphDefinition::new()
        .with_node("a", transmitter("x"))
        .with_node("b", receiver("x"))
        .with_node("c", receiver("x"))
        .with_node("z", plain());
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    for id in ["a", "b", "c", "z"] {
        list.add_node(id).unwrap();
    }
    let ids = ["a", "b", "c", "z"];
    let before = snapshot(&list, &ids);

    assert_eq!(link_wireless_dependencies(&mut list).unwrap(), 0);
    assert_eq!(link_wireless_dependencies(&mut list).unwrap(), 0);
    assert_eq!(snapshot(&list, &ids), before);
    assert_eq!(list.blocks_on("b"), 1);
    assert_eq!(list.blocks_on("c"), 1);
}

#[test]
fn test_one_pass_and_incremental_passes_agree() {
    let graph = GraphDefinition::new()
        .with_node("a", transmitter("x"))
        .with_node("b", receiver("x"))
        .with_node("z", plain());
    let ids = ["a", "b", "z"];

    let mut incremental = ExecutionList::new(&graph, with_wireless_ordering());
    let mut prepass = ExecutionList::new(&graph, Arc::new(ScheduleExtensions::new()));
    for id in ids {
        incremental.add_node(id).unwrap();
        prepass.add_node(id).unwrap();
    }
    assert_eq!(prepass.blocks_on("b"), 0);
    assert_eq!(link_wireless_dependencies(&mut prepass).unwrap(), 1);
    assert_eq!(snapshot(&prepass, &ids), snapshot(&incremental, &ids));
}

#[test]
fn test_receiver_waits_for_every_transmitter() {
    let graph = GraphDefinition::new()
        .with_node("a1", transmitter("y"))
        .with_node("a2", transmitter("y"))
        .with_node("b", receiver("y"));
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    for id in ["b", "a1", "a2"] {
        list.add_node(id).unwrap();
    }

    assert_eq!(list.blocks_on("b"), 2);
    assert!(list.is_blocking("a1", "b"));
    assert!(list.is_blocking("a2", "b"));
    assert!(!list.is_blocking("a1", "a2"));
    assert!(!list.is_blocking("a2", "a1"));

    list.complete(&list.stage_next().unwrap().unwrap());
    assert_eq!(list.blocks_on("b"), 1);
    assert_ne!(list.stage_next().unwrap().as_deref(), Some("b"));
}

#[test]
fn test_no_edges_between_same_roles_or_channels() {
    let graph = GraphDefinition::new()
        .with_node("t1", transmitter("x"))
        .with_node("t2", transmitter("x"))
        .with_node("r1", receiver("x"))
        .with_node("r2", receiver("x"))
        .with_node("other", receiver("X"));
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    for id in ["t1", "t2", "r1", "r2", "other"] {
        list.add_node(id).unwrap();
    }

    assert_eq!(list.blocks_on("t1"), 0);
    assert_eq!(list.blocks_on("t2"), 0);
    assert_eq!(list.blocks_on("r1"), 2);
    assert_eq!(list.blocks_on("r2"), 2);
    assert!(!list.is_blocking("r1", "r2"));
    assert_eq!(list.blocks_on("other"), 0);
}

#[test]
fn test_relays_take_part_by_mode() {
    let graph = GraphDefinition::new()
        .with_node(
            "rx",
            NodeSpec::new(wireless_kinds::RELAY)
                .literal("mode", json!("receive"))
                .literal("id", json!("r")),
        )
        .with_node(
            "tx",
            NodeSpec::new(wireless_kinds::RELAY)
                .literal("mode", json!("transmit"))
                .literal("id", json!("r"))
                .literal("data", json!(1)),
        );
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    list.add_node("rx").unwrap();
    list.add_node("tx").unwrap();
    assert!(list.is_blocking("tx", "rx"));
    assert_eq!(list.blocks_on("tx"), 0);
}

#[test]
fn test_visible_link_and_channel_share_one_edge() {
    let graph = GraphDefinition::new()
        .with_node("a", transmitter("x"))
        .with_node("b", receiver("x").link("trigger", "a", 0));
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    list.add_node("b").unwrap();
    list.add_node("a").unwrap();
    assert_eq!(list.blocks_on("b"), 1);
    assert_eq!(list.blocked_by("a"), vec!["b".to_string()]);
}

#[test]
fn test_wireless_cycle_is_reported() {
    // Visible: b -> a. Wireless: a (transmitter) -> b (receiver).
    let graph = GraphDefinition::new()
        .with_node("b", receiver("x"))
        .with_node(
            "a",
            NodeSpec::new(wireless_kinds::INPUT).literal("id", json!("x")).link("data", "b", 0),
        );
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    list.add_node("a").unwrap();

    let Err(err) = list.stage_next() else {
        panic!("expected a dependency cycle");
    };
    match err {
        WireKitError::Configuration(msg) => {
            assert!(msg.contains("Dependency cycle"), "{msg}");
            assert!(msg.contains("a (waits on b)"), "{msg}");
            assert!(msg.contains("b (waits on a)"), "{msg}");
        },
        other => panic!("expected configuration error, got: {other:?}"),
    }
}

#[test]
fn test_without_hook_only_visible_edges_exist() {
    let graph = GraphDefinition::new().with_node("b", receiver("x")).with_node("a", transmitter("x"));
    let mut list = ExecutionList::new(&graph, Arc::new(ScheduleExtensions::new()));
    list.add_node("b").unwrap();
    list.add_node("a").unwrap();
    assert_eq!(list.blocks_on("b"), 0);
    assert_eq!(list.stage_next().unwrap().as_deref(), Some("b"));
}

#[test]
fn test_unknown_node_is_configuration_error() {
    let graph = GraphDefinition::new();
    let mut list = ExecutionList::new(&graph, with_wireless_ordering());
    assert!(matches!(list.add_node("ghost"), Err(WireKitError::Configuration(_))));
}

/// A table whose pending set mentions a node it cannot describe.
#[derive(Default)]
struct PartialTable {
    ids: Vec<String>,
    specs: HashMap<String, NodeSpec>,
    edges: Vec<(String, String)>,
}

impl DependencyTable for PartialTable {
    fn pending_ids(&self) -> Vec<String> {
        self.ids.clone()
    }

    fn node_spec(&self, node_id: &str) -> Option<&NodeSpec> {
        self.specs.get(node_id)
    }

    fn is_blocking(&self, producer: &str, consumer: &str) -> bool {
        self.edges.iter().any(|(p, c)| p == producer && c == consumer)
    }

    fn add_block(&mut self, producer: &str, consumer: &str) -> bool {
        if self.is_blocking(producer, consumer) {
            return false;
        }
        self.edges.push((producer.to_string(), consumer.to_string()));
        true
    }
}

#[test]
fn test_missing_descriptor_skips_without_mutation() {
    let mut table = PartialTable {
        ids: vec!["a".into(), "b".into(), "ghost".into()],
        ..PartialTable::default()
    };
    table.specs.insert("a".into(), transmitter("x"));
    table.specs.insert("b".into(), receiver("x"));

    let err = link_wireless_dependencies(&mut table).unwrap_err();
    assert_eq!(err, AugmentationSkipped::MissingDescriptor { node_id: "ghost".into() });
    assert!(table.edges.is_empty());

    table.ids.pop();
    assert_eq!(link_wireless_dependencies(&mut table).unwrap(), 1);
    assert_eq!(table.edges, vec![("a".to_string(), "b".to_string())]);
}

struct FailingHook;

impl PendingSetHook for FailingHook {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn after_add(&self, _table: &mut dyn DependencyTable) -> Result<usize, AugmentationSkipped> {
        Err(AugmentationSkipped::MissingDescriptor { node_id: "?".into() })
    }
}

#[test]
fn test_failing_hook_does_not_stop_scheduling() {
    let graph = GraphDefinition::new()
        .with_node("src", plain())
        .with_node("sink", NodeSpec::new("core::debug").link("input", "src", 0));
    let mut extensions = ScheduleExtensions::new();
    assert!(extensions.install("test.failing", Arc::new(FailingHook)));
    assert!(!extensions.install("test.failing", Arc::new(FailingHook)));

    let mut list = ExecutionList::new(&graph, Arc::new(extensions));
    list.add_node("sink").unwrap();
    assert_eq!(list.blocks_on("sink"), 1);
    assert_eq!(list.stage_next().unwrap().as_deref(), Some("src"));
}
