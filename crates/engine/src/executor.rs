// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Runs a graph to completion, one node at a time, in dependency order.
//!
//! 1. Every node is instantiated and its bindings checked against its pins.
//! 2. The pending set is built from the output nodes (see [`crate::topology`]).
//! 3. Nodes are staged one by one. Just before a node would run its cache signature is
//!    computed from its kind, its inputs and its [`CachePolicy`]; a matching signature from
//!    a previous run reuses the cached outputs instead of executing.
//!
//! Signatures are computed at staging time rather than up front so a receiver's channel
//! hash reflects what its transmitter stored earlier in the same run.

use crate::cache::OutputCache;
use crate::constants::{
    METER_NAME, NODE_DURATION_METRIC, SIGNATURE_SEPARATOR, WIRELESS_EDGES_METRIC,
};
use crate::topology::{ExecutionList, ScheduleExtensions};
use indexmap::IndexMap;
use opentelemetry::{global, KeyValue};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use wirekit_api::{GraphDefinition, InputBinding};
use wirekit_core::{
    fingerprint, CachePolicy, ChannelRegistry, ExecutableNode, NodeContext, NodeOutputs,
    NodeRegistry, Value, WireKitError,
};

/// What happened during one run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Node ids that executed, in execution order.
    pub executed: Vec<String>,
    /// Node ids whose outputs were reused from a previous run.
    pub cached: Vec<String>,
    /// Outputs of every node that executed or was reused, in staging order.
    pub outputs: IndexMap<String, NodeOutputs>,
}

impl RunReport {
    /// Outputs of `node_id`, if it was part of the run.
    pub fn output(&self, node_id: &str) -> Option<&NodeOutputs> {
        self.outputs.get(node_id)
    }

    /// First output slot of `node_id`.
    pub fn first_output(&self, node_id: &str) -> Option<&Arc<Value>> {
        self.outputs.get(node_id).and_then(|outputs| outputs.first())
    }

    pub fn to_json(&self) -> serde_json::Value {
        let outputs: serde_json::Map<String, serde_json::Value> = self
            .outputs
            .iter()
            .map(|(id, values)| {
                (id.clone(), serde_json::Value::Array(values.iter().map(|v| v.to_json()).collect()))
            })
            .collect();
        serde_json::json!({
            "executed": self.executed,
            "cached": self.cached,
            "outputs": outputs,
        })
    }
}

pub(crate) struct GraphRun<'a> {
    pub graph: &'a GraphDefinition,
    pub registry: &'a NodeRegistry,
    pub channels: &'a Arc<ChannelRegistry>,
    pub extensions: Arc<ScheduleExtensions>,
    /// `None` disables output reuse for this run.
    pub cache: Option<&'a mut OutputCache>,
    pub cancellation_token: Option<&'a CancellationToken>,
}

impl GraphRun<'_> {
    #[allow(clippy::cognitive_complexity)]
    pub async fn execute(mut self) -> Result<RunReport, WireKitError> {
        let graph = self.graph;
        graph.validate().map_err(WireKitError::Configuration)?;

        let nodes = instantiate(graph, self.registry)?;

        let roots: Vec<&str> = graph
            .nodes
            .iter()
            .filter(|(_, spec)| self.registry.is_output_node(&spec.kind))
            .map(|(id, _)| id.as_str())
            .collect();
        if roots.is_empty() {
            return Err(WireKitError::Configuration(
                "Graph has no output nodes; nothing to execute".to_string(),
            ));
        }

        let mut list = ExecutionList::new(graph, Arc::clone(&self.extensions));
        for root in &roots {
            list.add_node(root)?;
        }

        let meter = global::meter(METER_NAME);
        let duration_histogram = meter
            .f64_histogram(NODE_DURATION_METRIC)
            .with_description("Node execution time in seconds")
            .build();
        let edges_counter = meter
            .u64_counter(WIRELESS_EDGES_METRIC)
            .with_description("Dependency edges added for wireless channels")
            .build();
        edges_counter.add(u64::try_from(list.hook_edges()).unwrap_or(u64::MAX), &[]);

        tracing::info!(
            nodes = graph.nodes.len(),
            roots = roots.len(),
            pending = list.pending_len(),
            wireless_edges = list.hook_edges(),
            "Starting graph run"
        );

        let mut report = RunReport::default();
        while let Some(node_id) = list.stage_next()? {
            if self.cancellation_token.is_some_and(CancellationToken::is_cancelled) {
                tracing::info!(node_id = %node_id, "Run cancelled before node");
                return Err(WireKitError::Cancelled(format!("stopped before node '{node_id}'")));
            }

            let Some(node) = nodes.get(&node_id) else {
                return Err(WireKitError::Runtime(format!(
                    "Node '{node_id}' was staged but never instantiated"
                )));
            };
            let kind = graph.node(&node_id).map(|s| s.kind.clone()).unwrap_or_default();

            let (ctx, mut signature_parts) =
                self.resolve_inputs(&node_id, &kind, node.as_ref(), &report)?;

            let signature = match node.cache_policy(&ctx) {
                CachePolicy::Never => None,
                CachePolicy::Inputs => {
                    Some(fingerprint::digest(&signature_parts.join(SIGNATURE_SEPARATOR)))
                },
                CachePolicy::Token(token) => {
                    signature_parts.push(format!("token={token}"));
                    Some(fingerprint::digest(&signature_parts.join(SIGNATURE_SEPARATOR)))
                },
            };

            let reused = match (&signature, self.cache.as_deref()) {
                (Some(sig), Some(cache)) => cache.lookup(&node_id, sig),
                _ => None,
            };

            let outputs = if let Some(outputs) = reused {
                tracing::debug!(node_id = %node_id, kind = %kind, "Reusing cached outputs");
                report.cached.push(node_id.clone());
                outputs
            } else {
                let outputs = self
                    .run_node(&node_id, &kind, node.as_ref(), &ctx, &duration_histogram)
                    .await?;
                if let Some(cache) = self.cache.as_deref_mut() {
                    match signature {
                        Some(sig) => cache.insert(&node_id, sig, outputs.clone()),
                        None => cache.invalidate(&node_id),
                    }
                }
                report.executed.push(node_id.clone());
                outputs
            };

            report.outputs.insert(node_id.clone(), outputs);
            list.complete(&node_id);
        }

        tracing::info!(
            executed = report.executed.len(),
            cached = report.cached.len(),
            "Graph run finished"
        );
        Ok(report)
    }

    /// Builds the node's context and the parts of its cache signature.
    ///
    /// Linked inputs contribute the fingerprint of the upstream value rather than the
    /// upstream signature, so downstream of an always-running node still caches on content.
    fn resolve_inputs(
        &self,
        node_id: &str,
        kind: &str,
        node: &dyn ExecutableNode,
        report: &RunReport,
    ) -> Result<(NodeContext, Vec<String>), WireKitError> {
        let spec = self.graph.node(node_id).ok_or_else(|| {
            WireKitError::Configuration(format!("Node '{node_id}' not found in graph"))
        })?;

        let mut ctx = NodeContext::new(node_id, kind, Arc::clone(self.channels));
        let mut parts = vec![format!("kind={kind}")];

        for (name, binding) in &spec.inputs {
            match binding {
                InputBinding::Literal(json) => {
                    ctx.inputs.insert(name.clone(), Arc::new(Value::from_json(json)));
                    parts.push(format!("{name}={json}"));
                },
                InputBinding::Link(link) => {
                    let value = report
                        .outputs
                        .get(&link.node)
                        .and_then(|outputs| outputs.get(link.output))
                        .ok_or_else(|| {
                            WireKitError::Runtime(format!(
                                "Node '{node_id}' input '{name}' reads output {} of '{}', which produced no such value",
                                link.output, link.node
                            ))
                        })?;
                    parts.push(format!("{name}=<{}>", fingerprint::signature(value)));
                    ctx.inputs.insert(name.clone(), Arc::clone(value));
                },
            }
        }

        for pin in node.input_pins() {
            if pin.required && !ctx.inputs.contains_key(&pin.name) {
                return Err(WireKitError::Configuration(format!(
                    "Node '{node_id}' ({kind}) is missing required input '{}'",
                    pin.name
                )));
            }
        }

        Ok((ctx, parts))
    }

    async fn run_node(
        &self,
        node_id: &str,
        kind: &str,
        node: &dyn ExecutableNode,
        ctx: &NodeContext,
        duration_histogram: &opentelemetry::metrics::Histogram<f64>,
    ) -> Result<NodeOutputs, WireKitError> {
        let span = tracing::info_span!("node_run", node.id = %node_id, node.kind = %kind);
        let start = Instant::now();

        let run = node.execute(ctx).instrument(span);
        let result = match self.cancellation_token {
            Some(token) => tokio::select! {
                result = run => result,
                () = token.cancelled() => {
                    return Err(WireKitError::Cancelled(format!("stopped while running node '{node_id}'")));
                }
            },
            None => run.await,
        };

        duration_histogram
            .record(start.elapsed().as_secs_f64(), &[KeyValue::new("node.kind", kind.to_string())]);

        let outputs = result.map_err(|e| {
            tracing::error!(node_id, kind, error = %e, "Node execution failed");
            WireKitError::NodeFailed { node_id: node_id.to_string(), source: Box::new(e) }
        })?;

        let declared = node.output_pins().len();
        if outputs.len() != declared {
            return Err(WireKitError::Runtime(format!(
                "Node '{node_id}' ({kind}) returned {} outputs but declares {declared}",
                outputs.len()
            )));
        }
        tracing::debug!(node_id, kind, elapsed_secs = start.elapsed().as_secs_f64(), "Node executed");
        Ok(outputs)
    }
}

/// Creates every node of the graph and checks links against the producers' output pins.
fn instantiate(
    graph: &GraphDefinition,
    registry: &NodeRegistry,
) -> Result<HashMap<String, Box<dyn ExecutableNode>>, WireKitError> {
    let mut nodes: HashMap<String, Box<dyn ExecutableNode>> = HashMap::new();
    for (id, spec) in &graph.nodes {
        let params = spec.literal_params();
        let node = registry.create_node(&spec.kind, Some(&params)).map_err(|e| {
            tracing::error!(node_id = %id, kind = %spec.kind, error = %e, "Failed to create node");
            WireKitError::Configuration(format!(
                "Failed to create node '{id}' ({}): {e}",
                spec.kind
            ))
        })?;
        nodes.insert(id.clone(), node);
    }

    for (id, spec) in &graph.nodes {
        for (input, link) in spec.links() {
            let available = nodes.get(&link.node).map_or(0, |n| n.output_pins().len());
            if link.output >= available {
                return Err(WireKitError::Configuration(format!(
                    "Node '{id}' input '{input}' links to output {} of '{}', which has {available} outputs",
                    link.output, link.node
                )));
            }
        }
    }

    Ok(nodes)
}
