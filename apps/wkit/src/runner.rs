// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Glue between the CLI and the engine: load a graph file, run it, summarise the result.

use anyhow::{anyhow, Context};
use std::path::Path;
use std::sync::PoisonError;
use tokio_util::sync::CancellationToken;
use wirekit_core::NodeDefinition;
use wirekit_engine::{Engine, EngineConfig, RunReport};

/// Loads the graph at `path` and runs it once on a fresh engine.
///
/// `token` aborts the run between nodes (or while a node is executing).
///
/// # Errors
///
/// Returns an error if the graph cannot be loaded or validated, or if the run fails.
pub async fn run_graph_file(
    engine_config: &EngineConfig,
    path: &Path,
    token: &CancellationToken,
) -> anyhow::Result<RunReport> {
    let graph = wirekit_api::load_path(path).map_err(|e| anyhow!(e))?;
    tracing::info!(
        path = %path.display(),
        name = graph.name.as_deref().unwrap_or("<unnamed>"),
        nodes = graph.nodes.len(),
        "Loaded graph"
    );

    let engine = Engine::with_config(engine_config.clone());
    engine
        .run_with_cancellation(&graph, token)
        .await
        .with_context(|| format!("Graph {} failed", path.display()))
}

/// Definitions of every node kind the runner can execute, sorted by kind.
pub fn node_definitions() -> Vec<NodeDefinition> {
    let engine = Engine::new();
    let registry = engine.registry().read().unwrap_or_else(PoisonError::into_inner);
    registry.definitions()
}

