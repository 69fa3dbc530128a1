// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! engine: The graph execution engine for WireKit.
//! This crate schedules graph nodes in dependency order, including the ordering implied by
//! wireless channels, and runs them against a shared channel registry.

use std::sync::{Arc, PoisonError, RwLock};
use tokio_util::sync::CancellationToken;
use wirekit_api::GraphDefinition;
use wirekit_core::registry::NodeRegistry;
use wirekit_core::{ChannelRegistry, WireKitError};

// --- Public Modules ---

pub mod cache;
pub mod config;
pub mod constants;
pub mod executor;
pub mod topology;
pub mod wireless_order;

// Re-exports
pub use config::EngineConfig;
pub use executor::RunReport;
pub use topology::{DependencyTable, ExecutionList, PendingSetHook, ScheduleExtensions};
pub use wireless_order::{AugmentationSkipped, InstallOutcome, WirelessRole};

use cache::OutputCache;
use executor::GraphRun;

// --- Engine Struct ---

/// The main Engine struct, the entry point for running graphs.
///
/// One engine owns one channel registry for its whole lifetime; channel values written in
/// one run stay visible to later runs until they are overwritten or cleared.
pub struct Engine {
    pub registry: Arc<RwLock<NodeRegistry>>,
    channels: Arc<ChannelRegistry>,
    extensions: Arc<ScheduleExtensions>,
    cache: tokio::sync::Mutex<OutputCache>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// Creates a new engine with the built-in nodes and the default configuration.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// Creates a new engine with the built-in nodes.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut registry = NodeRegistry::new();
        wirekit_nodes::register_nodes(&mut registry);
        Self::with_registry(registry, config)
    }

    /// Creates an engine over a caller-provided registry (used to add custom nodes).
    pub fn with_registry(registry: NodeRegistry, config: EngineConfig) -> Self {
        let mut engine = Self {
            registry: Arc::new(RwLock::new(registry)),
            channels: Arc::new(ChannelRegistry::new()),
            extensions: Arc::new(ScheduleExtensions::new()),
            cache: tokio::sync::Mutex::new(OutputCache::new()),
            config,
        };
        if engine.config.wireless_ordering {
            engine.install_wireless_ordering();
        } else {
            tracing::warn!("Wireless ordering disabled; receivers may run before transmitters");
        }
        engine
    }

    /// Installs the wireless ordering hook. Calling it again is a no-op.
    pub fn install_wireless_ordering(&mut self) -> InstallOutcome {
        wireless_order::install(Arc::make_mut(&mut self.extensions))
    }

    /// Registers an extra pending-set hook under `marker`. Returns false if one is
    /// already installed under that marker.
    pub fn install_hook(&mut self, marker: &'static str, hook: Arc<dyn PendingSetHook>) -> bool {
        Arc::make_mut(&mut self.extensions).install(marker, hook)
    }

    pub const fn registry(&self) -> &Arc<RwLock<NodeRegistry>> {
        &self.registry
    }

    pub fn channels(&self) -> &Arc<ChannelRegistry> {
        &self.channels
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn extensions(&self) -> &ScheduleExtensions {
        &self.extensions
    }

    /// Runs `graph` to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The graph fails validation or a node cannot be created
    /// - The dependencies form a cycle (including one closed by a wireless channel)
    /// - A node fails; the error is [`WireKitError::NodeFailed`] wrapping the node's own error
    pub async fn run(&self, graph: &GraphDefinition) -> Result<RunReport, WireKitError> {
        self.run_inner(graph, None).await
    }

    /// Runs `graph`, stopping at the next node boundary once `token` is cancelled.
    ///
    /// Values already stored on channels by the partial run stay in the registry.
    ///
    /// # Errors
    ///
    /// As [`Engine::run`], plus [`WireKitError::Cancelled`].
    pub async fn run_with_cancellation(
        &self,
        graph: &GraphDefinition,
        token: &CancellationToken,
    ) -> Result<RunReport, WireKitError> {
        self.run_inner(graph, Some(token)).await
    }

    /// Forgets every cached node output; the next run executes every node.
    pub async fn clear_cache(&self) {
        self.cache.lock().await.clear();
    }

    async fn run_inner(
        &self,
        graph: &GraphDefinition,
        cancellation_token: Option<&CancellationToken>,
    ) -> Result<RunReport, WireKitError> {
        let registry = {
            let guard = self.registry.read().unwrap_or_else(PoisonError::into_inner);
            guard.clone()
        };

        if self.config.clear_channels_before_run {
            self.channels.clear();
        }

        let mut cache = self.cache.lock().await;
        GraphRun {
            graph,
            registry: &registry,
            channels: &self.channels,
            extensions: Arc::clone(&self.extensions),
            cache: self.config.output_cache.then_some(&mut *cache),
            cancellation_token,
        }
        .execute()
        .await
    }
}

#[cfg(test)]
mod tests;
