// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! WireKit Core - Fundamental traits and data structures for dataflow graph nodes.
//!
//! ## Core Modules
//!
//! - [`types`]: The closed value model (scalars, lists, tensors)
//! - [`channels`]: Wireless channel registry for out-of-band value exchange
//! - [`fingerprint`]: Bounded-cost content hashes used for change detection
//! - [`node`]: ExecutableNode trait and execution context
//! - [`registry`]: Node factory and discovery system
//! - [`pins`]: Input/output declarations for graph validation
//! - [`error`]: Error types and handling
//! - [`helpers`]: Configuration parsing utilities
//!
//! ## Quick Start
//!
//! ```ignore
//! use wirekit_core::{ChannelRegistry, Value};
//! use std::sync::Arc;
//!
//! let channels = ChannelRegistry::new();
//! channels.store("latents", Arc::new(Value::Int(42)))?;
//! assert_eq!(*channels.retrieve("latents")?, Value::Int(42));
//! ```

// Re-export async_trait for use in node implementations
pub use async_trait::async_trait;

pub mod channels;
pub mod error;
pub mod fingerprint;
pub mod helpers;
pub mod node;
pub mod pins;
pub mod registry;
pub mod types;

/// Node kinds that take part in wireless channel exchange.
///
/// The engine's ordering pass recognises these kinds; the node crate registers them.
pub mod wireless_kinds {
    /// Stores its `data` input on channel `id` (the graph's "Wireless Input").
    pub const INPUT: &str = "wireless::input";
    /// Retrieves channel `id` (the graph's "Wireless Output").
    pub const OUTPUT: &str = "wireless::output";
    /// Transmits or receives depending on its `mode` literal.
    pub const RELAY: &str = "wireless::relay";
    pub const MANAGER: &str = "wireless::manager";
    pub const DEBUG: &str = "wireless::debug";

    /// Name of the literal input holding the channel id.
    pub const CHANNEL_INPUT: &str = "id";
    /// Name of the relay's literal input selecting transmit/receive.
    pub const MODE_INPUT: &str = "mode";
}

pub use channels::{ChannelError, ChannelRegistry, RegistryInfo};
pub use error::WireKitError;
pub use helpers::config_helpers;
pub use node::{CachePolicy, ExecutableNode, NodeContext, NodeFactory, NodeOutputs};
pub use pins::{InputPin, OutputPin};
pub use registry::{NodeDefinition, NodeRegistry, StaticPins};
pub use types::{ElementType, Tensor, TensorData, Value};
