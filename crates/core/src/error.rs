// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Structured error types for WireKit.
//!
//! Node implementations and the engine surface failures through [`WireKitError`].
//! Channel registry failures keep their own type ([`ChannelError`]) so callers
//! can match on them, and convert into [`WireKitError::Channel`] with `?`.

use crate::channels::ChannelError;
use thiserror::Error;

/// Main error type for WireKit operations.
#[derive(Debug, Error)]
pub enum WireKitError {
    /// Configuration or graph validation error.
    ///
    /// Examples:
    /// - Invalid node parameters (unknown relay mode, missing channel id)
    /// - Links pointing at nodes that do not exist
    /// - Dependency cycles (including cycles closed by wireless edges)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Runtime processing error raised while a node executes.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Wireless channel registry error (empty id, channel never written).
    #[error(transparent)]
    Channel(#[from] ChannelError),

    /// A node failed while executing; `source` is the node's own error.
    #[error("Node '{node_id}' failed: {source}")]
    NodeFailed {
        node_id: String,
        #[source]
        source: Box<WireKitError>,
    },

    /// The run was cancelled by the host before every node executed.
    #[error("Execution cancelled: {0}")]
    Cancelled(String),
}

impl From<WireKitError> for String {
    fn from(err: WireKitError) -> Self {
        err.to_string()
    }
}

// Generic string errors default to Runtime
impl From<String> for WireKitError {
    fn from(s: String) -> Self {
        Self::Runtime(s)
    }
}

impl From<&str> for WireKitError {
    fn from(s: &str) -> Self {
        Self::Runtime(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WireKitError::Configuration("unknown relay mode 'x'".to_string());
        assert_eq!(err.to_string(), "Configuration error: unknown relay mode 'x'");

        let err = WireKitError::NodeFailed {
            node_id: "rx".to_string(),
            source: Box::new(WireKitError::Channel(ChannelError::InvalidChannel)),
        };
        assert_eq!(err.to_string(), "Node 'rx' failed: Wireless channel id cannot be empty");

        let err = WireKitError::Cancelled("stopped by host".to_string());
        assert_eq!(err.to_string(), "Execution cancelled: stopped by host");
    }

    #[test]
    fn test_channel_error_is_transparent() {
        let err: WireKitError = ChannelError::InvalidChannel.into();
        assert_eq!(err.to_string(), ChannelError::InvalidChannel.to_string());
        assert!(matches!(err, WireKitError::Channel(ChannelError::InvalidChannel)));
    }

    #[test]
    fn test_string_to_error_conversion() {
        let err: WireKitError = "Something went wrong".into();
        assert_eq!(err.to_string(), "Runtime error: Something went wrong");

        let s: String = WireKitError::Runtime("boom".to_string()).into();
        assert_eq!(s, "Runtime error: boom");
    }
}
