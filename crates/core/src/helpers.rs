// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Helper functions for parsing node configuration from a node's literal inputs.

/// Configuration parsing used by node factories.
pub mod config_helpers {
    use crate::error::WireKitError;
    use serde::Deserialize;

    /// Parses configuration, falling back to defaults when absent or malformed.
    ///
    /// # Errors
    ///
    /// Never returns an error in practice; the `Result` keeps the call sites uniform.
    pub fn parse_config_optional<T>(params: Option<&serde_json::Value>) -> Result<T, WireKitError>
    where
        T: for<'de> Deserialize<'de> + Default,
    {
        Ok(serde_json::from_value(params.unwrap_or(&serde_json::Value::Null).clone())
            .unwrap_or_default())
    }

    /// Parses configuration with the node kind in the error message.
    ///
    /// # Errors
    ///
    /// Returns `WireKitError::Configuration` if `params` is `None` or deserialization fails.
    pub fn parse_config_with_context<T>(
        params: Option<&serde_json::Value>,
        context: &str,
    ) -> Result<T, WireKitError>
    where
        T: for<'de> Deserialize<'de>,
    {
        params.map_or_else(
            || Err(WireKitError::Configuration(format!("{context} configuration required"))),
            |p| {
                serde_json::from_value(p.clone()).map_err(|e| {
                    WireKitError::Configuration(format!("Failed to parse {context}: {e}"))
                })
            },
        )
    }
}
