// SPDX-FileCopyrightText: © 2025 StreamKit Contributors
//
// SPDX-License-Identifier: MPL-2.0

//! Pin declarations used to validate graph bindings before execution.
//!
//! - [`InputPin`]: a named input, optionally required
//! - [`OutputPin`]: a named output slot; links address outputs by position

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Describes an input a node reads from its context.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InputPin {
    pub name: String,
    /// Required inputs must be bound (by a link or a literal) in the graph definition.
    pub required: bool,
}

impl InputPin {
    pub fn required(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: true }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self { name: name.into(), required: false }
    }
}

/// Describes an output slot. The slot index is the pin's position in `output_pins()`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct OutputPin {
    pub name: String,
}

impl OutputPin {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
