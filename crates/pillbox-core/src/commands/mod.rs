// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Action commands that can be referenced inline as `[Name]`.
//!
//! A [`Command`] is plain data: a stable id, the display name used inside the
//! brackets, a one-line description for the picker, and the expansion text
//! that is substituted when the command is invoked.  Commands are collected in
//! a [`CommandRegistry`] which is built once and shared behind an `Arc`.

pub mod builtin;
pub mod registry;

pub use registry::CommandRegistry;

use serde::Serialize;

/// A command that can be referenced from chat text and picked from the popover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Command {
    id: String,
    name: String,
    description: String,
    expansion: String,
}

impl Command {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            expansion: expansion.into(),
        }
    }

    /// Stable, opaque identifier (e.g. `"compact"`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name, written between the brackets of an action reference.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-line description shown in the picker.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Text substituted for the command when it is invoked.
    pub fn expansion(&self) -> &str {
        &self.expansion
    }
}
