// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: Apache-2.0
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Serde default helper: returns `true`.
///
/// `#[serde(default)]` on a `bool` always falls back to `false`, so a named
/// function is required for fields that are on unless switched off.
fn default_true() -> bool {
    true
}

fn default_trigger() -> char {
    '['
}

fn default_close_delay_ms() -> u64 {
    10
}

fn default_max_visible() -> usize {
    8
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub picker: PickerConfig,
    #[serde(default)]
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickerConfig {
    /// Character that opens the action picker while typing.
    #[serde(default = "default_trigger")]
    pub trigger: char,
    /// Delay between the selection notification and the close notification,
    /// in milliseconds.  Gives the consumer time to finish its text
    /// substitution before the picker goes away.
    #[serde(default = "default_close_delay_ms")]
    pub close_delay_ms: u64,
    /// Maximum number of candidates shown at once.
    #[serde(default = "default_max_visible")]
    pub max_visible: usize,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            close_delay_ms: default_close_delay_ms(),
            max_visible: default_max_visible(),
        }
    }
}

impl PickerConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Apply bold / italic / code / line-break markup to literal text.
    #[serde(default = "default_true")]
    pub markup: bool,
    /// Show the resolved command id next to each action pill.
    #[serde(default)]
    pub show_ids: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { markup: true, show_ids: false }
    }
}
