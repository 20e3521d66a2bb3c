// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Built-in action commands, in declaration order.

use super::Command;

pub fn builtin_commands() -> Vec<Command> {
    vec![
        Command::new(
            "compact",
            "Compact",
            "Compact the conversation to reduce context size",
            "Please compact this conversation",
        ),
        Command::new(
            "summarize",
            "Summarize",
            "Summarize the conversation so far",
            "Please summarize our conversation so far",
        ),
        Command::new(
            "explain",
            "Explain",
            "Explain the referenced code step by step",
            "Please explain how this code works, step by step",
        ),
        Command::new(
            "review",
            "Review",
            "Review recent changes for bugs and style issues",
            "Please review the recent changes for bugs and style issues",
        ),
    ]
}
