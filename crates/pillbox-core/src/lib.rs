// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Inline reference core: the command registry, the `[Action]` / `@mention`
//! tokenizer and the candidate picker that inserts action references.

pub mod commands;
mod error;
pub mod expand;
pub mod markup;
pub mod picker;
pub mod tokenizer;

pub use commands::{Command, CommandRegistry};
pub use error::PickerError;
pub use expand::expand_actions;
pub use markup::{parse_inline, Inline};
pub use picker::{
    clamp_selection, filter, select_at, CloseReason, Picker, PickerEvent, Selection,
    SelectionNotifier, DEFAULT_CLOSE_DELAY,
};
pub use tokenizer::{fallback_command_id, tokenize, Segment, SegmentKind};
