// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Expansion of action references into their command text.

use tracing::debug;

use crate::commands::CommandRegistry;
use crate::tokenizer::{tokenize, SegmentKind};

/// Re-emit `text` with every action reference that names a registered
/// command replaced by the command's expansion.
///
/// Unresolved action references, mentions and literal text are copied
/// verbatim.  Where references overlap, the one that starts first wins; the
/// part of a later reference that runs past it is copied verbatim, so no
/// source text is ever dropped.
pub fn expand_actions(text: &str, registry: &CommandRegistry) -> String {
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut expanded = 0usize;

    for segment in tokenize(text, registry) {
        if segment.span.start < cursor {
            if segment.span.end > cursor {
                out.push_str(&text[cursor..segment.span.end]);
                cursor = segment.span.end;
            }
            continue;
        }
        let command = match &segment.kind {
            SegmentKind::ActionRef { label, .. } => registry.by_name(label),
            _ => None,
        };
        match command {
            Some(cmd) => {
                out.push_str(cmd.expansion());
                expanded += 1;
            }
            None => out.push_str(segment.source(text)),
        }
        cursor = segment.span.end;
    }

    debug!(expanded, "expanded action references");
    out
}
