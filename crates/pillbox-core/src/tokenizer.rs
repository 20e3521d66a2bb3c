// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Inline reference tokenizer.
//!
//! Splits free-form chat text into literal runs and two kinds of typed
//! references:
//!
//! - `[Action Label]`: an action reference, resolved against the
//!   [`CommandRegistry`] by case-insensitive name.
//! - `@path/to/file`: a mention of a file; everything after `@` up to the
//!   next whitespace character.
//!
//! Each pattern family is scanned by its own lazy match producer.  The two
//! producers are merged on start offset and folded into the final segment
//! list, so nothing outside [`tokenize`] ever observes a partial result.
//!
//! An action match and a mention match can overlap (e.g. `@[x]`, where the
//! mention swallows the brackets).  Both are kept and emitted in start order;
//! precedence for that combination is intentionally left undecided.

use std::iter::Peekable;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::trace;

use crate::commands::CommandRegistry;

// ── Segments ──────────────────────────────────────────────────────────────────

/// What a [`Segment`] represents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SegmentKind {
    /// Plain text between references.
    Literal { text: String },
    /// `[label]`: `command_id` is the id of the command whose name matches
    /// `label`, or [`fallback_command_id`] when no command matches.
    ActionRef { label: String, command_id: String },
    /// `@file_name`: no existence check is performed.
    MentionRef { file_name: String },
}

/// One classified run of the source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    #[serde(flatten)]
    pub kind: SegmentKind,
    /// Byte range of the source text this segment was produced from.
    pub span: Range<usize>,
}

impl Segment {
    fn literal(text: &str, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Literal { text: text[span.clone()].to_string() },
            span,
        }
    }

    /// The slice of `source` this segment covers.
    ///
    /// `source` must be the string the segment was tokenized from.
    pub fn source<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, SegmentKind::Literal { .. })
    }
}

// ── Match producers ───────────────────────────────────────────────────────────

fn action_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]+)\]").unwrap())
}

fn mention_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(\S+)").unwrap())
}

fn whitespace_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").unwrap())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefKind {
    Action,
    Mention,
}

/// A raw pattern hit before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RefMatch<'t> {
    kind: RefKind,
    span: Range<usize>,
    capture: &'t str,
}

fn matches_of<'t>(
    kind: RefKind,
    pattern: &'static Regex,
    text: &'t str,
) -> impl Iterator<Item = RefMatch<'t>> + 't {
    pattern.captures_iter(text).filter_map(move |caps| {
        let whole = caps.get(0)?;
        let capture = caps.get(1)?;
        Some(RefMatch { kind, span: whole.range(), capture: capture.as_str() })
    })
}

fn action_matches(text: &str) -> impl Iterator<Item = RefMatch<'_>> {
    matches_of(RefKind::Action, action_pattern(), text)
}

fn mention_matches(text: &str) -> impl Iterator<Item = RefMatch<'_>> {
    matches_of(RefKind::Mention, mention_pattern(), text)
}

/// Merge two start-ordered match streams into one start-ordered stream.
///
/// On equal start offsets the left stream goes first.  The two pattern
/// families begin with different characters so this never happens in
/// practice.
struct MergeByStart<A: Iterator, B: Iterator> {
    left: Peekable<A>,
    right: Peekable<B>,
}

impl<'t, A, B> Iterator for MergeByStart<A, B>
where
    A: Iterator<Item = RefMatch<'t>>,
    B: Iterator<Item = RefMatch<'t>>,
{
    type Item = RefMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let take_right = match (self.left.peek(), self.right.peek()) {
            (Some(l), Some(r)) => r.span.start < l.span.start,
            (None, Some(_)) => true,
            _ => false,
        };
        if take_right {
            self.right.next()
        } else {
            self.left.next()
        }
    }
}

fn merge_by_start<'t, A, B>(left: A, right: B) -> MergeByStart<A, B>
where
    A: Iterator<Item = RefMatch<'t>>,
    B: Iterator<Item = RefMatch<'t>>,
{
    MergeByStart { left: left.peekable(), right: right.peekable() }
}

// ── Resolution ────────────────────────────────────────────────────────────────

/// Id used for an action label that matches no registered command:
/// the label lower-cased, with every whitespace run replaced by one `-`.
///
/// `"Totally Unknown Thing"` → `"totally-unknown-thing"`.
pub fn fallback_command_id(label: &str) -> String {
    whitespace_run().replace_all(&label.to_lowercase(), "-").into_owned()
}

fn resolve(m: RefMatch<'_>, registry: &CommandRegistry) -> Segment {
    let kind = match m.kind {
        RefKind::Action => {
            let command_id = match registry.by_name(m.capture) {
                Some(cmd) => cmd.id().to_string(),
                None => fallback_command_id(m.capture),
            };
            SegmentKind::ActionRef { label: m.capture.to_string(), command_id }
        }
        RefKind::Mention => SegmentKind::MentionRef { file_name: m.capture.to_string() },
    };
    Segment { kind, span: m.span }
}

// ── Tokenizer ─────────────────────────────────────────────────────────────────

/// Split `text` into literal, action and mention segments in source order.
///
/// Never fails: text that does not form a reference stays literal.  The
/// result is never empty; an empty `text` yields a single empty literal.
/// When no two references overlap, the segments' spans tile `text` exactly.
///
/// Literal text is only emitted past the furthest end reached so far.  A
/// scanner that resets its position to the end of each match would emit a
/// trailing `Literal("c!")` for `@a[b]c!`, repeating text the mention already
/// covers; here no literal follows, because the mention ends last.
pub fn tokenize(text: &str, registry: &CommandRegistry) -> Vec<Segment> {
    let matches = merge_by_start(action_matches(text), mention_matches(text));

    let (mut segments, cursor) =
        matches.fold((Vec::new(), 0usize), |(mut segments, cursor), m| {
            if m.span.start > cursor {
                segments.push(Segment::literal(text, cursor..m.span.start));
            }
            let end = m.span.end;
            segments.push(resolve(m, registry));
            // Overlapping matches must not pull the cursor backwards.
            (segments, cursor.max(end))
        });

    if cursor < text.len() || segments.is_empty() {
        segments.push(Segment::literal(text, cursor..text.len()));
    }

    trace!(len = text.len(), segments = segments.len(), "tokenized text");
    segments
}
