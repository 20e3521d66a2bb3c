// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Segment rendering: literal text inline, references as pills.
//!
//! Segments are first flattened into [`Run`]s (literal text goes through the
//! inline markup pass when enabled), then drawn by one of two backends:
//! ratatui [`Text`] for the interactive composer, or an ANSI string for
//! plain terminal output.

use crossterm::style::Stylize;
use pillbox_config::RenderConfig;
use pillbox_core::{parse_inline, Inline, Segment, SegmentKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const ACTION_ICON: &str = "⚡";

/// A drawable piece of a rendered message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Run<'a> {
    Plain(&'a str),
    Bold(&'a str),
    Italic(&'a str),
    Code(&'a str),
    LineBreak,
    Action { label: &'a str, command_id: &'a str },
    Mention { file_name: &'a str },
}

fn push_literal<'a>(runs: &mut Vec<Run<'a>>, text: &'a str, markup: bool) {
    if !markup {
        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            if !first.is_empty() {
                runs.push(Run::Plain(first));
            }
        }
        for line in lines {
            runs.push(Run::LineBreak);
            if !line.is_empty() {
                runs.push(Run::Plain(line));
            }
        }
        return;
    }
    runs.extend(parse_inline(text).into_iter().map(|inline| match inline {
        Inline::Text(t) => Run::Plain(t),
        Inline::Bold(t) => Run::Bold(t),
        Inline::Italic(t) => Run::Italic(t),
        Inline::Code(t) => Run::Code(t),
        Inline::LineBreak => Run::LineBreak,
    }));
}

/// Flatten segments into drawable runs.
pub fn runs<'a>(segments: &'a [Segment], opts: &RenderConfig) -> Vec<Run<'a>> {
    let mut out = Vec::new();
    for segment in segments {
        match &segment.kind {
            SegmentKind::Literal { text } => push_literal(&mut out, text, opts.markup),
            SegmentKind::ActionRef { label, command_id } => {
                out.push(Run::Action { label, command_id })
            }
            SegmentKind::MentionRef { file_name } => out.push(Run::Mention { file_name }),
        }
    }
    out
}

fn action_pill_text(label: &str, command_id: &str, opts: &RenderConfig) -> String {
    if opts.show_ids {
        format!(" {ACTION_ICON} {label} ({command_id}) ")
    } else {
        format!(" {ACTION_ICON} {label} ")
    }
}

// ── ratatui backend ───────────────────────────────────────────────────────────

fn action_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn mention_style() -> Style {
    Style::default().fg(Color::Black).bg(Color::Magenta)
}

/// Render segments as ratatui text, one [`Line`] per line break.
pub fn to_text(segments: &[Segment], opts: &RenderConfig) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for run in runs(segments, opts) {
        let span = match run {
            Run::LineBreak => {
                lines.push(Line::from(std::mem::take(&mut current)));
                continue;
            }
            Run::Plain(t) => Span::raw(t.to_string()),
            Run::Bold(t) => Span::styled(t.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Run::Italic(t) => {
                Span::styled(t.to_string(), Style::default().add_modifier(Modifier::ITALIC))
            }
            Run::Code(t) => Span::styled(t.to_string(), Style::default().fg(Color::Yellow)),
            Run::Action { label, command_id } => {
                Span::styled(action_pill_text(label, command_id, opts), action_style())
            }
            Run::Mention { file_name } => {
                Span::styled(format!(" @{file_name} "), mention_style())
            }
        };
        current.push(span);
    }
    lines.push(Line::from(current));
    Text::from(lines)
}

// ── ANSI backend ──────────────────────────────────────────────────────────────

/// Render segments as a string with ANSI styling for plain terminal output.
pub fn to_ansi(segments: &[Segment], opts: &RenderConfig) -> String {
    let mut out = String::new();
    for run in runs(segments, opts) {
        let piece = match run {
            Run::Plain(t) => t.to_string(),
            Run::Bold(t) => t.bold().to_string(),
            Run::Italic(t) => t.italic().to_string(),
            Run::Code(t) => t.yellow().to_string(),
            Run::LineBreak => "\n".to_string(),
            Run::Action { label, command_id } => action_pill_text(label, command_id, opts)
                .black()
                .on_cyan()
                .bold()
                .to_string(),
            Run::Mention { file_name } => format!(" @{file_name} ").black().on_magenta().to_string(),
        };
        out.push_str(&piece);
    }
    out
}
