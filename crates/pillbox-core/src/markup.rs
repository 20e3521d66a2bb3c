// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Minimal inline markup for literal text runs.
//!
//! Recognises `**bold**`, `*italic*`, `` `code` `` and line breaks.  Markers
//! never span lines and match non-greedily; anything unmatched stays plain
//! text.  This is deliberately not a markdown parser.

use std::sync::OnceLock;

use regex::Regex;

/// One styled run of literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inline<'a> {
    Text(&'a str),
    Bold(&'a str),
    Italic(&'a str),
    Code(&'a str),
    LineBreak,
}

fn markup_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*|\*(.*?)\*|`(.*?)`|\n").unwrap())
}

/// Split `text` into styled runs.
pub fn parse_inline(text: &str) -> Vec<Inline<'_>> {
    let mut out = Vec::new();
    let mut cursor = 0;

    for caps in markup_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > cursor {
            out.push(Inline::Text(&text[cursor..whole.start()]));
        }
        let run = if let Some(m) = caps.get(1) {
            Inline::Bold(m.as_str())
        } else if let Some(m) = caps.get(2) {
            Inline::Italic(m.as_str())
        } else if let Some(m) = caps.get(3) {
            Inline::Code(m.as_str())
        } else {
            Inline::LineBreak
        };
        out.push(run);
        cursor = whole.end();
    }

    if cursor < text.len() {
        out.push(Inline::Text(&text[cursor..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_each_marker() {
        assert_eq!(
            parse_inline("a **b** *c* `d`\ne"),
            vec![
                Inline::Text("a "),
                Inline::Bold("b"),
                Inline::Text(" "),
                Inline::Italic("c"),
                Inline::Text(" "),
                Inline::Code("d"),
                Inline::LineBreak,
                Inline::Text("e"),
            ]
        );
    }

    #[test]
    fn unmatched_markers_stay_plain() {
        assert_eq!(parse_inline("2 * 3"), vec![Inline::Text("2 * 3")]);
        assert_eq!(parse_inline("tick ` only"), vec![Inline::Text("tick ` only")]);
    }

    #[test]
    fn markers_do_not_cross_lines() {
        assert_eq!(
            parse_inline("*a\nb*"),
            vec![Inline::Text("*a"), Inline::LineBreak, Inline::Text("b*")]
        );
    }

    #[test]
    fn empty_text_has_no_runs() {
        assert!(parse_inline("").is_empty());
    }
}
