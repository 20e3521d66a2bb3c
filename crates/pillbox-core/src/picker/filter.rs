// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Candidate filtering for the action picker.
//!
//! Matching is a plain case-insensitive substring test against the command
//! name or description; there is no fuzzy scoring.  The retained commands are
//! always sorted by name, whether or not a query was given.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::commands::Command;

/// Collation used for candidate names: case-insensitive first, with the
/// exact string as a deterministic tie-break.
///
/// Ordering is by Unicode scalar value after lower-casing, not by locale:
/// accented initials sort after ASCII ones (`Zed` before `Éclair`).
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn matches_query(cmd: &Command, query_lc: &str) -> bool {
    cmd.name().to_lowercase().contains(query_lc)
        || cmd.description().to_lowercase().contains(query_lc)
}

/// Return the commands matching `query`, sorted by name.
///
/// An empty query retains every command.  The sort is stable, so commands
/// that collate equal keep their registry order.  Names with non-ASCII
/// initials are not ordered the way a locale-aware collator would order them.
pub fn filter(commands: &[Arc<Command>], query: &str) -> Vec<Arc<Command>> {
    let query_lc = query.to_lowercase();
    let mut retained: Vec<Arc<Command>> = commands
        .iter()
        .filter(|cmd| query_lc.is_empty() || matches_query(cmd, &query_lc))
        .cloned()
        .collect();
    retained.sort_by(|a, b| collate(a.name(), b.name()));
    retained
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn commands() -> Vec<Arc<Command>> {
        [
            ("review", "Review", "Review recent changes"),
            ("compact", "Compact", "Compact the conversation"),
            ("explain", "explain", "Explain the code"),
            ("summarize", "Summarize", "Summarize the conversation so far"),
        ]
        .into_iter()
        .map(|(id, name, desc)| Arc::new(Command::new(id, name, desc, "")))
        .collect()
    }

    fn ids(list: &[Arc<Command>]) -> Vec<&str> {
        list.iter().map(|c| c.id()).collect()
    }

    #[test]
    fn empty_query_returns_all_sorted_by_name() {
        let all = commands();
        assert_eq!(ids(&filter(&all, "")), ["compact", "explain", "review", "summarize"]);
    }

    #[test]
    fn query_matches_name_or_description_case_insensitively() {
        let all = commands();
        assert_eq!(ids(&filter(&all, "CONVERSATION")), ["compact", "summarize"]);
        assert_eq!(ids(&filter(&all, "rev")), ["review"]);
        assert_eq!(ids(&filter(&all, "code")), ["explain"]);
    }

    #[test]
    fn no_match_returns_empty() {
        assert!(filter(&commands(), "zz-no-match").is_empty());
        assert!(filter(&[], "anything").is_empty());
    }

    #[test]
    fn longer_query_never_adds_candidates() {
        let all = commands();
        let pairs = [("", "c"), ("c", "co"), ("co", "con"), ("con", "conversation"), ("e", "ex")];
        for (short, long) in pairs {
            let wide = ids(&filter(&all, short)).into_iter().map(String::from).collect::<Vec<_>>();
            for id in ids(&filter(&all, long)) {
                assert!(wide.iter().any(|w| w == id), "{id} for {long:?} missing from {short:?}");
            }
        }
    }

    #[test]
    fn collate_ties_are_deterministic() {
        assert_eq!(collate("alpha", "Beta"), Ordering::Less);
        assert_eq!(collate("Alpha", "alpha"), Ordering::Less);
        assert_eq!(collate("same", "same"), Ordering::Equal);
    }

    #[test]
    fn non_ascii_initials_sort_after_ascii() {
        assert_eq!(collate("Zed", "Éclair"), Ordering::Less);
    }

    proptest! {
        #[test]
        fn extending_query_never_adds_candidates(short in "[a-z ]{0,4}", suffix in "[a-z ]{0,3}") {
            let all = commands();
            let long = format!("{short}{suffix}");
            let wide = filter(&all, &short);
            let wide = ids(&wide);
            for id in ids(&filter(&all, &long)) {
                prop_assert!(wide.contains(&id));
            }
        }

        #[test]
        fn result_is_sorted_by_name(query in "[a-z]{0,2}") {
            let retained = filter(&commands(), &query);
            prop_assert!(retained
                .windows(2)
                .all(|w| collate(w[0].name(), w[1].name()) != Ordering::Greater));
        }
    }
}
