// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Action picker: query filtering, selection and the popover lifecycle.
//!
//! The picker is either `Closed` or `Open`.  Opening always starts with an
//! empty query, every command as a candidate and the first candidate
//! highlighted (or nothing, when the registry is empty).  Each query change
//! recomputes the candidate list from scratch and re-validates the selection
//! with [`clamp_selection`].  Any selection, cancel or outside interaction
//! returns the picker to `Closed`.

mod filter;
mod selection;

pub use filter::filter;
pub use selection::{
    clamp_selection, select_at, CloseReason, PickerEvent, Selection, SelectionNotifier,
    DEFAULT_CLOSE_DELAY,
};

use std::sync::Arc;

use tracing::debug;

use crate::commands::{Command, CommandRegistry};
use crate::error::PickerError;

/// State of an open picker.
#[derive(Debug, Clone)]
struct OpenPicker {
    query: String,
    candidates: Vec<Arc<Command>>,
    selected: Option<usize>,
    /// First visible candidate.
    scroll_offset: usize,
}

#[derive(Debug, Clone, Default)]
enum PickerState {
    #[default]
    Closed,
    Open(OpenPicker),
}

/// Lifecycle and navigation state of the action picker.
pub struct Picker {
    registry: Arc<CommandRegistry>,
    state: PickerState,
    /// Maximum number of candidates shown at once.
    max_visible: usize,
}

impl Picker {
    pub fn new(registry: Arc<CommandRegistry>, max_visible: usize) -> Self {
        Self { registry, state: PickerState::Closed, max_visible: max_visible.max(1) }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PickerState::Open(_))
    }

    /// `Closed -> Open`.  Re-opening an open picker resets it.
    pub fn open(&mut self) {
        let candidates = filter(self.registry.all(), "");
        let selected = clamp_selection(&candidates, None);
        debug!(candidates = candidates.len(), "picker opened");
        self.state = PickerState::Open(OpenPicker {
            query: String::new(),
            candidates,
            selected,
            scroll_offset: 0,
        });
    }

    /// `Open -> Closed`.  Closing a closed picker is a no-op.
    pub fn close(&mut self, reason: CloseReason) {
        if self.is_open() {
            debug!(?reason, "picker closed");
        }
        self.state = PickerState::Closed;
    }

    /// Apply a notification produced by a [`SelectionNotifier`].
    pub fn handle_event(&mut self, event: &PickerEvent) {
        if let PickerEvent::Closed(reason) = event {
            self.close(*reason);
        }
    }

    /// Replace the query, recompute candidates and re-validate the selection.
    pub fn set_query(&mut self, query: &str) -> Result<(), PickerError> {
        let PickerState::Open(open) = &mut self.state else {
            return Err(PickerError::NotOpen);
        };
        if open.query == query {
            return Ok(());
        }
        open.query = query.to_string();
        open.candidates = filter(self.registry.all(), query);
        open.selected = clamp_selection(&open.candidates, open.selected);
        debug!(query, candidates = open.candidates.len(), "picker query changed");
        self.adjust_scroll();
        Ok(())
    }

    pub fn query(&self) -> Option<&str> {
        match &self.state {
            PickerState::Open(open) => Some(&open.query),
            PickerState::Closed => None,
        }
    }

    /// Current candidates; empty while closed.
    pub fn candidates(&self) -> &[Arc<Command>] {
        match &self.state {
            PickerState::Open(open) => &open.candidates,
            PickerState::Closed => &[],
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match &self.state {
            PickerState::Open(open) => open.selected,
            PickerState::Closed => None,
        }
    }

    /// Move the highlight down by one, wrapping to the top.
    pub fn select_next(&mut self) {
        if let PickerState::Open(open) = &mut self.state {
            let len = open.candidates.len();
            if len == 0 {
                return;
            }
            open.selected = Some(open.selected.map_or(0, |i| (i + 1) % len));
        }
        self.adjust_scroll();
    }

    /// Move the highlight up by one, wrapping to the bottom.
    pub fn select_prev(&mut self) {
        if let PickerState::Open(open) = &mut self.state {
            let len = open.candidates.len();
            if len == 0 {
                return;
            }
            open.selected = Some(
                open.selected
                    .and_then(|i| i.checked_sub(1))
                    .unwrap_or(len - 1),
            );
        }
        self.adjust_scroll();
    }

    /// Highlight `index` directly (e.g. from a pointer hover).
    pub fn highlight(&mut self, index: usize) -> Result<(), PickerError> {
        let PickerState::Open(open) = &mut self.state else {
            return Err(PickerError::NotOpen);
        };
        if index >= open.candidates.len() {
            return Err(PickerError::InvalidIndex {
                index: index as isize,
                len: open.candidates.len(),
            });
        }
        open.selected = Some(index);
        self.adjust_scroll();
        Ok(())
    }

    /// Confirm the highlighted candidate.
    ///
    /// The picker stays open; it closes when the caller feeds back the
    /// deferred [`PickerEvent::Closed`] from [`SelectionNotifier::notify`].
    pub fn confirm(&self) -> Result<Selection, PickerError> {
        let PickerState::Open(open) = &self.state else {
            return Err(PickerError::NotOpen);
        };
        let index = open.selected.ok_or(PickerError::NoSelection)?;
        select_at(&open.candidates, index as isize)
    }

    /// The visible window of candidates and the index of its first entry.
    pub fn visible(&self) -> (usize, &[Arc<Command>]) {
        match &self.state {
            PickerState::Open(open) => {
                let end = (open.scroll_offset + self.max_visible).min(open.candidates.len());
                let start = open.scroll_offset.min(end);
                (start, &open.candidates[start..end])
            }
            PickerState::Closed => (0, &[]),
        }
    }

    fn adjust_scroll(&mut self) {
        let max_visible = self.max_visible;
        let PickerState::Open(open) = &mut self.state else {
            return;
        };
        let Some(selected) = open.selected else {
            open.scroll_offset = 0;
            return;
        };
        if selected < open.scroll_offset {
            open.scroll_offset = selected;
        } else if selected >= open.scroll_offset + max_visible {
            open.scroll_offset = selected + 1 - max_visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(n: usize) -> Arc<CommandRegistry> {
        Arc::new(CommandRegistry::from_commands((0..n).map(|i| {
            Command::new(format!("cmd{i:02}"), format!("Item {i:02}"), format!("desc {i}"), "")
        })))
    }

    #[test]
    fn starts_closed_with_no_candidates() {
        let picker = Picker::new(registry(3), 8);
        assert!(!picker.is_open());
        assert!(picker.candidates().is_empty());
        assert_eq!(picker.selected(), None);
        assert!(matches!(picker.confirm(), Err(PickerError::NotOpen)));
    }

    #[test]
    fn open_lists_everything_with_first_selected() {
        let mut picker = Picker::new(registry(3), 8);
        picker.open();
        assert_eq!(picker.query(), Some(""));
        assert_eq!(picker.candidates().len(), 3);
        assert_eq!(picker.selected(), Some(0));
    }

    #[test]
    fn open_on_empty_registry_has_no_selection() {
        let mut picker = Picker::new(Arc::new(CommandRegistry::empty()), 8);
        picker.open();
        assert_eq!(picker.selected(), None);
        assert_eq!(picker.confirm(), Err(PickerError::NoSelection));
    }

    #[test]
    fn query_change_resets_out_of_bounds_selection() {
        let mut picker = Picker::new(registry(12), 8);
        picker.open();
        for _ in 0..5 {
            picker.select_next();
        }
        assert_eq!(picker.selected(), Some(5));
        // Only "Item 10" and "Item 11" contain "item 1".
        picker.set_query("item 1").unwrap();
        assert_eq!(picker.candidates().len(), 2);
        assert_eq!(picker.selected(), Some(0));
    }

    #[test]
    fn query_change_keeps_in_bounds_selection() {
        let mut picker = Picker::new(registry(12), 8);
        picker.open();
        picker.select_next();
        picker.set_query("item").unwrap();
        assert_eq!(picker.selected(), Some(1));
    }

    #[test]
    fn no_match_means_no_selection() {
        let mut picker = Picker::new(registry(3), 8);
        picker.open();
        picker.set_query("zz-no-match").unwrap();
        assert!(picker.candidates().is_empty());
        assert_eq!(picker.selected(), None);
        picker.select_next();
        assert_eq!(picker.selected(), None);
    }

    #[test]
    fn set_query_while_closed_fails() {
        let mut picker = Picker::new(registry(3), 8);
        assert_eq!(picker.set_query("x"), Err(PickerError::NotOpen));
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut picker = Picker::new(registry(3), 8);
        picker.open();
        picker.select_prev();
        assert_eq!(picker.selected(), Some(2));
        picker.select_next();
        assert_eq!(picker.selected(), Some(0));
    }

    #[test]
    fn confirm_returns_highlighted_command() {
        let mut picker = Picker::new(registry(3), 8);
        picker.open();
        picker.select_next();
        let sel = picker.confirm().unwrap();
        assert_eq!(sel.index, 1);
        assert_eq!(sel.command.id(), "cmd01");
        assert!(picker.is_open(), "confirm must not close synchronously");
    }

    #[test]
    fn closed_event_closes_and_reopen_resets() {
        let mut picker = Picker::new(registry(3), 8);
        picker.open();
        picker.set_query("02").unwrap();
        picker.handle_event(&PickerEvent::Selected { command_id: "cmd02".into() });
        assert!(picker.is_open());
        picker.handle_event(&PickerEvent::Closed(CloseReason::Selected));
        assert!(!picker.is_open());

        picker.open();
        assert_eq!(picker.query(), Some(""));
        assert_eq!(picker.candidates().len(), 3);
        assert_eq!(picker.selected(), Some(0));
    }

    #[test]
    fn highlight_rejects_out_of_bounds() {
        let mut picker = Picker::new(registry(2), 8);
        picker.open();
        assert!(picker.highlight(1).is_ok());
        assert_eq!(picker.selected(), Some(1));
        assert_eq!(picker.highlight(2), Err(PickerError::InvalidIndex { index: 2, len: 2 }));
    }

    #[test]
    fn scroll_follows_selection() {
        let mut picker = Picker::new(registry(20), 5);
        picker.open();
        for _ in 0..6 {
            picker.select_next();
        }
        let (offset, visible) = picker.visible();
        assert_eq!(visible.len(), 5);
        assert!(offset <= 6 && 6 < offset + 5);

        picker.select_prev();
        picker.select_prev();
        picker.select_prev();
        picker.select_prev();
        picker.select_prev();
        picker.select_prev();
        assert_eq!(picker.visible().0, 0);
    }
}
