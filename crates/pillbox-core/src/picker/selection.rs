// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Selection index validation and the select-then-close notification protocol.
//!
//! Confirming a candidate produces two notifications, always in this order:
//!
//! 1. [`PickerEvent::Selected`]: sent synchronously, so the consumer can
//!    substitute the chosen reference into its text buffer.
//! 2. [`PickerEvent::Closed`]: sent after [`DEFAULT_CLOSE_DELAY`] (or the
//!    configured delay) from a fire-and-forget timer task.
//!
//! A consumer that tore the picker down on (1) could run its substitution
//! against state that no longer exists; the deferral gives the substitution
//! time to land first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

use crate::commands::Command;
use crate::error::PickerError;

/// Delay between the selection notification and the close notification.
pub const DEFAULT_CLOSE_DELAY: Duration = Duration::from_millis(10);

/// Validate `current` against the candidate list.
///
/// - Empty list → `None` ("no selection").
/// - `current` in bounds → unchanged.
/// - Otherwise (out of bounds, or no previous selection) → `Some(0)`.
pub fn clamp_selection<T>(candidates: &[T], current: Option<usize>) -> Option<usize> {
    if candidates.is_empty() {
        return None;
    }
    match current {
        Some(i) if i < candidates.len() => Some(i),
        _ => Some(0),
    }
}

/// A confirmed candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub index: usize,
    pub command: Arc<Command>,
}

/// Pick the candidate at `index`.
///
/// `index` is signed because keyboard intents from the host may step past
/// either end of the list; any index outside `0..len` is rejected with
/// [`PickerError::InvalidIndex`] and nothing is notified.
pub fn select_at(candidates: &[Arc<Command>], index: isize) -> Result<Selection, PickerError> {
    let invalid = PickerError::InvalidIndex { index, len: candidates.len() };
    let i = usize::try_from(index).map_err(|_| invalid.clone())?;
    let command = candidates.get(i).cloned().ok_or(invalid)?;
    Ok(Selection { index: i, command })
}

/// Why the picker closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A candidate was confirmed.
    Selected,
    /// The user dismissed the picker (e.g. Esc).
    Cancelled,
    /// An interaction outside the picker (e.g. a click elsewhere).
    OutsideInteraction,
}

/// Notifications delivered to the picker's consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerEvent {
    Selected { command_id: String },
    Closed(CloseReason),
}

/// Sends the two-step select-then-close notification for a [`Selection`].
#[derive(Debug, Clone)]
pub struct SelectionNotifier {
    tx: mpsc::UnboundedSender<PickerEvent>,
    close_delay: Duration,
}

impl SelectionNotifier {
    pub fn new(tx: mpsc::UnboundedSender<PickerEvent>, close_delay: Duration) -> Self {
        Self { tx, close_delay }
    }

    /// Notify the selection now and schedule the close notification.
    ///
    /// Must be called from within a Tokio runtime.  The close timer is not
    /// cancellable.
    pub fn notify(&self, selection: &Selection) {
        let command_id = selection.command.id().to_string();
        debug!(command_id = %command_id, index = selection.index, "candidate selected");
        if self.tx.send(PickerEvent::Selected { command_id }).is_err() {
            debug!("picker event receiver dropped; skipping close notification");
            return;
        }

        let tx = self.tx.clone();
        let delay = self.close_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(PickerEvent::Closed(CloseReason::Selected));
        });
    }
}
