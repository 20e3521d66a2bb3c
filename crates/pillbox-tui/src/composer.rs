// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Interactive single-line composer hosting the action picker.
//!
//! Typing the trigger character opens the picker; everything typed between
//! the trigger and the cursor becomes the live query.  Up/Down/Tab move the
//! highlight, Enter confirms, Esc cancels.  Confirming goes through the
//! two-step notification protocol: the `Selected` event replaces the trigger
//! and query with `[Name] ` in the buffer, and the deferred `Closed` event
//! then closes the picker.
//!
//! The composer draws into an inline ratatui viewport below the shell
//! prompt: the raw input line, a pill preview of the buffer, and the picker
//! popover when open.  Mouse capture and focus reporting are enabled for the
//! session: clicking a candidate confirms it, while a click elsewhere or the
//! terminal losing focus dismisses the picker.

use std::sync::Arc;

use crossterm::event::{
    DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use futures::StreamExt;
use pillbox_config::Config;
use pillbox_core::{
    tokenize, CloseReason, CommandRegistry, Picker, PickerError, PickerEvent, SelectionNotifier,
};
use ratatui::layout::{Constraint, Layout, Margin, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::{DefaultTerminal, Frame, TerminalOptions, Viewport};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use unicode_width::UnicodeWidthStr;

use crate::render;

const PROMPT: &str = "> ";

/// Rows drawn besides the candidate list: input, preview and the popover border.
const CHROME_ROWS: u16 = 4;

fn viewport_height(max_visible: usize) -> u16 {
    u16::try_from(max_visible).unwrap_or(u16::MAX).saturating_add(CHROME_ROWS)
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Submit,
    Quit,
}

pub struct Composer {
    registry: Arc<CommandRegistry>,
    config: Config,
    picker: Picker,
    notifier: SelectionNotifier,
    events: mpsc::UnboundedReceiver<PickerEvent>,
    buffer: String,
    /// Byte offset of the cursor in `buffer`.
    cursor: usize,
    /// Byte offset of the trigger character that opened the picker.
    trigger_at: Option<usize>,
    /// Screen area of the popover as last drawn.
    picker_area: Option<Rect>,
}

impl Composer {
    pub fn new(registry: Arc<CommandRegistry>, config: Config) -> Self {
        let (tx, events) = mpsc::unbounded_channel();
        let notifier = SelectionNotifier::new(tx, config.picker.close_delay());
        let picker = Picker::new(registry.clone(), config.picker.max_visible);
        Self {
            registry,
            config,
            picker,
            notifier,
            events,
            buffer: String::new(),
            cursor: 0,
            trigger_at: None,
            picker_area: None,
        }
    }

    /// Run the composer until the user submits (returns the buffer) or quits
    /// (returns `None`).
    pub async fn run(mut self) -> anyhow::Result<Option<String>> {
        let height = viewport_height(self.config.picker.max_visible);
        let mut terminal = ratatui::init_with_options(TerminalOptions {
            viewport: Viewport::Inline(height),
        });
        if let Err(e) = execute!(std::io::stdout(), EnableMouseCapture, EnableFocusChange) {
            warn!("could not enable mouse capture: {e}");
        }
        let result = self.event_loop(&mut terminal).await;
        let _ = execute!(std::io::stdout(), DisableMouseCapture, DisableFocusChange);
        ratatui::restore();
        result
    }

    async fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<Option<String>> {
        let mut term_events = EventStream::new();

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                Some(event) = self.events.recv() => {
                    self.handle_picker_event(event);
                }
                term_event = term_events.next() => match term_event {
                    Some(Ok(event)) => match self.handle_term_event(event) {
                        Flow::Continue => {}
                        Flow::Submit => return Ok(Some(std::mem::take(&mut self.buffer))),
                        Flow::Quit => return Ok(None),
                    },
                    Some(Err(e)) => return Err(e.into()),
                    None => return Ok(None),
                },
            }
        }
    }

    // ── Event handling ────────────────────────────────────────────────────────

    fn handle_term_event(&mut self, event: Event) -> Flow {
        match event {
            Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k),
            Event::Mouse(m) if matches!(m.kind, MouseEventKind::Down(_)) => {
                self.handle_click(Position::new(m.column, m.row));
                Flow::Continue
            }
            Event::FocusLost => {
                self.dismiss(CloseReason::OutsideInteraction);
                Flow::Continue
            }
            _ => Flow::Continue,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        if self.picker.is_open() && self.trigger_at.is_some() {
            match key.code {
                KeyCode::Up | KeyCode::BackTab => {
                    self.picker.select_prev();
                    return Flow::Continue;
                }
                KeyCode::Down | KeyCode::Tab => {
                    self.picker.select_next();
                    return Flow::Continue;
                }
                KeyCode::Enter => {
                    self.confirm();
                    return Flow::Continue;
                }
                KeyCode::Esc => {
                    self.dismiss(CloseReason::Cancelled);
                    return Flow::Continue;
                }
                _ => {}
            }
        }

        match key.code {
            KeyCode::Enter => return Flow::Submit,
            KeyCode::Esc => return Flow::Quit,
            KeyCode::Char(c) if !ctrl => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Left => self.cursor = prev_char_boundary(&self.buffer, self.cursor),
            KeyCode::Right => self.cursor = next_char_boundary(&self.buffer, self.cursor),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.buffer.len(),
            _ => {}
        }
        self.sync_query();
        Flow::Continue
    }

    fn handle_click(&mut self, at: Position) {
        if !self.picker.is_open() {
            return;
        }
        let Some(area) = self.picker_area.filter(|area| area.contains(at)) else {
            self.dismiss(CloseReason::OutsideInteraction);
            return;
        };
        // Clicks on the border or below the last candidate are ignored.
        let list = area.inner(Margin::new(1, 1));
        if !list.contains(at) {
            return;
        }
        let (offset, visible) = self.picker.visible();
        let row = usize::from(at.y - list.y);
        if row >= visible.len() {
            return;
        }
        match self.picker.highlight(offset + row) {
            Ok(()) => self.confirm(),
            Err(e) => debug!("ignoring click on picker row {row}: {e}"),
        }
    }

    fn handle_picker_event(&mut self, event: PickerEvent) {
        if let PickerEvent::Selected { command_id } = &event {
            self.apply_selection(command_id);
        }
        self.picker.handle_event(&event);
    }

    fn confirm(&mut self) {
        match self.picker.confirm() {
            Ok(selection) => self.notifier.notify(&selection),
            Err(PickerError::NoSelection) => debug!("nothing to confirm"),
            Err(e) => warn!("picker confirm failed: {e}"),
        }
    }

    fn dismiss(&mut self, reason: CloseReason) {
        self.trigger_at = None;
        self.picker.close(reason);
    }

    // ── Buffer editing ────────────────────────────────────────────────────────

    fn insert_char(&mut self, c: char) {
        let at = self.cursor;
        self.buffer.insert(at, c);
        self.cursor += c.len_utf8();
        if c == self.config.picker.trigger && !self.picker.is_open() {
            self.trigger_at = Some(at);
            self.picker.open();
        }
    }

    fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let start = prev_char_boundary(&self.buffer, self.cursor);
        self.buffer.replace_range(start..self.cursor, "");
        self.cursor = start;
    }

    /// Feed the text between trigger and cursor to the picker, or close it
    /// when the cursor has left the query.
    fn sync_query(&mut self) {
        let Some(at) = self.trigger_at else { return };
        if !self.picker.is_open() {
            self.trigger_at = None;
            return;
        }
        let still_triggered = self.cursor > at
            && self.buffer[at..].starts_with(self.config.picker.trigger);
        let query_start = at + self.config.picker.trigger.len_utf8();
        let query = if still_triggered && self.cursor >= query_start {
            Some(&self.buffer[query_start..self.cursor])
        } else {
            None
        };
        match query {
            Some(q) if !q.contains(']') => {
                let q = q.to_string();
                if let Err(e) = self.picker.set_query(&q) {
                    warn!("picker query update failed: {e}");
                }
            }
            _ => self.dismiss(CloseReason::Cancelled),
        }
    }

    /// Replace the trigger and query with the chosen reference.
    fn apply_selection(&mut self, command_id: &str) {
        let Some(at) = self.trigger_at.take() else { return };
        let Some(command) = self.registry.by_id(command_id) else {
            warn!(command_id, "selected command is not registered");
            return;
        };
        let end = self.cursor.max(at);
        let reference = format!("[{}] ", command.name());
        self.buffer.replace_range(at..end, &reference);
        self.cursor = at + reference.len();
        debug!(command_id, "inserted action reference");
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let [input_area, preview_area, picker_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(frame.area());

        let input = Line::from(vec![
            Span::styled(PROMPT, Style::default().fg(Color::DarkGray)),
            Span::raw(self.buffer.as_str()),
        ]);
        frame.render_widget(Paragraph::new(input), input_area);

        let segments = tokenize(&self.buffer, &self.registry);
        let preview = render::to_text(&segments, &self.config.render);
        frame.render_widget(Paragraph::new(preview), preview_area);

        self.picker_area = None;
        if self.picker.is_open() {
            self.draw_picker(frame, picker_area);
            self.picker_area = Some(picker_area);
        }

        let x = PROMPT.width() + self.buffer[..self.cursor].width();
        frame.set_cursor_position((input_area.x + x.min(u16::MAX as usize) as u16, input_area.y));
    }

    fn draw_picker(&self, frame: &mut Frame, area: Rect) {
        let query = self.picker.query().unwrap_or_default();
        let title = if query.is_empty() {
            " Commands ".to_string()
        } else {
            format!(" Commands matching \"{query}\" ")
        };
        let block = Block::default().borders(Borders::ALL).title(title);

        let (offset, visible) = self.picker.visible();
        if visible.is_empty() {
            let empty = Paragraph::new(Span::styled(
                "No commands found",
                Style::default().fg(Color::DarkGray),
            ))
            .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = visible
            .iter()
            .map(|cmd| {
                ListItem::new(Line::from(vec![
                    Span::styled(cmd.name().to_string(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw("  "),
                    Span::styled(cmd.description().to_string(), Style::default().fg(Color::DarkGray)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White));
        let mut state = ListState::default();
        state.select(self.picker.selected().map(|i| i.saturating_sub(offset)));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}
