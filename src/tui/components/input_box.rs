//! # InputBox Component
//!
//! Single-row text entry used by both the entry form and the thread view.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, Ctrl+J for a newline)
//! - Handle editing (backspace, delete, cursor movement)
//! - Handle submission (Enter)
//! - Show the placeholder when empty and a spinner while disabled
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `disabled` is a prop mirrored
//! from `App::is_loading` each frame; a disabled box ignores every event.
//! Newlines are displayed as `↵` so the box always stays one row high.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::spinner_frame;
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top border + content row + bottom border
pub const HEIGHT: u16 = 3;
/// Offset from area edge to content (border + padding)
const CONTENT_OFFSET: u16 = 2;

const NEWLINE_GLYPH: char = '↵';

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text or cursor changed
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    cursor: usize,
    /// Shown dimmed when the buffer is empty (Prop)
    pub placeholder: String,
    /// Hint shown in the bottom border (Prop)
    pub hint: String,
    /// Awaiting a reply: events are ignored and a spinner is drawn (Prop)
    pub disabled: bool,
    /// Whether the terminal cursor is placed in this box (Prop)
    pub focused: bool,
    /// Animation frame for the spinner (Prop)
    pub tick: usize,
}

impl InputBox {
    pub fn new(placeholder: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            hint: hint.into(),
            disabled: false,
            focused: true,
            tick: 0,
        }
    }

    /// Characters of the buffer as displayed, with newlines replaced.
    fn display_chars(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.buffer
            .char_indices()
            .map(|(i, c)| (i, if c == '\n' { NEWLINE_GLYPH } else { c }))
    }

    /// Display column of the cursor, counted in terminal cells.
    fn cursor_column(&self) -> usize {
        self.display_chars()
            .take_while(|(i, _)| *i < self.cursor)
            .map(|(_, c)| c.width().unwrap_or(0))
            .sum()
    }

    /// Visible slice of the buffer for a content width, scrolled so the
    /// cursor is always on screen. Returns the text and the cursor column
    /// relative to the slice.
    fn visible(&self, width: usize) -> (String, usize) {
        let cursor_col = self.cursor_column();
        // Keep one cell free for the cursor at the end of the buffer
        let skip_cols = (cursor_col + 1).saturating_sub(width);

        let mut col = 0;
        let mut shown = String::new();
        let mut shown_width = 0;
        for (_, c) in self.display_chars() {
            let w = c.width().unwrap_or(0);
            if col < skip_cols {
                col += w;
                continue;
            }
            if shown_width + w > width {
                break;
            }
            shown.push(c);
            shown_width += w;
        }
        let skipped = col.max(skip_cols);
        (shown, cursor_col.saturating_sub(skipped))
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .char_indices()
            .nth(1)
            .map(|(i, _)| self.cursor + i)
            .unwrap_or(self.buffer.len())
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;

        let border_style = if self.disabled {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Green)
        };

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1));
        if !self.hint.is_empty() {
            block = block.title_bottom(
                Line::from(Span::styled(
                    format!(" {} ", self.hint),
                    Style::default().fg(Color::DarkGray),
                ))
                .right_aligned(),
            );
        }

        let (content, cursor_col) = if self.disabled {
            let line = Line::from(Span::styled(
                spinner_frame(self.tick),
                Style::default().fg(Color::Blue),
            ));
            (line, None)
        } else if self.buffer.is_empty() {
            let line = Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
            (line, Some(0))
        } else {
            let (shown, col) = self.visible(width);
            (Line::from(shown), Some(col))
        };

        frame.render_widget(
            Paragraph::new(content)
                .block(block)
                .style(Style::default().fg(Color::Green)),
            area,
        );

        if self.focused
            && let Some(col) = cursor_col
        {
            let col = u16::try_from(col).unwrap_or(u16::MAX);
            let x = area.x.saturating_add(CONTENT_OFFSET).saturating_add(col);
            frame.set_cursor_position((x.min(area.right().saturating_sub(1)), area.y + 1));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.disabled {
            return None;
        }
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = self.prev_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = self.next_boundary();
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
