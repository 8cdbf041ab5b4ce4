//! # TitleBar Component
//!
//! Top bar of the thread view: application title and status on the left,
//! the close hint on the right.
//!
//! Purely presentational. All data comes in as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(
//!     Phrase::Title.text(lang),
//!     &app.status_message,
//!     Phrase::CloseHint.text(lang),
//! );
//! title_bar.render(frame, title_area);
//! ```

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar {
    pub title: String,
    /// Transient status (e.g. "Thinking...")
    pub status_message: String,
    /// Right-aligned keyboard hint
    pub hint: String,
}

impl TitleBar {
    pub fn new(
        title: impl Into<String>,
        status_message: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            status_message: status_message.into(),
            hint: hint.into(),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            self.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )];
        if !self.status_message.is_empty() {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                self.status_message.clone(),
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), area);

        let hint = Line::from(Span::styled(
            self.hint.clone(),
            Style::default().fg(Color::DarkGray),
        ))
        .right_aligned();
        frame.render_widget(hint, area);
    }
}
