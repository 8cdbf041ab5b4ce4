//! # Landing Page Component
//!
//! The collapsed entry form: title, subtitle and the input box centered over
//! the ripple background. Shown while the thread view is closed.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::i18n::{Language, Phrase};
use crate::tui::component::Component;
use crate::tui::components::input_box::{self, InputBox};
use crate::tui::components::ripples::Ripples;

/// Widest the entry form gets on large terminals.
const FORM_WIDTH: u16 = 72;

pub struct LandingPage<'a> {
    pub input: &'a mut InputBox,
    pub language: Language,
    pub elapsed: Duration,
}

impl<'a> LandingPage<'a> {
    pub fn new(input: &'a mut InputBox, language: Language, elapsed: Duration) -> Self {
        Self {
            input,
            language,
            elapsed,
        }
    }
}

impl<'a> Component for LandingPage<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Ripples::new(self.elapsed), area);

        let [column] = Layout::horizontal([Constraint::Length(FORM_WIDTH.min(area.width))])
            .flex(Flex::Center)
            .areas(area);

        let [title_area, subtitle_area, _, input_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1), // Spacer
            Constraint::Length(input_box::HEIGHT),
        ])
        .flex(Flex::Center)
        .areas(column);

        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                Phrase::Title.text(self.language),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center),
            title_area,
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                Phrase::Subtitle.text(self.language),
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center),
            subtitle_area,
        );

        self.input.render(frame, input_area);
    }
}
