use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::i18n::{Language, Phrase};
use crate::core::message::{Message, Role};
use crate::tui::component::Component;
use crate::tui::{markdown, plain};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// A stateless component that renders a single chat message.
///
/// User messages go through the plain formatter, assistant messages through
/// the markdown renderer. The response time of an assistant reply is shown
/// right-aligned in the top border.
///
/// `MessageView` is transient: built fresh each frame by `MessageList`.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub message: &'a Message,
    pub language: Language,
}

impl<'a> MessageView<'a> {
    pub fn new(message: &'a Message, language: Language) -> Self {
        Self { message, language }
    }

    /// Rendered height for this message at the given outer width.
    ///
    /// Uses the same `Paragraph` that `render` draws, so the layout cache and
    /// the actual frame always agree.
    pub fn calculate_height(message: &Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Too narrow for borders + padding; still occupy one row
            return 1;
        }
        if message.content.trim().is_empty() {
            return VERTICAL_OVERHEAD;
        }

        let lines = body_paragraph(message).line_count(content_width);
        let lines = u16::try_from(lines).unwrap_or(u16::MAX - VERTICAL_OVERHEAD);
        lines.max(1) + VERTICAL_OVERHEAD
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

fn body_text(message: &Message) -> Text<'static> {
    let style = role_style(message.role);
    let content = message.content.trim_end();
    match message.role {
        Role::User => plain::format(content, style),
        Role::Assistant => markdown::render(content, Color::Blue),
    }
}

fn body_paragraph(message: &Message) -> Paragraph<'static> {
    Paragraph::new(body_text(message)).wrap(Wrap { trim: false })
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let label = match self.message.role {
            Role::User => Phrase::You,
            Role::Assistant => Phrase::Assistant,
        }
        .text(self.language);

        let border_style = role_style(self.message.role).add_modifier(Modifier::DIM);

        let mut block = Block::bordered()
            .title(label)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        if let Some(elapsed) = &self.message.response_time {
            block = block.title_top(Line::from(format!(" {elapsed} ")).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);
        body_paragraph(self.message).render(inner_area, buf);
    }
}

impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn make_message(role: Role, content: &str) -> Message {
        Message {
            id: "msg-test".into(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
            response_time: None,
        }
    }

    fn render_to_string(message: &Message, width: u16) -> String {
        let height = MessageView::calculate_height(message, width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let mut view = MessageView::new(message, Language::English);
                Component::render(&mut view, f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn calculate_height_empty_content_returns_border_height() {
        let message = make_message(Role::User, "   ");
        assert_eq!(MessageView::calculate_height(&message, 80), VERTICAL_OVERHEAD);
    }

    #[test]
    fn calculate_height_zero_width_returns_minimum() {
        let message = make_message(Role::User, "Hello world");
        assert_eq!(MessageView::calculate_height(&message, 0), 1);
        assert_eq!(
            MessageView::calculate_height(&message, HORIZONTAL_OVERHEAD),
            1
        );
    }

    #[test]
    fn calculate_height_single_line_fits() {
        let message = make_message(Role::User, "Hello");
        assert_eq!(
            MessageView::calculate_height(&message, 80),
            1 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_counts_explicit_newlines() {
        let message = make_message(Role::User, "line1\nline2\nline3");
        assert_eq!(
            MessageView::calculate_height(&message, 80),
            3 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn calculate_height_wraps_long_lines() {
        let message = make_message(Role::User, "abcdefghij");
        // content width 5 → "abcde" | "fghij"
        assert_eq!(
            MessageView::calculate_height(&message, 9),
            2 + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn user_message_shows_label_and_raw_markup() {
        let message = make_message(Role::User, "**not bold**");
        let text = render_to_string(&message, 40);
        assert!(text.contains("you"));
        assert!(text.contains("**not bold**"));
    }

    #[test]
    fn assistant_message_renders_markdown() {
        let message = make_message(Role::Assistant, "**bold**");
        let text = render_to_string(&message, 40);
        assert!(text.contains("assistant"));
        assert!(text.contains("bold"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn response_time_shown_in_border() {
        let mut message = make_message(Role::Assistant, "hi");
        message.response_time = Some("3s".into());
        let text = render_to_string(&message, 40);
        assert!(text.contains(" 3s "));
    }

    #[test]
    fn role_colors() {
        assert_eq!(role_style(Role::User).fg, Some(Color::Green));
        assert_eq!(role_style(Role::Assistant).fg, Some(Color::Blue));
    }
}
