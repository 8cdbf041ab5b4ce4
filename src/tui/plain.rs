//! Plain-text formatter.
//!
//! Used for user messages: each `\n` starts a new line, whitespace is kept,
//! and nothing is interpreted as markup.

use ratatui::style::Style;
use ratatui::text::{Line, Span, Text};

/// Makes arbitrary text safe to put in a terminal cell.
///
/// Tabs expand to 4 spaces (ratatui renders `\t` as zero-width) and every
/// other control character is dropped, so escape sequences in message text
/// never reach the terminal.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// Formats `content` as one styled line per input line.
pub fn format(content: &str, style: Style) -> Text<'static> {
    let lines: Vec<Line<'static>> = content
        .split('\n')
        .map(|line| Line::from(Span::styled(sanitize(line), style)))
        .collect();
    Text::from(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn contents(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn newline_splits_into_two_lines() {
        let text = format("line1\nline2", Style::default());
        assert_eq!(contents(&text), vec!["line1", "line2"]);
    }

    #[test]
    fn whitespace_is_preserved() {
        let text = format("  indented  \n\nafter blank", Style::default());
        assert_eq!(contents(&text), vec!["  indented  ", "", "after blank"]);
    }

    #[test]
    fn markup_is_not_interpreted() {
        let text = format("**bold** <b>tag</b>", Style::default());
        assert_eq!(contents(&text), vec!["**bold** <b>tag</b>"]);
    }

    #[test]
    fn style_is_applied_to_every_line() {
        let style = Style::default().fg(Color::Green);
        let text = format("a\nb", style);
        assert!(text.lines.iter().all(|l| l.spans[0].style == style));
    }

    #[test]
    fn sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("\u{1b}[31mred\r"), "[31mred");
        assert_eq!(sanitize("a\tb"), "a    b");
    }
}
