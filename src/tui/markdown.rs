//! Markdown → ratatui `Text` renderer for assistant replies.
//!
//! Built on `pulldown_cmark` with the GitHub extensions (tables,
//! strikethrough, task lists). Fenced code blocks get a language label and
//! syntect highlighting; links keep their URL visible; raw HTML is shown as
//! inert text. All text passes through [`sanitize`] before it lands in a cell.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use crate::tui::plain::sanitize;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Label shown on fenced blocks without an info string.
pub const DEFAULT_CODE_LABEL: &str = "code";

/// Parse markdown content into styled `Text`.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

/// Language label for a fence info string: its first word, or `code`.
pub fn code_label(info: &str) -> String {
    info.split_whitespace()
        .next()
        .map(sanitize)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_CODE_LABEL.to_string())
}

fn border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

// ── Writer ──────────────────────────────────────────────────────────────────

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline style stack; nested styles compose via `patch`.
    styles: Vec<Style>,
    /// Per-line gutter spans (blockquote and code block `│`).
    gutters: Vec<Span<'static>>,
    /// List nesting: None = unordered, Some(n) = next ordered number.
    lists: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_code: bool,
    link_url: Option<String>,
    /// Cells of the table row being built.
    table_row: Option<Vec<String>>,
    needs_blank: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            gutters: vec![],
            lists: vec![],
            highlighter: None,
            in_code: false,
            link_url: None,
            table_row: None,
            needs_blank: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn new_line(&mut self, line: Line<'static>) {
        let mut spans: Vec<Span<'static>> = self.gutters.clone();
        spans.extend(line.spans);
        self.text.lines.push(Line::from(spans));
    }

    fn push_span(&mut self, span: Span<'static>) {
        if let Some(cells) = self.table_row.as_mut() {
            if let Some(cell) = cells.last_mut() {
                cell.push_str(&span.content);
            }
            return;
        }
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.new_line(Line::from(span)),
        }
    }

    fn start_block(&mut self) {
        if self.needs_blank {
            self.new_line(Line::default());
            self.needs_blank = false;
        }
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => self.push_span(Span::styled(
                sanitize(&c),
                Style::default().fg(Color::White).bg(Color::DarkGray),
            )),
            // Raw HTML is displayed, never interpreted
            Event::Html(html) => {
                self.start_block();
                self.new_line(Line::default());
                self.html(html);
            }
            Event::InlineHtml(html) => self.html(html),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.new_line(Line::default()),
            Event::Rule => {
                self.start_block();
                self.new_line(Line::from(Span::styled("─".repeat(40), border_style())));
                self.needs_blank = true;
            }
            Event::TaskListMarker(checked) => {
                self.push_span(Span::raw(if checked { "[x] " } else { "[ ] " }));
            }
            _ => {} // footnotes, math
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                self.start_block();
                self.new_line(Line::default());
            }
            Tag::Heading { level, .. } => {
                self.start_block();
                let style = heading_style(self.base_fg, level);
                self.new_line(Line::from(Span::styled(
                    format!("{} ", "#".repeat(heading_depth(level))),
                    style,
                )));
                self.push_style(style);
            }
            Tag::BlockQuote(_) => {
                self.start_block();
                self.gutters.push(Span::styled("│ ", border_style()));
                self.push_style(
                    Style::default()
                        .fg(self.base_fg)
                        .add_modifier(Modifier::DIM | Modifier::ITALIC),
                );
            }
            Tag::CodeBlock(kind) => self.open_code_block(kind),
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.start_block();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.new_line(Line::default());
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{indent}{n}. ");
                        *n += 1;
                        m
                    }
                    _ => format!("{indent}- "),
                };
                self.push_span(Span::styled(marker, border_style()));
            }
            Tag::Table(_) => self.start_block(),
            Tag::TableHead | Tag::TableRow => self.table_row = Some(Vec::new()),
            Tag::TableCell => {
                if let Some(cells) = self.table_row.as_mut() {
                    cells.push(String::new());
                }
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(sanitize(&dest_url));
                self.push_style(link_style());
            }
            _ => {} // images, definitions, metadata
        }
    }

    fn open_code_block(&mut self, kind: CodeBlockKind<'_>) {
        if !self.text.lines.is_empty() {
            self.new_line(Line::default());
        }
        self.needs_blank = false;
        let info = match &kind {
            CodeBlockKind::Fenced(info) => info.as_ref(),
            CodeBlockKind::Indented => "",
        };
        let label = code_label(info);

        self.new_line(Line::from(vec![
            Span::styled("╭── ", border_style()),
            Span::styled(label.clone(), border_style().add_modifier(Modifier::BOLD)),
            Span::styled(" ──", border_style()),
        ]));
        self.gutters.push(Span::styled("│ ", border_style()));

        if label != DEFAULT_CODE_LABEL
            && let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&label)
            && let Some(theme) = THEME_SET.themes.get(CODE_THEME)
        {
            self.highlighter = Some(HighlightLines::new(syntax, theme));
        }
        self.in_code = true;
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.needs_blank = true,
            TagEnd::Heading(_) => {
                self.pop_style();
                self.needs_blank = true;
            }
            TagEnd::BlockQuote(_) => {
                self.gutters.pop();
                self.pop_style();
                self.needs_blank = true;
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_code = false;
                self.gutters.pop();
                self.new_line(Line::from(Span::styled("╰──", border_style())));
                self.needs_blank = true;
            }
            TagEnd::List(_) => {
                self.lists.pop();
                self.needs_blank = true;
            }
            TagEnd::TableHead => {
                let width = self.flush_table_row(true);
                self.new_line(Line::from(Span::styled("─".repeat(width), border_style())));
            }
            TagEnd::TableRow => {
                self.flush_table_row(false);
            }
            TagEnd::Table => self.needs_blank = true,
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::raw(" ("));
                    self.push_span(Span::styled(url, link_style()));
                    self.push_span(Span::raw(")"));
                }
            }
            _ => {}
        }
    }

    /// Writes the buffered table row as one line; returns its character width.
    fn flush_table_row(&mut self, header: bool) -> usize {
        let Some(cells) = self.table_row.take() else {
            return 0;
        };
        let joined = cells.join(" │ ");
        let width = joined.chars().count();
        let mut style = Style::default().fg(self.base_fg);
        if header {
            style = style.add_modifier(Modifier::BOLD);
        }
        self.new_line(Line::from(Span::styled(joined, style)));
        width
    }

    fn text(&mut self, cow: CowStr<'_>) {
        if self.in_code {
            self.code_text(&cow);
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(sanitize(&cow), style));
    }

    fn code_text(&mut self, code: &str) {
        if let Some(mut hl) = self.highlighter.take() {
            for line in LinesWithEndings::from(code) {
                let spans: Vec<Span<'static>> = match hl.highlight_line(line, &SYNTAX_SET) {
                    Ok(ranges) => ranges
                        .into_iter()
                        .filter_map(|(hl_style, frag)| {
                            let content = sanitize(frag.trim_end_matches('\n'));
                            if content.is_empty() {
                                return None;
                            }
                            let fg = Color::Rgb(
                                hl_style.foreground.r,
                                hl_style.foreground.g,
                                hl_style.foreground.b,
                            );
                            Some(Span::styled(content, Style::default().fg(fg)))
                        })
                        .collect(),
                    Err(_) => vec![Span::raw(sanitize(line.trim_end_matches('\n')))],
                };
                self.new_line(Line::from(spans));
            }
            self.highlighter = Some(hl);
            return;
        }

        let style = Style::default().fg(Color::White);
        for line in code.lines() {
            self.new_line(Line::from(Span::styled(sanitize(line), style)));
        }
    }

    fn html(&mut self, html: CowStr<'_>) {
        let style = Style::default()
            .fg(self.base_fg)
            .add_modifier(Modifier::DIM);
        let content = sanitize(html.trim_end_matches('\n'));
        if !content.is_empty() {
            self.push_span(Span::styled(content, style));
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────────

fn heading_style(base_fg: Color, level: HeadingLevel) -> Style {
    let style = Style::default().fg(base_fg);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => style.add_modifier(Modifier::BOLD),
        _ => style.add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
