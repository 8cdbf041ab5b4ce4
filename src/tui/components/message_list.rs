//! # MessageList Component
//!
//! Scrollable view of the conversation thread.
//!
//! ## Responsibilities
//!
//! - Display the list of messages
//! - Manage scrolling and the stick-to-bottom behaviour
//! - Show the thinking indicator while a reply is pending
//! - Cache per-message heights so only new messages are measured
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the message slice (props).
//!
//! Since `Component::render` takes `&mut self`, we can safely mutate the state
//! (including layout cache and scroll state) during the render pass, aligning
//! with Ratatui's `StatefulWidget` pattern.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::i18n::{Language, Phrase};
use crate::core::message::Message;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::MessageView;
use crate::tui::components::spinner_frame;
use crate::tui::event::TuiEvent;

/// Rows reserved below the last message for the thinking indicator.
const INDICATOR_HEIGHT: u16 = 2;

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.layout
            .total_height()
            .saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll if the user has reached the bottom.
    /// Called on scroll-down events so that scrolling past the end re-pins.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Jump to the newest message and follow new content again.
    pub fn pin_to_bottom(&mut self) {
        self.stick_to_bottom = true;
        self.scroll_state.scroll_to_bottom();
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    pub language: Language,
    pub is_loading: bool,
    pub tick: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [Message],
        language: Language,
        is_loading: bool,
        tick: usize,
    ) -> Self {
        Self {
            state,
            messages,
            language,
            is_loading,
            tick,
        }
    }

    fn indicator_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner_frame(self.tick)),
                Style::default().fg(Color::Blue),
            ),
            Span::styled(
                format!("{}...", Phrase::Thinking.text(self.language)),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ])
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        let num_messages = self.messages.len();

        // 1. Update layout cache; messages are immutable once appended
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(num_messages, content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for message in self.messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(MessageView::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_metadata(num_messages, content_width);

        let total_height = self.state.layout.total_height();
        let indicator = if self.is_loading { INDICATOR_HEIGHT } else { 0 };
        let canvas_height = total_height.saturating_add(indicator);

        // 2. Clamp scroll offset to prevent overscrolling past content
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible messages into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        for i in visible_range {
            let height = self.state.layout.heights[i];
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(MessageView::new(&self.messages[i], self.language), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if self.is_loading {
            let rect = Rect::new(0, total_height.saturating_add(1), content_width, 1);
            scroll_view.render_widget(self.indicator_line(), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Handled on the state: `MessageList` is rebuilt every frame and cannot
/// hold the scroll position.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => self.pin_to_bottom(),
            _ => {}
        }
        None
    }
}

/// Cached layout measurements
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// Number of cached heights still valid for this frame.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || self.heights.is_empty() {
            return 0;
        }
        if message_count < self.message_count {
            return 0;
        }
        self.message_count
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Indices of messages that intersect the viewport, plus half a viewport
    /// of buffer on each side.
    pub fn visible_range(
        &self,
        scroll_offset: u16,
        viewport_height: u16,
    ) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end.max(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::message::MessageStore;
    use chrono::Utc;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn store_with(n: usize) -> MessageStore {
        let mut store = MessageStore::new(Language::English);
        for i in 0..n {
            if i % 2 == 0 {
                store.push_user(format!("question {i}"), Utc::now());
            } else {
                store.push_assistant(format!("answer {i}"), Utc::now());
            }
        }
        store
    }

    fn draw(
        state: &mut MessageListState,
        messages: &[Message],
        loading: bool,
        width: u16,
        height: u16,
    ) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let mut list =
                    MessageList::new(state, messages, Language::English, loading, 0);
                list.render(f, f.area());
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
    fn test_layout_cache_reusable() {
        let mut cache = LayoutCache::new();
        cache.update_metadata(5, 80);
        cache.heights = vec![1; 5];

        // Same everything -> all reusable
        assert_eq!(cache.reusable_count(5, 80), 5);
        // New message appended -> only the old ones are reusable
        assert_eq!(cache.reusable_count(6, 80), 5);
        // Width changed -> nothing reusable
        assert_eq!(cache.reusable_count(5, 40), 0);
        // Fewer messages than cached -> invalid
        assert_eq!(cache.reusable_count(3, 80), 0);
    }

    #[test]
    fn test_visible_range() {
        let mut cache = LayoutCache::new();
        cache.heights = vec![10; 10];
        cache.rebuild_prefix_heights();
        assert_eq!(cache.total_height(), 100);

        // Viewport rows 50..60 plus 5 rows of buffer on each side
        assert_eq!(cache.visible_range(50, 10), 4..7);
        assert_eq!(cache.visible_range(0, 10), 0..2);
        assert_eq!(cache.visible_range(95, 10), 9..10);
    }

    #[test]
    fn test_visible_range_empty() {
        let cache = LayoutCache::new();
        assert_eq!(cache.visible_range(0, 10), 0..0);
    }

    #[test]
    fn test_scroll_up_unpins_and_scroll_to_bottom_repins() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![10; 10];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 10;
        state.scroll_state.set_offset(Position { x: 0, y: 90 });

        state.handle_event(&TuiEvent::ScrollUp);
        assert!(!state.stick_to_bottom);

        state.handle_event(&TuiEvent::ScrollToBottom);
        assert!(state.stick_to_bottom);
    }

    #[test]
    fn test_scroll_down_at_bottom_repins() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![5; 2];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 20; // content fits, max offset is 0
        state.stick_to_bottom = false;

        state.handle_event(&TuiEvent::ScrollDown);
        assert!(state.stick_to_bottom);
        assert_eq!(state.scroll_state.offset().y, 0);
    }

    #[test]
    fn test_clamp_scroll() {
        let mut state = MessageListState::new();
        state.layout.heights = vec![10; 3];
        state.layout.rebuild_prefix_heights();
        state.viewport_height = 10;
        state.scroll_state.set_offset(Position { x: 0, y: 500 });

        state.clamp_scroll();
        assert_eq!(state.scroll_state.offset().y, 20);
    }

    #[test]
    fn test_render_shows_messages_and_caches_heights() {
        let store = store_with(2);
        let mut state = MessageListState::new();
        let text = draw(&mut state, store.messages(), false, 60, 20);

        assert!(text.contains("question 0"));
        assert!(text.contains("answer 1"));
        assert_eq!(state.layout.heights.len(), 2);
        assert_eq!(state.viewport_height, 20);
    }

    #[test]
    fn test_render_shows_thinking_indicator_while_loading() {
        let store = store_with(1);
        let mut state = MessageListState::new();

        let text = draw(&mut state, store.messages(), true, 60, 20);
        assert!(text.contains("Thinking..."));

        let text = draw(&mut state, store.messages(), false, 60, 20);
        assert!(!text.contains("Thinking..."));
    }

    #[test]
    fn test_new_messages_appended_to_cache() {
        let mut store = store_with(1);
        let mut state = MessageListState::new();
        draw(&mut state, store.messages(), false, 60, 20);
        assert_eq!(state.layout.heights.len(), 1);

        store.push_assistant("reply".into(), Utc::now());
        draw(&mut state, store.messages(), false, 60, 20);
        assert_eq!(state.layout.heights.len(), 2);
    }
}
