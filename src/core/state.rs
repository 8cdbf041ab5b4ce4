//! # Application State
//!
//! Core chat state. This module contains domain logic only -
//! no TUI-specific types. Presentation details (scroll offsets, input
//! buffer, animation) live in the `tui` module.
//!
//! ```text
//! App
//! ├── client: Arc<dyn FlowClient>   // remote flow
//! ├── messages: MessageStore        // append-only conversation
//! ├── session_id: Option<String>    // reused for every send once known
//! ├── presentation: Presentation    // Closed (entry form) / Open (thread)
//! ├── is_loading: bool              // awaiting a reply
//! ├── language: Language            // UI language
//! └── status_message: String        // title bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::i18n::Language;
use crate::core::message::MessageStore;
use crate::flow::FlowClient;

/// Which of the two screens is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presentation {
    /// Collapsed entry form (initial).
    #[default]
    Closed,
    /// Expanded thread view.
    Open,
}

pub struct App {
    pub client: Arc<dyn FlowClient>,
    pub messages: MessageStore,
    pub session_id: Option<String>,
    pub presentation: Presentation,
    pub is_loading: bool,
    pub language: Language,
    pub status_message: String,
}

impl App {
    pub fn new(client: Arc<dyn FlowClient>, language: Language) -> Self {
        Self {
            client,
            messages: MessageStore::new(language),
            session_id: None,
            presentation: Presentation::Closed,
            is_loading: false,
            language,
            status_message: String::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.presentation == Presentation::Open
    }
}
