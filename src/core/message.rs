//! # Message Store
//!
//! The conversation as an append-only list of [`Message`]s. Messages are
//! never edited or removed once pushed.
//!
//! ```text
//! MessageStore
//! └── messages: Vec<Message>
//!     ├── user       "hello"              12:00:00
//!     └── assistant  "hi there"           12:00:03   (3s)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::i18n::{Language, duration_units};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub role: Role,
    pub timestamp: DateTime<Utc>,
    /// Only set on an assistant message that directly answers a user message.
    pub response_time: Option<String>,
}

fn new_message_id() -> String {
    format!("msg-{}", uuid::Uuid::new_v4())
}

#[derive(Debug, Default, Clone)]
pub struct MessageStore {
    messages: Vec<Message>,
    language: Language,
}

impl MessageStore {
    pub fn new(language: Language) -> Self {
        Self {
            messages: Vec::new(),
            language,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn push_user(&mut self, content: String, timestamp: DateTime<Utc>) -> &Message {
        self.push(Message {
            id: new_message_id(),
            content,
            role: Role::User,
            timestamp,
            response_time: None,
        })
    }

    /// Appends an assistant message, stamping its response time when it
    /// directly follows a user message.
    pub fn push_assistant(&mut self, content: String, timestamp: DateTime<Utc>) -> &Message {
        let response_time = match self.messages.last() {
            Some(prev) if prev.role == Role::User => Some(format_response_time(
                (timestamp - prev.timestamp).num_milliseconds(),
                self.language,
            )),
            _ => None,
        };
        self.push(Message {
            id: new_message_id(),
            content,
            role: Role::Assistant,
            timestamp,
            response_time,
        })
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        self.messages.last().expect("just pushed")
    }
}

/// Formats an elapsed time in milliseconds: `<1s`, `42s`, `2m 5s`.
///
/// Seconds are truncated; negative durations (clock skew) count as `<1s`.
pub fn format_response_time(elapsed_ms: i64, language: Language) -> String {
    let (minute_unit, second_unit) = duration_units(language);
    let seconds = elapsed_ms.max(0) / 1000;
    if seconds < 1 {
        format!("<1{second_unit}")
    } else if seconds < 60 {
        format!("{seconds}{second_unit}")
    } else {
        format!(
            "{}{minute_unit} {}{second_unit}",
            seconds / 60,
            seconds % 60
        )
    }
}
