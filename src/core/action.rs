//! # Actions
//!
//! Everything that can happen in Flowchat becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The flow answers? That's `Action::ReplyReceived(reply)`.
//!
//! `update()` applies an action to the state and returns an [`Effect`]
//! describing any I/O the caller must perform. The reducer itself never
//! touches the network or the terminal.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use chrono::Utc;
use log::{debug, info, warn};

use crate::core::i18n::Phrase;
use crate::core::state::{App, Presentation};
use crate::flow::{FlowError, FlowReply};

#[derive(Debug)]
pub enum Action {
    /// Raw input from the entry form or thread input box.
    Submit(String),
    ReplyReceived(FlowReply),
    RequestFailed(FlowError),
    /// User dismissed the thread view.
    CloseChat,
    Quit,
}

#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    /// Run the flow with this message on a background task.
    SpawnRequest {
        message: String,
        session_id: Option<String>,
    },
    /// Give the entry form its cursor back after the close transition.
    ScheduleRefocus,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(raw) => {
            let text = raw.trim();
            if text.is_empty() {
                return Effect::None;
            }
            if app.is_loading {
                debug!("Submit ignored: a reply is still pending");
                return Effect::None;
            }

            if app.presentation == Presentation::Closed {
                app.presentation = Presentation::Open;
            }

            app.messages.push_user(text.to_string(), Utc::now());
            app.is_loading = true;
            app.status_message = Phrase::Thinking.text(app.language).to_string();
            info!("User message submitted ({} bytes)", text.len());

            Effect::SpawnRequest {
                message: text.to_string(),
                session_id: app.session_id.clone(),
            }
        }
        Action::ReplyReceived(reply) => {
            app.session_id = Some(reply.session_id);
            let message = app.messages.push_assistant(reply.response, Utc::now());
            app.status_message = message.response_time.clone().unwrap_or_default();
            app.is_loading = false;
            Effect::None
        }
        Action::RequestFailed(error) => {
            warn!("Flow request failed: {:?} ({})", error.kind(), error);
            let phrase = if error.is_network() {
                Phrase::ErrorNetwork
            } else {
                Phrase::ErrorApiConnection
            };
            app.messages
                .push_assistant(phrase.text(app.language).to_string(), Utc::now());
            app.status_message.clear();
            app.is_loading = false;
            Effect::None
        }
        Action::CloseChat => {
            if app.presentation == Presentation::Open {
                app.presentation = Presentation::Closed;
                Effect::ScheduleRefocus
            } else {
                Effect::None
            }
        }
        Action::Quit => Effect::Quit,
    }
}
