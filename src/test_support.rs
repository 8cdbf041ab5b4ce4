//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::core::i18n::Language;
use crate::flow::{FlowClient, FlowError, FlowReply};

/// A fake flow that plays back queued results and counts calls.
///
/// When the queue is empty it echoes the message back.
#[derive(Default)]
pub struct ScriptedClient {
    results: Mutex<VecDeque<Result<FlowReply, FlowError>>>,
    calls: AtomicUsize,
    seen_sessions: Mutex<Vec<Option<String>>>,
    delay: Option<Duration>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, result: Result<FlowReply, FlowError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_sessions(&self) -> Vec<Option<String>> {
        self.seen_sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlowClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn send(&self, message: &str, session_id: Option<&str>) -> Result<FlowReply, FlowError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_sessions
            .lock()
            .unwrap()
            .push(session_id.map(str::to_string));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| {
            Ok(FlowReply {
                response: format!("echo: {message}"),
                session_id: session_id.unwrap_or("session_test").to_string(),
            })
        })
    }
}

/// Creates a test App backed by an empty `ScriptedClient`.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(Arc::new(ScriptedClient::new()), Language::English)
}
