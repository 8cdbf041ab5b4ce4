//! # Flow API
//!
//! Everything needed to talk to a hosted Langflow flow: the request/reply
//! types, the response envelope normalizer, the retry schedule and the
//! HTTP client itself. Nothing in here knows about the terminal.

pub mod envelope;
pub mod langflow;
pub mod provider;
pub mod retry;
pub mod types;

pub use langflow::LangflowClient;
pub use provider::{ErrorKind, FlowClient, FlowError};
pub use retry::RetryPolicy;
pub use types::{FlowReply, RunRequest, new_session_id};
