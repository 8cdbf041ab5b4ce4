use serde::{Deserialize, Serialize};

/// Body of `POST /api/v1/run/{flow_id}`.
///
/// `tweaks` is always sent as an explicit `null`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RunRequest {
    pub input_value: String,
    pub output_type: &'static str,
    pub input_type: &'static str,
    pub session_id: String,
    pub tweaks: Option<serde_json::Value>,
}

impl RunRequest {
    pub fn chat(message: &str, session_id: String) -> Self {
        Self {
            input_value: message.to_string(),
            output_type: "chat",
            input_type: "chat",
            session_id,
            tweaks: None,
        }
    }
}

/// A normalized reply: the extracted text plus the session id to reuse next time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FlowReply {
    pub response: String,
    pub session_id: String,
}

/// Generates a client-side session id: `session_<unix millis>_<9 random chars>`.
///
/// Only needs to be unique within one conversation, not unguessable.
pub fn new_session_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(9).collect();
    format!("session_{millis}_{suffix}")
}
