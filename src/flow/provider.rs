use std::fmt;

use async_trait::async_trait;

use super::types::FlowReply;

/// Discriminant for [`FlowError`], used by callers that only need to branch
/// on the class of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NetworkTimeout,
    Network,
    Api,
    MalformedResponse,
}

/// Errors that can occur while running a flow.
///
/// Each variant is built once, where the failure happens. Callers branch on
/// [`FlowError::kind`] rather than on the rendered message.
#[derive(Debug, Clone, PartialEq)]
pub enum FlowError {
    /// The attempt was cancelled by the per-attempt timeout.
    Timeout,
    /// Transport failure (DNS, connection refused, reset, TLS).
    Network(String),
    /// The API answered with a non-2xx status. `body` is kept for logging only.
    Api { status: u16, body: String },
    /// The body was not JSON, or no reply text could be found in it.
    Malformed(String),
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::Timeout => ErrorKind::NetworkTimeout,
            FlowError::Network(_) => ErrorKind::Network,
            FlowError::Api { .. } => ErrorKind::Api,
            FlowError::Malformed(_) => ErrorKind::MalformedResponse,
        }
    }

    /// True for transport-class failures, timeouts included.
    pub fn is_network(&self) -> bool {
        matches!(self.kind(), ErrorKind::NetworkTimeout | ErrorKind::Network)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FlowError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowError::Timeout => write!(
                f,
                "request timed out, please check your connection and try again"
            ),
            FlowError::Network(_) => write!(
                f,
                "could not reach the server, please check your internet connection"
            ),
            FlowError::Api { status, .. } => write!(f, "API request failed (HTTP {status})"),
            FlowError::Malformed(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FlowError {}

#[async_trait]
pub trait FlowClient: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Sends one user message to the flow and waits for the full reply.
    ///
    /// `session_id` ties the message to an existing conversation. When `None`
    /// the client picks a fresh id and returns it in the reply.
    async fn send(&self, message: &str, session_id: Option<&str>) -> Result<FlowReply, FlowError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_is_network_class() {
        assert_eq!(FlowError::Timeout.kind(), ErrorKind::NetworkTimeout);
        assert!(FlowError::Timeout.is_network());
        assert!(FlowError::Network("refused".into()).is_network());
    }

    #[test]
    fn api_and_malformed_are_not_network_class() {
        let api = FlowError::Api { status: 503, body: "down".into() };
        assert!(!api.is_network());
        assert_eq!(api.status(), Some(503));
        assert!(!FlowError::Malformed("bad".into()).is_network());
    }

    #[test]
    fn display_hides_low_level_details() {
        let net = FlowError::Network("tcp connect error: 10.0.0.1:443".into());
        assert!(!net.to_string().contains("10.0.0.1"));

        let api = FlowError::Api { status: 401, body: "{\"detail\":\"secret\"}".into() };
        let shown = api.to_string();
        assert!(shown.contains("401"));
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn display_keeps_malformed_message() {
        let err = FlowError::Malformed("unexpected response format".into());
        assert_eq!(err.to_string(), "unexpected response format");
    }

    #[test]
    fn trait_object_forwards_session() {
        use crate::test_support::ScriptedClient;
        use std::sync::Arc;

        let client: Arc<dyn FlowClient> = Arc::new(ScriptedClient::new());
        let reply = tokio_test::block_on(client.send("ping", Some("s-1"))).unwrap();
        assert_eq!(reply.response, "echo: ping");
        assert_eq!(reply.session_id, "s-1");
    }
}
