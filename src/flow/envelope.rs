//! Reply extraction from the Langflow run response.
//!
//! The run endpoint nests the reply text differently depending on how the
//! flow's output component is configured. Rather than chaining optional
//! lookups, the known locations are kept in [`REPLY_RULES`] and tried in
//! order; the first non-empty string wins.

use serde_json::Value;

use super::provider::FlowError;

/// A named location of the reply text inside the envelope.
pub struct ReplyRule {
    pub name: &'static str,
    pub pointer: &'static str,
}

impl ReplyRule {
    fn apply<'a>(&self, envelope: &'a Value) -> Option<&'a str> {
        envelope
            .pointer(self.pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Extraction rules in priority order.
pub const REPLY_RULES: &[ReplyRule] = &[
    ReplyRule {
        name: "results.message.text",
        pointer: "/outputs/0/outputs/0/results/message/text",
    },
    ReplyRule {
        name: "outputs.message.message",
        pointer: "/outputs/0/outputs/0/outputs/message/message",
    },
    ReplyRule {
        name: "messages[0].message",
        pointer: "/outputs/0/outputs/0/messages/0/message",
    },
];

/// Returns the reply text from a parsed run response.
pub fn extract_reply(envelope: &Value) -> Result<String, FlowError> {
    if envelope.is_null() {
        return Err(FlowError::Malformed("no data received from the API".to_string()));
    }

    REPLY_RULES
        .iter()
        .find_map(|rule| {
            rule.apply(envelope).map(|text| {
                log::debug!("Reply found via rule '{}'", rule.name);
                text.to_string()
            })
        })
        .ok_or_else(|| FlowError::Malformed("unexpected response format".to_string()))
}

/// The session id echoed back by the server, if it sent a non-empty one.
pub fn session_id(envelope: &Value) -> Option<&str> {
    envelope
        .get("session_id")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wrap(inner: Value) -> Value {
        json!({ "outputs": [ { "outputs": [ inner ] } ] })
    }

    #[test]
    fn results_path_alone() {
        let env = wrap(json!({ "results": { "message": { "text": "A" } } }));
        assert_eq!(extract_reply(&env).unwrap(), "A");
    }

    #[test]
    fn outputs_path_alone() {
        let env = wrap(json!({ "outputs": { "message": { "message": "M" } } }));
        assert_eq!(extract_reply(&env).unwrap(), "M");
    }

    #[test]
    fn messages_path_alone() {
        let env = wrap(json!({ "messages": [ { "message": "B" } ] }));
        assert_eq!(extract_reply(&env).unwrap(), "B");
    }

    #[test]
    fn results_path_wins_when_all_present() {
        let env = wrap(json!({
            "results": { "message": { "text": "first" } },
            "outputs": { "message": { "message": "second" } },
            "messages": [ { "message": "third" } ]
        }));
        assert_eq!(extract_reply(&env).unwrap(), "first");
    }

    #[test]
    fn empty_string_falls_through_to_next_rule() {
        let env = wrap(json!({
            "results": { "message": { "text": "" } },
            "messages": [ { "message": "fallback" } ]
        }));
        assert_eq!(extract_reply(&env).unwrap(), "fallback");
    }

    #[test]
    fn no_rule_matches_is_malformed() {
        let env = wrap(json!({ "artifacts": { "message": "ignored" } }));
        let err = extract_reply(&env).unwrap_err();
        assert!(matches!(err, FlowError::Malformed(_)));
    }

    #[test]
    fn null_envelope_is_malformed() {
        let err = extract_reply(&Value::Null).unwrap_err();
        assert_eq!(err, FlowError::Malformed("no data received from the API".into()));
    }

    #[test]
    fn non_string_values_are_skipped() {
        let env = wrap(json!({
            "results": { "message": { "text": 42 } },
            "outputs": { "message": { "message": "text wins" } }
        }));
        assert_eq!(extract_reply(&env).unwrap(), "text wins");
    }

    #[test]
    fn session_id_ignores_empty() {
        assert_eq!(session_id(&json!({ "session_id": "abc" })), Some("abc"));
        assert_eq!(session_id(&json!({ "session_id": "" })), None);
        assert_eq!(session_id(&json!({})), None);
    }
}
