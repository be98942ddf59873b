//! Streaming Wire Frames
//!
//! One request frame goes up when the connection opens; the server answers
//! with text token frames and at most one terminal control frame.
//!
//! Control frames are recognised structurally, never by substring:
//!
//! 1. tagged envelope `{"kind": "token" | "error" | "recommendations", "payload": ...}`
//! 2. bare object with an `error` key
//! 3. bare object with a `recommendations` key
//! 4. anything else (including malformed JSON) is a literal token

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fallback text when an error frame carries no usable message
pub const DEFAULT_STREAM_ERROR: &str = "Streaming error";

/// Client -> server frame, sent once on open
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub query: String,
    /// Bearer token; serialized as `null` when absent
    pub token: Option<String>,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>, token: Option<String>) -> Self {
        Self {
            query: query.into(),
            token,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Server -> client frame, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A chunk of answer text
    Token(String),
    /// Server-signaled failure; terminates the query
    Error(String),
    /// Terminal frame with follow-up suggestions
    Recommendations(Vec<String>),
}

#[derive(Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
enum Envelope {
    Token(String),
    Error(Value),
    Recommendations(Value),
}

impl StreamFrame {
    /// Classify a raw text frame
    pub fn decode(text: &str) -> Self {
        let trimmed = text.trim_start();
        if !trimmed.starts_with('{') {
            return StreamFrame::Token(text.to_string());
        }

        let object = match serde_json::from_str::<Value>(trimmed) {
            Ok(Value::Object(map)) => map,
            _ => return StreamFrame::Token(text.to_string()),
        };

        if object.contains_key("kind") {
            if let Ok(envelope) = serde_json::from_value::<Envelope>(Value::Object(object.clone())) {
                return match envelope {
                    Envelope::Token(token) => StreamFrame::Token(token),
                    Envelope::Error(payload) => StreamFrame::Error(error_text(&payload)),
                    Envelope::Recommendations(payload) => {
                        StreamFrame::Recommendations(suggestion_list(&payload))
                    }
                };
            }
        }

        Self::decode_bare(&object).unwrap_or_else(|| StreamFrame::Token(text.to_string()))
    }

    fn decode_bare(object: &Map<String, Value>) -> Option<Self> {
        if let Some(error) = object.get("error") {
            return Some(StreamFrame::Error(error_text(error)));
        }
        object
            .get("recommendations")
            .map(|recs| StreamFrame::Recommendations(suggestion_list(recs)))
    }

    /// Whether this frame ends the query
    pub fn is_terminal(&self) -> bool {
        !matches!(self, StreamFrame::Token(_))
    }
}

fn error_text(value: &Value) -> String {
    match value {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Null | Value::Bool(false) | Value::String(_) => DEFAULT_STREAM_ERROR.to_string(),
        other => other.to_string(),
    }
}

/// Suggestion strings; a malformed list degrades to empty, non-strings are skipped
fn suggestion_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_token() {
        assert_eq!(StreamFrame::decode("Hel"), StreamFrame::Token("Hel".into()));
        assert_eq!(StreamFrame::decode(" "), StreamFrame::Token(" ".into()));
    }

    #[test]
    fn test_words_error_and_recommendations_stay_tokens() {
        let text = "The error in recommendations is {small}";
        assert_eq!(StreamFrame::decode(text), StreamFrame::Token(text.into()));
    }

    #[test]
    fn test_bare_error_object() {
        assert_eq!(
            StreamFrame::decode(r#"{"error": "bad request"}"#),
            StreamFrame::Error("bad request".into())
        );
        assert_eq!(
            StreamFrame::decode(r#"{"error": null}"#),
            StreamFrame::Error(DEFAULT_STREAM_ERROR.into())
        );
    }

    #[test]
    fn test_error_wins_over_recommendations() {
        assert_eq!(
            StreamFrame::decode(r#"{"recommendations": ["a"], "error": "boom"}"#),
            StreamFrame::Error("boom".into())
        );
    }

    #[test]
    fn test_bare_recommendations_object() {
        assert_eq!(
            StreamFrame::decode(r#"{"recommendations":["a","b"]}"#),
            StreamFrame::Recommendations(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_malformed_recommendations_degrade_to_empty() {
        assert_eq!(
            StreamFrame::decode(r#"{"recommendations": "oops"}"#),
            StreamFrame::Recommendations(vec![])
        );
        assert_eq!(
            StreamFrame::decode(r#"{"recommendations": ["a", 3, null, "b"]}"#),
            StreamFrame::Recommendations(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_invalid_json_is_token() {
        let text = r#"{"recommendations": ["a""#;
        assert_eq!(StreamFrame::decode(text), StreamFrame::Token(text.into()));
    }

    #[test]
    fn test_unrelated_object_is_token() {
        let text = r#"{"rate": 7.5}"#;
        assert_eq!(StreamFrame::decode(text), StreamFrame::Token(text.into()));
    }

    #[test]
    fn test_tagged_envelope() {
        assert_eq!(
            StreamFrame::decode(r#"{"kind":"token","payload":"{\"error\":1}"}"#),
            StreamFrame::Token(r#"{"error":1}"#.into())
        );
        assert_eq!(
            StreamFrame::decode(r#"{"kind":"error","payload":"denied"}"#),
            StreamFrame::Error("denied".into())
        );
        assert_eq!(
            StreamFrame::decode(r#"{"kind":"recommendations","payload":["x"]}"#),
            StreamFrame::Recommendations(vec!["x".into()])
        );
    }

    #[test]
    fn test_unknown_envelope_kind_falls_back() {
        let text = r#"{"kind":"status","payload":"warming up"}"#;
        assert_eq!(StreamFrame::decode(text), StreamFrame::Token(text.into()));
    }

    #[test]
    fn test_query_request_json() {
        let with_token = QueryRequest::new("hi", Some("t1".into()));
        assert_eq!(with_token.to_json().unwrap(), r#"{"query":"hi","token":"t1"}"#);

        let without = QueryRequest::new("hi", None);
        assert_eq!(without.to_json().unwrap(), r#"{"query":"hi","token":null}"#);
    }

    #[test]
    fn test_is_terminal() {
        assert!(!StreamFrame::Token("a".into()).is_terminal());
        assert!(StreamFrame::Error("e".into()).is_terminal());
        assert!(StreamFrame::Recommendations(vec![]).is_terminal());
    }
}
