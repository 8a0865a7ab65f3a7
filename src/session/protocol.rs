//! JSON messages exchanged over the real-time channel.
//!
//! Every message is an object with a `type` tag.  Inbound messages that fail
//! to parse, lack a `type`, or carry an unknown one are ignored by the
//! session; [`parse_client_message`] reports them as `None`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Features announced in the connection acknowledgment.
pub const DEFAULT_FEATURES: [&str; 4] = [
    "Real-time spelling suggestions",
    "Grammar checking with syntax restructuring",
    "Domain dictionary support",
    "Performance metrics",
];

pub const CONNECTION_MESSAGE: &str = "Real-time grammar and spelling assistance connected";

/// Message sent to the client when the analysis pipeline fails.
pub const PROCESSING_ERROR_MESSAGE: &str = "Processing error occurred";

// ---------------------------------------------------------------------------
// Client -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    TextInput {
        #[serde(default)]
        text: String,
    },
    Ping,
}

/// Parse one inbound frame; `None` for anything the session should ignore.
pub fn parse_client_message(raw: &str) -> Option<ClientMessage> {
    match serde_json::from_str(raw) {
        Ok(message) => Some(message),
        Err(e) => {
            log::debug!("session: ignoring unrecognised message: {e}");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Server -> client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    ConnectionEstablished {
        message: String,
        features: Vec<String>,
        timestamp: f64,
    },
    AnalysisResult(AnalysisResult),
    Pong {
        timestamp: f64,
    },
    Error {
        message: String,
        timestamp: f64,
    },
}

impl ServerMessage {
    pub fn connection_established(features: &[String]) -> Self {
        ServerMessage::ConnectionEstablished {
            message: CONNECTION_MESSAGE.to_string(),
            features: features.to_vec(),
            timestamp: unix_timestamp(),
        }
    }

    pub fn pong() -> Self {
        ServerMessage::Pong {
            timestamp: unix_timestamp(),
        }
    }

    pub fn processing_error() -> Self {
        ServerMessage::Error {
            message: PROCESSING_ERROR_MESSAGE.to_string(),
            timestamp: unix_timestamp(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Aggregate analysis of one `text_input` event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub timestamp: f64,
    pub processing_time_ms: f64,
    /// Token -> suggestions, in order of first appearance in the text.
    pub spelling_suggestions: IndexMap<String, Vec<String>>,
    /// Present only when a correction is suggested.
    pub grammar_check: Option<GrammarCheck>,
    pub word_count: usize,
    pub character_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarCheck {
    pub original: String,
    pub corrected: String,
    pub has_changes: bool,
    pub error: Option<String>,
}

/// Seconds since the Unix epoch with sub-second precision.
pub fn unix_timestamp() -> f64 {
    let now = chrono::Utc::now();
    now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1_000_000.0
}

/// Round milliseconds to two decimals.
pub fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn parses_known_messages() {
        assert_eq!(
            parse_client_message(r#"{"type":"text_input","text":"teh cat"}"#),
            Some(ClientMessage::TextInput {
                text: "teh cat".into()
            })
        );
        assert_eq!(parse_client_message(r#"{"type":"ping"}"#), Some(ClientMessage::Ping));
    }

    #[test]
    fn text_defaults_to_empty() {
        assert_eq!(
            parse_client_message(r#"{"type":"text_input"}"#),
            Some(ClientMessage::TextInput { text: String::new() })
        );
    }

    #[test]
    fn ignores_unparseable_messages() {
        assert_eq!(parse_client_message("not json"), None);
        assert_eq!(parse_client_message(r#"{"text":"no type"}"#), None);
        assert_eq!(parse_client_message(r#"{"type":"subscribe"}"#), None);
        assert_eq!(parse_client_message("[1,2,3]"), None);
    }

    #[test]
    fn extra_fields_are_tolerated() {
        assert_eq!(
            parse_client_message(r#"{"type":"ping","id":7}"#),
            Some(ClientMessage::Ping)
        );
    }

    #[test]
    fn pong_wire_shape() {
        let value: Value = serde_json::from_str(&ServerMessage::pong().to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "pong");
        assert!(value["timestamp"].as_f64().unwrap() > 1_600_000_000.0);
    }

    #[test]
    fn error_wire_shape() {
        let value = serde_json::to_value(ServerMessage::processing_error()).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "Processing error occurred");
    }

    #[test]
    fn analysis_result_wire_shape() {
        let mut suggestions = IndexMap::new();
        suggestions.insert("teh".to_string(), vec!["the".to_string()]);
        suggestions.insert("quik".to_string(), vec!["quick".to_string()]);

        let message = ServerMessage::AnalysisResult(AnalysisResult {
            timestamp: 1.5,
            processing_time_ms: 2.25,
            spelling_suggestions: suggestions,
            grammar_check: None,
            word_count: 4,
            character_count: 18,
        });

        let raw = message.to_json().unwrap();
        assert!(raw.find("\"teh\"").unwrap() < raw.find("\"quik\"").unwrap());

        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "analysis_result",
                "timestamp": 1.5,
                "processing_time_ms": 2.25,
                "spelling_suggestions": {"teh": ["the"], "quik": ["quick"]},
                "grammar_check": null,
                "word_count": 4,
                "character_count": 18
            })
        );
    }

    #[test]
    fn connection_established_lists_features() {
        let features: Vec<String> = DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect();
        let value = serde_json::to_value(ServerMessage::connection_established(&features)).unwrap();
        assert_eq!(value["type"], "connection_established");
        assert_eq!(value["features"].as_array().unwrap().len(), 4);
        assert_eq!(value["message"], CONNECTION_MESSAGE);
    }

    #[test]
    fn rounds_to_two_decimals() {
        assert_eq!(round_ms(1.23456), 1.23);
        assert_eq!(round_ms(0.005), 0.01);
    }
}
