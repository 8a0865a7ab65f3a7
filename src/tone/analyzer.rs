//! `ToneAnalyzer` trait and `ApiToneAnalyzer` implementation.
//!
//! `ApiToneAnalyzer` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint (Groq by default).  Connection details come from [`LlmConfig`];
//! the API key falls back to the `GROQ_API_KEY` environment variable.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::prompt::build_review_chat;
use crate::config::LlmConfig;

/// Environment variable consulted when `llm.api_key` is unset.
pub const API_KEY_ENV_VAR: &str = "GROQ_API_KEY";

/// More findings than this are cut down to the first grammar and tone ones.
const MAX_FINDINGS: usize = 5;
const KEPT_GRAMMAR_FINDINGS: usize = 3;
const KEPT_TONE_FINDINGS: usize = 2;

// ---------------------------------------------------------------------------
// ToneError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ToneError {
    #[error("API request failed: {0}")]
    Request(String),

    #[error("API request timed out")]
    Timeout,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("no response from model")]
    EmptyResponse,

    #[error("GROQ_API_KEY is not set and llm.api_key is not configured")]
    MissingApiKey,
}

impl From<reqwest::Error> for ToneError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ToneError::Timeout
        } else {
            ToneError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// One flagged sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub sentence_index: Option<usize>,
    #[serde(default)]
    pub error_type: String,
    #[serde(default)]
    pub original_sentence: String,
    #[serde(default)]
    pub corrected_sentence: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone_category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Findings {
    #[serde(default)]
    pub grammar_errors: Vec<Finding>,
    #[serde(default)]
    pub tone_errors: Vec<Finding>,
}

impl Findings {
    pub fn total(&self) -> usize {
        self.grammar_errors.len() + self.tone_errors.len()
    }

    /// Keep the first grammar and tone findings when there are too many.
    fn truncated(mut self) -> Self {
        if self.total() > MAX_FINDINGS {
            self.grammar_errors.truncate(KEPT_GRAMMAR_FINDINGS);
            self.tone_errors.truncate(KEPT_TONE_FINDINGS);
        }
        self
    }
}

/// Parse the model's reply, tolerating a surrounding markdown code fence.
pub fn parse_findings(content: &str) -> Result<Findings, ToneError> {
    let mut body = content.trim();
    body = body.strip_prefix("```json").unwrap_or(body);
    body = body.strip_prefix("```").unwrap_or(body);
    body = body.strip_suffix("```").unwrap_or(body);

    let findings: Findings =
        serde_json::from_str(body.trim()).map_err(|e| ToneError::Parse(e.to_string()))?;
    Ok(findings.truncated())
}

// ---------------------------------------------------------------------------
// ToneAnalyzer trait
// ---------------------------------------------------------------------------

/// Async trait for whole-text grammar and tone review.
#[async_trait]
pub trait ToneAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> Result<Findings, ToneError>;
}

// ---------------------------------------------------------------------------
// ApiToneAnalyzer
// ---------------------------------------------------------------------------

pub struct ApiToneAnalyzer {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ApiToneAnalyzer {
    /// Build an analyzer from config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.
    pub fn from_config(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV_VAR).ok())
            .filter(|key| !key.is_empty());

        Self {
            client,
            config: config.clone(),
            api_key,
        }
    }
}

#[async_trait]
impl ToneAnalyzer for ApiToneAnalyzer {
    async fn analyze(&self, text: &str) -> Result<Findings, ToneError> {
        let key = self.api_key.as_deref().ok_or(ToneError::MissingApiKey)?;
        let (system_msg, user_msg) = build_review_chat(text);

        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "temperature":     self.config.temperature,
            "max_tokens":      3000,
            "response_format": { "type": "json_object" }
        });

        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ToneError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ToneError::EmptyResponse)?;

        parse_findings(content)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(kind: &str, i: usize) -> String {
        format!(
            r#"{{"sentence_index":{i},"error_type":"{kind}","original_sentence":"s{i}","corrected_sentence":"c{i}"}}"#
        )
    }

    #[test]
    fn parses_plain_json() {
        let content = format!(
            r#"{{"grammar_errors":[{}],"tone_errors":[]}}"#,
            finding("grammar", 1)
        );
        let findings = parse_findings(&content).unwrap();
        assert_eq!(findings.grammar_errors.len(), 1);
        assert_eq!(findings.grammar_errors[0].sentence_index, Some(1));
        assert!(findings.tone_errors.is_empty());
    }

    #[test]
    fn strips_code_fences() {
        let fenced = "```json\n{\"grammar_errors\": [], \"tone_errors\": []}\n```";
        assert_eq!(parse_findings(fenced).unwrap(), Findings::default());

        let bare = "```\n{\"tone_errors\": []}\n```";
        assert_eq!(parse_findings(bare).unwrap(), Findings::default());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        assert_eq!(parse_findings("{}").unwrap(), Findings::default());
    }

    #[test]
    fn more_than_five_findings_are_truncated() {
        let grammar: Vec<String> = (0..4).map(|i| finding("grammar", i)).collect();
        let tone: Vec<String> = (0..3).map(|i| finding("tone_analysis", i)).collect();
        let content = format!(
            r#"{{"grammar_errors":[{}],"tone_errors":[{}]}}"#,
            grammar.join(","),
            tone.join(",")
        );

        let findings = parse_findings(&content).unwrap();
        assert_eq!(findings.grammar_errors.len(), 3);
        assert_eq!(findings.tone_errors.len(), 2);
        assert_eq!(findings.grammar_errors[2].original_sentence, "s2");
    }

    #[test]
    fn five_findings_are_kept() {
        let grammar: Vec<String> = (0..4).map(|i| finding("grammar", i)).collect();
        let content = format!(
            r#"{{"grammar_errors":[{}],"tone_errors":[{}]}}"#,
            grammar.join(","),
            finding("tone_analysis", 0)
        );
        assert_eq!(parse_findings(&content).unwrap().total(), 5);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_findings("I found no issues."),
            Err(ToneError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let config = LlmConfig {
            api_key: Some(String::new()),
            base_url: "http://127.0.0.1:9".into(),
            ..LlmConfig::default()
        };
        let mut analyzer = ApiToneAnalyzer::from_config(&config);
        analyzer.api_key = None;
        assert!(matches!(
            analyzer.analyze("text").await,
            Err(ToneError::MissingApiKey)
        ));
    }

    #[test]
    fn analyzer_is_object_safe() {
        let _: Box<dyn ToneAnalyzer> = Box::new(ApiToneAnalyzer::from_config(&LlmConfig::default()));
    }
}
