//! General-purpose grammar rule engine.
//!
//! [`RuleEngine`] reports rule matches for a text; [`apply_matches`] turns
//! them into a corrected string.  [`LanguageToolEngine`] talks to a
//! LanguageTool server over its HTTP API.  All connection details come from
//! [`GrammarConfig`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::config::GrammarConfig;

// ---------------------------------------------------------------------------
// GrammarError
// ---------------------------------------------------------------------------

/// Errors that can occur while checking a text.
#[derive(Debug, Error)]
pub enum GrammarError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("grammar check timed out")]
    Timeout,

    /// The response could not be parsed as expected JSON.
    #[error("failed to parse grammar response: {0}")]
    Parse(String),

    /// The server answered with a non-success status.
    #[error("grammar server unavailable: {0}")]
    Unavailable(String),
}

impl From<reqwest::Error> for GrammarError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            GrammarError::Timeout
        } else {
            GrammarError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// RuleMatch / RuleEngine
// ---------------------------------------------------------------------------

/// One rule violation.  `offset` and `length` are in UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub offset: usize,
    pub length: usize,
    pub replacements: Vec<String>,
    pub rule_id: String,
    pub message: String,
}

#[async_trait]
pub trait RuleEngine: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<RuleMatch>, GrammarError>;
}

/// Apply the first replacement of every match to `text`.
///
/// Matches without replacements, out-of-range matches and matches that
/// overlap an earlier one are skipped.
pub fn apply_matches(text: &str, matches: &[RuleMatch]) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();

    let mut ordered: Vec<&RuleMatch> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .filter(|m| {
            m.offset
                .checked_add(m.length)
                .is_some_and(|end| end <= units.len())
        })
        .collect();
    ordered.sort_by_key(|m| (m.offset, m.length));

    let mut corrected: Vec<u16> = Vec::with_capacity(units.len());
    let mut cursor = 0usize;
    for m in ordered {
        if m.offset < cursor {
            continue;
        }
        corrected.extend_from_slice(&units[cursor..m.offset]);
        corrected.extend(m.replacements[0].encode_utf16());
        cursor = m.offset + m.length;
    }
    corrected.extend_from_slice(&units[cursor..]);

    String::from_utf16_lossy(&corrected)
}

// ---------------------------------------------------------------------------
// LanguageToolEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<WireMatch>,
}

#[derive(Debug, Deserialize)]
struct WireMatch {
    offset: usize,
    length: usize,
    #[serde(default)]
    message: String,
    #[serde(default)]
    replacements: Vec<WireReplacement>,
    rule: Option<WireRule>,
}

#[derive(Debug, Deserialize)]
struct WireReplacement {
    value: String,
}

#[derive(Debug, Deserialize)]
struct WireRule {
    id: String,
}

impl From<WireMatch> for RuleMatch {
    fn from(m: WireMatch) -> Self {
        RuleMatch {
            offset: m.offset,
            length: m.length,
            replacements: m.replacements.into_iter().map(|r| r.value).collect(),
            rule_id: m.rule.map(|r| r.id).unwrap_or_default(),
            message: m.message,
        }
    }
}

/// Client for a LanguageTool server (`/v2/check`).
pub struct LanguageToolEngine {
    client: reqwest::Client,
    config: GrammarConfig,
}

impl LanguageToolEngine {
    /// Build a client without contacting the server.
    pub fn from_config(config: &GrammarConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Build a client and verify the server answers `/v2/languages`.
    pub async fn connect(config: &GrammarConfig) -> Result<Self, GrammarError> {
        let engine = Self::from_config(config);
        engine.check_reachable().await?;
        log::info!(
            "grammar: LanguageTool reachable at {} ({})",
            engine.config.base_url,
            engine.config.language
        );
        Ok(engine)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn check_reachable(&self) -> Result<(), GrammarError> {
        let response = self.client.get(self.endpoint("/v2/languages")).send().await?;
        if !response.status().is_success() {
            return Err(GrammarError::Unavailable(response.status().to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl RuleEngine for LanguageToolEngine {
    async fn check(&self, text: &str) -> Result<Vec<RuleMatch>, GrammarError> {
        let mut form = vec![
            ("text", text.to_string()),
            ("language", self.config.language.clone()),
        ];
        if let Some(mother_tongue) = self.config.mother_tongue.as_deref() {
            form.push(("motherTongue", mother_tongue.to_string()));
        }

        let response = self
            .client
            .post(self.endpoint("/v2/check"))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GrammarError::Unavailable(response.status().to_string()));
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| GrammarError::Parse(e.to_string()))?;

        Ok(body.matches.into_iter().map(RuleMatch::from).collect())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Returns a fixed set of matches for every text.
    pub(crate) struct FixedEngine(pub Vec<RuleMatch>);

    #[async_trait]
    impl RuleEngine for FixedEngine {
        async fn check(&self, _text: &str) -> Result<Vec<RuleMatch>, GrammarError> {
            Ok(self.0.clone())
        }
    }

    /// Always fails as if the server were down.
    pub(crate) struct DownEngine;

    #[async_trait]
    impl RuleEngine for DownEngine {
        async fn check(&self, _text: &str) -> Result<Vec<RuleMatch>, GrammarError> {
            Err(GrammarError::Request("connection refused".into()))
        }
    }

    pub(crate) fn rule(offset: usize, length: usize, replacement: &str) -> RuleMatch {
        RuleMatch {
            offset,
            length,
            replacements: vec![replacement.to_string()],
            rule_id: "TEST_RULE".into(),
            message: "test".into(),
        }
    }

    #[test]
    fn overflowing_span_is_skipped() {
        let huge = rule(usize::MAX, 2, "x");
        let past_end = rule(4, usize::MAX, "y");
        assert_eq!(apply_matches("teh cat", &[huge, past_end]), "teh cat");
    }

    #[test]
    fn applies_first_replacement() {
        let mut m = rule(0, 3, "The");
        m.replacements.push("Tha".into());
        assert_eq!(apply_matches("teh cat sat", &[m]), "The cat sat");
    }

    #[test]
    fn applies_matches_in_offset_order() {
        let matches = vec![rule(8, 3, "sat"), rule(0, 3, "The")];
        assert_eq!(apply_matches("teh cat sta", &matches), "The cat sat");
    }

    #[test]
    fn skips_overlaps_and_empty_replacements() {
        let mut empty = rule(4, 3, "x");
        empty.replacements.clear();
        let matches = vec![rule(0, 5, "A big"), rule(2, 4, "zzz"), empty];
        assert_eq!(apply_matches("a cat sat", &matches), "A big sat");
    }

    #[test]
    fn out_of_range_match_is_ignored() {
        assert_eq!(apply_matches("short", &[rule(3, 10, "x")]), "short");
    }

    #[test]
    fn offsets_are_utf16_units() {
        // The emoji is two UTF-16 units.
        let text = "😀 teh end";
        assert_eq!(apply_matches(text, &[rule(3, 3, "the")]), "😀 the end");
    }

    #[test]
    fn parses_languagetool_response() {
        let json = r#"{
            "software": {"name": "LanguageTool"},
            "matches": [{
                "message": "Possible spelling mistake found.",
                "offset": 0,
                "length": 3,
                "replacements": [{"value": "The"}, {"value": "Ten"}],
                "rule": {"id": "MORFOLOGIK_RULE_EN_US", "description": "Spelling"}
            }]
        }"#;
        let body: CheckResponse = serde_json::from_str(json).unwrap();
        let matches: Vec<RuleMatch> = body.matches.into_iter().map(RuleMatch::from).collect();

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule_id, "MORFOLOGIK_RULE_EN_US");
        assert_eq!(matches[0].replacements, vec!["The", "Ten"]);
    }

    #[test]
    fn engine_is_object_safe() {
        let _: Box<dyn RuleEngine> = Box::new(LanguageToolEngine::from_config(
            &GrammarConfig::default(),
        ));
    }

    #[tokio::test]
    async fn connect_fails_when_server_is_unreachable() {
        let config = GrammarConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 2,
            ..GrammarConfig::default()
        };
        assert!(LanguageToolEngine::connect(&config).await.is_err());
    }
}
