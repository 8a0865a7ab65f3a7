//! Compliance-style report built from a tone review.

use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::analyzer::{Finding, Findings, ToneAnalyzer};
use super::prompt::normalize_whitespace;

pub const TOOL_ID: &str = "TOOL_003";
pub const RULE_GRAMMAR: &str = "WQ003_GRAMMAR";
pub const RULE_TONE: &str = "WQ003_TONE";
pub const RULE_NONE: &str = "WQ003";

const NOT_CONFIGURED: &str = "tone analysis is not configured (set llm.enabled = true)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationStatus {
    Compliant,
    Violation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToneReport {
    pub tool_id: String,
    pub violation_status: ViolationStatus,
    pub grammar_errors: Vec<Finding>,
    pub tone_errors: Vec<Finding>,
    pub total_grammar_issues: usize,
    pub total_tone_issues: usize,
    pub rules_triggered: Vec<String>,
    /// Seconds, e.g. `"0.8123s"`.
    pub processing_time: String,
    /// RFC 3339 in UTC with a `Z` suffix.
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_error: Option<String>,
}

impl ToneReport {
    /// Assemble a report from `findings` and an optional analyzer error.
    pub fn from_findings(findings: Findings, api_error: Option<String>, started: Instant) -> Self {
        let mut rules_triggered = Vec::new();
        if !findings.grammar_errors.is_empty() {
            rules_triggered.push(RULE_GRAMMAR.to_string());
        }
        if !findings.tone_errors.is_empty() {
            rules_triggered.push(RULE_TONE.to_string());
        }

        let violation_status = if rules_triggered.is_empty() {
            rules_triggered.push(RULE_NONE.to_string());
            ViolationStatus::Compliant
        } else {
            ViolationStatus::Violation
        };

        let secs = (started.elapsed().as_secs_f64() * 10_000.0).round() / 10_000.0;

        Self {
            tool_id: TOOL_ID.to_string(),
            violation_status,
            total_grammar_issues: findings.grammar_errors.len(),
            total_tone_issues: findings.tone_errors.len(),
            grammar_errors: findings.grammar_errors,
            tone_errors: findings.tone_errors,
            rules_triggered,
            processing_time: format!("{secs}s"),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            api_error,
        }
    }
}

/// Review `text` and build a report.  Never fails: an unavailable or failing
/// analyzer yields an empty, compliant report with `api_error` set.
pub async fn analyze_tone(analyzer: Option<&dyn ToneAnalyzer>, text: &str) -> ToneReport {
    let started = Instant::now();
    let clean = normalize_whitespace(text);

    let (findings, api_error) = match analyzer {
        None => (Findings::default(), Some(NOT_CONFIGURED.to_string())),
        Some(analyzer) => match analyzer.analyze(&clean).await {
            Ok(findings) => (findings, None),
            Err(e) => {
                log::warn!("tone: analysis failed: {e}");
                (Findings::default(), Some(e.to_string()))
            }
        },
    };

    ToneReport::from_findings(findings, api_error, started)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::tone::analyzer::ToneError;

    /// Records the text it was given and returns fixed findings.
    struct Recording {
        findings: Findings,
        seen: Mutex<Option<String>>,
    }

    #[async_trait]
    impl ToneAnalyzer for Recording {
        async fn analyze(&self, text: &str) -> Result<Findings, ToneError> {
            *self.seen.lock().unwrap() = Some(text.to_string());
            Ok(self.findings.clone())
        }
    }

    struct Offline;

    #[async_trait]
    impl ToneAnalyzer for Offline {
        async fn analyze(&self, _text: &str) -> Result<Findings, ToneError> {
            Err(ToneError::Timeout)
        }
    }

    fn finding(kind: &str) -> Finding {
        Finding {
            sentence_index: Some(0),
            error_type: kind.to_string(),
            original_sentence: "They was late.".into(),
            corrected_sentence: "They were late.".into(),
            tone_category: None,
        }
    }

    #[tokio::test]
    async fn clean_text_is_compliant() {
        let analyzer = Recording {
            findings: Findings::default(),
            seen: Mutex::new(None),
        };
        let report = analyze_tone(Some(&analyzer), "  The motion\n is granted. ").await;

        assert_eq!(report.tool_id, "TOOL_003");
        assert_eq!(report.violation_status, ViolationStatus::Compliant);
        assert_eq!(report.rules_triggered, vec!["WQ003"]);
        assert_eq!(report.api_error, None);
        assert!(report.processing_time.ends_with('s'));
        assert!(report.timestamp.ends_with('Z'));
        assert_eq!(
            analyzer.seen.lock().unwrap().as_deref(),
            Some("The motion is granted.")
        );
    }

    #[tokio::test]
    async fn findings_trigger_rules() {
        let analyzer = Recording {
            findings: Findings {
                grammar_errors: vec![finding("grammar")],
                tone_errors: vec![finding("tone_analysis"), finding("tone_analysis")],
            },
            seen: Mutex::new(None),
        };
        let report = analyze_tone(Some(&analyzer), "They was late.").await;

        assert_eq!(report.violation_status, ViolationStatus::Violation);
        assert_eq!(report.rules_triggered, vec!["WQ003_GRAMMAR", "WQ003_TONE"]);
        assert_eq!(report.total_grammar_issues, 1);
        assert_eq!(report.total_tone_issues, 2);
    }

    #[tokio::test]
    async fn analyzer_failure_is_reported_in_body() {
        let report = analyze_tone(Some(&Offline), "text").await;
        assert_eq!(report.violation_status, ViolationStatus::Compliant);
        assert_eq!(report.api_error.as_deref(), Some("API request timed out"));
    }

    #[tokio::test]
    async fn missing_analyzer_is_reported_in_body() {
        let report = analyze_tone(None, "text").await;
        assert!(report.api_error.is_some());
        assert_eq!(report.rules_triggered, vec!["WQ003"]);
    }

    #[test]
    fn api_error_omitted_when_absent() {
        let report = ToneReport::from_findings(Findings::default(), None, Instant::now());
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("api_error").is_none());
        assert_eq!(value["violation_status"], "Compliant");
    }
}
