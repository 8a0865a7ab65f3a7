//! LLM-backed grammar and tone review producing a compliance-style report.
//!
//! Enabled through the `[llm]` config section.  Failures never surface as
//! errors: they are reported in the `api_error` field of the report.

pub mod analyzer;
pub mod prompt;
pub mod report;

pub use analyzer::{
    parse_findings, ApiToneAnalyzer, Finding, Findings, ToneAnalyzer, ToneError, API_KEY_ENV_VAR,
};
pub use prompt::{build_review_chat, normalize_whitespace};
pub use report::{analyze_tone, ToneReport, ViolationStatus};
