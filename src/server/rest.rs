//! Request/response endpoints.
//!
//! Every handler validates its body, trims the text, and answers with JSON.
//! Failures use [`ApiError`], serialised as `{"detail": "..."}`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::context::AppContext;
use crate::grammar::check_sentence;
use crate::session::protocol::round_ms;
use crate::spell::{suggest_or_empty, DictionaryStatus, SymSpellError, Verbosity};
use crate::tone::{analyze_tone, ToneReport};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const MAX_WORD_CHARS: usize = 100;
const MAX_SENTENCE_CHARS: usize = 5000;
const MAX_SUGGESTIONS_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// ApiError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ApiError {
    /// The input was empty after trimming.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Malformed bodies keep the `{"detail"}` shape: data errors (missing field,
/// wrong type) are 422, everything else 400.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        let detail = rejection.body_text();
        if rejection.status() == StatusCode::UNPROCESSABLE_ENTITY {
            ApiError::Validation(detail)
        } else {
            ApiError::BadRequest(detail)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Reject `value` unless it holds between 1 and `max` characters.
fn check_length(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len == 0 || len > max {
        return Err(ApiError::Validation(format!(
            "{field} must be between 1 and {max} characters (got {len})"
        )));
    }
    Ok(())
}

fn elapsed_ms(started: Instant) -> f64 {
    round_ms(started.elapsed().as_secs_f64() * 1000.0)
}

// ---------------------------------------------------------------------------
// GET /  and  GET /health
// ---------------------------------------------------------------------------

pub async fn root(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let realtime = &ctx.config.server.realtime_path;
    Json(json!({
        "message": "Real-time Grammar and Spelling Checking API",
        "version": VERSION,
        "endpoints": {
            "websocket": format!("{realtime} - WebSocket - Real-time grammar and spelling assistance"),
            "suggestions": "/suggestions - POST - Spelling suggestions (general + domain terms)",
            "check_sentence": "/check_sentence - POST - Grammar check of a single sentence",
            "check_text": "/check_text - POST - Grammar check of multi-sentence text",
            "analyze_tone": "/analyze_tone - POST - Critical grammar and tone report",
            "health": "/health - GET - Health check",
        },
        "features": ctx.features,
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub services: IndexMap<&'static str, &'static str>,
    pub dictionary_status: DictionaryStatus,
    pub initialization_warnings: Option<Vec<String>>,
    pub websocket_connections: usize,
}

fn availability(available: bool) -> &'static str {
    if available {
        "available"
    } else {
        "unavailable"
    }
}

pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<HealthResponse> {
    let dictionary = &ctx.dictionary_status;

    // The rule engine is verified at startup, so it is always reachable here.
    let mut services = IndexMap::new();
    services.insert("sentence_boundaries", availability(ctx.segmenter.has_primary()));
    services.insert("languagetool", availability(true));
    services.insert("symspell", availability(dictionary.general_loaded));
    services.insert("domain_dictionary", availability(dictionary.domain_loaded));
    services.insert("websocket", availability(true));
    services.insert("syntax_restructurer", availability(true));
    services.insert("tone_analysis", availability(ctx.tone.is_some()));

    // Degraded when the general-language index is missing.
    let healthy = dictionary.general_loaded;

    Json(HealthResponse {
        status: if healthy { "healthy" } else { "degraded" },
        version: VERSION,
        services,
        dictionary_status: dictionary.clone(),
        initialization_warnings: (!ctx.warnings.is_empty()).then(|| ctx.warnings.clone()),
        websocket_connections: ctx.registry.count(),
    })
}

// ---------------------------------------------------------------------------
// POST /suggestions
// ---------------------------------------------------------------------------

fn default_max_suggestions() -> usize {
    3
}

fn default_verbosity() -> String {
    "all".into()
}

#[derive(Debug, Deserialize)]
pub struct WordRequest {
    pub word: String,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_verbosity")]
    pub verbosity: String,
}

#[derive(Debug, Serialize)]
pub struct WordSuggestionResponse {
    pub word: String,
    pub suggestions: Vec<String>,
    pub processing_time_ms: f64,
    pub dictionary_sources: Vec<String>,
}

pub async fn suggestions(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<WordRequest>, JsonRejection>,
) -> Result<Json<WordSuggestionResponse>, ApiError> {
    let Json(req) = payload?;
    let started = Instant::now();

    check_length("word", &req.word, MAX_WORD_CHARS)?;
    if !(1..=MAX_SUGGESTIONS_LIMIT).contains(&req.max_suggestions) {
        return Err(ApiError::Validation(format!(
            "max_suggestions must be between 1 and {MAX_SUGGESTIONS_LIMIT}"
        )));
    }
    let verbosity: Verbosity = req
        .verbosity
        .parse()
        .map_err(|e: SymSpellError| ApiError::Validation(e.to_string()))?;

    let word = req.word.trim().to_lowercase();
    if word.is_empty() {
        return Err(ApiError::BadRequest(
            "Word cannot be empty after stripping whitespace".into(),
        ));
    }

    let suggester = Arc::clone(&ctx.suggester);
    let max = req.max_suggestions;
    let suggestions = tokio::task::spawn_blocking(move || {
        suggest_or_empty(suggester.as_ref(), &word, max, verbosity)
    })
    .await
    .map_err(|e| {
        log::error!("rest: suggestion lookup failed: {e}");
        ApiError::Internal("Internal server error while getting suggestions".into())
    })?;

    Ok(Json(WordSuggestionResponse {
        word: req.word,
        suggestions,
        processing_time_ms: elapsed_ms(started),
        dictionary_sources: ctx.dictionary_sources.clone(),
    }))
}

// ---------------------------------------------------------------------------
// POST /check_sentence  and  POST /check_text
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SentenceRequest {
    pub sentence: String,
}

#[derive(Debug, Serialize)]
pub struct GrammarCheckResponse {
    pub original: String,
    pub corrected: String,
    pub has_changes: bool,
    pub processing_time_ms: f64,
    pub error_message: Option<String>,
    pub sentences_processed: usize,
}

/// Validate a sentence request and return its trimmed text.
fn trimmed_sentence(req: &SentenceRequest, empty_message: &str) -> Result<String, ApiError> {
    check_length("sentence", &req.sentence, MAX_SENTENCE_CHARS)?;
    let text = req.sentence.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest(empty_message.into()));
    }
    Ok(text.to_string())
}

pub async fn check_one_sentence(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<SentenceRequest>, JsonRejection>,
) -> Result<Json<GrammarCheckResponse>, ApiError> {
    let Json(req) = payload?;
    let started = Instant::now();
    let sentence = trimmed_sentence(&req, "Sentence cannot be empty")?;

    let outcome = check_sentence(ctx.corrector.as_ref(), &ctx.rewriter, &sentence).await;

    Ok(Json(GrammarCheckResponse {
        original: outcome.original,
        corrected: outcome.corrected,
        has_changes: outcome.changed,
        processing_time_ms: elapsed_ms(started),
        error_message: outcome.error,
        sentences_processed: 1,
    }))
}

pub async fn check_text(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<SentenceRequest>, JsonRejection>,
) -> Result<Json<GrammarCheckResponse>, ApiError> {
    let Json(req) = payload?;
    let started = Instant::now();
    let text = trimmed_sentence(&req, "Text cannot be empty")?;

    let sentences = ctx.segmenter.segment(&text);
    let mut corrected = Vec::with_capacity(sentences.len());
    let mut has_changes = false;
    let mut errors = Vec::new();

    for sentence in &sentences {
        let outcome = check_sentence(ctx.corrector.as_ref(), &ctx.rewriter, sentence).await;
        has_changes |= outcome.changed;
        if let Some(e) = outcome.error {
            errors.push(e);
        }
        corrected.push(outcome.corrected);
    }

    Ok(Json(GrammarCheckResponse {
        original: text,
        corrected: corrected.join(" "),
        has_changes,
        processing_time_ms: elapsed_ms(started),
        error_message: (!errors.is_empty()).then(|| errors.join("; ")),
        sentences_processed: sentences.len(),
    }))
}

// ---------------------------------------------------------------------------
// POST /analyze_tone
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ToneRequest {
    pub text: String,
}

pub async fn tone_report(
    State(ctx): State<Arc<AppContext>>,
    payload: Result<Json<ToneRequest>, JsonRejection>,
) -> Result<Json<ToneReport>, ApiError> {
    let Json(req) = payload?;
    check_length("text", &req.text, MAX_SENTENCE_CHARS)?;
    if req.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text cannot be empty".into()));
    }

    Ok(Json(analyze_tone(ctx.tone.as_deref(), &req.text).await))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
