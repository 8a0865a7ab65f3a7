//! Analysis pipeline run for every `text_input` event.
//!
//! # Flow
//!
//! ```text
//! text
//!   ├─▶ word tokens ─▶ unique, len > 2 ─▶ spawn_blocking(suggest × N)
//!   └─▶ len(trim) > 10 ─▶ corrector ─▶ structural rewriter
//!                          └─ changed? ─▶ grammar_check record
//!   ─▶ AnalysisResult
//! ```
//!
//! Analyzer failures become empty or absent fields.  Only a panicking
//! analyzer or the overall timeout fail the run.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::FutureExt;
use indexmap::IndexMap;
use thiserror::Error;

use super::protocol::{round_ms, unix_timestamp, AnalysisResult, GrammarCheck};
use crate::grammar::{check_sentence, GrammarCorrector, StructuralRewriter};
use crate::spell::{suggest_or_empty, SpellingSuggester, Verbosity};
use crate::text::{unique_tokens, word_tokens};

/// Suggestions requested per token.
pub const MAX_SUGGESTIONS: usize = 3;

/// Tokens this short or shorter get no spelling analysis.
const MIN_SPELL_TOKEN_CHARS: usize = 2;

/// Texts this short or shorter (after trimming) get no grammar analysis.
const MIN_GRAMMAR_CHARS: usize = 10;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("analysis task failed: {0}")]
    Internal(String),

    #[error("analysis timed out after {0:?}")]
    Timeout(Duration),
}

/// Fans one text out to the analyzers and aggregates the results.
pub struct AnalysisPipeline {
    suggester: Arc<dyn SpellingSuggester>,
    corrector: Arc<dyn GrammarCorrector>,
    rewriter: StructuralRewriter,
    timeout: Duration,
}

impl AnalysisPipeline {
    pub fn new(
        suggester: Arc<dyn SpellingSuggester>,
        corrector: Arc<dyn GrammarCorrector>,
        rewriter: StructuralRewriter,
        timeout: Duration,
    ) -> Self {
        Self {
            suggester,
            corrector,
            rewriter,
            timeout,
        }
    }

    /// Analyze `text`.  Runs to completion or until the configured timeout.
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, PipelineError> {
        match tokio::time::timeout(self.timeout, self.run(text)).await {
            Ok(result) => result,
            Err(_) => Err(PipelineError::Timeout(self.timeout)),
        }
    }

    async fn run(&self, text: &str) -> Result<AnalysisResult, PipelineError> {
        let started = Instant::now();

        // ── 1. Tokenize ──────────────────────────────────────────────────
        let tokens = word_tokens(text);
        let candidates: Vec<String> = unique_tokens(&tokens)
            .into_iter()
            .filter(|token| token.chars().count() > MIN_SPELL_TOKEN_CHARS)
            .map(str::to_string)
            .collect();

        // ── 2. Spelling (dictionary lookups are CPU-bound) ───────────────
        let suggester = Arc::clone(&self.suggester);
        let spelling_suggestions = tokio::task::spawn_blocking(move || {
            let mut suggestions = IndexMap::new();
            for token in candidates {
                let found =
                    suggest_or_empty(suggester.as_ref(), &token, MAX_SUGGESTIONS, Verbosity::All);
                if !found.is_empty() {
                    suggestions.insert(token, found);
                }
            }
            suggestions
        })
        .await
        .map_err(|e| PipelineError::Internal(e.to_string()))?;

        // ── 3. Grammar ───────────────────────────────────────────────────
        let grammar_check = if text.trim().chars().count() > MIN_GRAMMAR_CHARS {
            let outcome =
                AssertUnwindSafe(check_sentence(self.corrector.as_ref(), &self.rewriter, text))
                    .catch_unwind()
                    .await
                    .map_err(|_| PipelineError::Internal("grammar analysis panicked".into()))?;
            outcome.changed.then(|| GrammarCheck {
                original: outcome.original,
                corrected: outcome.corrected,
                has_changes: true,
                error: outcome.error,
            })
        } else {
            None
        };

        // ── 4. Assemble ──────────────────────────────────────────────────
        Ok(AnalysisResult {
            timestamp: unix_timestamp(),
            processing_time_ms: round_ms(started.elapsed().as_secs_f64() * 1000.0),
            spelling_suggestions,
            grammar_check,
            word_count: tokens.len(),
            character_count: text.chars().count(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
