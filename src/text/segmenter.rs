//! Sentence segmentation with a boundary-model primary strategy and a regex
//! fallback.
//!
//! [`SentenceSegmenter`] asks its [`SentenceBoundaryProvider`] first.  When
//! the provider is absent or fails, the text is split by
//! [`fallback_segmentation`], which shields abbreviations such as `Dr.`,
//! `U.S.C.` or `e.g.` from being read as sentence terminators.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Titles, legal citations and Latin abbreviations whose trailing period is
/// not a sentence break.
/// Longer forms come first so `U.S.C.` is not cut short at `U.S.`.
const ABBREVIATIONS: &str = r"U\.S\.C|C\.F\.R|P\.L|U\.S|Mrs|Mr|Ms|Dr|Prof|Sr|Jr|Inc|Corp|Ltd|Co|vs|etc|i\.e|e\.g|et\.al|cf|ibid|op\.cit|supra|infra|Art|Sec|Para|Ch|Vol|No";

/// Stand-in for a protected period while the fallback splits.
const DOT_PLACEHOLDER: &str = "<!DOT!>";

static ABBREVIATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{ABBREVIATIONS})\."))
        .expect("abbreviation pattern should compile")
});

static TRAILING_ABBREVIATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{ABBREVIATIONS})\.$"))
        .expect("trailing abbreviation pattern should compile")
});

static TERMINATOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.!?]+(?:\s+|$)").expect("sentence terminator pattern should compile")
});

// ---------------------------------------------------------------------------
// SegmentError
// ---------------------------------------------------------------------------

/// Failure of a sentence-boundary provider.
#[derive(Debug, Clone, Error)]
pub enum SegmentError {
    #[error("sentence boundary detection failed: {0}")]
    Boundary(String),
}

// ---------------------------------------------------------------------------
// SentenceBoundaryProvider
// ---------------------------------------------------------------------------

/// Model-based sentence boundary detection.
///
/// Implementations return the raw sentence spans in order; the segmenter
/// trims them and drops empty spans.
pub trait SentenceBoundaryProvider: Send + Sync {
    fn sentences(&self, text: &str) -> Result<Vec<String>, SegmentError>;
}

/// UAX #29 sentence boundaries, with spans that end in a known abbreviation
/// glued to the span that follows them.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeSentenceBoundaries;

impl SentenceBoundaryProvider for UnicodeSentenceBoundaries {
    fn sentences(&self, text: &str) -> Result<Vec<String>, SegmentError> {
        let mut sentences: Vec<String> = Vec::new();
        let mut pending = String::new();

        for span in text.split_sentence_bounds() {
            pending.push_str(span);
            if TRAILING_ABBREVIATION_PATTERN.is_match(pending.trim_end()) {
                continue;
            }
            sentences.push(std::mem::take(&mut pending));
        }
        if !pending.trim().is_empty() {
            sentences.push(pending);
        }

        Ok(sentences)
    }
}

// ---------------------------------------------------------------------------
// SentenceSegmenter
// ---------------------------------------------------------------------------

/// Splits text into sentence units.
#[derive(Clone)]
pub struct SentenceSegmenter {
    primary: Option<Arc<dyn SentenceBoundaryProvider>>,
}

impl SentenceSegmenter {
    /// Segmenter that consults `primary` before falling back.
    pub fn new(primary: Arc<dyn SentenceBoundaryProvider>) -> Self {
        Self {
            primary: Some(primary),
        }
    }

    /// Segmenter that always uses the regex fallback.
    pub fn fallback_only() -> Self {
        Self { primary: None }
    }

    /// Whether a boundary model is configured.
    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    /// Split `text` into trimmed, non-empty sentences.
    ///
    /// Empty or whitespace-only input yields an empty vector; any other input
    /// yields at least one sentence.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if let Some(primary) = &self.primary {
            match primary.sentences(text) {
                Ok(spans) => {
                    let sentences: Vec<String> = spans
                        .iter()
                        .map(|s| s.trim())
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                    if sentences.is_empty() {
                        return vec![text.to_string()];
                    }
                    return sentences;
                }
                Err(e) => {
                    log::warn!("segmenter: {e}, using fallback");
                }
            }
        }

        fallback_segmentation(text)
    }
}

impl Default for SentenceSegmenter {
    fn default() -> Self {
        Self::new(Arc::new(UnicodeSentenceBoundaries))
    }
}

/// Regex sentence split with abbreviation protection.
///
/// Terminal punctuation is consumed by the split, so `"Hi. Bye!"` becomes
/// `["Hi", "Bye"]`.
pub fn fallback_segmentation(text: &str) -> Vec<String> {
    let protected = ABBREVIATION_PATTERN.replace_all(text, |caps: &regex::Captures<'_>| {
        caps[0].replace('.', DOT_PLACEHOLDER)
    });

    let sentences: Vec<String> = TERMINATOR_PATTERN
        .split(&protected)
        .map(|s| s.replace(DOT_PLACEHOLDER, ".").trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.is_empty() {
        vec![text.to_string()]
    } else {
        sentences
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
