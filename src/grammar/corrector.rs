//! Core `GrammarCorrector` trait and the rule-engine-backed first stage.

use async_trait::async_trait;

use super::engine::{apply_matches, RuleEngine};

/// Result of one correction pass.  Errors are carried as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub corrected: String,
    /// Trimmed input and trimmed output differ.
    pub changed: bool,
    pub error: Option<String>,
}

impl Correction {
    /// A pass that left `text` alone.
    pub fn unchanged(text: &str) -> Self {
        Self {
            corrected: text.to_string(),
            changed: false,
            error: None,
        }
    }
}

/// Async trait for sentence-level grammar correction.
///
/// Implementations never fail: an internal error yields the input unchanged
/// with the message in [`Correction::error`].
#[async_trait]
pub trait GrammarCorrector: Send + Sync {
    async fn correct(&self, sentence: &str) -> Correction;
}

// ---------------------------------------------------------------------------
// RuleEngineCorrector
// ---------------------------------------------------------------------------

/// Applies the edits suggested by a [`RuleEngine`].
pub struct RuleEngineCorrector<E: RuleEngine> {
    engine: E,
}

impl<E: RuleEngine> RuleEngineCorrector<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl<E: RuleEngine> GrammarCorrector for RuleEngineCorrector<E> {
    async fn correct(&self, sentence: &str) -> Correction {
        match self.engine.check(sentence).await {
            Ok(matches) => {
                let corrected = apply_matches(sentence, &matches);
                Correction {
                    changed: sentence.trim() != corrected.trim(),
                    corrected,
                    error: None,
                }
            }
            Err(e) => {
                let message = format!("Grammar check failed: {e}");
                log::warn!("grammar: {message}");
                Correction {
                    error: Some(message),
                    ..Correction::unchanged(sentence)
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::engine::tests::{rule, DownEngine, FixedEngine};

    #[tokio::test]
    async fn applies_engine_edits() {
        let corrector = RuleEngineCorrector::new(FixedEngine(vec![rule(0, 3, "The")]));
        let result = corrector.correct("teh cat sat.").await;
        assert_eq!(result.corrected, "The cat sat.");
        assert!(result.changed);
        assert_eq!(result.error, None);
    }

    #[tokio::test]
    async fn no_matches_is_unchanged() {
        let corrector = RuleEngineCorrector::new(FixedEngine(Vec::new()));
        let result = corrector.correct("The cat sat.").await;
        assert_eq!(result, Correction::unchanged("The cat sat."));
    }

    #[tokio::test]
    async fn whitespace_only_edit_is_not_a_change() {
        let corrector = RuleEngineCorrector::new(FixedEngine(vec![rule(12, 1, "")]));
        let result = corrector.correct("The cat sat. ").await;
        assert_eq!(result.corrected, "The cat sat.");
        assert!(!result.changed);
    }

    #[tokio::test]
    async fn engine_failure_returns_input_with_error() {
        let corrector = RuleEngineCorrector::new(DownEngine);
        let result = corrector.correct("teh cat").await;
        assert_eq!(result.corrected, "teh cat");
        assert!(!result.changed);
        assert!(result
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("Grammar check failed")));
    }

    #[test]
    fn corrector_is_object_safe() {
        let _: Box<dyn GrammarCorrector> = Box::new(RuleEngineCorrector::new(DownEngine));
    }
}
