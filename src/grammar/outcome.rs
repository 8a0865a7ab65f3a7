//! Full grammar check of one sentence: corrector, then structural rewrite.

use serde::Serialize;

use super::corrector::GrammarCorrector;
use super::restructure::StructuralRewriter;

/// Outcome of every correction stage applied to one sentence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrammarOutcome {
    pub original: String,
    pub corrected: String,
    /// Trimmed original and trimmed final text differ.
    pub changed: bool,
    /// Error reported by the rule engine, if it failed.
    pub error: Option<String>,
}

/// Run `corrector` on `sentence` and pipe its output through `rewriter`.
///
/// `changed` compares the final text with the original, so a rewrite that
/// undoes an earlier edit reports no change.
pub async fn check_sentence(
    corrector: &dyn GrammarCorrector,
    rewriter: &StructuralRewriter,
    sentence: &str,
) -> GrammarOutcome {
    let correction = corrector.correct(sentence).await;
    let corrected = rewriter.restructure(&correction.corrected);

    GrammarOutcome {
        original: sentence.to_string(),
        changed: sentence.trim() != corrected.trim(),
        corrected,
        error: correction.error,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::grammar::corrector::RuleEngineCorrector;
    use crate::grammar::engine::tests::{rule, DownEngine, FixedEngine};
    use crate::grammar::supplementary::SupplementaryRules;
    use crate::text::LexiconTagger;

    fn rewriter() -> StructuralRewriter {
        StructuralRewriter::new(Arc::new(LexiconTagger::new()))
    }

    #[tokio::test]
    async fn supplementary_rules_fix_question() {
        let corrector = SupplementaryRules::new(RuleEngineCorrector::new(FixedEngine(Vec::new())));
        let outcome = check_sentence(&corrector, &rewriter(), "What France is capital?").await;

        assert_eq!(outcome.corrected, "What is the capital of France?");
        assert!(outcome.changed);
        assert_eq!(outcome.error, None);
    }

    #[tokio::test]
    async fn rewriter_runs_after_corrector() {
        let corrector = SupplementaryRules::new(RuleEngineCorrector::new(FixedEngine(Vec::new())));
        let outcome = check_sentence(&corrector, &rewriter(), "What France exports wine?").await;
        assert_eq!(outcome.corrected, "What exports the wine of France?");
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn correct_sentence_is_unchanged() {
        let corrector = SupplementaryRules::new(RuleEngineCorrector::new(FixedEngine(Vec::new())));
        let outcome =
            check_sentence(&corrector, &rewriter(), "The court adjourned for the day.").await;
        assert_eq!(outcome.corrected, outcome.original);
        assert!(!outcome.changed);
    }

    #[tokio::test]
    async fn engine_edit_is_reported() {
        let corrector = RuleEngineCorrector::new(FixedEngine(vec![rule(4, 4, "quick")]));
        let outcome = check_sentence(&corrector, &rewriter(), "the quik brown fox").await;
        assert_eq!(outcome.corrected, "the quick brown fox");
        assert!(outcome.changed);
    }

    #[tokio::test]
    async fn engine_error_is_carried() {
        let corrector = SupplementaryRules::new(RuleEngineCorrector::new(DownEngine));
        let outcome = check_sentence(&corrector, &rewriter(), "The cat sat.").await;
        assert!(!outcome.changed);
        assert!(outcome.error.is_some());
    }
}
