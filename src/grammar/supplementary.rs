//! Supplementary rules chained after another corrector.
//!
//! The rule engine does not catch a family of garbled questions such as
//! "What France is capital?".  [`SupplementaryRules`] wraps any
//! [`GrammarCorrector`], runs it, and rewrites that shape into
//! "What is the capital of France?".

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use super::corrector::{Correction, GrammarCorrector};

const WH_WORDS: [&str; 5] = ["what", "where", "when", "who", "which"];
const COPULAS: [&str; 4] = ["is", "are", "was", "were"];

/// `<wh> <noun> <copula> <noun>?` spanning the whole sentence.
static MALFORMED_QUESTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(What|Where|When|Who|Which)\s+(\w+)\s+(is|are|was|were)\s+(\w+)\?$")
        .expect("malformed question pattern should compile")
});

/// Rewrite a malformed question, or return `None` when no rule applies.
pub fn apply_question_rules(text: &str) -> Option<String> {
    if let Some(caps) = MALFORMED_QUESTION.captures(text) {
        return Some(format!(
            "{} {} the {} of {}?",
            &caps[1], &caps[3], &caps[4], &caps[2]
        ));
    }

    // Looser positional form: longer questions whose first three words line up.
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() >= 4
        && WH_WORDS.contains(&words[0].to_lowercase().as_str())
        && COPULAS.contains(&words[2].to_lowercase().as_str())
        && text.trim_end().ends_with('?')
    {
        let last = words[words.len() - 1].trim_end_matches('?');
        return Some(format!("{} {} the {} of {}?", words[0], words[2], last, words[1]));
    }

    None
}

/// Decorator that runs `inner` and then the question rules on its output.
pub struct SupplementaryRules<C: GrammarCorrector> {
    inner: C,
}

impl<C: GrammarCorrector> SupplementaryRules<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: GrammarCorrector> GrammarCorrector for SupplementaryRules<C> {
    async fn correct(&self, sentence: &str) -> Correction {
        let first_pass = self.inner.correct(sentence).await;

        match apply_question_rules(&first_pass.corrected) {
            Some(rewritten) if rewritten != first_pass.corrected => Correction {
                changed: first_pass.changed || rewritten.trim() != first_pass.corrected.trim(),
                corrected: rewritten,
                error: first_pass.error,
            },
            _ => first_pass,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::corrector::RuleEngineCorrector;
    use crate::grammar::engine::tests::{rule, DownEngine, FixedEngine};

    fn clean_engine() -> SupplementaryRules<RuleEngineCorrector<FixedEngine>> {
        SupplementaryRules::new(RuleEngineCorrector::new(FixedEngine(Vec::new())))
    }

    #[tokio::test]
    async fn rewrites_malformed_question() {
        let result = clean_engine().correct("What France is capital?").await;
        assert_eq!(
            result,
            Correction {
                corrected: "What is the capital of France?".into(),
                changed: true,
                error: None,
            }
        );
    }

    #[tokio::test]
    async fn second_pass_is_stable() {
        let corrector = clean_engine();
        let first = corrector.correct("What France is capital?").await;
        let second = corrector.correct(&first.corrected).await;
        assert_eq!(second.corrected, "What is the capital of France?");
        assert!(!second.changed);
    }

    #[tokio::test]
    async fn wh_word_and_copula_are_case_insensitive() {
        let result = clean_engine().correct("where paris WAS city?").await;
        assert_eq!(result.corrected, "where WAS the city of paris?");
    }

    #[tokio::test]
    async fn positional_rule_handles_longer_questions() {
        let result = clean_engine().correct("Who John is the father?").await;
        assert_eq!(result.corrected, "Who is the father of John?");
        assert!(result.changed);
    }

    #[tokio::test]
    async fn statements_pass_through() {
        let result = clean_engine().correct("The court is in session.").await;
        assert_eq!(result, Correction::unchanged("The court is in session."));
    }

    #[tokio::test]
    async fn question_without_mark_is_not_rewritten() {
        let result = clean_engine().correct("What France is capital").await;
        assert!(!result.changed);
    }

    #[tokio::test]
    async fn runs_on_input_when_engine_fails() {
        let corrector = SupplementaryRules::new(RuleEngineCorrector::new(DownEngine));
        let result = corrector.correct("What France is capital?").await;
        assert_eq!(result.corrected, "What is the capital of France?");
        assert!(result.changed);
        assert!(result.error.is_some());
    }

    #[tokio::test]
    async fn keeps_engine_change_flag() {
        let corrector =
            SupplementaryRules::new(RuleEngineCorrector::new(FixedEngine(vec![rule(0, 3, "The")])));
        let result = corrector.correct("teh cat sat.").await;
        assert_eq!(result.corrected, "The cat sat.");
        assert!(result.changed);
    }
}
