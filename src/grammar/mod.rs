//! Grammar correction.
//!
//! Stages, in order:
//! 1. [`RuleEngineCorrector`] applies the edits of a [`RuleEngine`]
//!    (LanguageTool in production).
//! 2. [`SupplementaryRules`] wraps stage 1 and fixes garbled questions the
//!    engine misses.
//! 3. [`StructuralRewriter`] re-linearizes wh-questions using
//!    part-of-speech tags.
//!
//! [`check_sentence`] chains all three into a [`GrammarOutcome`].

pub mod corrector;
pub mod engine;
pub mod outcome;
pub mod restructure;
pub mod supplementary;

pub use corrector::{Correction, GrammarCorrector, RuleEngineCorrector};
pub use engine::{apply_matches, GrammarError, LanguageToolEngine, RuleEngine, RuleMatch};
pub use outcome::{check_sentence, GrammarOutcome};
pub use restructure::StructuralRewriter;
pub use supplementary::{apply_question_rules, SupplementaryRules};
