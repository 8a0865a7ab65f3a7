//! Structural rewriting of garbled wh-questions using part-of-speech tags.
//!
//! A sentence is treated as malformed when it opens with a wh-word and a
//! noun appears before the first main verb, e.g. "What France exports
//! wine?".  The repair re-linearizes the sentence as
//! `<wh> <verb> the <object> of <subject>?`.
//!
//! Subject and object are chosen positionally: the first noun within the
//! first three tokens is the subject, the next noun is the object.  Longer
//! or more complex sentences can be mis-assigned; anything that does not fit
//! the shape is returned unchanged.

use std::sync::Arc;

use crate::text::{PartOfSpeech, PosTagger, TaggedToken};

const WH_WORDS: [&str; 5] = ["what", "where", "who", "when", "which"];

/// Tokens at an index below this may be taken as the subject.
const SUBJECT_WINDOW: usize = 3;

#[derive(Clone)]
pub struct StructuralRewriter {
    tagger: Arc<dyn PosTagger>,
}

impl StructuralRewriter {
    pub fn new(tagger: Arc<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    /// Rewrite `sentence` when it is a malformed question; otherwise return
    /// it unchanged.  Tagging failures also return it unchanged.
    pub fn restructure(&self, sentence: &str) -> String {
        let tokens = match self.tagger.tag(sentence) {
            Ok(tokens) => tokens,
            Err(e) => {
                log::warn!("restructure: {e}, leaving sentence unchanged");
                return sentence.to_string();
            }
        };

        if !is_malformed_question(&tokens) {
            return sentence.to_string();
        }
        repair(&tokens, sentence).unwrap_or_else(|| sentence.to_string())
    }
}

fn is_malformed_question(tokens: &[TaggedToken]) -> bool {
    if tokens.len() < 3 || !WH_WORDS.contains(&tokens[0].text.to_lowercase().as_str()) {
        return false;
    }

    tokens
        .iter()
        .enumerate()
        .skip(2)
        .filter(|(_, token)| token.pos == PartOfSpeech::Verb)
        .any(|(i, _)| tokens[1..i].iter().any(|t| t.pos.is_nominal()))
}

fn repair(tokens: &[TaggedToken], original: &str) -> Option<String> {
    let wh_word = &tokens.first()?.text;
    let mut verb: Option<&str> = None;
    let mut subject: Option<&str> = None;
    let mut object: Option<&str> = None;

    for (i, token) in tokens.iter().enumerate() {
        if token.pos == PartOfSpeech::Verb {
            if verb.is_none() {
                verb = Some(token.text.as_str());
            }
        } else if token.pos.is_nominal() {
            if subject.is_none() && i < SUBJECT_WINDOW {
                subject = Some(token.text.as_str());
            } else if object.is_none() {
                object = Some(token.text.as_str());
            }
        }
    }

    if !original.trim_end().ends_with('?') {
        return None;
    }
    Some(format!("{wh_word} {} the {} of {}?", verb?, object?, subject?))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{LexiconTagger, TagError};

    struct BrokenTagger;

    impl PosTagger for BrokenTagger {
        fn tag(&self, _text: &str) -> Result<Vec<TaggedToken>, TagError> {
            Err(TagError::Tagging("model unavailable".into()))
        }
    }

    fn rewriter() -> StructuralRewriter {
        StructuralRewriter::new(Arc::new(LexiconTagger::new()))
    }

    #[test]
    fn rewrites_noun_before_verb() {
        assert_eq!(
            rewriter().restructure("What France exports wine?"),
            "What exports the wine of France?"
        );
    }

    #[test]
    fn well_formed_question_is_unchanged() {
        let s = "What is the capital of France?";
        assert_eq!(rewriter().restructure(s), s);
    }

    #[test]
    fn declarative_sentence_is_unchanged() {
        let s = "The clerk filed the motion yesterday.";
        assert_eq!(rewriter().restructure(s), s);
    }

    #[test]
    fn missing_question_mark_is_unchanged() {
        let s = "What France exports wine";
        assert_eq!(rewriter().restructure(s), s);
    }

    #[test]
    fn missing_object_is_unchanged() {
        let s = "Where John went?";
        assert_eq!(rewriter().restructure(s), s);
    }

    #[test]
    fn tagger_failure_is_unchanged() {
        let rewriter = StructuralRewriter::new(Arc::new(BrokenTagger));
        let s = "What France exports wine?";
        assert_eq!(rewriter.restructure(s), s);
    }

    #[test]
    fn idempotent() {
        let once = rewriter().restructure("What France exports wine?");
        assert_eq!(rewriter().restructure(&once), once);
    }
}
