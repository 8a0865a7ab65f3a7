//! Part-of-speech tagging.
//!
//! [`PosTagger`] is the capability the structural rewriter depends on.
//! [`LexiconTagger`] is a deterministic, dependency-free implementation:
//! closed-class word lists, a lexicon of common verbs / adjectives /
//! adverbs, suffix heuristics and capitalisation.  Tags follow the Universal
//! Dependencies tag set; copulas and auxiliaries are always [`Aux`], never
//! [`Verb`].
//!
//! [`Aux`]: PartOfSpeech::Aux
//! [`Verb`]: PartOfSpeech::Verb

use std::collections::HashMap;

use once_cell::sync::Lazy;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

// ---------------------------------------------------------------------------
// PartOfSpeech
// ---------------------------------------------------------------------------

/// Universal part-of-speech tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    Noun,
    ProperNoun,
    Verb,
    Aux,
    Pronoun,
    Determiner,
    Adposition,
    Adjective,
    Adverb,
    CoordinatingConjunction,
    SubordinatingConjunction,
    Particle,
    Numeral,
    Punctuation,
    Other,
}

impl PartOfSpeech {
    /// The Universal Dependencies label, e.g. `"PROPN"`.
    pub fn label(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Determiner => "DET",
            PartOfSpeech::Adposition => "ADP",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::CoordinatingConjunction => "CCONJ",
            PartOfSpeech::SubordinatingConjunction => "SCONJ",
            PartOfSpeech::Particle => "PART",
            PartOfSpeech::Numeral => "NUM",
            PartOfSpeech::Punctuation => "PUNCT",
            PartOfSpeech::Other => "X",
        }
    }

    /// `NOUN` or `PROPN`.
    pub fn is_nominal(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }
}

/// One token with its tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub text: String,
    pub pos: PartOfSpeech,
}

// ---------------------------------------------------------------------------
// TagError / PosTagger
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum TagError {
    #[error("part-of-speech tagging failed: {0}")]
    Tagging(String),
}

/// Splits a sentence into tokens and tags each one.
pub trait PosTagger: Send + Sync {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError>;
}

// ---------------------------------------------------------------------------
// Lexicon
// ---------------------------------------------------------------------------

const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "do", "does", "did", "has", "have",
    "had", "will", "would", "shall", "should", "can", "could", "may", "might", "must",
];

const PRONOUNS: &[&str] = &[
    "what", "who", "whom", "whose", "which", "i", "you", "he", "she", "it", "we", "they", "me",
    "him", "us", "them", "myself", "yourself", "himself", "herself", "itself", "ourselves",
    "themselves", "someone", "everyone", "anyone", "nobody", "everybody", "nothing",
    "something", "anything", "everything",
];

const DETERMINERS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "every", "each", "no", "all", "both", "either", "neither", "another",
];

const ADPOSITIONS: &[&str] = &[
    "of", "in", "on", "at", "to", "for", "with", "by", "from", "about", "into", "over", "under",
    "after", "before", "between", "through", "during", "without", "against", "across", "upon",
    "within", "among",
];

const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet"];

const SUBORDINATORS: &[&str] = &[
    "because", "if", "although", "though", "while", "unless", "since", "whether",
];

const ADVERBS: &[&str] = &[
    "where", "when", "why", "how", "very", "also", "often", "never", "always", "now", "then",
    "here", "there", "too", "just", "only", "still", "already", "soon", "yesterday", "today",
    "tomorrow", "however", "really", "quite", "again",
];

const VERBS: &[&str] = &[
    "go", "goes", "went", "gone", "make", "makes", "made", "take", "takes", "took", "taken",
    "see", "sees", "saw", "seen", "know", "knows", "knew", "known", "say", "says", "said", "get",
    "gets", "got", "give", "gives", "gave", "given", "find", "finds", "found", "think", "thinks",
    "thought", "tell", "tells", "told", "come", "comes", "came", "want", "wants", "use", "uses",
    "work", "works", "call", "calls", "try", "tries", "ask", "asks", "feel", "feels", "felt",
    "put", "puts", "mean", "means", "meant", "keep", "keeps", "kept", "let", "lets", "begin",
    "begins", "began", "seem", "seems", "help", "helps", "show", "shows", "hear", "hears",
    "heard", "play", "plays", "run", "runs", "ran", "move", "moves", "live", "lives", "believe",
    "believes", "bring", "brings", "brought", "happen", "happens", "write", "writes", "wrote",
    "written", "sit", "sits", "sat", "stand", "stands", "stood", "lose", "loses", "pay", "pays",
    "paid", "meet", "meets", "met", "include", "includes", "continue", "continues", "learn",
    "learns", "change", "changes", "lead", "leads", "led", "understand", "understands",
    "understood", "watch", "watches", "follow", "follows", "stop", "stops", "create", "creates",
    "speak", "speaks", "spoke", "spoken", "read", "reads", "allow", "allows", "add", "adds",
    "spend", "spends", "spent", "grow", "grows", "grew", "walk", "walks", "win", "wins", "won",
    "offer", "offers", "remember", "remembers", "love", "loves", "consider", "considers",
    "appear", "appears", "buy", "buys", "bought", "wait", "waits", "serve", "serves", "send",
    "sends", "sent", "expect", "expects", "build", "builds", "built", "stay", "stays", "fall",
    "falls", "fell", "reach", "reaches", "remain", "remains", "suggest", "suggests", "sell",
    "sells", "sold", "require", "requires", "decide", "decides", "eat", "eats", "ate", "eaten",
    "export", "exports", "sue", "sues", "sign", "signs", "argue", "argues", "testify",
    "testifies", "sleep", "sleeps", "slept", "like", "likes", "drink", "drinks", "drank",
];

const ADJECTIVES: &[&str] = &[
    "good", "new", "first", "last", "long", "great", "little", "own", "other", "old", "right",
    "big", "high", "different", "small", "large", "next", "early", "young", "important", "few",
    "public", "bad", "same", "able", "legal", "weak", "strong", "solid", "wrong", "correct",
    "clear", "happy", "sad", "quick", "lazy", "brown", "red", "tall", "main", "civil",
    "criminal", "federal",
];

/// Nouns that the `-ing` / `-ed` verb heuristic would otherwise mis-tag.
const NOUN_EXCEPTIONS: &[&str] = &[
    "thing", "things", "king", "ring", "morning", "evening", "building", "meeting", "wedding",
    "ceiling", "bed", "need", "seed", "speed", "shed", "hundred", "spring", "string", "sibling",
    "hearing", "ruling", "filing", "proceeding", "pleading", "feed", "deed", "creed",
];

static LEXICON: Lazy<HashMap<&'static str, PartOfSpeech>> = Lazy::new(|| {
    let groups: [(&[&str], PartOfSpeech); 10] = [
        (NOUN_EXCEPTIONS, PartOfSpeech::Noun),
        (ADJECTIVES, PartOfSpeech::Adjective),
        (VERBS, PartOfSpeech::Verb),
        (ADVERBS, PartOfSpeech::Adverb),
        (SUBORDINATORS, PartOfSpeech::SubordinatingConjunction),
        (COORDINATORS, PartOfSpeech::CoordinatingConjunction),
        (ADPOSITIONS, PartOfSpeech::Adposition),
        (DETERMINERS, PartOfSpeech::Determiner),
        (PRONOUNS, PartOfSpeech::Pronoun),
        (AUXILIARIES, PartOfSpeech::Aux),
    ];

    // Later groups win, so closed classes override open-class entries.
    let mut lexicon = HashMap::new();
    for (words, pos) in groups {
        for word in words {
            lexicon.insert(*word, pos);
        }
    }
    lexicon.insert("not", PartOfSpeech::Particle);
    lexicon
});

fn is_closed_class(pos: PartOfSpeech) -> bool {
    !matches!(
        pos,
        PartOfSpeech::Noun
            | PartOfSpeech::Verb
            | PartOfSpeech::Adjective
            | PartOfSpeech::Adverb
    )
}

// ---------------------------------------------------------------------------
// LexiconTagger
// ---------------------------------------------------------------------------

/// Rule-and-lexicon English tagger.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexiconTagger;

impl LexiconTagger {
    pub fn new() -> Self {
        Self
    }

    fn tag_word(word: &str, index: usize) -> PartOfSpeech {
        if word.chars().all(|c| !c.is_alphanumeric()) {
            return PartOfSpeech::Punctuation;
        }
        if word.chars().any(|c| c.is_ascii_digit()) && word.chars().all(|c| !c.is_alphabetic()) {
            return PartOfSpeech::Numeral;
        }

        let lower = word.to_lowercase();
        let known = LEXICON.get(lower.as_str()).copied();
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);

        if let Some(pos) = known {
            if is_closed_class(pos) {
                return pos;
            }
        }
        if capitalized && index > 0 {
            return PartOfSpeech::ProperNoun;
        }
        if let Some(pos) = known {
            return pos;
        }

        if lower.ends_with("ly") {
            PartOfSpeech::Adverb
        } else if lower.len() > 4 && (lower.ends_with("ing") || lower.ends_with("ed")) {
            PartOfSpeech::Verb
        } else if lower.ends_with("ize") || lower.ends_with("ify") {
            PartOfSpeech::Verb
        } else if ["ous", "ful", "able", "ible", "ive", "less"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
        {
            PartOfSpeech::Adjective
        } else if capitalized {
            PartOfSpeech::ProperNoun
        } else {
            PartOfSpeech::Noun
        }
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, text: &str) -> Result<Vec<TaggedToken>, TagError> {
        let tokens = text
            .split_word_bounds()
            .filter(|segment| !segment.trim().is_empty())
            .enumerate()
            .map(|(index, segment)| TaggedToken {
                text: segment.to_string(),
                pos: Self::tag_word(segment, index),
            })
            .collect();
        Ok(tokens)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use PartOfSpeech::*;

    fn tags(text: &str) -> Vec<(String, PartOfSpeech)> {
        LexiconTagger::new()
            .tag(text)
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.pos))
            .collect()
    }

    fn pos_only(text: &str) -> Vec<PartOfSpeech> {
        tags(text).into_iter().map(|(_, pos)| pos).collect()
    }

    #[test]
    fn malformed_question() {
        assert_eq!(
            pos_only("What France is capital?"),
            vec![Pronoun, ProperNoun, Aux, Noun, Punctuation]
        );
    }

    #[test]
    fn well_formed_question_has_no_verb() {
        assert_eq!(
            pos_only("What is the capital of France?"),
            vec![Pronoun, Aux, Determiner, Noun, Adposition, ProperNoun, Punctuation]
        );
    }

    #[test]
    fn verbs_from_lexicon_and_suffix() {
        assert_eq!(
            pos_only("The clerk filed the motion yesterday."),
            vec![Determiner, Noun, Verb, Determiner, Noun, Adverb, Punctuation]
        );
        assert_eq!(pos_only("Where John went"), vec![Adverb, ProperNoun, Verb]);
    }

    #[test]
    fn noun_exceptions_are_not_verbs() {
        assert_eq!(pos_only("the hearing"), vec![Determiner, Noun]);
        assert_eq!(pos_only("the morning"), vec![Determiner, Noun]);
    }

    #[test]
    fn contractions_and_numbers() {
        let tagged = tags("They don't owe 500 dollars.");
        assert_eq!(tagged[1].0, "don't");
        assert_eq!(tagged[3], ("500".to_string(), Numeral));
    }

    #[test]
    fn capitalised_closed_class_keeps_its_tag() {
        assert_eq!(pos_only("The Court"), vec![Determiner, ProperNoun]);
        assert_eq!(pos_only("What The"), vec![Pronoun, Determiner]);
    }

    #[test]
    fn labels_follow_universal_tags() {
        assert_eq!(ProperNoun.label(), "PROPN");
        assert_eq!(Aux.label(), "AUX");
        assert!(Noun.is_nominal());
        assert!(!Verb.is_nominal());
    }
}
