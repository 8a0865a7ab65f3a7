//! Spelling: a symmetric-delete fuzzy index, dictionary loading, and the
//! suggester the analysis pipeline consumes.

pub mod dictionary;
pub mod suggester;
pub mod symspell;

pub use dictionary::{DictionaryError, DictionaryIndex, DictionaryStatus, GENERAL_SOURCE_NAME};
pub use suggester::{suggest_or_empty, DictionarySuggester, SpellError, SpellingSuggester};
pub use symspell::{Suggestion, SymSpell, SymSpellError, Verbosity};
