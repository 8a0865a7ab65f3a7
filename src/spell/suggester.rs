//! Spelling suggestions for a single token.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use super::dictionary::DictionaryIndex;
use super::symspell::{SymSpellError, Verbosity};

#[derive(Debug, Clone, Error)]
pub enum SpellError {
    #[error("dictionary lookup failed: {0}")]
    Lookup(#[from] SymSpellError),
}

/// Ranked correction candidates for a token.
///
/// Results never contain the token itself (case-insensitive) or duplicates,
/// and hold at most `max_results` entries.  Callers treat an error as "no
/// suggestions".
pub trait SpellingSuggester: Send + Sync {
    fn suggest(
        &self,
        token: &str,
        max_results: usize,
        verbosity: Verbosity,
    ) -> Result<Vec<String>, SpellError>;
}

/// [`SpellingSuggester`] backed by the shared [`DictionaryIndex`].
#[derive(Debug, Clone)]
pub struct DictionarySuggester {
    index: Arc<DictionaryIndex>,
    max_edit_distance: usize,
}

impl DictionarySuggester {
    pub fn new(index: Arc<DictionaryIndex>, max_edit_distance: usize) -> Self {
        Self {
            index,
            max_edit_distance,
        }
    }
}

impl SpellingSuggester for DictionarySuggester {
    fn suggest(
        &self,
        token: &str,
        max_results: usize,
        verbosity: Verbosity,
    ) -> Result<Vec<String>, SpellError> {
        let candidates = self
            .index
            .symspell()
            .lookup(token, verbosity, self.max_edit_distance)?;

        let input = token.to_lowercase();
        let mut seen = HashSet::new();
        let suggestions = candidates
            .into_iter()
            .map(|candidate| candidate.term)
            .filter(|term| term.to_lowercase() != input)
            .filter(|term| seen.insert(term.clone()))
            .take(max_results)
            .collect();

        Ok(suggestions)
    }
}

/// Run `suggester`, turning a lookup failure into an empty list.
pub fn suggest_or_empty(
    suggester: &dyn SpellingSuggester,
    token: &str,
    max_results: usize,
    verbosity: Verbosity,
) -> Vec<String> {
    match suggester.suggest(token, max_results, verbosity) {
        Ok(suggestions) => suggestions,
        Err(e) => {
            log::warn!("spell: suggestions for '{token}' failed: {e}");
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
