//! Symmetric-delete fuzzy index.
//!
//! Every dictionary term contributes the deletes of its prefix (up to the
//! configured edit distance) to an index.  A lookup generates the deletes of
//! the input's prefix and verifies each candidate with the true
//! Damerau-Levenshtein distance, so lookup cost depends on the input length
//! rather than on the dictionary size.  All lengths are counted in `char`s.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Verbosity
// ---------------------------------------------------------------------------

/// How many candidates a lookup returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
    /// The single best candidate.
    Top,
    /// Every candidate at the smallest distance found.
    Closest,
    /// Every candidate within the edit distance, exact match included.
    #[default]
    All,
}

impl FromStr for Verbosity {
    type Err = SymSpellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top" => Ok(Verbosity::Top),
            "closest" => Ok(Verbosity::Closest),
            "all" => Ok(Verbosity::All),
            other => Err(SymSpellError::UnknownVerbosity(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Suggestion / SymSpellError
// ---------------------------------------------------------------------------

/// One lookup candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub term: String,
    pub distance: usize,
    pub count: u64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SymSpellError {
    #[error("lookup edit distance {requested} exceeds dictionary maximum {max}")]
    EditDistanceTooLarge { requested: usize, max: usize },

    #[error("prefix length {prefix_length} must exceed max edit distance {max_edit_distance}")]
    InvalidPrefixLength {
        prefix_length: usize,
        max_edit_distance: usize,
    },

    #[error("unknown verbosity '{0}' (expected top, closest or all)")]
    UnknownVerbosity(String),
}

// ---------------------------------------------------------------------------
// SymSpell
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SymSpell {
    /// Delete variant -> terms it was generated from.
    deletes: HashMap<String, Vec<String>>,
    /// Term -> frequency count.
    words: HashMap<String, u64>,
    max_dictionary_edit_distance: usize,
    prefix_length: usize,
    /// Longest term in chars.
    max_length: usize,
}

impl SymSpell {
    pub fn new(
        max_dictionary_edit_distance: usize,
        prefix_length: usize,
    ) -> Result<Self, SymSpellError> {
        if prefix_length == 0 || prefix_length <= max_dictionary_edit_distance {
            return Err(SymSpellError::InvalidPrefixLength {
                prefix_length,
                max_edit_distance: max_dictionary_edit_distance,
            });
        }
        Ok(Self {
            deletes: HashMap::new(),
            words: HashMap::new(),
            max_dictionary_edit_distance,
            prefix_length,
            max_length: 0,
        })
    }

    pub fn max_dictionary_edit_distance(&self) -> usize {
        self.max_dictionary_edit_distance
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn count(&self, term: &str) -> Option<u64> {
        self.words.get(term).copied()
    }

    /// Add `term` with frequency `count`.
    ///
    /// A term already present keeps its index entries and has its count
    /// increased (saturating).  Returns `true` when the term is new.
    pub fn add_entry(&mut self, term: &str, count: u64) -> bool {
        if term.is_empty() {
            return false;
        }
        if let Some(existing) = self.words.get_mut(term) {
            *existing = existing.saturating_add(count);
            return false;
        }

        self.words.insert(term.to_string(), count);
        self.max_length = self.max_length.max(term.chars().count());

        for variant in self.prefix_deletes(term) {
            self.deletes.entry(variant).or_default().push(term.to_string());
        }
        true
    }

    /// Candidates for `input` within `max_edit_distance`, ordered by
    /// distance, then descending count, then term.
    pub fn lookup(
        &self,
        input: &str,
        verbosity: Verbosity,
        max_edit_distance: usize,
    ) -> Result<Vec<Suggestion>, SymSpellError> {
        if max_edit_distance > self.max_dictionary_edit_distance {
            return Err(SymSpellError::EditDistanceTooLarge {
                requested: max_edit_distance,
                max: self.max_dictionary_edit_distance,
            });
        }

        let input_len = input.chars().count();
        if input_len.saturating_sub(max_edit_distance) > self.max_length {
            return Ok(Vec::new());
        }

        let mut suggestions = Vec::new();
        let mut considered: HashSet<&str> = HashSet::new();

        if let Some((term, &count)) = self.words.get_key_value(input) {
            suggestions.push(Suggestion {
                term: term.clone(),
                distance: 0,
                count,
            });
            considered.insert(term.as_str());
            if verbosity != Verbosity::All {
                return Ok(suggestions);
            }
        }
        if max_edit_distance == 0 {
            return Ok(suggestions);
        }

        for variant in self.prefix_deletes(input) {
            let Some(terms) = self.deletes.get(&variant) else {
                continue;
            };
            for term in terms {
                if !considered.insert(term.as_str()) {
                    continue;
                }
                let term_len = term.chars().count();
                if term_len.abs_diff(input_len) > max_edit_distance {
                    continue;
                }
                let distance = strsim::damerau_levenshtein(input, term);
                if distance <= max_edit_distance {
                    suggestions.push(Suggestion {
                        term: term.clone(),
                        distance,
                        count: self.words.get(term).copied().unwrap_or(0),
                    });
                }
            }
        }

        suggestions.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.term.cmp(&b.term))
        });

        match verbosity {
            Verbosity::Top => suggestions.truncate(1),
            Verbosity::Closest => {
                if let Some(best) = suggestions.first().map(|s| s.distance) {
                    suggestions.retain(|s| s.distance == best);
                }
            }
            Verbosity::All => {}
        }

        Ok(suggestions)
    }

    /// The prefix of `word` plus every string reachable from it by deleting
    /// up to `max_dictionary_edit_distance` chars.
    fn prefix_deletes(&self, word: &str) -> HashSet<String> {
        let prefix: String = word.chars().take(self.prefix_length).collect();

        let mut variants = HashSet::new();
        variants.insert(prefix.clone());
        let mut frontier = vec![prefix];

        for _ in 0..self.max_dictionary_edit_distance {
            let mut next = Vec::new();
            for edit in &frontier {
                let chars: Vec<char> = edit.chars().collect();
                for skip in 0..chars.len() {
                    let variant: String = chars
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != skip)
                        .map(|(_, c)| *c)
                        .collect();
                    if variants.insert(variant.clone()) {
                        next.push(variant);
                    }
                }
            }
            frontier = next;
        }

        variants
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
