//! Process-wide dictionary index built from a general-language and a
//! domain-specific frequency file.
//!
//! Each file holds one entry per line, whitespace separated, with the term
//! and its count at configurable column positions.  Lines that do not parse
//! are skipped.  Either source may be missing, but at least one must load.

use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::symspell::{SymSpell, SymSpellError};
use crate::config::{AppPaths, DictionaryConfig};

/// Label of the general-language source in `dictionary_sources`.
pub const GENERAL_SOURCE_NAME: &str = "English";

#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("failed to read dictionary {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dictionary {0} contains no usable entries")]
    Empty(PathBuf),

    #[error("no dictionaries could be loaded")]
    NoneLoaded,

    #[error("invalid index parameters: {0}")]
    Index(#[from] SymSpellError),
}

/// Which sources loaded, and how many entries each contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DictionaryStatus {
    pub general_loaded: bool,
    pub domain_loaded: bool,
    pub general_terms: usize,
    pub domain_terms: usize,
}

/// The merged, read-only lookup structure.
#[derive(Debug, Clone)]
pub struct DictionaryIndex {
    symspell: SymSpell,
    status: DictionaryStatus,
    sources: Vec<String>,
    warnings: Vec<String>,
}

impl DictionaryIndex {
    /// Load both configured sources into one index.
    ///
    /// A source that fails to load is recorded as a warning; the call fails
    /// only when neither source loads.
    pub fn load(config: &DictionaryConfig, paths: &AppPaths) -> Result<Self, DictionaryError> {
        let mut symspell = SymSpell::new(config.max_edit_distance, config.prefix_length)?;
        let mut status = DictionaryStatus::default();
        let mut sources = Vec::new();
        let mut warnings = Vec::new();

        if let Some(path) = &config.general_path {
            let path = paths.resolve_dictionary(path);
            match load_frequency_file(&mut symspell, &path, config.term_index, config.count_index)
            {
                Ok(entries) => {
                    log::info!("dictionary: loaded {entries} general terms from {}", path.display());
                    status.general_loaded = true;
                    status.general_terms = entries;
                    sources.push(GENERAL_SOURCE_NAME.to_string());
                }
                Err(e) => {
                    log::error!("dictionary: general dictionary failed: {e}");
                    warnings.push(format!("General dictionary failed: {e}"));
                }
            }
        }

        if let Some(path) = &config.domain_path {
            let path = paths.resolve_dictionary(path);
            match load_frequency_file(&mut symspell, &path, config.term_index, config.count_index)
            {
                Ok(entries) => {
                    log::info!(
                        "dictionary: loaded {entries} {} terms from {}",
                        config.domain_name,
                        path.display()
                    );
                    status.domain_loaded = true;
                    status.domain_terms = entries;
                    sources.push(config.domain_name.clone());
                }
                Err(e) => {
                    log::warn!("dictionary: {} dictionary failed: {e}", config.domain_name);
                    warnings.push(format!("{} dictionary failed: {e}", config.domain_name));
                }
            }
        }

        if !status.general_loaded && !status.domain_loaded {
            return Err(DictionaryError::NoneLoaded);
        }

        Ok(Self {
            symspell,
            status,
            sources,
            warnings,
        })
    }

    /// Index over an in-memory term list, reported as the general source.
    pub fn from_terms(
        terms: &[(&str, u64)],
        max_edit_distance: usize,
        prefix_length: usize,
    ) -> Result<Self, DictionaryError> {
        let mut symspell = SymSpell::new(max_edit_distance, prefix_length)?;
        for (term, count) in terms {
            symspell.add_entry(term, *count);
        }
        Ok(Self {
            status: DictionaryStatus {
                general_loaded: true,
                general_terms: terms.len(),
                ..DictionaryStatus::default()
            },
            symspell,
            sources: vec![GENERAL_SOURCE_NAME.to_string()],
            warnings: Vec::new(),
        })
    }

    pub fn symspell(&self) -> &SymSpell {
        &self.symspell
    }

    pub fn status(&self) -> &DictionaryStatus {
        &self.status
    }

    /// Labels of the sources that loaded, general first.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Load failures of individual sources.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Add every parseable line of `path` to `symspell`; returns the number of
/// entries read.
fn load_frequency_file(
    symspell: &mut SymSpell,
    path: &Path,
    term_index: usize,
    count_index: usize,
) -> Result<usize, DictionaryError> {
    let contents = std::fs::read_to_string(path).map_err(|source| DictionaryError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut entries = 0usize;
    let mut skipped = 0usize;
    for line in contents.lines() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        let parsed = columns.get(term_index).zip(
            columns
                .get(count_index)
                .and_then(|count| count.parse::<u64>().ok()),
        );
        match parsed {
            Some((term, count)) => {
                symspell.add_entry(term, count);
                entries += 1;
            }
            None if line.trim().is_empty() => {}
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("dictionary: skipped {skipped} malformed lines in {}", path.display());
    }
    if entries == 0 {
        return Err(DictionaryError::Empty(path.to_path_buf()));
    }
    Ok(entries)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::spell::symspell::Verbosity;

    fn write_dictionary(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write dictionary");
        file
    }

    fn config(general: Option<&Path>, domain: Option<&Path>) -> DictionaryConfig {
        DictionaryConfig {
            general_path: general.map(Path::to_path_buf),
            domain_path: domain.map(Path::to_path_buf),
            ..DictionaryConfig::default()
        }
    }

    #[test]
    fn merges_both_sources() {
        let general = write_dictionary("the 1000\nquick 50\n");
        let domain = write_dictionary("plaintiff 40\ntort 30\nestoppel 20\n");
        let cfg = config(Some(general.path()), Some(domain.path()));

        let index = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap();
        assert_eq!(
            index.status(),
            &DictionaryStatus {
                general_loaded: true,
                domain_loaded: true,
                general_terms: 2,
                domain_terms: 3,
            }
        );
        assert_eq!(index.sources(), &["English".to_string(), "Legal".to_string()]);
        assert!(index.warnings().is_empty());

        let found = index.symspell().lookup("plaintif", Verbosity::Top, 2).unwrap();
        assert_eq!(found[0].term, "plaintiff");
    }

    #[test]
    fn one_missing_source_is_a_warning() {
        let domain = write_dictionary("plaintiff 40\n");
        let cfg = config(Some(Path::new("/no/such/general.txt")), Some(domain.path()));

        let index = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap();
        assert!(!index.status().general_loaded);
        assert!(index.status().domain_loaded);
        assert_eq!(index.sources(), &["Legal".to_string()]);
        assert_eq!(index.warnings().len(), 1);
    }

    #[test]
    fn no_sources_is_fatal() {
        let cfg = config(Some(Path::new("/no/such/a.txt")), None);
        let err = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap_err();
        assert!(matches!(err, DictionaryError::NoneLoaded));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let general = write_dictionary("the 1000\nbroken\n\nword notanumber\nfox 20\n");
        let cfg = config(Some(general.path()), None);

        let index = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap();
        assert_eq!(index.status().general_terms, 2);
        assert_eq!(index.symspell().count("fox"), Some(20));
    }

    #[test]
    fn file_without_entries_does_not_count_as_loaded() {
        let general = write_dictionary("garbage line\n");
        let domain = write_dictionary("tort 5\n");
        let cfg = config(Some(general.path()), Some(domain.path()));

        let index = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap();
        assert!(!index.status().general_loaded);
    }

    #[test]
    fn custom_column_positions() {
        let general = write_dictionary("1000 the\n20 fox\n");
        let cfg = DictionaryConfig {
            term_index: 1,
            count_index: 0,
            ..config(Some(general.path()), None)
        };

        let index = DictionaryIndex::load(&cfg, &AppPaths::new()).unwrap();
        assert_eq!(index.symspell().count("the"), Some(1000));
    }
}
