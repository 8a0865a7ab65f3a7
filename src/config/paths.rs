//! Cross-platform application paths using the `dirs` crate.
//!
//! Config dir:
//!   Windows: %APPDATA%\grammar-assist\
//!   macOS:   ~/Library/Application Support/grammar-assist/
//!   Linux:   ~/.config/grammar-assist/
//!
//! Data dir (dictionaries):
//!   Windows: %LOCALAPPDATA%\grammar-assist\
//!   macOS:   ~/Library/Application Support/grammar-assist/
//!   Linux:   ~/.local/share/grammar-assist/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory searched for dictionary files referenced by bare file name.
    pub dictionaries_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "grammar-assist";

    /// Resolves all paths using the `dirs` crate, falling back to the current
    /// directory when the platform provides none.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            dictionaries_dir: data_dir.join("dictionaries"),
        }
    }

    /// Resolve a configured dictionary path.
    ///
    /// Paths that exist as given (absolute, or relative to the working
    /// directory) are used unchanged; otherwise the file name is looked up
    /// in [`dictionaries_dir`](Self::dictionaries_dir).
    pub fn resolve_dictionary(&self, configured: &std::path::Path) -> PathBuf {
        if configured.exists() {
            return configured.to_path_buf();
        }
        match configured.file_name() {
            Some(name) => {
                let candidate = self.dictionaries_dir.join(name);
                if candidate.exists() {
                    candidate
                } else {
                    configured.to_path_buf()
                }
            }
            None => configured.to_path_buf(),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_are_non_empty() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.to_str().is_some_and(|s| !s.is_empty()));
        assert!(paths
            .settings_file
            .file_name()
            .is_some_and(|n| n == "settings.toml"));
        assert!(paths.dictionaries_dir.ends_with("dictionaries"));
    }

    #[test]
    fn existing_path_is_used_unchanged() {
        let file = tempfile::NamedTempFile::new().expect("temp file");
        let paths = AppPaths::new();
        assert_eq!(paths.resolve_dictionary(file.path()), file.path());
    }

    #[test]
    fn missing_path_is_returned_as_configured() {
        let paths = AppPaths::new();
        let configured = std::path::Path::new("no/such/dir/not-a-dictionary-file.txt");
        assert_eq!(paths.resolve_dictionary(configured), configured);
    }
}
