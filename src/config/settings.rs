//! Service settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section is `#[serde(default)]`, so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "GRAMMAR_ASSIST_CONFIG";

// ---------------------------------------------------------------------------
// ServerConfig
// ---------------------------------------------------------------------------

/// Listener settings for the HTTP / WebSocket server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind, e.g. `"0.0.0.0"` or `"127.0.0.1"`.
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Route of the real-time WebSocket endpoint.
    pub realtime_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8000,
            realtime_path: "/ws/realtime".into(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ---------------------------------------------------------------------------
// DictionaryConfig
// ---------------------------------------------------------------------------

/// Where the spelling dictionaries live and how the fuzzy index is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// General-language frequency dictionary (`term count` per line).
    pub general_path: Option<PathBuf>,
    /// Domain-specific dictionary merged into the same index.
    pub domain_path: Option<PathBuf>,
    /// Display name of the domain dictionary (reported as a source).
    pub domain_name: String,
    /// Largest edit distance the index is built for and queried with.
    pub max_edit_distance: usize,
    /// Number of leading characters used to build delete variants.
    pub prefix_length: usize,
    /// Column holding the term.
    pub term_index: usize,
    /// Column holding the frequency count.
    pub count_index: usize,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            general_path: Some(PathBuf::from("data/frequency_dictionary_en.txt")),
            domain_path: Some(PathBuf::from("data/legal_dictionary.txt")),
            domain_name: "Legal".into(),
            max_edit_distance: 2,
            prefix_length: 7,
            term_index: 0,
            count_index: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// GrammarConfig
// ---------------------------------------------------------------------------

/// Connection settings for the LanguageTool rule engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrammarConfig {
    /// Base URL of a LanguageTool server (`/v2/check` is appended).
    pub base_url: String,
    /// Language variant passed to every check.
    pub language: String,
    /// Native language of the writer, enables false-friend rules.
    pub mother_tongue: Option<String>,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8081".into(),
            language: "en-US".into(),
            mother_tongue: Some("en".into()),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AnalysisConfig
// ---------------------------------------------------------------------------

/// Limits applied to one real-time analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// A pipeline run taking longer than this is abandoned and reported as
    /// an `error` event.
    pub timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

// ---------------------------------------------------------------------------
// LlmConfig
// ---------------------------------------------------------------------------

/// Settings for the LLM-backed tone report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether `/analyze_tone` calls out to the model at all.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible API (`/v1/chat/completions` is
    /// appended).
    pub base_url: String,
    /// API key. When `None` the `GROQ_API_KEY` environment variable is used.
    pub api_key: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).
    pub temperature: f32,
    /// Maximum seconds to wait for a response.
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://api.groq.com/openai".into(),
            api_key: None,
            model: "llama-3.3-70b-versatile".into(),
            temperature: 0.2,
            timeout_secs: 45,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level service configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use grammar_assist::config::AppConfig;
///
/// // Returns Default when no file exists.
/// let config = AppConfig::load().unwrap();
/// println!("listening on {}", config.server.bind_addr());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub dictionary: DictionaryConfig,
    pub grammar: GrammarConfig,
    pub analysis: AnalysisConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from `$GRAMMAR_ASSIST_CONFIG`, or from the
    /// platform-appropriate `settings.toml` when the variable is unset.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::settings_path())
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved settings file location.
    pub fn settings_path() -> PathBuf {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => AppPaths::new().settings_file,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
