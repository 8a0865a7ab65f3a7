//! Configuration module for the grammar assistance service.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! `AppPaths` for cross-platform directories, and TOML persistence via
//! `AppConfig::load` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AnalysisConfig, AppConfig, DictionaryConfig, GrammarConfig, LlmConfig, ServerConfig,
    CONFIG_ENV_VAR,
};
