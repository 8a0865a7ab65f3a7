//! Process-wide service context.
//!
//! Built once at startup and shared read-only by every request handler and
//! session through an `Arc<AppContext>`.  The only mutable piece is the
//! [`ConnectionRegistry`], which synchronises itself.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::{AppConfig, AppPaths};
use crate::grammar::{
    GrammarCorrector, LanguageToolEngine, RuleEngineCorrector, StructuralRewriter,
    SupplementaryRules,
};
use crate::session::{AnalysisPipeline, ConnectionRegistry, DEFAULT_FEATURES};
use crate::spell::{DictionaryIndex, DictionarySuggester, DictionaryStatus, SpellingSuggester};
use crate::text::{LexiconTagger, SentenceSegmenter, UnicodeSentenceBoundaries};
use crate::tone::{ApiToneAnalyzer, ToneAnalyzer};

pub struct AppContext {
    pub config: AppConfig,
    pub segmenter: SentenceSegmenter,
    pub suggester: Arc<dyn SpellingSuggester>,
    pub corrector: Arc<dyn GrammarCorrector>,
    pub rewriter: StructuralRewriter,
    pub pipeline: Arc<AnalysisPipeline>,
    pub registry: ConnectionRegistry,
    pub dictionary_status: DictionaryStatus,
    pub dictionary_sources: Vec<String>,
    /// Non-fatal problems met during startup (e.g. a dictionary that failed
    /// to load).
    pub warnings: Vec<String>,
    pub tone: Option<Arc<dyn ToneAnalyzer>>,
    pub features: Vec<String>,
}

impl AppContext {
    /// Load dictionaries, connect to the rule engine and wire the analyzers.
    ///
    /// Fails when no dictionary loads or the rule engine is unreachable.
    pub async fn initialize(config: AppConfig) -> Result<Self> {
        let paths = AppPaths::new();

        let index = DictionaryIndex::load(&config.dictionary, &paths)
            .context("failed to build the spelling dictionary")?;
        log::info!(
            "dictionary: {} terms from {:?}",
            index.symspell().len(),
            index.sources()
        );

        let engine = LanguageToolEngine::connect(&config.grammar)
            .await
            .with_context(|| {
                format!(
                    "grammar engine unavailable at {}",
                    config.grammar.base_url
                )
            })?;
        let corrector: Arc<dyn GrammarCorrector> =
            Arc::new(SupplementaryRules::new(RuleEngineCorrector::new(engine)));

        let tone: Option<Arc<dyn ToneAnalyzer>> = if config.llm.enabled {
            log::info!("tone: enabled ({} via {})", config.llm.model, config.llm.base_url);
            Some(Arc::new(ApiToneAnalyzer::from_config(&config.llm)))
        } else {
            log::info!("tone: disabled");
            None
        };

        Ok(Self::from_parts(config, index, corrector, tone))
    }

    /// Assemble a context from already-built collaborators.
    pub fn from_parts(
        config: AppConfig,
        index: DictionaryIndex,
        corrector: Arc<dyn GrammarCorrector>,
        tone: Option<Arc<dyn ToneAnalyzer>>,
    ) -> Self {
        let dictionary_status = index.status().clone();
        let dictionary_sources = index.sources().to_vec();
        let warnings = index.warnings().to_vec();

        let suggester: Arc<dyn SpellingSuggester> = Arc::new(DictionarySuggester::new(
            Arc::new(index),
            config.dictionary.max_edit_distance,
        ));
        let rewriter = StructuralRewriter::new(Arc::new(LexiconTagger::new()));
        let pipeline = Arc::new(AnalysisPipeline::new(
            Arc::clone(&suggester),
            Arc::clone(&corrector),
            rewriter.clone(),
            Duration::from_secs(config.analysis.timeout_secs),
        ));

        Self {
            segmenter: SentenceSegmenter::new(Arc::new(UnicodeSentenceBoundaries)),
            suggester,
            corrector,
            rewriter,
            pipeline,
            registry: ConnectionRegistry::new(),
            dictionary_status,
            dictionary_sources,
            warnings,
            tone,
            features: DEFAULT_FEATURES.iter().map(|f| f.to_string()).collect(),
            config,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
