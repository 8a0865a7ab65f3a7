//! Real-time sessions.
//!
//! A transport adapter (see `server::ws`) turns socket frames into
//! [`InboundFrame`]s and hands them to a [`SessionOrchestrator`], which runs
//! the [`AnalysisPipeline`] per event and replies through the
//! [`ConnectionRegistry`].

pub mod orchestrator;
pub mod pipeline;
pub mod protocol;
pub mod registry;
pub mod state;

pub use orchestrator::{InboundFrame, SessionOrchestrator};
pub use pipeline::{AnalysisPipeline, PipelineError, MAX_SUGGESTIONS};
pub use protocol::{
    parse_client_message, unix_timestamp, AnalysisResult, ClientMessage, GrammarCheck,
    ServerMessage, DEFAULT_FEATURES,
};
pub use registry::{ConnectionRegistry, RegistryError};
pub use state::{Session, SessionError, SessionState};
