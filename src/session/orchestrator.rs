//! Session orchestrator: drives one real-time connection.
//!
//! [`SessionOrchestrator`] consumes [`InboundFrame`]s from the transport
//! adapter over a `tokio::sync::mpsc` channel and writes replies through the
//! [`ConnectionRegistry`].
//!
//! # Flow
//!
//! ```text
//! register ─▶ Open ─▶ connection_established
//!   loop:
//!     ping            ─▶ pong
//!     text_input      ─▶ pipeline.analyze ─┬─ Ok  ─▶ analysis_result
//!                                          └─ Err ─▶ error
//!     anything else   ─▶ (ignored)
//!     Closed / transport error / send failure ─▶ break
//! Closing ─▶ Closed ─▶ deregister
//! ```
//!
//! Events are handled one at a time, so replies leave in the order their
//! events arrived.

use std::sync::Arc;

use tokio::sync::mpsc;

use super::pipeline::AnalysisPipeline;
use super::protocol::{parse_client_message, ClientMessage, ServerMessage};
use super::registry::ConnectionRegistry;
use super::state::{Session, SessionState};

/// What the transport adapter hands the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// One text frame, unparsed.
    Text(String),
    /// The peer closed the connection.
    Closed,
    /// The transport failed; the connection is unusable.
    TransportError(String),
}

pub struct SessionOrchestrator {
    session: Session,
    registry: ConnectionRegistry,
    pipeline: Arc<AnalysisPipeline>,
    features: Vec<String>,
}

impl SessionOrchestrator {
    pub fn new(
        registry: ConnectionRegistry,
        pipeline: Arc<AnalysisPipeline>,
        features: Vec<String>,
    ) -> Self {
        Self {
            session: Session::new(),
            registry,
            pipeline,
            features,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the session until the transport goes away.
    ///
    /// `outbound` receives every serialized reply; `inbound` delivers the
    /// client's frames.  Returns the session in its terminal state.
    pub async fn run(
        mut self,
        outbound: mpsc::Sender<String>,
        mut inbound: mpsc::Receiver<InboundFrame>,
    ) -> Session {
        let id = self.session.id();
        self.registry.register(id, outbound);

        if self.open().await {
            while let Some(frame) = inbound.recv().await {
                let keep_going = match frame {
                    InboundFrame::Text(raw) => self.handle_text(&raw).await,
                    InboundFrame::Closed => {
                        log::info!("session {id}: client disconnected");
                        false
                    }
                    InboundFrame::TransportError(e) => {
                        log::warn!("session {id}: transport error: {e}");
                        false
                    }
                };
                if !keep_going {
                    break;
                }
            }
        }

        self.session.close();
        self.registry.deregister(id);
        let lifetime = chrono::Utc::now() - self.session.created_at();
        log::debug!(
            "session {id}: orchestrator finished after {}s",
            lifetime.num_seconds()
        );
        self.session
    }

    // -----------------------------------------------------------------------
    // Event handlers
    // -----------------------------------------------------------------------

    /// Enter `Open` and send the acknowledgment.  `false` if it could not be
    /// delivered.
    async fn open(&mut self) -> bool {
        if let Err(e) = self.session.transition(SessionState::Open) {
            log::error!("session {}: {e}", self.session.id());
            return false;
        }
        self.reply(ServerMessage::connection_established(&self.features))
            .await
    }

    /// Handle one text frame.  Returns `false` when the session must end.
    async fn handle_text(&self, raw: &str) -> bool {
        match parse_client_message(raw) {
            Some(ClientMessage::Ping) => self.reply(ServerMessage::pong()).await,
            Some(ClientMessage::TextInput { text }) if !text.trim().is_empty() => {
                let message = match self.pipeline.analyze(&text).await {
                    Ok(result) => ServerMessage::AnalysisResult(result),
                    Err(e) => {
                        log::error!("session {}: analysis failed: {e}", self.session.id());
                        ServerMessage::processing_error()
                    }
                };
                self.reply(message).await
            }
            Some(ClientMessage::TextInput { .. }) => {
                log::debug!("session {}: ignoring empty text_input", self.session.id());
                true
            }
            None => true,
        }
    }

    async fn reply(&self, message: ServerMessage) -> bool {
        match self.registry.send(self.session.id(), &message).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("session {}: {e}", self.session.id());
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
