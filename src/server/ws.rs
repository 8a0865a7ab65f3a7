//! WebSocket transport adapter for real-time sessions.
//!
//! The socket is split into two tasks around a [`SessionOrchestrator`]:
//!
//! ```text
//! socket rx ─▶ reader task ─▶ mpsc<InboundFrame> ─▶ orchestrator
//! orchestrator ─▶ registry ─▶ mpsc<String> ─▶ writer task ─▶ socket tx
//! ```
//!
//! The writer ends when the orchestrator deregisters the session (dropping
//! the last sender); the reader is aborted once the orchestrator returns.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use super::context::AppContext;
use crate::session::{InboundFrame, SessionOrchestrator};

const OUTBOUND_CAPACITY: usize = 64;
const INBOUND_CAPACITY: usize = 16;

pub async fn realtime(ws: WebSocketUpgrade, State(ctx): State<Arc<AppContext>>) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, ctx))
}

async fn serve_socket(socket: WebSocket, ctx: Arc<AppContext>) {
    let (mut sink, mut stream) = socket.split();
    let (outbound_tx, mut outbound_rx) = mpsc::channel::<String>(OUTBOUND_CAPACITY);
    let (inbound_tx, inbound_rx) = mpsc::channel::<InboundFrame>(INBOUND_CAPACITY);

    let writer = tokio::spawn(async move {
        while let Some(text) = outbound_rx.recv().await {
            if let Err(e) = sink.send(Message::Text(text.into())).await {
                log::debug!("ws: send failed: {e}");
                break;
            }
        }
        let _ = sink.close().await;
    });

    let reader = tokio::spawn(async move {
        while let Some(frame) = stream.next().await {
            let inbound = match frame {
                Ok(Message::Text(text)) => InboundFrame::Text(text.as_str().to_owned()),
                Ok(Message::Close(_)) => InboundFrame::Closed,
                Ok(Message::Binary(_)) => {
                    log::debug!("ws: ignoring binary frame");
                    continue;
                }
                // Ping/pong control frames are answered by the transport.
                Ok(_) => continue,
                Err(e) => InboundFrame::TransportError(e.to_string()),
            };

            let last = !matches!(inbound, InboundFrame::Text(_));
            if inbound_tx.send(inbound).await.is_err() || last {
                return;
            }
        }
        let _ = inbound_tx.send(InboundFrame::Closed).await;
    });

    let orchestrator = SessionOrchestrator::new(
        ctx.registry.clone(),
        Arc::clone(&ctx.pipeline),
        ctx.features.clone(),
    );
    let session = orchestrator.run(outbound_tx, inbound_rx).await;

    reader.abort();
    if let Err(e) = writer.await {
        log::warn!("ws: writer task failed: {e}");
    }
    log::info!(
        "ws: session {} ended ({} open)",
        session.id(),
        ctx.registry.count()
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
