//! WebSocket ⇄ channel bridge for one connection.
//!
//! The socket is split; a reader task turns WebSocket messages into
//! [`InboundFrame`]s and a writer task serializes [`OutboundMessage`]s.  The
//! session itself runs on the connection's own task between the two.  When
//! the session returns, its outbound sender is dropped, the writer sends a
//! close frame, and the reader is aborted.
//!
//! When the client leaves first, the writer drops its receiver at once so the
//! session sees a closed outbound channel and stops queueing inference.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::{mpsc, oneshot};

use crate::pipeline::{InboundFrame, OutboundMessage, PipelineVariant, SessionPipeline};

use super::routes::AppState;

/// Serve one upgraded connection until its session closes.
pub async fn bridge_session(socket: WebSocket, state: AppState, variant: PipelineVariant) {
    let capacity = state.config.server.channel_capacity.max(1);
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (frame_tx, frame_rx) = mpsc::channel::<InboundFrame>(capacity);
    let (message_tx, mut message_rx) = mpsc::channel::<OutboundMessage>(capacity);
    let (gone_tx, mut gone_rx) = oneshot::channel::<()>();

    // Writer task: forward session messages, then close.
    let writer = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                message = message_rx.recv() => match message {
                    Some(message) => message,
                    None => break,
                },
                Ok(()) = &mut gone_rx => return,
            };
            let json = match message.to_json() {
                Ok(json) => json,
                Err(e) => {
                    log::error!("socket: failed to serialize message: {e}");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(json.into())).await.is_err() {
                return;
            }
        }
        let _ = ws_tx.send(Message::Close(None)).await;
    });

    // Reader task: forward frames until the client leaves or the server
    // shuts down.  A full frame queue backpressures the socket.
    let mut shutdown = state.shutdown_signal();
    let reader = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                msg = ws_rx.next() => msg,
                _ = shutdown.changed() => break,
            };
            let frame = match msg {
                Some(Ok(Message::Binary(bytes))) => InboundFrame::Audio(bytes.to_vec()),
                Some(Ok(Message::Text(text))) => InboundFrame::Text(text.to_string()),
                Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => {
                    let _ = gone_tx.send(());
                    break;
                }
                Some(Err(e)) => {
                    log::debug!("socket: receive failed: {e}");
                    let _ = gone_tx.send(());
                    break;
                }
            };
            if frame_tx.send(frame).await.is_err() {
                break;
            }
        }
    });

    let session = SessionPipeline::new(
        state.dispatcher.clone(),
        variant,
        state.config.audio.window_size(),
    );
    session.run(frame_rx, message_tx).await;

    reader.abort();
    let _ = writer.await;
}
