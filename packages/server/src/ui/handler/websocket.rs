//! WebSocket connection handlers.
//!
//! Each connection runs two tasks:
//!
//! - reader: reads frames one at a time and dispatches them to the use cases
//! - writer (`pusher_loop`): drains the connection's outbound channel into the socket
//!
//! If the writer fails first, the reader is asked to stop; it only stops while
//! waiting for the next frame, so a use case already in progress always finishes.
//! The disconnect use case runs after the reader has finished.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::sync::{mpsc, oneshot};

use crate::{domain::ConnectionId, ui::state::AppState};

use super::dispatch::dispatch_frame;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let max_frame_bytes = state.max_frame_bytes;
    ws.max_message_size(max_frame_bytes)
        .max_frame_size(max_frame_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver for events addressed to this connection
/// * `sender` - WebSocket sink to send messages to this client
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(msg.into())).await {
                tracing::debug!("Outbound send failed: {}", e);
                break;
            }
        }
    })
}

/// Spawns the reader task for one connection.
///
/// Frames are handled strictly in arrival order: the next frame is not read
/// until the previous one has been fully processed.
fn reader_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    connection_id: ConnectionId,
    mut shutdown: oneshot::Receiver<()>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let frame = tokio::select! {
                _ = &mut shutdown => {
                    tracing::debug!("Reader for '{}' stopped by writer", connection_id.as_str());
                    break;
                }
                frame = receiver.next() => frame,
            };

            let msg = match frame {
                Some(Ok(msg)) => msg,
                Some(Err(e)) => {
                    tracing::error!("WebSocket error on '{}': {}", connection_id.as_str(), e);
                    break;
                }
                None => break,
            };

            match msg {
                Message::Text(text) => {
                    dispatch_frame(&state, &connection_id, text.as_str()).await;
                }
                Message::Binary(_) => {
                    tracing::debug!(
                        "Ignoring binary frame from '{}'",
                        connection_id.as_str()
                    );
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", connection_id.as_str());
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                Message::Ping(_) | Message::Pong(_) => {}
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, receiver) = socket.split();

    // 1. 接続 ID の払い出しと送信チャンネルの登録
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_participant_usecase.execute(tx).await;
    tracing::info!("Connection '{}' established", connection_id.as_str());

    // 2. 読み書きのタスクを起動
    let mut send_task = pusher_loop(rx, sender);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let mut recv_task = reader_loop(receiver, state.clone(), connection_id.clone(), shutdown_rx);

    // 3. どちらかが終わるまで待つ
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => {
            let _ = shutdown_tx.send(());
            if let Err(e) = recv_task.await {
                tracing::error!("Reader task for '{}' failed: {}", connection_id.as_str(), e);
            }
        }
    };

    // 4. 切断処理（Registry から外し、ルームに通知する）
    match state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        Some(participant) => tracing::info!(
            "Connection '{}' ({}) closed",
            connection_id.as_str(),
            participant.name.as_str()
        ),
        None => tracing::info!(
            "Connection '{}' closed before joining a room",
            connection_id.as_str()
        ),
    }
}
