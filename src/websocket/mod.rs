//! WebSocket Handler Module
//!
//! Real-time chat relay. A socket joins one or more conversations, receives their
//! history, and from then on gets every message broadcast to those conversations.
//!
//! Frames are JSON objects of the form `{"event": ..., "data": ...}`.

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::api::app_state::AppState;

pub mod hub;

pub use hub::{ConversationHub, ServerEvent};

/// Events sent by the client
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    JoinConversation(String),
    SendMessage(SendMessagePayload),
}

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub conversation_id: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

type Outbound = mpsc::UnboundedSender<ServerEvent>;

/// WebSocket handler using Axum's WebSocket support
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

pub fn create_websocket_router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_handler))
}

/// Handle the WebSocket connection
async fn handle_socket(ws: WebSocket, state: AppState) {
    let (sender, receiver) = ws.split();
    let connection_id = uuid::Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", connection_id);

    let (outbound, rx) = mpsc::unbounded_channel();

    tokio::join! {
        handle_forward(sender, rx, connection_id.clone()),
        handle_receive(receiver, outbound, state, connection_id.clone())
    };

    debug!("WebSocket connection closed: {}", connection_id);
}

/// Write queued events to the socket until every outbound sender is gone
async fn handle_forward(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<ServerEvent>,
    connection_id: String,
) {
    while let Some(event) = rx.recv().await {
        let text = match serde_json::to_string(&event) {
            Ok(text) => text,
            Err(e) => {
                error!("Failed to serialize event for {}: {}", connection_id, e);
                continue;
            }
        };

        if let Err(e) = sender.send(Message::Text(text)).await {
            error!("Failed to send event to {}: {}", connection_id, e);
            break;
        }
    }
}

/// Handle incoming WebSocket messages
async fn handle_receive(
    mut receiver: SplitStream<WebSocket>,
    outbound: Outbound,
    state: AppState,
    connection_id: String,
) {
    let mut subscriptions: HashMap<String, JoinHandle<()>> = HashMap::new();

    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                process_message(&text, &outbound, &state, &mut subscriptions).await;
            }
            Ok(Message::Close(_)) => {
                debug!("Client initiated close for {}", connection_id);
                break;
            }
            Ok(_) => {}
            Err(e) => {
                error!("WebSocket error for {}: {}", connection_id, e);
                break;
            }
        }
    }

    // Forwarders hold outbound clones; abort them so the writer can finish
    for (conversation_id, handle) in subscriptions.drain() {
        handle.abort();
        let _ = handle.await;
        state.hub.release(&conversation_id);
    }
}

/// Process one client frame
async fn process_message(
    text: &str,
    outbound: &Outbound,
    state: &AppState,
    subscriptions: &mut HashMap<String, JoinHandle<()>>,
) {
    let event: ClientEvent = match serde_json::from_str(text) {
        Ok(event) => event,
        Err(e) => {
            let _ = outbound.send(ServerEvent::Error(format!("Invalid message format: {}", e)));
            return;
        }
    };

    match event {
        ClientEvent::JoinConversation(conversation_id) => {
            if !subscriptions.contains_key(&conversation_id) {
                let rx = state.hub.subscribe(&conversation_id);
                let handle = tokio::spawn(forward_conversation(rx, outbound.clone()));
                subscriptions.insert(conversation_id.clone(), handle);
            }

            match state.chat.join(&conversation_id).await {
                Ok(history) => {
                    let _ = outbound.send(ServerEvent::ConversationHistory(history));
                }
                Err(e) => {
                    error!("Failed to load conversation {}: {}", conversation_id, e);
                    let _ = outbound.send(ServerEvent::Error(e.to_string()));
                }
            }
        }
        ClientEvent::SendMessage(payload) => {
            if payload.message.trim().is_empty() {
                let _ = outbound.send(ServerEvent::Error("Message cannot be empty".to_string()));
                return;
            }

            let chat = state.chat.clone();
            tokio::spawn(async move {
                chat.send_message(
                    &payload.conversation_id,
                    &payload.message,
                    payload.timestamp.as_deref(),
                )
                .await;
            });
        }
    }
}

/// Relay a conversation's broadcast stream into this socket's outbound queue
async fn forward_conversation(mut rx: broadcast::Receiver<ServerEvent>, outbound: Outbound) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if outbound.send(event).is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("WebSocket listener lagged, skipped {} events", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
