//! WebSocket connection state machine.
//!
//! Handles the read/write loop for a single WebSocket connection,
//! dispatching incoming commands and forwarding filtered events.
//! Predictions run in their own task and feed an outbound queue.

use std::time::Duration;

use axum::extract::ws::{Message, WebSocket};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use super::messages::{SlotPayload, WsCommand, WsMessage, WsMessageType};
use super::subscription::SubscriptionManager;
use crate::app_state::AppState;
use crate::domain::prediction::PredictionInput;
use crate::domain::{DashboardEvent, UserId};
use crate::error::GatewayError;

type WsSender = SplitSink<WebSocket, Message>;

/// Replies produced off the read loop (streamed prediction slots) queue
/// here until the loop writes them.
const OUTBOX_CAPACITY: usize = 32;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Reads commands from the client and dispatches them.
/// - Forwards events of followed users from the [`broadcast::Receiver`];
///   events that can change the gate are followed by a fresh gate decision.
/// - Writes prediction slots streamed by background tasks, so a running
///   prediction never holds up commands or events.
pub async fn run_connection(
    socket: WebSocket,
    session: Option<UserId>,
    mut event_rx: broadcast::Receiver<DashboardEvent>,
    state: AppState,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (outbox_tx, mut outbox_rx) = mpsc::channel::<WsMessage>(OUTBOX_CAPACITY);
    let mut subs = SubscriptionManager::new(session);

    loop {
        tokio::select! {
            // Incoming message from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let reply = handle_text_message(text.as_str(), session, &mut subs, &state, &outbox_tx).await;
                        if let Some(reply) = reply
                            && !send(&mut ws_tx, &reply).await
                        {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
            // Event from EventBus
            event = event_rx.recv() => {
                match event {
                    Ok(dashboard_event) => {
                        if subs.matches(dashboard_event.user_id())
                            && !forward_event(&mut ws_tx, &dashboard_event, &state).await
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(lagged = n, "ws client lagged behind event bus");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
            // Reply from a background task
            Some(reply) = outbox_rx.recv() => {
                if !send(&mut ws_tx, &reply).await {
                    break;
                }
            }
        }
    }

    tracing::debug!(user_id = ?session, "ws connection closed");
}

async fn send(ws_tx: &mut WsSender, msg: &WsMessage) -> bool {
    ws_tx.send(Message::text(msg.to_json())).await.is_ok()
}

/// Runs a prediction and queues its slots, each once its reveal delay has
/// elapsed. Stops early when the connection has gone away.
async fn stream_prediction(
    state: AppState,
    user_id: UserId,
    input: PredictionInput,
    id: String,
    outbox: mpsc::Sender<WsMessage>,
) {
    let slots = match state.prediction_service.predict(user_id, input).await {
        Ok(slots) => slots,
        Err(e) => {
            let _ = outbox.send(error_reply(id, &e)).await;
            return;
        }
    };
    let start = Instant::now();
    let total = slots.len();
    for (index, slot) in slots.iter().enumerate() {
        tokio::time::sleep_until(start + Duration::from_millis(slot.reveal_after_ms)).await;
        let payload = serde_json::to_value(SlotPayload { index, total, slot }).unwrap_or_default();
        let msg = WsMessage::new(id.clone(), WsMessageType::Response, payload);
        if outbox.send(msg).await.is_err() {
            tracing::debug!(%user_id, "connection closed during prediction reveal");
            return;
        }
    }
}

async fn forward_event(ws_tx: &mut WsSender, event: &DashboardEvent, state: &AppState) -> bool {
    let payload = serde_json::to_value(event).unwrap_or_default();
    if !send(ws_tx, &WsMessage::event(payload)).await {
        return false;
    }
    if !event.affects_gate() {
        return true;
    }
    let decision = state
        .profile_service
        .evaluate_gate(Some(event.user_id()))
        .await;
    let payload = serde_json::json!({
        "event_type": "gate_changed",
        "decision": decision,
    });
    send(ws_tx, &WsMessage::event(payload)).await
}

/// Handles a text message from the client. Returns the immediate reply,
/// or `None` when the reply is streamed through `outbox`.
async fn handle_text_message(
    text: &str,
    session: Option<UserId>,
    subs: &mut SubscriptionManager,
    state: &AppState,
    outbox: &mpsc::Sender<WsMessage>,
) -> Option<WsMessage> {
    let Ok(msg) = serde_json::from_str::<WsMessage>(text) else {
        return Some(WsMessage::error("", 400, "malformed JSON"));
    };
    let Ok(command) = serde_json::from_value::<WsCommand>(msg.payload) else {
        return Some(WsMessage::error(msg.id, 404, "unknown command"));
    };

    match command {
        WsCommand::Subscribe { user_ids } => {
            let accepted = subs.subscribe(&parse_ids(&user_ids));
            Some(WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "subscribed": accepted.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "count": subs.count(),
                }),
            ))
        }
        WsCommand::Unsubscribe { user_ids } => {
            let ids = parse_ids(&user_ids);
            subs.unsubscribe(&ids);
            Some(WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::json!({
                    "unsubscribed": ids.iter().map(ToString::to_string).collect::<Vec<_>>(),
                    "remaining_count": subs.count(),
                }),
            ))
        }
        WsCommand::RecheckGate => {
            let decision = state.profile_service.evaluate_gate(session).await;
            Some(WsMessage::new(
                msg.id,
                WsMessageType::Response,
                serde_json::to_value(decision).unwrap_or_default(),
            ))
        }
        WsCommand::Predict { input } => {
            let Some(user_id) = session else {
                return Some(error_reply(msg.id, &GatewayError::Unauthorized));
            };
            tokio::spawn(stream_prediction(
                state.clone(),
                user_id,
                input,
                msg.id,
                outbox.clone(),
            ));
            None
        }
    }
}

fn error_reply(id: String, err: &GatewayError) -> WsMessage {
    WsMessage::error(id, err.error_code(), err.to_string())
}

fn parse_ids(raw: &[String]) -> Vec<UserId> {
    raw.iter().filter_map(|s| s.parse::<UserId>().ok()).collect()
}
