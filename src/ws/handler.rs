//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::api::session::Session;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
///
/// The session header is read once at upgrade time; the connection follows
/// that user's profile events from the start.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Session(session): Session,
) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    tracing::debug!(user_id = ?session, "ws upgrade");
    ws.on_upgrade(move |socket| run_connection(socket, session, event_rx, state))
}
