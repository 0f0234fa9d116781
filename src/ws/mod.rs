//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` pushes profile events of the session
//! user, answers `recheck_gate` with a fresh gate decision, and streams
//! prediction slots one by one at their reveal delays.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
