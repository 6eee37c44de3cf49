//! Realtime chat relay over WebSockets.
//!
//! Sockets join rooms keyed by [`RoomId`](crate::chat::RoomId) and every
//! message sent into a room is stored first, then pushed to each socket in it.
//! Delivery is best effort; clients catch up through `GET /chat/{id}`.

mod events;
mod relay;
mod ws;

use axum::{routing::get, Router};

use crate::AppState;

pub use events::{dispatch, ClientEvent, ServerEvent};
pub use relay::{ConnectionId, Relay};

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws::chat_socket))
}
