mod history;
mod log;
mod room_id;

use axum::{routing::get, Router};

use crate::AppState;

pub use log::{
    append_message, get_or_create_chat, history, Chat, ChatHistory, ChatMessage, HistoryMessage,
    Sender,
};
pub use room_id::RoomId;

pub fn router() -> Router<AppState> {
    Router::new().route("/{target_user_id}", get(history::chat_history))
}
