use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    chat::{self, RoomId},
    identity::{self, User},
    AppError, AppResult,
};

use super::{ConnectionId, Relay};

/// Frames a client sends, as `{"event": "...", "data": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinChat {
        logged_in_user: Uuid,
        target_user_id: Uuid,
    },
    #[serde(rename_all = "camelCase")]
    SendMessage {
        logged_in_user: Uuid,
        target_user_id: Uuid,
        text: String,
    },
}

/// Frames the relay pushes to room members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    #[serde(rename_all = "camelCase")]
    MessageReceived {
        first_name: String,
        text: String,
        logged_in_user: Uuid,
    },
}

impl ClientEvent {
    fn logged_in_user(&self) -> Uuid {
        match self {
            ClientEvent::JoinChat { logged_in_user, .. }
            | ClientEvent::SendMessage { logged_in_user, .. } => *logged_in_user,
        }
    }
}

/// Handles one inbound frame from `me` on `connection`.
///
/// A message is written to the chat log before it is fanned out, so the
/// stored history always contains everything any client saw live.
pub async fn dispatch(
    db_pool: &SqlitePool,
    relay: &Relay,
    connection: ConnectionId,
    me: &User,
    event: ClientEvent,
) -> AppResult<()> {
    if event.logged_in_user() != me.id {
        return Err(AppError::validation("loggedInUser doesn't match the session"));
    }

    match event {
        ClientEvent::JoinChat { target_user_id, .. } => {
            let room = RoomId::derive(me.id, target_user_id);
            if relay.join(connection, room.clone()).await {
                tracing::info!(user_id = %me.id, %room, "{} joined room", me.first_name);
            }
        }
        ClientEvent::SendMessage { target_user_id, text, .. } => {
            if text.trim().is_empty() {
                return Err(AppError::validation("message text is empty"));
            }
            if identity::find_by_id(db_pool, target_user_id).await?.is_none() {
                return Err(AppError::UnknownTarget);
            }

            let chat = chat::get_or_create_chat(db_pool, me.id, target_user_id).await?;
            chat::append_message(db_pool, &chat, me.id, &text).await?;

            let room = RoomId::derive(me.id, target_user_id);
            let delivered = relay
                .broadcast(
                    &room,
                    &ServerEvent::MessageReceived {
                        first_name: me.first_name.clone(),
                        text,
                        logged_in_user: me.id,
                    },
                )
                .await;
            tracing::debug!(%room, delivered, "message relayed");
        }
    }

    Ok(())
}
