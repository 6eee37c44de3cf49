use std::sync::Arc;

use axum::{
    debug_handler,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    Extension,
};
use futures_util::{SinkExt, StreamExt};
use sqlx::SqlitePool;

use crate::{identity::User, AppState};

use super::{events, ClientEvent, Relay};

#[debug_handler(state = AppState)]
pub(crate) async fn chat_socket(
    State(db_pool): State<SqlitePool>,
    State(relay): State<Arc<Relay>>,
    Extension(me): Extension<User>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve(socket, db_pool, relay, me))
}

async fn serve(socket: WebSocket, db_pool: SqlitePool, relay: Arc<Relay>, me: User) {
    let (connection, mut outbox) = relay.connect().await;
    let (mut sender, mut receiver) = socket.split();
    tracing::debug!(user_id = %me.id, connection, "socket connected");

    let mut writer = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            let Ok(frame) = serde_json::to_string(&event) else {
                continue;
            };
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    loop {
        tokio::select! {
            frame = receiver.next() => {
                let text = match frame {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => continue,
                };
                let Ok(event) = serde_json::from_str::<ClientEvent>(text.as_str()) else {
                    continue;
                };

                if let Err(e) = events::dispatch(&db_pool, &relay, connection, &me, event).await {
                    tracing::warn!(user_id = %me.id, error = %e, "dropped chat event");
                }
            }
            _ = &mut writer => break,
        }
    }

    relay.disconnect(connection).await;
    writer.abort();
    tracing::debug!(user_id = %me.id, connection, "socket closed");
}
