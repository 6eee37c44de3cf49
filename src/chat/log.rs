use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{db::ordered_pair, AppError, AppResult};

/// The one conversation between an unordered pair of users.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Chat {
    pub id: Uuid,
    pub user_low: Uuid,
    pub user_high: Uuid,
    pub created_at: OffsetDateTime,
}

impl Chat {
    pub fn participants(&self) -> [Uuid; 2] {
        [self.user_low, self.user_high]
    }

    pub fn has_participant(&self, user_id: Uuid) -> bool {
        self.user_low == user_id || self.user_high == user_id
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub sender_id: Uuid,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sender {
    #[sqlx(rename = "sender_id")]
    pub id: Uuid,
    // gone if the sender deleted their account
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryMessage {
    pub id: Uuid,
    #[sqlx(flatten)]
    pub sender: Sender,
    pub text: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatHistory {
    pub id: Uuid,
    pub participants: [Uuid; 2],
    pub messages: Vec<HistoryMessage>,
}

/// Finds the pair's chat, creating an empty one the first time.
pub async fn get_or_create_chat(db_pool: &SqlitePool, a: Uuid, b: Uuid) -> AppResult<Chat> {
    let (low, high) = ordered_pair(a, b);

    sqlx::query(
        "INSERT INTO chats (id,user_low,user_high,created_at) VALUES (?,?,?,?)
         ON CONFLICT (user_low,user_high) DO NOTHING",
    )
    .bind(Uuid::now_v7())
    .bind(low)
    .bind(high)
    .bind(OffsetDateTime::now_utc())
    .execute(db_pool)
    .await?;

    Ok(
        sqlx::query_as("SELECT * FROM chats WHERE user_low=? AND user_high=?")
            .bind(low)
            .bind(high)
            .fetch_one(db_pool)
            .await?,
    )
}

/// Appends to the chat's log. Messages are never edited or removed.
pub async fn append_message(
    db_pool: &SqlitePool,
    chat: &Chat,
    sender: Uuid,
    text: &str,
) -> AppResult<ChatMessage> {
    if !chat.has_participant(sender) {
        return Err(AppError::validation("sender is not part of this chat"));
    }

    Ok(
        sqlx::query_as(
            "INSERT INTO chat_messages (id,chat_id,sender_id,text,created_at) VALUES (?,?,?,?,?) RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(chat.id)
        .bind(sender)
        .bind(text)
        .bind(OffsetDateTime::now_utc())
        .fetch_one(db_pool)
        .await?,
    )
}

pub async fn history(db_pool: &SqlitePool, chat: &Chat) -> AppResult<ChatHistory> {
    let messages = sqlx::query_as(
        "SELECT m.id, m.sender_id, users.first_name, users.last_name, m.text, m.created_at
         FROM chat_messages m LEFT JOIN users ON users.id = m.sender_id
         WHERE m.chat_id=?
         ORDER BY m.rowid",
    )
    .bind(chat.id)
    .fetch_all(db_pool)
    .await?;

    Ok(ChatHistory {
        id: chat.id,
        participants: chat.participants(),
        messages,
    })
}
