use axum::{
    debug_handler,
    extract::State,
    Extension, Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    extract::AppPath,
    identity::{self, User},
    AppError, AppResult, Envelope,
};

use super::{get_or_create_chat, history, ChatHistory};

#[debug_handler]
pub(crate) async fn chat_history(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppPath(target_user_id): AppPath<Uuid>,
) -> AppResult<Json<Envelope<ChatHistory>>> {
    if target_user_id == me.id {
        return Err(AppError::validation("can't chat with yourself"));
    }
    if identity::find_by_id(&db_pool, target_user_id).await?.is_none() {
        return Err(AppError::UnknownTarget);
    }

    let chat = get_or_create_chat(&db_pool, me.id, target_user_id).await?;
    let history = history(&db_pool, &chat).await?;

    Ok(Envelope::json(format!("{} messages", history.messages.len()), history))
}
