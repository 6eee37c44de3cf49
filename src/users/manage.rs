use axum::{
    debug_handler,
    extract::State,
    Extension, Json,
};
use serde_json::{Map, Value};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    extract::{AppJson, AppPath},
    identity::{self, User},
    AppError, AppResult, Envelope,
};

fn ensure_owner(me: &User, user_id: Uuid) -> AppResult<()> {
    if me.id == user_id { Ok(()) } else { Err(AppError::NotOwner) }
}

#[debug_handler]
pub(crate) async fn edit_user(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppPath(user_id): AppPath<Uuid>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> AppResult<Json<Envelope<User>>> {
    ensure_owner(&me, user_id)?;

    let user = identity::update_profile(&db_pool, me, body).await?;
    Ok(Envelope::json("edited", user))
}

#[debug_handler]
pub(crate) async fn delete_user(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppPath(user_id): AppPath<Uuid>,
) -> AppResult<Json<Envelope<User>>> {
    if identity::find_by_id(&db_pool, user_id).await?.is_none() {
        return Err(AppError::NotFound("user"));
    }
    ensure_owner(&me, user_id)?;

    let user = identity::delete_user(&db_pool, user_id).await?;
    tracing::info!(%user_id, "user deleted");
    Ok(Envelope::json("deleted", user))
}
