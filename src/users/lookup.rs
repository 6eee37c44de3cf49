use axum::{
    debug_handler,
    extract::State,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{
    extract::AppQuery,
    identity::{self, User},
    AppError, AppResult, Envelope,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupQuery {
    #[serde(default)]
    email_id: String,
}

#[debug_handler]
pub(crate) async fn by_email(
    State(db_pool): State<SqlitePool>,
    AppQuery(LookupQuery { email_id }): AppQuery<LookupQuery>,
) -> AppResult<Json<Envelope<Vec<User>>>> {
    let users = identity::find_by_email(&db_pool, &email_id).await?;
    if users.is_empty() {
        return Err(AppError::NotFound("user"));
    }

    Ok(Envelope::json(format!("{} users found", users.len()), users))
}
