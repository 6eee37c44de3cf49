use axum::{debug_handler, extract::State, Json};
use sqlx::SqlitePool;

use crate::{
    extract::AppJson,
    identity::{self, Signup, User},
    AppResult, Envelope,
};

#[debug_handler]
pub(crate) async fn signup(
    State(db_pool): State<SqlitePool>,
    AppJson(body): AppJson<Signup>,
) -> AppResult<Json<Envelope<User>>> {
    let user = identity::register(&db_pool, body).await?;
    Ok(Envelope::json("User added successfully", user))
}
