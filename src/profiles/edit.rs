use axum::{debug_handler, extract::State, Extension, Json};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::SqlitePool;

use crate::{
    extract::AppJson,
    identity::{self, User},
    AppResult, Envelope,
};

#[debug_handler]
pub(crate) async fn edit_profile(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppJson(body): AppJson<Map<String, Value>>,
) -> AppResult<Json<Envelope<User>>> {
    let user = identity::update_profile(&db_pool, me, body).await?;
    Ok(Envelope::json(
        format!("{}, your profile updated successfully", user.first_name),
        user,
    ))
}

#[derive(Deserialize)]
pub(crate) struct PasswordBody {
    #[serde(default)]
    password: String,
}

#[debug_handler]
pub(crate) async fn change_password(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppJson(PasswordBody { password }): AppJson<PasswordBody>,
) -> AppResult<Json<Envelope<()>>> {
    identity::set_password(&db_pool, me.id, password).await?;
    tracing::info!(user_id = %me.id, "password changed");

    Ok(Envelope::json(format!("Password updated for {}", me.first_name), ()))
}
