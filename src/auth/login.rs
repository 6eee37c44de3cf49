use axum::{
    debug_handler,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{extract::AppJson, identity, AppError, AppResult, AppState, Envelope};

use super::{cookie::credential_cookie, TokenKeys};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LoginBody {
    #[serde(default)]
    email_id: String,
    #[serde(default)]
    password: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(db_pool): State<SqlitePool>,
    State(token_keys): State<TokenKeys>,
    AppJson(LoginBody { email_id, password }): AppJson<LoginBody>,
) -> AppResult<Response> {
    // don't tell callers which half was wrong
    let user = identity::authenticate(&db_pool, &email_id, &password)
        .await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::BadPassword,
            e => e,
        })?;

    let token = token_keys.issue(user.id)?;
    tracing::info!(user_id = %user.id, "user logged in");

    let greeting = format!("Welcome back, {}", user.first_name);
    Ok((
        [(header::SET_COOKIE, credential_cookie(token).to_string())],
        Envelope::json(greeting, user),
    )
        .into_response())
}
