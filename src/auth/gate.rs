use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;

use crate::{identity, identity::User, AppError, AppResult, AppState};

use super::{cookie::read_token, TokenKeys};

/// Resolves a credential to the user it was issued for.
pub async fn resolve(db_pool: &SqlitePool, keys: &TokenKeys, token: &str) -> AppResult<User> {
    let user_id = keys.verify(token)?;
    identity::find_by_id(db_pool, user_id)
        .await?
        .ok_or(AppError::UnknownIdentity)
}

/// Rejects the request before any handler runs unless it carries a valid
/// credential; otherwise the resolved [`User`] is put in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let token = read_token(request.headers()).ok_or(AppError::MissingCredential)?;
    let user = resolve(&state.db_pool, &state.token_keys, &token).await?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}
