pub mod appresult;
pub mod auth;
pub mod chat;
pub mod config;
pub mod db;
pub mod extract;
pub mod feed;
pub mod identity;
pub mod profiles;
pub mod requests;
pub mod rooms;
pub mod users;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method},
    middleware, Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppError, AppResult};
pub use config::Config;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub token_keys: auth::TokenKeys,
    pub relay: Arc<rooms::Relay>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, jwt_secret: &str) -> Self {
        Self {
            db_pool,
            token_keys: auth::TokenKeys::from_secret(jwt_secret.as_bytes()),
            relay: Arc::new(rooms::Relay::new()),
        }
    }
}

/// `{"message": ..., "data": ...}`, the shape of every successful response.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub message: String,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn json(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            message: message.into(),
            data,
        })
    }
}

/// Builds the whole HTTP surface. Login routes stay public; every other
/// route sits behind [`auth::require_auth`].
pub fn app(state: AppState, allowed_origin: &str) -> anyhow::Result<Router> {
    let cors = CorsLayer::new()
        .allow_origin(
            allowed_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("bad allowed origin {allowed_origin:?}"))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let protected = Router::new()
        .nest("/profile", profiles::router())
        .nest("/user", users::router())
        .nest("/request", requests::router())
        .nest("/feed", feed::router())
        .nest("/chat", chat::router())
        .merge(rooms::router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_auth));

    Ok(Router::new()
        .merge(auth::router())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}
