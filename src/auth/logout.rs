use axum::{debug_handler, http::header, response::IntoResponse};

use crate::Envelope;

use super::cookie::cleared_cookie;

#[debug_handler]
pub(crate) async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, cleared_cookie().to_string())],
        Envelope::json("Logout successful", ()),
    )
}
