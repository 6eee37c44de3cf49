mod lookup;
mod manage;
mod network;

use axum::{routing::{get, patch}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(lookup::by_email))
        .route("/{user_id}", patch(manage::edit_user).delete(manage::delete_user))
        .route("/requests/received", get(network::received_requests))
        .route("/connections", get(network::connections))
}
