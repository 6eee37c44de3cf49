mod edit;
mod page;

use axum::{routing::{get, patch}, Router};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(page::profile).patch(edit::edit_profile))
        .route("/password", patch(edit::change_password))
}
