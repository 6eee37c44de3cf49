mod page;
mod select;

use axum::{routing::get, Router};

use crate::AppState;

pub use page::{Page, DEFAULT_LIMIT, MAX_LIMIT};
pub use select::compute_feed;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(select::feed))
}
