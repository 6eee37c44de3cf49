//! Connection requests between two users.
//!
//! A pair starts with no request. The sender opens one as `ignored` or
//! `interested`; only the recipient may move an `interested` request to
//! `accepted` or `rejected`. Every other state is final.

mod review;
mod send;
mod status;
mod store;

use axum::{routing::post, Router};

use crate::AppState;

pub use status::{RequestStatus, ReviewStatus, SendStatus};
pub use store::{connections, received, review, send, ConnectionRequest, ReceivedRequest};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/send/{status}/{to_user_id}", post(send::send_request))
        .route("/review/{status}/{request_id}", post(review::review_request))
}
