use axum::{
    debug_handler,
    extract::State,
    Extension, Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{extract::AppPath, identity::User, AppResult, Envelope};

use super::{store, ConnectionRequest, ReviewStatus};

#[debug_handler]
pub(crate) async fn review_request(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppPath((status, request_id)): AppPath<(String, Uuid)>,
) -> AppResult<Json<Envelope<ConnectionRequest>>> {
    let decision: ReviewStatus = status.parse()?;
    let request = store::review(&db_pool, me.id, request_id, decision).await?;

    Ok(Envelope::json(format!("Connection request {}", request.status), request))
}
