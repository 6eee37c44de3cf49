use axum::{
    debug_handler,
    extract::State,
    Extension, Json,
};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{extract::AppPath, identity::User, AppResult, Envelope};

use super::{store, ConnectionRequest, SendStatus};

#[debug_handler]
pub(crate) async fn send_request(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppPath((status, to_user_id)): AppPath<(String, Uuid)>,
) -> AppResult<Json<Envelope<ConnectionRequest>>> {
    let status: SendStatus = status.parse()?;
    let request = store::send(&db_pool, me.id, to_user_id, status).await?;

    Ok(Envelope::json("Connection request sent successfully", request))
}
