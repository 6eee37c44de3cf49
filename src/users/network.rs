use axum::{debug_handler, extract::State, Extension, Json};
use sqlx::SqlitePool;

use crate::{
    identity::{PublicProfile, User},
    requests::{self, ReceivedRequest},
    AppResult, Envelope,
};

#[debug_handler]
pub(crate) async fn received_requests(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
) -> AppResult<Json<Envelope<Vec<ReceivedRequest>>>> {
    let pending = requests::received(&db_pool, me.id).await?;
    Ok(Envelope::json("Data fetched successfully", pending))
}

#[debug_handler]
pub(crate) async fn connections(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
) -> AppResult<Json<Envelope<Vec<PublicProfile>>>> {
    let connections = requests::connections(&db_pool, me.id).await?;
    Ok(Envelope::json(format!("{} connections", connections.len()), connections))
}
