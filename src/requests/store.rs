use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    appresult::unique_or,
    db::ordered_pair,
    identity::{self, PublicProfile, PUBLIC_COLUMNS},
    AppError, AppResult,
};

use super::{RequestStatus, ReviewStatus, SendStatus};

#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: RequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A pending request addressed to the caller, with the sender resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivedRequest {
    #[sqlx(rename = "request_id")]
    pub id: Uuid,
    pub status: RequestStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[sqlx(flatten)]
    pub from_user: PublicProfile,
}

/// Opens a request from `from` to `to`. A pair holds at most one request,
/// whichever side sent it; the unique pair index backs the explicit check.
pub async fn send(
    db_pool: &SqlitePool,
    from: Uuid,
    to: Uuid,
    status: SendStatus,
) -> AppResult<ConnectionRequest> {
    if from == to {
        return Err(AppError::SelfRequest);
    }
    if identity::find_by_id(db_pool, to).await?.is_none() {
        return Err(AppError::UnknownTarget);
    }

    let (low, high) = ordered_pair(from, to);
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM connection_requests WHERE user_low=? AND user_high=?")
            .bind(low)
            .bind(high)
            .fetch_optional(db_pool)
            .await?;
    if existing.is_some() {
        return Err(AppError::DuplicateRequest);
    }

    let now = OffsetDateTime::now_utc();
    let request: ConnectionRequest = sqlx::query_as(
        "INSERT INTO connection_requests (id,from_user_id,to_user_id,status,user_low,user_high,created_at,updated_at)
         VALUES (?,?,?,?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(from)
    .bind(to)
    .bind(RequestStatus::from(status))
    .bind(low)
    .bind(high)
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
    .map_err(|e| unique_or(e, AppError::DuplicateRequest))?;

    tracing::info!(request_id = %request.id, %from, %to, status = %request.status, "connection request sent");
    Ok(request)
}

/// Moves an `interested` request to `decision`. Only its recipient may do so.
pub async fn review(
    db_pool: &SqlitePool,
    reviewer: Uuid,
    request_id: Uuid,
    decision: ReviewStatus,
) -> AppResult<ConnectionRequest> {
    let request: ConnectionRequest = sqlx::query_as("SELECT * FROM connection_requests WHERE id=?")
        .bind(request_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or(AppError::NotFound("connection request"))?;

    if request.to_user_id != reviewer {
        return Err(AppError::NotReviewable);
    }
    let next = request.status.review(decision)?;

    // a concurrent review may have won since the read
    let reviewed: ConnectionRequest = sqlx::query_as(
        "UPDATE connection_requests SET status=?,updated_at=?
         WHERE id=? AND to_user_id=? AND status='interested' RETURNING *",
    )
    .bind(next)
    .bind(OffsetDateTime::now_utc())
    .bind(request_id)
    .bind(reviewer)
    .fetch_optional(db_pool)
    .await?
    .ok_or(AppError::NotReviewable)?;

    tracing::info!(%request_id, %reviewer, status = %reviewed.status, "connection request reviewed");
    Ok(reviewed)
}

pub async fn received(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<ReceivedRequest>> {
    let sql = format!(
        "SELECT r.id AS request_id, r.status, r.created_at, {PUBLIC_COLUMNS}
         FROM connection_requests r JOIN users ON users.id = r.from_user_id
         WHERE r.to_user_id=? AND r.status='interested'
         ORDER BY r.rowid"
    );

    Ok(sqlx::query_as(&sql).bind(user_id).fetch_all(db_pool).await?)
}

/// Accepted connections, each resolved to whichever side isn't `user_id`.
pub async fn connections(db_pool: &SqlitePool, user_id: Uuid) -> AppResult<Vec<PublicProfile>> {
    let sql = format!(
        "SELECT {PUBLIC_COLUMNS}
         FROM connection_requests r JOIN users
           ON users.id = CASE WHEN r.from_user_id=? THEN r.to_user_id ELSE r.from_user_id END
         WHERE r.status='accepted' AND (r.from_user_id=? OR r.to_user_id=?)
         ORDER BY r.rowid"
    );

    Ok(sqlx::query_as(&sql)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(db_pool)
        .await?)
}

#[cfg(test)]
mod tests {
    use crate::{db, testing};

    use super::*;

    #[tokio::test]
    async fn self_request_always_fails() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;

        for status in [SendStatus::Ignored, SendStatus::Interested] {
            assert!(matches!(
                send(&db_pool, alice.id, alice.id, status).await,
                Err(AppError::SelfRequest)
            ));
        }
    }

    #[tokio::test]
    async fn unknown_target_fails() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;

        assert!(matches!(
            send(&db_pool, alice.id, Uuid::now_v7(), SendStatus::Interested).await,
            Err(AppError::UnknownTarget)
        ));
    }

    #[tokio::test]
    async fn second_send_in_either_direction_is_duplicate() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;
        let brian = testing::user(&db_pool, "Brian").await;

        let sent = send(&db_pool, alice.id, brian.id, SendStatus::Ignored).await.unwrap();
        assert_eq!(sent.status, RequestStatus::Ignored);
        assert_eq!((sent.from_user_id, sent.to_user_id), (alice.id, brian.id));

        for (from, to) in [(alice.id, brian.id), (brian.id, alice.id)] {
            assert!(matches!(
                send(&db_pool, from, to, SendStatus::Interested).await,
                Err(AppError::DuplicateRequest)
            ));
        }
    }

    #[tokio::test]
    async fn pair_index_rejects_racing_insert() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;
        let brian = testing::user(&db_pool, "Brian").await;
        send(&db_pool, alice.id, brian.id, SendStatus::Interested).await.unwrap();

        // what a writer that slipped past the read would attempt
        let (low, high) = ordered_pair(brian.id, alice.id);
        let now = OffsetDateTime::now_utc();
        let err = sqlx::query(
            "INSERT INTO connection_requests (id,from_user_id,to_user_id,status,user_low,user_high,created_at,updated_at)
             VALUES (?,?,?,'interested',?,?,?,?)",
        )
        .bind(Uuid::now_v7())
        .bind(brian.id)
        .bind(alice.id)
        .bind(low)
        .bind(high)
        .bind(now)
        .bind(now)
        .execute(&db_pool)
        .await
        .unwrap_err();

        assert!(matches!(unique_or(err, AppError::DuplicateRequest), AppError::DuplicateRequest));
    }

    #[tokio::test]
    async fn review_rules() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;
        let brian = testing::user(&db_pool, "Brian").await;
        let carla = testing::user(&db_pool, "Carla").await;

        let interested = send(&db_pool, alice.id, brian.id, SendStatus::Interested).await.unwrap();
        let ignored = send(&db_pool, carla.id, brian.id, SendStatus::Ignored).await.unwrap();

        // the sender can't review their own request
        assert!(matches!(
            review(&db_pool, alice.id, interested.id, ReviewStatus::Accepted).await,
            Err(AppError::NotReviewable)
        ));
        // nor can anyone review an ignored one
        assert!(matches!(
            review(&db_pool, brian.id, ignored.id, ReviewStatus::Accepted).await,
            Err(AppError::NotReviewable)
        ));
        assert!(matches!(
            review(&db_pool, brian.id, Uuid::now_v7(), ReviewStatus::Accepted).await,
            Err(AppError::NotFound(_))
        ));

        let accepted = review(&db_pool, brian.id, interested.id, ReviewStatus::Accepted).await.unwrap();
        assert_eq!(accepted.status, RequestStatus::Accepted);

        // accepted is terminal
        assert!(matches!(
            review(&db_pool, brian.id, interested.id, ReviewStatus::Rejected).await,
            Err(AppError::NotReviewable)
        ));
    }

    #[tokio::test]
    async fn received_and_connections() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = testing::user(&db_pool, "Alice").await;
        let brian = testing::user(&db_pool, "Brian").await;
        let carla = testing::user(&db_pool, "Carla").await;

        let from_alice = send(&db_pool, alice.id, brian.id, SendStatus::Interested).await.unwrap();
        send(&db_pool, carla.id, brian.id, SendStatus::Interested).await.unwrap();

        let pending = received(&db_pool, brian.id).await.unwrap();
        let senders: Vec<Uuid> = pending.iter().map(|r| r.from_user.id).collect();
        assert_eq!(senders, vec![alice.id, carla.id]);
        assert_eq!(pending[0].id, from_alice.id);
        assert!(received(&db_pool, alice.id).await.unwrap().is_empty());

        review(&db_pool, brian.id, from_alice.id, ReviewStatus::Accepted).await.unwrap();

        let of_alice = connections(&db_pool, alice.id).await.unwrap();
        let of_brian = connections(&db_pool, brian.id).await.unwrap();
        assert_eq!(of_alice, vec![PublicProfile::from(&brian)]);
        assert_eq!(of_brian, vec![PublicProfile::from(&alice)]);
        assert!(connections(&db_pool, carla.id).await.unwrap().is_empty());

        assert_eq!(received(&db_pool, brian.id).await.unwrap().len(), 1);
    }
}
