use axum::{debug_handler, extract::State, Extension, Json};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    extract::AppQuery,
    identity::{PublicProfile, User, PUBLIC_COLUMNS},
    AppResult, Envelope,
};

use super::Page;

/// Users `viewer` hasn't interacted with yet, in storage order. Anyone on
/// either side of a request involving the viewer is hidden, whatever its status.
pub async fn compute_feed(
    db_pool: &SqlitePool,
    viewer: Uuid,
    page: Page,
) -> AppResult<Vec<PublicProfile>> {
    let sql = format!(
        "SELECT {PUBLIC_COLUMNS} FROM users
         WHERE users.id <> ? AND users.id NOT IN (
             SELECT from_user_id FROM connection_requests WHERE to_user_id=?
             UNION
             SELECT to_user_id FROM connection_requests WHERE from_user_id=?
         )
         ORDER BY users.rowid LIMIT ? OFFSET ?"
    );

    Ok(sqlx::query_as(&sql)
        .bind(viewer)
        .bind(viewer)
        .bind(viewer)
        .bind(i64::from(page.limit()))
        .bind(page.skip() as i64)
        .fetch_all(db_pool)
        .await?)
}

#[debug_handler]
pub(crate) async fn feed(
    State(db_pool): State<SqlitePool>,
    Extension(me): Extension<User>,
    AppQuery(page): AppQuery<Page>,
) -> AppResult<Json<Envelope<Vec<PublicProfile>>>> {
    let users = compute_feed(&db_pool, me.id, page).await?;
    Ok(Envelope::json(format!("{} users found", users.len()), users))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::{db, requests::{self, SendStatus}, testing};

    use super::*;

    #[tokio::test]
    async fn excludes_viewer_and_anyone_with_a_request() {
        let db_pool = db::in_memory().await.unwrap();
        let viewer = testing::user(&db_pool, "Viewer").await;
        let mut others = Vec::new();
        for name in ["Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot"] {
            others.push(testing::user(&db_pool, name).await);
        }

        // one of each status, both directions
        requests::send(&db_pool, viewer.id, others[0].id, SendStatus::Ignored).await.unwrap();
        requests::send(&db_pool, viewer.id, others[1].id, SendStatus::Interested).await.unwrap();
        let incoming = requests::send(&db_pool, others[2].id, viewer.id, SendStatus::Interested).await.unwrap();
        let rejected = requests::send(&db_pool, others[3].id, viewer.id, SendStatus::Interested).await.unwrap();
        requests::review(&db_pool, viewer.id, incoming.id, requests::ReviewStatus::Accepted).await.unwrap();
        requests::review(&db_pool, viewer.id, rejected.id, requests::ReviewStatus::Rejected).await.unwrap();
        // requests not involving the viewer don't hide anyone
        requests::send(&db_pool, others[4].id, others[5].id, SendStatus::Interested).await.unwrap();

        let feed = compute_feed(&db_pool, viewer.id, Page::default()).await.unwrap();
        let ids: Vec<Uuid> = feed.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![others[4].id, others[5].id]);

        // and the other side sees the viewer gone too
        let theirs: HashSet<Uuid> = compute_feed(&db_pool, others[0].id, Page::default())
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert!(!theirs.contains(&viewer.id));
        assert!(!theirs.contains(&others[0].id));
    }

    #[tokio::test]
    async fn pagination_follows_storage_order() {
        let db_pool = db::in_memory().await.unwrap();
        let viewer = testing::user(&db_pool, "Viewer").await;
        let mut expected = Vec::new();
        for i in 0..55 {
            expected.push(testing::user(&db_pool, &format!("User{i:02}")).await.id);
        }

        let all = compute_feed(&db_pool, viewer.id, Page::new(1, 1000)).await.unwrap();
        assert_eq!(all.len(), 50);

        let first: Vec<Uuid> = compute_feed(&db_pool, viewer.id, Page::new(1, 10))
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        let second: Vec<Uuid> = compute_feed(&db_pool, viewer.id, Page::new(2, 10))
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(first, expected[..10]);
        assert_eq!(second, expected[10..20]);

        let last = compute_feed(&db_pool, viewer.id, Page::new(6, 10)).await.unwrap();
        assert_eq!(last.len(), 5);
    }

    #[tokio::test]
    async fn heavily_connected_viewer_still_gets_a_feed() {
        let db_pool = db::in_memory().await.unwrap();
        let viewer = testing::user(&db_pool, "Viewer").await;
        for i in 0..1200 {
            let other = testing::user(&db_pool, &format!("Seen{i:04}")).await;
            requests::send(&db_pool, viewer.id, other.id, SendStatus::Ignored).await.unwrap();
        }
        let fresh = testing::user(&db_pool, "Fresh").await;

        let feed = compute_feed(&db_pool, viewer.id, Page::default()).await.unwrap();
        assert_eq!(feed.iter().map(|p| p.id).collect::<Vec<_>>(), vec![fresh.id]);
    }
}
