use sqlx::{types::Json, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::identity::{Signup, User, DEFAULT_ABOUT, DEFAULT_PHOTO_URL};

pub(crate) const PASSWORD: &str = "Secret#123";

pub(crate) fn signup(first_name: &str, email: &str) -> Signup {
    Signup {
        first_name: first_name.to_owned(),
        last_name: "Tester".to_owned(),
        email_id: email.to_owned(),
        password: PASSWORD.to_owned(),
        ..Default::default()
    }
}

/// Inserts `<first_name>@example.com` directly, skipping password hashing.
/// The stored hash matches no password.
pub(crate) async fn user(db_pool: &SqlitePool, first_name: &str) -> User {
    let now = OffsetDateTime::now_utc();
    sqlx::query_as(
        "INSERT INTO users (id,first_name,last_name,email,password,photo_url,about,skills,created_at,updated_at)
         VALUES (?,?,'Tester',?,'!',?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(first_name)
    .bind(format!("{}@example.com", first_name.to_lowercase()))
    .bind(DEFAULT_PHOTO_URL)
    .bind(DEFAULT_ABOUT)
    .bind(Json(Vec::<String>::new()))
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
    .unwrap()
}
