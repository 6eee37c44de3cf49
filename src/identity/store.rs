use serde_json::{Map, Value};
use sqlx::{types::Json, SqlitePool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{appresult::unique_or, AppError, AppResult};

use super::{
    hash_password, validate, verify_password, Signup, User, DEFAULT_ABOUT, DEFAULT_PHOTO_URL,
};

pub async fn register(db_pool: &SqlitePool, signup: Signup) -> AppResult<User> {
    validate::signup(&signup)?;
    let email = validate::email(&signup.email_id)?;
    let password = hash_password(signup.password).await?;

    let now = OffsetDateTime::now_utc();
    let user: User = sqlx::query_as(
        "INSERT INTO users (id,first_name,last_name,email,password,age,gender,photo_url,about,skills,created_at,updated_at)
         VALUES (?,?,?,?,?,?,?,?,?,?,?,?) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(signup.first_name.trim())
    .bind(signup.last_name.trim())
    .bind(&email)
    .bind(password)
    .bind(signup.age)
    .bind(signup.gender)
    .bind(DEFAULT_PHOTO_URL)
    .bind(DEFAULT_ABOUT)
    .bind(Json(Vec::<String>::new()))
    .bind(now)
    .bind(now)
    .fetch_one(db_pool)
    .await
    .map_err(|e| unique_or(e, AppError::DuplicateEmail))?;

    tracing::info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok(user)
}

/// Unknown emails surface as `NotFound`, wrong passwords as `BadPassword`.
pub async fn authenticate(db_pool: &SqlitePool, email: &str, password: &str) -> AppResult<User> {
    let email = email.trim().to_lowercase();
    let user: User = sqlx::query_as("SELECT * FROM users WHERE email=?")
        .bind(&email)
        .fetch_optional(db_pool)
        .await?
        .ok_or(AppError::NotFound("user"))?;

    if !verify_password(password.to_owned(), user.password.clone()).await? {
        return Err(AppError::BadPassword);
    }

    Ok(user)
}

pub async fn find_by_id(db_pool: &SqlitePool, id: Uuid) -> AppResult<Option<User>> {
    Ok(
        sqlx::query_as("SELECT * FROM users WHERE id=?")
            .bind(id)
            .fetch_optional(db_pool)
            .await?,
    )
}

pub async fn find_by_email(db_pool: &SqlitePool, email: &str) -> AppResult<Vec<User>> {
    Ok(
        sqlx::query_as("SELECT * FROM users WHERE email=? ORDER BY rowid")
            .bind(email.trim().to_lowercase())
            .fetch_all(db_pool)
            .await?,
    )
}

/// Applies an allow-listed patch to `user` and stores the result.
pub async fn update_profile(
    db_pool: &SqlitePool,
    mut user: User,
    body: Map<String, Value>,
) -> AppResult<User> {
    let patch = validate::profile_patch(body)?;

    if let Some(first_name) = patch.first_name {
        user.first_name = first_name.trim().to_owned();
    }
    if let Some(last_name) = patch.last_name {
        user.last_name = last_name.trim().to_owned();
    }
    if let Some(photo_url) = patch.photo_url {
        user.photo_url = photo_url;
    }
    if let Some(about) = patch.about {
        user.about = about;
    }
    if let Some(gender) = patch.gender {
        user.gender = Some(gender);
    }
    if let Some(age) = patch.age {
        user.age = Some(age);
    }
    if let Some(skills) = patch.skills {
        user.skills = Json(skills);
    }

    let updated: Option<User> = sqlx::query_as(
        "UPDATE users SET first_name=?,last_name=?,photo_url=?,about=?,gender=?,age=?,skills=?,updated_at=?
         WHERE id=? RETURNING *",
    )
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.photo_url)
    .bind(&user.about)
    .bind(user.gender)
    .bind(user.age)
    .bind(&user.skills)
    .bind(OffsetDateTime::now_utc())
    .bind(user.id)
    .fetch_optional(db_pool)
    .await?;

    updated.ok_or(AppError::NotFound("user"))
}

pub async fn set_password(db_pool: &SqlitePool, id: Uuid, raw: String) -> AppResult<()> {
    validate::strong_password(&raw)?;
    let hash = hash_password(raw).await?;

    let result = sqlx::query("UPDATE users SET password=?,updated_at=? WHERE id=?")
        .bind(hash)
        .bind(OffsetDateTime::now_utc())
        .bind(id)
        .execute(db_pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("user"));
    }
    Ok(())
}

/// Removes the record only. Requests and chats naming it are left behind and
/// skipped by every read that joins on `users`.
pub async fn delete_user(db_pool: &SqlitePool, id: Uuid) -> AppResult<User> {
    let deleted: Option<User> = sqlx::query_as("DELETE FROM users WHERE id=? RETURNING *")
        .bind(id)
        .fetch_optional(db_pool)
        .await?;

    deleted.ok_or(AppError::NotFound("user"))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::{db, identity::Gender, testing::signup};

    use super::*;

    #[tokio::test]
    async fn register_hashes_and_normalizes() {
        let db_pool = db::in_memory().await.unwrap();
        let user = register(&db_pool, signup("Alice", " Alice@Example.com")).await.unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password, "Secret#123");
        assert_eq!(user.photo_url, DEFAULT_PHOTO_URL);

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["emailId"], "alice@example.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db_pool = db::in_memory().await.unwrap();
        register(&db_pool, signup("Alice", "alice@example.com")).await.unwrap();

        let err = register(&db_pool, signup("Alicia", "ALICE@example.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail));
    }

    #[tokio::test]
    async fn authenticate_distinguishes_failures() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = register(&db_pool, signup("Alice", "alice@example.com")).await.unwrap();

        let found = authenticate(&db_pool, "ALICE@example.com", "Secret#123").await.unwrap();
        assert_eq!(found.id, alice.id);

        assert!(matches!(
            authenticate(&db_pool, "alice@example.com", "Wrong#123").await,
            Err(AppError::BadPassword)
        ));
        assert!(matches!(
            authenticate(&db_pool, "bob@example.com", "Secret#123").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn profile_update_and_password_change() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = register(&db_pool, signup("Alice", "alice@example.com")).await.unwrap();

        let body = json!({ "about": "rustacean", "gender": "female", "skills": ["rust"] });
        let Value::Object(body) = body else { unreachable!() };
        let updated = update_profile(&db_pool, alice.clone(), body).await.unwrap();
        assert_eq!(updated.about, "rustacean");
        assert_eq!(updated.gender, Some(Gender::Female));
        assert_eq!(updated.skills.0, vec!["rust"]);
        assert_eq!(updated.email, alice.email);

        set_password(&db_pool, alice.id, "Changed#456".to_owned()).await.unwrap();
        assert!(authenticate(&db_pool, "alice@example.com", "Changed#456").await.is_ok());
        assert!(matches!(
            set_password(&db_pool, alice.id, "weak".to_owned()).await,
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn delete_removes_user() {
        let db_pool = db::in_memory().await.unwrap();
        let alice = register(&db_pool, signup("Alice", "alice@example.com")).await.unwrap();

        delete_user(&db_pool, alice.id).await.unwrap();
        assert!(find_by_id(&db_pool, alice.id).await.unwrap().is_none());
        assert!(matches!(delete_user(&db_pool, alice.id).await, Err(AppError::NotFound(_))));
    }
}
