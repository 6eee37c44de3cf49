use anyhow::{anyhow, Context};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::AppResult;

/// Argon2id with a fresh salt, off the async runtime.
pub async fn hash_password(raw: String) -> AppResult<String> {
    let hash = tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(raw.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| anyhow!("hash password: {e}"))
    })
    .await
    .context("password hashing task")??;

    Ok(hash)
}

pub async fn verify_password(raw: String, hash: String) -> AppResult<bool> {
    let matches = tokio::task::spawn_blocking(move || {
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow!("stored hash unreadable: {e}"))?;
        anyhow::Ok(Argon2::default().verify_password(raw.as_bytes(), &parsed).is_ok())
    })
    .await
    .context("password verification task")??;

    Ok(matches)
}
