//! Registered users: records, the public projection shown to other users,
//! and the field rules shared by signup and profile edits.

mod password;
mod store;
pub mod validate;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

pub use password::{hash_password, verify_password};
pub use store::{
    authenticate, delete_user, find_by_email, find_by_id, register, set_password, update_profile,
};

pub const DEFAULT_PHOTO_URL: &str = "https://cdn-icons-png.flaticon.com/512/666/666201.png";
pub const DEFAULT_ABOUT: &str = "Hey there! I'm new here.";

/// Fields a user may change through a profile edit. Email and password have their own flows.
pub const EDITABLE_FIELDS: [&str; 7] = [
    "firstName",
    "lastName",
    "photoUrl",
    "about",
    "gender",
    "age",
    "skills",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

/// A full user record. The password hash never leaves the server.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "emailId")]
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub photo_url: String,
    pub about: String,
    pub skills: Json<Vec<String>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// What other users get to see.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub photo_url: String,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub about: String,
    pub skills: Json<Vec<String>>,
}

/// Column list matching [`PublicProfile`], for queries against `users`.
pub(crate) const PUBLIC_COLUMNS: &str =
    "users.id, users.first_name, users.last_name, users.photo_url, users.age, users.gender, users.about, users.skills";

impl From<&User> for PublicProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            photo_url: user.photo_url.clone(),
            age: user.age,
            gender: user.gender,
            about: user.about.clone(),
            skills: user.skills.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email_id: String,
    #[serde(default)]
    pub password: String,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub about: Option<String>,
    pub gender: Option<Gender>,
    pub age: Option<u32>,
    pub skills: Option<Vec<String>>,
}
