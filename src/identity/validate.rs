use serde_json::{Map, Value};

use crate::{AppError, AppResult};

use super::{ProfilePatch, Signup, EDITABLE_FIELDS};

pub fn first_name(name: &str) -> AppResult<()> {
    match name.trim().chars().count() {
        4..=50 => Ok(()),
        _ => Err(AppError::validation("first name must be 4 to 50 characters")),
    }
}

pub fn last_name(name: &str, required: bool) -> AppResult<()> {
    let len = name.trim().chars().count();
    if required && len == 0 {
        return Err(AppError::validation("last name is required"));
    }
    if len > 50 {
        return Err(AppError::validation("last name must be at most 50 characters"));
    }
    Ok(())
}

/// Trims and lower-cases, then checks for a `local@domain.tld` shape.
pub fn email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    let invalid = || AppError::validation(format!("invalid email {email:?}"));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let labels: Vec<&str> = domain.split('.').collect();
    let well_formed = !local.is_empty()
        && !email.chars().any(char::is_whitespace)
        && labels.len() >= 2
        && labels.iter().all(|l| !l.is_empty() && !l.contains('@'))
        && labels.last().is_some_and(|tld| tld.len() >= 2);

    if well_formed { Ok(email) } else { Err(invalid()) }
}

/// At least 8 characters with a lowercase, an uppercase, a digit and a symbol.
pub fn strong_password(password: &str) -> AppResult<()> {
    let strong = password.chars().count() >= 8
        && password.chars().any(|c| c.is_lowercase())
        && password.chars().any(|c| c.is_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());

    if strong {
        Ok(())
    } else {
        Err(AppError::validation("please enter a strong password"))
    }
}

pub fn age(age: Option<u32>) -> AppResult<()> {
    match age {
        Some(age) if age < 18 => Err(AppError::validation("age must be at least 18")),
        _ => Ok(()),
    }
}

pub fn photo_url(url: &str) -> AppResult<()> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or_default();
    let host = rest.split(['/', '?', '#']).next().unwrap_or_default();

    if host.is_empty() || url.chars().any(char::is_whitespace) {
        return Err(AppError::validation(format!("invalid url {url:?}")));
    }
    Ok(())
}

pub fn signup(signup: &Signup) -> AppResult<()> {
    first_name(&signup.first_name)?;
    last_name(&signup.last_name, true)?;
    strong_password(&signup.password)?;
    age(signup.age)
}

/// Rejects any key outside [`EDITABLE_FIELDS`], then checks each supplied value.
pub fn profile_patch(body: Map<String, Value>) -> AppResult<ProfilePatch> {
    if let Some(field) = body.keys().find(|k| !EDITABLE_FIELDS.contains(&k.as_str())) {
        return Err(AppError::ForbiddenField(field.clone()));
    }

    let patch: ProfilePatch = serde_json::from_value(Value::Object(body))
        .map_err(|e| AppError::validation(e.to_string()))?;

    if let Some(name) = &patch.first_name {
        first_name(name)?;
    }
    if let Some(name) = &patch.last_name {
        last_name(name, false)?;
    }
    if let Some(url) = &patch.photo_url {
        photo_url(url)?;
    }
    age(patch.age)?;

    Ok(patch)
}
