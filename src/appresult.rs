use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error("can't send a connection request to yourself")]
    SelfRequest,

    #[error("target user does not exist")]
    UnknownTarget,

    #[error("a connection request already exists between these users")]
    DuplicateRequest,

    #[error("connection request can't be reviewed")]
    NotReviewable,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("please login")]
    MissingCredential,

    #[error("invalid or expired token")]
    InvalidOrExpiredSignature,

    #[error("user not found")]
    UnknownIdentity,

    #[error("field `{0}` can't be updated")]
    ForbiddenField(String),

    #[error("invalid credentials")]
    BadPassword,

    #[error("only the owner can modify this user")]
    NotOwner,

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        use AppError::*;
        match self {
            Validation(_) => "VALIDATION_ERROR",
            DuplicateEmail => "DUPLICATE_EMAIL",
            SelfRequest => "SELF_REQUEST",
            UnknownTarget => "UNKNOWN_TARGET",
            DuplicateRequest => "DUPLICATE_REQUEST",
            NotReviewable => "NOT_REVIEWABLE",
            NotFound(_) => "NOT_FOUND",
            MissingCredential => "MISSING_CREDENTIAL",
            InvalidOrExpiredSignature => "INVALID_OR_EXPIRED_SIGNATURE",
            UnknownIdentity => "UNKNOWN_IDENTITY",
            ForbiddenField(_) => "FORBIDDEN_FIELD",
            BadPassword => "BAD_PASSWORD",
            NotOwner => "NOT_OWNER",
            StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        use AppError::*;
        match self {
            Validation(_) | ForbiddenField(_) | SelfRequest | BadPassword => StatusCode::BAD_REQUEST,
            MissingCredential | InvalidOrExpiredSignature | UnknownIdentity => StatusCode::UNAUTHORIZED,
            NotOwner => StatusCode::FORBIDDEN,
            NotFound(_) | UnknownTarget => StatusCode::NOT_FOUND,
            DuplicateEmail | DuplicateRequest | NotReviewable => StatusCode::CONFLICT,
            StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Maps a unique-index violation to `on_conflict`, anything else to storage failure.
pub(crate) fn unique_or(err: sqlx::Error, on_conflict: AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => on_conflict,
        _ => AppError::StorageUnavailable(err),
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
                code: self.code(),
            }),
        )
            .into_response()
    }
}
