use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Where a request between two users stands. A pair with no row is in the
/// implicit "no request" state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RequestStatus {
    Ignored,
    Interested,
    Accepted,
    Rejected,
}

/// Statuses a sender may open a request with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendStatus {
    Ignored,
    Interested,
}

/// Decisions the recipient may take on an `interested` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewStatus {
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        use RequestStatus::*;
        match self {
            Ignored => "ignored",
            Interested => "interested",
            Accepted => "accepted",
            Rejected => "rejected",
        }
    }

    /// Only `interested` moves on; everything else is terminal.
    pub fn review(self, decision: ReviewStatus) -> Result<RequestStatus, AppError> {
        match self {
            RequestStatus::Interested => Ok(decision.into()),
            _ => Err(AppError::NotReviewable),
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SendStatus> for RequestStatus {
    fn from(status: SendStatus) -> Self {
        match status {
            SendStatus::Ignored => RequestStatus::Ignored,
            SendStatus::Interested => RequestStatus::Interested,
        }
    }
}

impl From<ReviewStatus> for RequestStatus {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Accepted => RequestStatus::Accepted,
            ReviewStatus::Rejected => RequestStatus::Rejected,
        }
    }
}

impl FromStr for SendStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignored" => Ok(SendStatus::Ignored),
            "interested" => Ok(SendStatus::Interested),
            _ => Err(AppError::validation(format!("request status {s} not valid"))),
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(ReviewStatus::Accepted),
            "rejected" => Ok(ReviewStatus::Rejected),
            _ => Err(AppError::validation(format!("review status {s} not valid"))),
        }
    }
}
