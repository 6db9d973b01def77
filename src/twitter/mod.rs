pub mod v1;

use crate::model::{Account, Status};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Cursor value requesting the first page of a cursored endpoint.
pub const FIRST_CURSOR: i64 = -1;
/// Cursor value returned once there are no further pages.
pub const LAST_CURSOR: i64 = 0;

/// Outcome of a failed remote call, classified by what the caller should do
/// about it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The account is protected or the token lacks access to it
    #[error("Not authorized")]
    Denied,
    #[error("Transient error: {0}")]
    Transient(String),
    #[error("{0}")]
    Fatal(String),
}

impl ApiError {
    pub fn is_denied(&self) -> bool {
        matches!(self, ApiError::Denied)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Followers,
    Friends,
}

/// Rate limited endpoints used by the collectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    FollowerIds,
    FriendIds,
    UserTimeline,
}

impl From<Relation> for Endpoint {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Followers => Endpoint::FollowerIds,
            Relation::Friends => Endpoint::FriendIds,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quota {
    pub remaining: i32,
    pub reset_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdPage {
    pub ids: Vec<u64>,
    pub next_cursor: i64,
}

#[async_trait]
pub trait TwitterApi: Send + Sync {
    async fn quota(&self, endpoint: Endpoint) -> Result<Quota, ApiError>;

    async fn relation_ids(
        &self,
        account: &Account,
        relation: Relation,
        cursor: i64,
    ) -> Result<IdPage, ApiError>;

    /// Statuses posted by `account`, newest first, no newer than `max_id`.
    async fn user_timeline(
        &self,
        account: &Account,
        count: i32,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>, ApiError>;
}
