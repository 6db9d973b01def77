use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A status as collected from a user timeline. Equality is structural, so two
/// records are duplicates exactly when they serialize identically.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Status {
    pub id: u64,
    pub timestamp: i64,
    pub text: String,
    pub lang: Option<String>,
    pub in_reply_to_status_id: Option<u64>,
    pub retweet_count: i32,
    pub favorite_count: i32,
    pub user: Option<Author>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Author {
    pub id: u64,
    pub screen_name: String,
    pub name: String,
    pub protected: bool,
    pub followers_count: i32,
    pub friends_count: i32,
    pub statuses_count: i32,
}

impl Status {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Account must be a numeric user id or a screen name")]
pub struct AccountParseError;

/// The user whose followers, friends or timeline are being collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Account {
    Id(u64),
    ScreenName(String),
}

impl FromStr for Account {
    type Err = AccountParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            return s.parse().map(Account::Id).map_err(|_| AccountParseError);
        }
        let name = s.strip_prefix('@').unwrap_or(s);
        if name.is_empty() {
            return Err(AccountParseError);
        }
        Ok(Account::ScreenName(name.to_string()))
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Account::Id(id) => write!(f, "{}", id),
            Account::ScreenName(name) => write!(f, "@{}", name),
        }
    }
}
