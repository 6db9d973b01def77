use crate::credentials::Credentials;
use crate::model::{Account, Author, Status};
use crate::twitter::{ApiError, Endpoint, IdPage, Quota, Relation, TwitterApi};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use egg_mode::error::Error;
use egg_mode::service::{RateLimitStatus, TweetMethod, UserMethod};
use egg_mode::user::{TwitterUser, UserID};
use egg_mode::{KeyPair, Token};
use std::future::Future;
use std::time::Duration;

const TIMEOUT_SEC: u64 = 10;
// Largest page the ids endpoints accept
const IDS_PAGE_SIZE: i32 = 5000;

// https://developer.twitter.com/en/support/twitter-api/error-troubleshooting
const CODE_RATE_LIMITED: i32 = 88;
const CODE_OVER_CAPACITY: i32 = 130;
const CODE_INTERNAL_ERROR: i32 = 131;
const CODE_NOT_AUTHORIZED: i32 = 179;

pub struct TwitterClientV1 {
    token: Token,
    timeout: Duration,
}

impl TwitterClientV1 {
    pub fn new(credentials: &Credentials) -> Self {
        let consumer = KeyPair::new(
            credentials.consumer_key.clone(),
            credentials.consumer_secret.clone(),
        );
        let access = KeyPair::new(
            credentials.access_token.clone(),
            credentials.access_token_secret.clone(),
        );
        Self {
            token: Token::Access { consumer, access },
            timeout: Duration::from_secs(TIMEOUT_SEC),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, Error>>,
    ) -> Result<T, ApiError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(classify),
            Err(_) => Err(ApiError::Transient(format!(
                "No response within {} seconds",
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl TwitterApi for TwitterClientV1 {
    async fn quota(&self, endpoint: Endpoint) -> Result<Quota, ApiError> {
        let status = self
            .bounded(egg_mode::service::rate_limit_status(&self.token))
            .await?
            .response;
        quota_from_status(&status, endpoint)
    }

    async fn relation_ids(
        &self,
        account: &Account,
        relation: Relation,
        cursor: i64,
    ) -> Result<IdPage, ApiError> {
        let mut pages = match relation {
            Relation::Followers => egg_mode::user::followers_ids(user_id(account), &self.token),
            Relation::Friends => egg_mode::user::friends_ids(user_id(account), &self.token),
        }
        .with_page_size(IDS_PAGE_SIZE);
        pages.next_cursor = cursor;
        let page = self.bounded(pages.call()).await?.response;
        Ok(IdPage {
            ids: page.ids,
            next_cursor: page.next_cursor,
        })
    }

    async fn user_timeline(
        &self,
        account: &Account,
        count: i32,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>, ApiError> {
        let timeline = egg_mode::tweet::user_timeline(user_id(account), true, true, &self.token)
            .with_page_size(count);
        let tweets = self.bounded(timeline.call(None, max_id)).await?.response;
        Ok(tweets.into_iter().map(Status::from).collect())
    }
}

fn quota_from_status(status: &RateLimitStatus, endpoint: Endpoint) -> Result<Quota, ApiError> {
    // Each entry is an empty response whose headers carry the limit
    let entry = match endpoint {
        Endpoint::FollowerIds => status.user.get(&UserMethod::FollowersIds),
        Endpoint::FriendIds => status.user.get(&UserMethod::FriendsIds),
        Endpoint::UserTimeline => status.tweet.get(&TweetMethod::UserTimeline),
    }
    .ok_or_else(|| ApiError::Fatal(format!("No rate limit reported for {:?}", endpoint)))?;
    let limit = &entry.rate_limit_status;
    Ok(Quota {
        remaining: limit.remaining,
        reset_at: Utc.timestamp_opt(i64::from(limit.reset), 0).single(),
    })
}

fn user_id(account: &Account) -> UserID {
    match account {
        Account::Id(id) => UserID::from(*id),
        Account::ScreenName(name) => UserID::from(name.clone()),
    }
}

fn classify(err: Error) -> ApiError {
    let message = err.to_string();
    match err {
        Error::TwitterError(.., errors) => classify_codes(
            errors
                .errors
                .iter()
                .map(|e| (e.code, e.message.as_str())),
            message,
        ),
        Error::RateLimit(_) | Error::NetError(_) => ApiError::Transient(message),
        Error::BadStatus(status) => classify_status(status.as_u16(), message),
        _ => ApiError::Fatal(message),
    }
}

fn classify_codes<'a>(
    mut codes: impl Iterator<Item = (i32, &'a str)> + Clone,
    message: String,
) -> ApiError {
    if codes
        .clone()
        .any(|(code, text)| code == CODE_NOT_AUTHORIZED || text.starts_with("Not authorized"))
    {
        ApiError::Denied
    } else if codes.any(|(code, _)| {
        matches!(
            code,
            CODE_RATE_LIMITED | CODE_OVER_CAPACITY | CODE_INTERNAL_ERROR
        )
    }) {
        ApiError::Transient(message)
    } else {
        ApiError::Fatal(message)
    }
}

fn classify_status(status: u16, message: String) -> ApiError {
    match status {
        401 => ApiError::Denied,
        429 | 500..=599 => ApiError::Transient(message),
        _ => ApiError::Fatal(message),
    }
}

impl From<egg_mode::tweet::Tweet> for Status {
    fn from(tweet: egg_mode::tweet::Tweet) -> Self {
        Status {
            id: tweet.id,
            timestamp: tweet.created_at.timestamp(),
            text: tweet.text,
            lang: tweet.lang,
            in_reply_to_status_id: tweet.in_reply_to_status_id,
            retweet_count: tweet.retweet_count,
            favorite_count: tweet.favorite_count,
            user: tweet.user.map(|user| Author::from(*user)),
        }
    }
}

impl From<TwitterUser> for Author {
    fn from(user: TwitterUser) -> Self {
        Author {
            id: user.id,
            screen_name: user.screen_name,
            name: user.name,
            protected: user.protected,
            followers_count: user.followers_count,
            friends_count: user.friends_count,
            statuses_count: user.statuses_count,
        }
    }
}
