//! Scripted [`TwitterApi`] used by the unit tests.

use crate::model::{Account, Status};
use crate::session::Session;
use crate::settings::Settings;
use crate::twitter::{ApiError, Endpoint, IdPage, Quota, Relation, TwitterApi};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct State {
    quota: VecDeque<Result<i32, ApiError>>,
    quota_calls: Vec<Endpoint>,
    ids: VecDeque<Result<IdPage, ApiError>>,
    id_calls: Vec<(Relation, i64)>,
    timeline: Vec<Status>,
    timeline_faults: VecDeque<Option<ApiError>>,
    timeline_calls: Vec<Option<u64>>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<State>>,
}

impl FakeApi {
    pub fn session(&self, settings: Settings) -> Session {
        Session::new(Box::new(self.clone()), settings)
    }

    /// Quota probe results, in call order. Once exhausted every probe reports 100.
    pub fn script_quota(&self, results: Vec<Result<i32, ApiError>>) {
        self.state.lock().unwrap().quota = results.into();
    }

    /// Id page results, in call order. Once exhausted every call fails.
    pub fn script_ids(&self, results: Vec<Result<IdPage, ApiError>>) {
        self.state.lock().unwrap().ids = results.into();
    }

    /// Statuses with ids `1..=count`, served newest first.
    pub fn with_timeline(&self, count: u64) {
        self.state.lock().unwrap().timeline = (1..=count).map(status).collect();
    }

    /// Per-call faults for the timeline; `None` serves the page normally.
    pub fn script_timeline_faults(&self, faults: Vec<Option<ApiError>>) {
        self.state.lock().unwrap().timeline_faults = faults.into();
    }

    pub fn quota_calls(&self) -> Vec<Endpoint> {
        self.state.lock().unwrap().quota_calls.clone()
    }

    pub fn id_calls(&self) -> Vec<(Relation, i64)> {
        self.state.lock().unwrap().id_calls.clone()
    }

    pub fn timeline_calls(&self) -> Vec<Option<u64>> {
        self.state.lock().unwrap().timeline_calls.clone()
    }
}

pub fn status(id: u64) -> Status {
    Status {
        id,
        timestamp: 1_300_000_000 + id as i64,
        text: format!("status number {}", id),
        lang: Some("en".to_string()),
        in_reply_to_status_id: None,
        retweet_count: 0,
        favorite_count: 0,
        user: None,
    }
}

pub fn page(ids: &[u64], next_cursor: i64) -> Result<IdPage, ApiError> {
    Ok(IdPage {
        ids: ids.to_vec(),
        next_cursor,
    })
}

#[async_trait]
impl TwitterApi for FakeApi {
    async fn quota(&self, endpoint: Endpoint) -> Result<Quota, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.quota_calls.push(endpoint);
        let remaining = state.quota.pop_front().unwrap_or(Ok(100))?;
        Ok(Quota {
            remaining,
            reset_at: None,
        })
    }

    async fn relation_ids(
        &self,
        _account: &Account,
        relation: Relation,
        cursor: i64,
    ) -> Result<IdPage, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.id_calls.push((relation, cursor));
        state
            .ids
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Fatal("No more scripted pages".into())))
    }

    async fn user_timeline(
        &self,
        _account: &Account,
        count: i32,
        max_id: Option<u64>,
    ) -> Result<Vec<Status>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.timeline_calls.push(max_id);
        if let Some(Some(fault)) = state.timeline_faults.pop_front() {
            return Err(fault);
        }
        Ok(state
            .timeline
            .iter()
            .rev()
            .filter(|s| max_id.map_or(true, |max| s.id <= max))
            .take(count as usize)
            .cloned()
            .collect())
    }
}
