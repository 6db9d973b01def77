//! Collectors that walk the paginated endpoints for a single account.

use crate::model::{Account, Status};
use crate::session::Session;
use crate::twitter::{ApiError, Endpoint, Relation, FIRST_CURSOR, LAST_CURSOR};
use std::collections::BTreeSet;
use tokio::time::sleep;

/// Why a status collection stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestEnd {
    /// The timeline returned an empty page
    Exhausted,
    /// `page_limit` pages were collected
    PageLimit,
    /// The account is protected
    Denied,
    /// A page kept failing and the collection was abandoned
    GaveUp,
}

#[derive(Debug)]
pub struct StatusHarvest {
    pub statuses: BTreeSet<Status>,
    pub pages: usize,
    pub end: HarvestEnd,
}

enum PageOutcome {
    Page(Vec<Status>),
    Empty,
    Denied,
    GaveUp,
}

impl Session {
    pub async fn followers(&self, account: &Account) -> Result<BTreeSet<u64>, ApiError> {
        self.collect_ids(account, Relation::Followers).await
    }

    pub async fn friends(&self, account: &Account) -> Result<BTreeSet<u64>, ApiError> {
        self.collect_ids(account, Relation::Friends).await
    }

    /// Follows the cursor from the first page until the service returns the
    /// terminal cursor. A protected account ends the walk with whatever was
    /// gathered so far.
    async fn collect_ids(
        &self,
        account: &Account,
        relation: Relation,
    ) -> Result<BTreeSet<u64>, ApiError> {
        let mut ids = BTreeSet::new();
        let mut cursor = FIRST_CURSOR;
        while cursor != LAST_CURSOR {
            let page = match self.api.relation_ids(account, relation, cursor).await {
                Ok(page) => page,
                Err(e) if e.is_denied() => {
                    log::info!("Not authorized to list {:?} of {}, skipping", relation, account);
                    break;
                }
                Err(e) => return Err(e),
            };
            log::debug!(
                "Got {} {:?} ids for {} at cursor {}",
                page.ids.len(),
                relation,
                account,
                cursor
            );
            ids.extend(page.ids);
            cursor = page.next_cursor;
        }
        Ok(ids)
    }

    /// Collects up to `page_limit` pages of the account's timeline, newest
    /// first. Never fails: the returned harvest says why collection stopped.
    pub async fn statuses(&self, account: &Account) -> StatusHarvest {
        self.wait_for_quota(Endpoint::UserTimeline).await;
        let mut harvest = StatusHarvest {
            statuses: BTreeSet::new(),
            pages: 0,
            end: HarvestEnd::PageLimit,
        };
        let mut max_id = None;
        while harvest.pages < self.settings.page_limit {
            let page = match self.fetch_status_page(account, max_id).await {
                PageOutcome::Page(page) => page,
                PageOutcome::Empty => {
                    harvest.end = HarvestEnd::Exhausted;
                    break;
                }
                PageOutcome::Denied => {
                    harvest.end = HarvestEnd::Denied;
                    break;
                }
                PageOutcome::GaveUp => {
                    log::warn!(
                        "Giving up on timeline of {} after {} pages",
                        account,
                        harvest.pages
                    );
                    harvest.end = HarvestEnd::GaveUp;
                    break;
                }
            };
            harvest.pages += 1;
            let oldest = page.iter().map(|s| s.id).min();
            log::debug!("Got {} statuses for {}", page.len(), account);
            harvest.statuses.extend(page);
            match oldest.and_then(|id| id.checked_sub(1)) {
                Some(next) => max_id = Some(next),
                None => {
                    harvest.end = HarvestEnd::Exhausted;
                    break;
                }
            }
        }
        harvest
    }

    async fn fetch_status_page(&self, account: &Account, max_id: Option<u64>) -> PageOutcome {
        let settings = &self.settings;
        let mut failures = 0;
        loop {
            let e = match self
                .api
                .user_timeline(account, settings.page_size, max_id)
                .await
            {
                Ok(page) if page.is_empty() => return PageOutcome::Empty,
                Ok(page) => return PageOutcome::Page(page),
                Err(e) if e.is_denied() => return PageOutcome::Denied,
                Err(e) => e,
            };
            failures += 1;
            log::warn!(
                "Timeline request for {} failed ({}/{}): {}",
                account,
                failures,
                settings.max_page_failures,
                e
            );
            if failures >= settings.max_page_failures {
                return PageOutcome::GaveUp;
            }
            if failures >= settings.gate_after_failures {
                self.wait_for_quota(Endpoint::UserTimeline).await;
            }
            sleep(settings.page_retry_wait(failures)).await;
        }
    }
}
