use std::time::Duration;

/// Waits, retry limits and page bounds used by a [`Session`](crate::Session).
#[derive(Debug, Clone)]
pub struct Settings {
    /// How long to sleep when the quota probe reports no remaining calls
    pub exhausted_wait: Duration,
    /// How long to sleep when the quota probe itself fails
    pub probe_retry_wait: Duration,
    /// Upper bound on a single remote call
    pub request_timeout: Duration,
    /// Maximum number of timeline pages to collect
    pub page_limit: usize,
    /// Statuses requested per timeline page
    pub page_size: i32,
    /// Failures of a single timeline page before the collection is abandoned
    pub max_page_failures: u32,
    /// Failures of a single timeline page after which the quota gate is re-run
    pub gate_after_failures: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            exhausted_wait: Duration::from_secs(20 * 60),
            probe_retry_wait: Duration::from_secs(5),
            request_timeout: Duration::from_secs(10),
            page_limit: 5,
            page_size: 50,
            max_page_failures: 5,
            gate_after_failures: 2,
        }
    }
}

impl Settings {
    /// Sleep before retrying a timeline page that has failed `failures` times.
    pub fn page_retry_wait(&self, failures: u32) -> Duration {
        Duration::from_secs(u64::from(failures) + 1)
    }
}
