use crate::credentials::{Credentials, CredentialsError};
use crate::settings::Settings;
use crate::twitter::v1::TwitterClientV1;
use crate::twitter::{Endpoint, Quota, TwitterApi};
use std::path::Path;
use tokio::time::sleep;

/// An authenticated API handle together with the waits and limits the
/// collectors run under.
pub struct Session {
    pub(crate) api: Box<dyn TwitterApi>,
    pub(crate) settings: Settings,
}

impl Session {
    pub fn new(api: Box<dyn TwitterApi>, settings: Settings) -> Self {
        Self { api, settings }
    }

    /// Loads credentials from `path` and builds a v1.1 client from them.
    pub async fn from_auth_file(
        path: impl AsRef<Path>,
        settings: Settings,
    ) -> Result<Self, CredentialsError> {
        let credentials = Credentials::load(path).await?;
        log::debug!("Loaded {:?}", credentials);
        let client = TwitterClientV1::new(&credentials).with_timeout(settings.request_timeout);
        Ok(Self::new(Box::new(client), settings))
    }

    pub fn api(&self) -> &dyn TwitterApi {
        self.api.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Blocks until the service reports at least one remaining call for
    /// `endpoint`. There is no upper bound on how long this waits.
    pub async fn wait_for_quota(&self, endpoint: Endpoint) -> Quota {
        loop {
            match self.api.quota(endpoint).await {
                Ok(quota) if quota.remaining >= 1 => {
                    log::info!("Remaining {:?} calls: {}", endpoint, quota.remaining);
                    return quota;
                }
                Ok(quota) => {
                    match quota.reset_at {
                        Some(reset_at) => log::warn!(
                            "No remaining {:?} calls (window resets at {}), sleeping {} minutes before retry",
                            endpoint,
                            reset_at,
                            self.settings.exhausted_wait.as_secs() / 60
                        ),
                        None => log::warn!(
                            "No remaining {:?} calls, sleeping {} minutes before retry",
                            endpoint,
                            self.settings.exhausted_wait.as_secs() / 60
                        ),
                    }
                    sleep(self.settings.exhausted_wait).await;
                }
                Err(e) => {
                    log::warn!(
                        "Unable to get quota ({}), sleeping {} seconds before retry",
                        e,
                        self.settings.probe_retry_wait.as_secs()
                    );
                    sleep(self.settings.probe_retry_wait).await;
                }
            }
        }
    }
}
