//! Cookie-consent banner: decides visibility from the persisted record and
//! records acceptance.

use std::{sync::Arc, time::Duration};

use shared::domain::{ConsentRecord, CONSENT_STORAGE_KEY};
use storage::{KeyValueStore, StorageError};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{scheduler::TaskSlot, view::BannerView};

pub const DEFAULT_BANNER_HIDE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Error)]
pub enum ConsentError {
    #[error("failed to persist consent: {0}")]
    Storage(#[from] StorageError),
    #[error("failed to encode consent record: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BannerState {
    Hidden,
    Visible,
}

pub struct ConsentManager {
    store: Arc<dyn KeyValueStore>,
    banner: Arc<dyn BannerView>,
    hide_delay: Duration,
    state: BannerState,
    dismissed: bool,
    removal: TaskSlot,
}

impl ConsentManager {
    pub fn new(store: Arc<dyn KeyValueStore>, banner: Arc<dyn BannerView>) -> Self {
        Self {
            store,
            banner,
            hide_delay: DEFAULT_BANNER_HIDE_DELAY,
            state: BannerState::Hidden,
            dismissed: false,
            removal: TaskSlot::new(),
        }
    }

    pub fn with_hide_delay(mut self, hide_delay: Duration) -> Self {
        self.hide_delay = hide_delay;
        self
    }

    pub fn state(&self) -> BannerState {
        self.state
    }

    /// Stored consent, or `None` when absent, unreadable or malformed.
    pub async fn read_consent(&self) -> Option<ConsentRecord> {
        let raw = match self.store.get(CONSENT_STORAGE_KEY).await {
            Ok(raw) => raw?,
            Err(err) => {
                warn!(error = %err, "consent store unavailable; treating consent as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "ignoring malformed consent record");
                None
            }
        }
    }

    pub async fn write_consent(&self, accepted: bool) -> Result<ConsentRecord, ConsentError> {
        let record = ConsentRecord::new(accepted);
        let raw = serde_json::to_string(&record)?;
        self.store.set(CONSENT_STORAGE_KEY, &raw).await?;
        Ok(record)
    }

    pub fn show_banner(&mut self) {
        if self.dismissed {
            debug!("consent banner already dismissed for this page load");
            return;
        }
        self.removal.cancel();
        self.banner.show();
        self.state = BannerState::Visible;
    }

    /// Hides the banner now and takes it out of layout after the hide delay.
    /// Outside a tokio runtime the banner is removed immediately.
    pub fn hide_banner(&mut self) {
        self.dismissed = true;
        self.state = BannerState::Hidden;
        self.banner.mark_hidden();

        let banner = Arc::clone(&self.banner);
        self.removal.schedule(self.hide_delay, move || banner.remove());
    }

    pub async fn init(&mut self) -> BannerState {
        match self.read_consent().await {
            None => self.show_banner(),
            Some(record) => {
                debug!(
                    accepted = record.accepted,
                    timestamp = %record.timestamp,
                    "consent already recorded"
                );
                self.state = BannerState::Hidden;
                self.banner.remove();
            }
        }
        self.state
    }

    /// Accept-control handler. Persistence failures never keep the banner up.
    pub async fn accept(&mut self) -> BannerState {
        match self.write_consent(true).await {
            Ok(record) => info!(timestamp = %record.timestamp, "cookie consent accepted"),
            Err(err) => warn!(error = %err, "unable to save cookie consent"),
        }
        self.hide_banner();
        self.state
    }
}

#[cfg(test)]
#[path = "tests/consent_tests.rs"]
mod tests;
