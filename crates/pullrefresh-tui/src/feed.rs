//! Demo content source driven by the pull-to-refresh controller

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use pullrefresh_core::config::DemoConfig;
use pullrefresh_core::RefreshAction;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub fetched_at: DateTime<Local>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Feed source unavailable (attempt {attempt})")]
    Unavailable { attempt: u32 },
}

const SEED_TITLES: [&str; 6] = [
    "Welcome to the pull-to-refresh demo",
    "Drag down with the mouse at the top of this list",
    "Or tap Space at the top to pull and press Enter to release",
    "Release past the threshold to fetch new items",
    "Press r for a programmatic refresh",
    "Press e to toggle the controller on and off",
];

/// In-memory feed whose refresh prepends a freshly fetched item after a delay.
///
/// Clones share the same item list, so the host can keep one for rendering
/// while the controller owns another as its refresh action.
#[derive(Debug, Clone)]
pub struct DemoFeed {
    items: Arc<Mutex<Vec<FeedItem>>>,
    attempts: Arc<AtomicU32>,
    delay: Duration,
    fail_every: u32,
}

impl DemoFeed {
    pub fn new(config: &DemoConfig) -> Self {
        let now = Local::now();
        let items = SEED_TITLES
            .iter()
            .map(|title| FeedItem {
                title: title.to_string(),
                fetched_at: now,
            })
            .collect();
        Self {
            items: Arc::new(Mutex::new(items)),
            attempts: Arc::new(AtomicU32::new(0)),
            delay: Duration::from_millis(config.refresh_delay_ms),
            fail_every: config.fail_every,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<FeedItem>> {
        self.items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current items, newest first
    pub fn items(&self) -> Vec<FeedItem> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Number of refreshes started so far
    pub fn attempts(&self) -> u32 {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RefreshAction for DemoFeed {
    type Error = FeedError;

    async fn refresh(&self) -> Result<(), FeedError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;

        if self.fail_every > 0 && attempt % self.fail_every == 0 {
            warn!(attempt, "Demo feed refresh failed");
            return Err(FeedError::Unavailable { attempt });
        }

        let fetched_at = Local::now();
        self.lock().insert(
            0,
            FeedItem {
                title: format!("Fresh story #{}", attempt),
                fetched_at,
            },
        );
        info!(attempt, "Demo feed refreshed");
        Ok(())
    }
}
