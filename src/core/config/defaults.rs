use std::path::PathBuf;
use std::time::Duration;

use crate::core::config::data::Config;
use crate::core::retry::{RetryPolicy, DEFAULT_INITIAL_DELAY, DEFAULT_MAX_RETRIES};
use crate::core::store::FileStore;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_SITE_URL: &str = "http://localhost";
pub const DEFAULT_SITE_NAME: &str = "chatroute";
pub const DEFAULT_RENDER_CACHE_CAPACITY: usize = 256;

impl Config {
    pub fn base_url(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn site_url(&self) -> &str {
        self.site_url.as_deref().unwrap_or(DEFAULT_SITE_URL)
    }

    pub fn site_name(&self) -> &str {
        self.site_name.as_deref().unwrap_or(DEFAULT_SITE_NAME)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            self.initial_retry_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_INITIAL_DELAY),
        )
    }

    pub fn render_cache_capacity(&self) -> usize {
        self.render_cache_capacity
            .unwrap_or(DEFAULT_RENDER_CACHE_CAPACITY)
    }

    /// Configured data directory, else the platform data dir.
    pub fn data_dir(&self) -> Option<PathBuf> {
        self.data_dir.clone().or_else(FileStore::default_dir)
    }
}
