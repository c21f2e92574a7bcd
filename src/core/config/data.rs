use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of `config.toml`. Every field is optional; see `defaults.rs`
/// for the values used when a field is unset.
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Completion API base URL (e.g., "https://openrouter.ai/api/v1")
    pub base_url: Option<String>,
    /// Sent as `HTTP-Referer` so the provider can attribute traffic
    pub site_url: Option<String>,
    /// Sent as `X-Title`
    pub site_name: Option<String>,
    /// Retries allowed after a rate-limited response
    pub max_retries: Option<u32>,
    /// Delay before the first retry; doubles on each subsequent retry
    pub initial_retry_delay_ms: Option<u64>,
    /// Number of rendered markdown documents kept in memory
    pub render_cache_capacity: Option<usize>,
    /// Directory holding conversations.json and settings.json
    pub data_dir: Option<PathBuf>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
///
/// # Examples
/// - Unix: `/home/user/.local/share/chatroute` → `~/.local/share/chatroute`
/// - macOS: `/Users/user/Library/Application Support/...` → `~/Library/Application Support/...`
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

/// Keys accepted by `chatroute config set` / `chatroute config unset`.
pub const CONFIG_KEYS: &[&str] = &[
    "base-url",
    "site-url",
    "site-name",
    "max-retries",
    "initial-retry-delay-ms",
    "render-cache-capacity",
    "data-dir",
];

impl Config {
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), String> {
        let value = value.trim();
        if value.is_empty() {
            return Err(format!("A value is required for '{key}'"));
        }
        match key {
            "base-url" => self.base_url = Some(value.to_string()),
            "site-url" => self.site_url = Some(value.to_string()),
            "site-name" => self.site_name = Some(value.to_string()),
            "max-retries" => self.max_retries = Some(parse_number(key, value)?),
            "initial-retry-delay-ms" => {
                self.initial_retry_delay_ms = Some(parse_number(key, value)?)
            }
            "render-cache-capacity" => {
                self.render_cache_capacity = Some(parse_number(key, value)?)
            }
            "data-dir" => self.data_dir = Some(PathBuf::from(value)),
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: &str) -> Result<(), String> {
        match key {
            "base-url" => self.base_url = None,
            "site-url" => self.site_url = None,
            "site-name" => self.site_name = None,
            "max-retries" => self.max_retries = None,
            "initial-retry-delay-ms" => self.initial_retry_delay_ms = None,
            "render-cache-capacity" => self.render_cache_capacity = None,
            "data-dir" => self.data_dir = None,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, String> {
    value
        .parse()
        .map_err(|_| format!("'{value}' is not a valid number for '{key}'"))
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown config key '{key}'. Available: {}",
        CONFIG_KEYS.join(", ")
    )
}
