use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme '{other}' (expected light or dark)")),
        }
    }
}

/// Process-wide presentation preferences, independent of any conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme: Theme,
    pub language: String,
    pub auto_scroll: bool,
    pub show_timestamps: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            language: "en".to_string(),
            auto_scroll: true,
            show_timestamps: true,
        }
    }
}

/// Keys accepted by `chatroute set` / `chatroute unset`.
pub const SETTING_KEYS: &[&str] = &["theme", "language", "auto-scroll", "show-timestamps"];

impl Settings {
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "theme" => self.theme = value.parse()?,
            "language" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err("Language cannot be empty".to_string());
                }
                self.language = value.to_string();
            }
            "auto-scroll" => self.auto_scroll = parse_flag(value)?,
            "show-timestamps" => self.show_timestamps = parse_flag(value)?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    /// Reset a single key to its default value.
    pub fn unset(&mut self, key: &str) -> Result<(), String> {
        let defaults = Settings::default();
        match key {
            "theme" => self.theme = defaults.theme,
            "language" => self.language = defaults.language,
            "auto-scroll" => self.auto_scroll = defaults.auto_scroll,
            "show-timestamps" => self.show_timestamps = defaults.show_timestamps,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }

    pub fn print_all(&self) {
        println!("theme: {}", self.theme);
        println!("language: {}", self.language);
        println!("auto-scroll: {}", on_off(self.auto_scroll));
        println!("show-timestamps: {}", on_off(self.show_timestamps));
    }
}

fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(format!("Expected on/off, got '{other}'")),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

fn unknown_key(key: &str) -> String {
    format!(
        "Unknown setting '{key}'. Available: {}",
        SETTING_KEYS.join(", ")
    )
}
