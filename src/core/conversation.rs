use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::message::{new_id, Message};

pub const DEFAULT_TITLE: &str = "New Chat";

const TITLE_WORDS: usize = 5;
const TITLE_ELLIPSIS_THRESHOLD: usize = 30;

/// A named, append-only sequence of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    /// Set once the title has been derived; the title never changes afterwards.
    #[serde(default)]
    pub title_locked: bool,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: new_id(),
            title: DEFAULT_TITLE.to_string(),
            title_locked: false,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn find(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    pub(crate) fn find_mut(&mut self, id: &str) -> Option<&mut Message> {
        self.messages.iter_mut().find(|m| m.id == id)
    }

    /// Adopt a title derived from `first_user_message` unless one is already locked.
    pub fn lock_title_from(&mut self, first_user_message: &str) {
        if self.title_locked {
            return;
        }
        self.title = derive_title(first_user_message);
        self.title_locked = true;
    }

    /// Advance `updated_at`, never moving it before `created_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().max(self.created_at);
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// First five words of the message, with `...` appended when the original
/// text is longer than thirty characters.
pub fn derive_title(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().take(TITLE_WORDS).collect();
    if words.is_empty() {
        return DEFAULT_TITLE.to_string();
    }

    let mut title = words.join(" ");
    if text.trim().chars().count() > TITLE_ELLIPSIS_THRESHOLD {
        title.push_str("...");
    }
    title
}
