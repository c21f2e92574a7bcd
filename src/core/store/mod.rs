//! Local persistence for conversations and settings.
//!
//! The [`KeyValueStore`] trait is the storage boundary: string keys mapping
//! to serialized documents. [`Repository`] layers the record formats on top
//! and absorbs storage failures so they never interrupt a chat.

pub mod file;
pub mod memory;

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use tracing::warn;

use crate::core::config::data::path_display;
use crate::core::conversation::Conversation;
use crate::core::settings::Settings;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const CONVERSATIONS_KEY: &str = "conversations";
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Serialize(serde_json::Error),
    InvalidKey(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => {
                write!(f, "Storage error at {}: {}", path_display(path), source)
            }
            StoreError::Serialize(source) => write!(f, "Invalid record encoding: {source}"),
            StoreError::InvalidKey(key) => write!(f, "Invalid storage key: {key:?}"),
        }
    }
}

impl StdError for StoreError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::Serialize(source) => Some(source),
            StoreError::InvalidKey(_) => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialize(err)
    }
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Conversation and settings records on top of a [`KeyValueStore`].
///
/// Every method degrades to a no-op (or an empty/default result) when the
/// store fails; the failure is logged and in-memory state is left alone.
pub struct Repository {
    store: Box<dyn KeyValueStore>,
}

impl Repository {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// All persisted conversations, in stored order. Unreadable data yields
    /// an empty list; use only where nothing is written back.
    pub fn load_conversations(&self) -> Vec<Conversation> {
        self.try_load_conversations().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load conversations; ignoring them");
            Vec::new()
        })
    }

    pub fn find_conversation(&self, id: &str) -> Option<Conversation> {
        self.load_conversations().into_iter().find(|c| c.id == id)
    }

    /// Most recently updated conversation, if any.
    pub fn latest_conversation(&self) -> Option<Conversation> {
        self.load_conversations()
            .into_iter()
            .max_by_key(|c| c.updated_at)
    }

    /// Replace the conversation with the same id, or append it.
    pub fn upsert_conversation(&self, conversation: &Conversation) -> bool {
        let Some(mut conversations) = self.conversations_for_update() else {
            return false;
        };
        match conversations.iter_mut().find(|c| c.id == conversation.id) {
            Some(existing) => *existing = conversation.clone(),
            None => conversations.push(conversation.clone()),
        }
        self.write_conversations(&conversations)
    }

    /// Returns true when a conversation with `id` existed and was removed.
    pub fn delete_conversation(&self, id: &str) -> bool {
        let Some(mut conversations) = self.conversations_for_update() else {
            return false;
        };
        let before = conversations.len();
        conversations.retain(|c| c.id != id);
        if conversations.len() == before {
            return false;
        }
        self.write_conversations(&conversations)
    }

    pub fn load_settings(&self) -> Settings {
        match self.store.get(SETTINGS_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!(error = %err, "stored settings are unreadable; using defaults");
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(err) => {
                warn!(error = %err, "failed to read settings; using defaults");
                Settings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        self.write(SETTINGS_KEY, settings)
    }

    fn try_load_conversations(&self) -> Result<Vec<Conversation>, StoreError> {
        match self.store.get(CONVERSATIONS_KEY)? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    /// Existing records to rewrite, or `None` when they cannot be loaded.
    /// Writing over unreadable data would discard every stored conversation.
    fn conversations_for_update(&self) -> Option<Vec<Conversation>> {
        match self.try_load_conversations() {
            Ok(conversations) => Some(conversations),
            Err(err) => {
                warn!(error = %err, "stored conversations unavailable; leaving them untouched");
                None
            }
        }
    }

    fn write_conversations(&self, conversations: &[Conversation]) -> bool {
        self.write(CONVERSATIONS_KEY, conversations)
    }

    fn write<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let result = serde_json::to_string(value)
            .map_err(StoreError::from)
            .and_then(|raw| self.store.set(key, &raw));
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(key, error = %err, "failed to persist record");
                false
            }
        }
    }
}
