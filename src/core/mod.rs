pub mod classifier;
pub mod config;
pub mod conversation;
pub mod credentials;
pub mod error;
pub mod message;
pub mod profiles;
pub mod reconciler;
pub mod retry;
pub mod settings;
pub mod store;
