//! Chatroute is a terminal chat client that routes every message to a model
//! suited to the task it describes.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns classification, model profiles, the retrying request
//!   executor, conversation reconciliation, persistence, and configuration.
//! - [`api`] defines the chat-completion payloads and the HTTP client that
//!   sends them.
//! - [`render`] converts markdown replies to HTML or plain text behind a
//!   bounded cache.
//! - [`utils`] carries clipboard access, tracing setup, and URL helpers.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches subcommands and runs the
//! interactive chat in [`cli::chat`].

pub mod api;
pub mod cli;
pub mod core;
pub mod render;
pub mod utils;
