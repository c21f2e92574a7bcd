//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod auth;
pub mod chat;
pub mod classify;
pub mod conversations;
pub mod say;
pub mod settings;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::api::OpenRouterClient;
use crate::core::config::{ClientConfig, Config};
use crate::core::credentials::resolve_credential;
use crate::core::store::{FileStore, MemoryStore, Repository};
use crate::utils::logging::init_tracing;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("VERGEN_GIT_DESCRIBE"),
    ", built ",
    env!("VERGEN_BUILD_DATE"),
    ")"
);

#[derive(Parser)]
#[command(name = "chatroute")]
#[command(version, long_version = LONG_VERSION)]
#[command(about = "A terminal chat client that picks a model for each message")]
#[command(
    long_about = "Chatroute sends each message to a model chosen for the kind of task it \
describes: coding questions go to a code-tuned model, research questions to a \
research-tuned model, and everything else to a general model. Rate-limited requests \
are retried with exponential backoff, and conversations are saved locally.\n\n\
Authentication:\n\
  Set OPENROUTER_API_KEY, or run 'chatroute auth' to store a key in the system keyring.\n\n\
Chat commands:\n\
  /new              Start a new conversation\n\
  /copy             Copy the last reply as plain text\n\
  /list             List saved conversations\n\
  /open <id>        Switch to a saved conversation\n\
  /help             Show chat commands\n\
  /quit             Leave the chat\n\n\
Logging:\n\
  CHATROUTE_LOG     Log filter written to stderr (default: warn)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat (default)
    Chat {
        /// Start a new conversation instead of resuming the latest one
        #[arg(short = 'n', long)]
        new: bool,
    },
    /// Send a single message and print the reply
    Say {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        prompt: Vec<String>,
    },
    /// Show which category and model a message would be routed to
    Classify {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        text: Vec<String>,
    },
    /// List saved conversations
    Conversations,
    /// Print a saved conversation
    Show {
        /// Conversation id (a unique prefix is enough)
        id: String,
        /// Render replies as HTML instead of plain text
        #[arg(long)]
        html: bool,
    },
    /// Delete a saved conversation
    Delete {
        /// Conversation id (a unique prefix is enough)
        id: String,
    },
    /// Set a display setting, or list settings when no key is given
    Set {
        key: Option<String>,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Reset a display setting to its default
    Unset { key: String },
    /// Show or change config.toml values
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Store an OpenRouter API key in the system keyring
    Auth,
    /// Remove the stored API key
    Deauth,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Set a config value
    Set { key: String, value: String },
    /// Remove a config value, restoring its default
    Unset { key: String },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    tokio::runtime::Runtime::new()?.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;

    match args.command.unwrap_or(Commands::Chat { new: false }) {
        Commands::Chat { new } => {
            let client = build_client(&config)?;
            chat::run_chat(&config, &client, &open_repository(&config), new).await
        }
        Commands::Say { prompt } => {
            let client = build_client(&config)?;
            say::run_say(&prompt.join(" "), &client, &config).await
        }
        Commands::Classify { text } => {
            classify::print_classification(&text.join(" "));
            Ok(())
        }
        Commands::Conversations => conversations::list(&open_repository(&config)),
        Commands::Show { id, html } => {
            conversations::show(&open_repository(&config), &config, &id, html)
        }
        Commands::Delete { id } => conversations::delete(&open_repository(&config), &id),
        Commands::Set { key, value } => {
            settings::set(&open_repository(&config), key.as_deref(), &value.join(" "))
        }
        Commands::Unset { key } => settings::unset(&open_repository(&config), &key),
        Commands::Config { command } => settings::config(config, command),
        Commands::Auth => auth::run_auth(),
        Commands::Deauth => auth::run_deauth(),
    }
}

/// Resolve the credential and validate client settings before any request.
pub fn build_client(config: &Config) -> Result<OpenRouterClient, Box<dyn Error>> {
    let credential = match resolve_credential() {
        Ok(credential) => credential,
        Err(err) if err.is_recoverable() => {
            warn!(error = %err, "keyring unavailable; continuing without it");
            None
        }
        Err(err) => return Err(err.into()),
    };
    Ok(OpenRouterClient::new(ClientConfig::resolve(
        config, credential,
    )?))
}

/// File-backed repository in the data dir, or an in-memory one when no
/// data dir can be determined.
pub fn open_repository(config: &Config) -> Repository {
    match config.data_dir() {
        Some(dir) => Repository::new(Box::new(FileStore::new(dir))),
        None => {
            warn!("no data directory available; conversations will not be saved");
            Repository::new(Box::new(MemoryStore::new()))
        }
    }
}
