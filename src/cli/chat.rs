//! Line-oriented interactive chat.

use std::error::Error;
use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::api::{CompletionClient, OpenRouterClient};
use crate::cli::conversations::{
    find_by_prefix, write_conversation_list, write_message, write_transcript,
};
use crate::core::config::Config;
use crate::core::message::{Message, MessageStatus};
use crate::core::profiles::model_display_name;
use crate::core::reconciler::{ChatSession, PLACEHOLDER_TEXT, WELCOME_MESSAGE};
use crate::core::retry::{execute_with_retry, RetryPolicy};
use crate::core::store::Repository;
use crate::render::{MarkdownRenderer, RenderCache};
use crate::utils::clipboard::{Clipboard, SystemClipboard};

const HELP: &str = "\
Commands:
  /new          Start a new conversation
  /copy         Copy the last reply as plain text
  /list         List saved conversations
  /open <id>    Switch to a saved conversation
  /help         Show this help
  /quit         Leave the chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplCommand<'a> {
    Empty,
    Message(&'a str),
    New,
    Copy,
    List,
    Open(&'a str),
    Help,
    Quit,
    Unknown(&'a str),
}

pub fn parse_line(line: &str) -> ReplCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return ReplCommand::Message(trimmed);
    };

    let (command, argument) = match rest.split_once(char::is_whitespace) {
        Some((command, argument)) => (command, argument.trim()),
        None => (rest, ""),
    };
    match command {
        "new" => ReplCommand::New,
        "copy" => ReplCommand::Copy,
        "list" => ReplCommand::List,
        "open" if !argument.is_empty() => ReplCommand::Open(argument),
        "help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        _ => ReplCommand::Unknown(trimmed),
    }
}

/// Collaborators the chat loop drives.
pub struct ChatContext<'a> {
    pub client: &'a dyn CompletionClient,
    pub policy: RetryPolicy,
    pub repository: &'a Repository,
    pub renderer: MarkdownRenderer,
    pub clipboard: &'a dyn Clipboard,
    pub show_timestamps: bool,
}

pub async fn run_chat(
    config: &Config,
    client: &OpenRouterClient,
    repository: &Repository,
    new: bool,
) -> Result<(), Box<dyn Error>> {
    let settings = repository.load_settings();
    let session = if new {
        ChatSession::new()
    } else {
        ChatSession::resume_or_new(repository)
    };

    let clipboard = SystemClipboard;
    let mut ctx = ChatContext {
        client,
        policy: client.config().retry,
        repository,
        renderer: MarkdownRenderer::new(RenderCache::new(config.render_cache_capacity())),
        clipboard: &clipboard,
        show_timestamps: settings.show_timestamps,
    };

    let stdin = io::stdin();
    run_repl(&mut ctx, session, stdin.lock(), &mut io::stdout()).await?;
    Ok(())
}

/// Read lines from `input` until EOF or `/quit`. Returns the final session.
pub async fn run_repl<R: BufRead, W: Write>(
    ctx: &mut ChatContext<'_>,
    mut session: ChatSession,
    mut input: R,
    out: &mut W,
) -> io::Result<ChatSession> {
    greet(ctx, &session, out)?;

    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            break;
        }

        match parse_line(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Quit => break,
            ReplCommand::Help => writeln!(out, "{HELP}")?,
            ReplCommand::New => {
                session = ChatSession::new();
                writeln!(out, "{WELCOME_MESSAGE}")?;
            }
            ReplCommand::Copy => copy_last_reply(ctx, &session, out)?,
            ReplCommand::List => {
                write_conversation_list(out, &ctx.repository.load_conversations())?
            }
            ReplCommand::Open(id) => {
                let conversations = ctx.repository.load_conversations();
                match find_by_prefix(&conversations, id) {
                    Ok(conversation) => {
                        session = ChatSession::from_conversation(conversation.clone());
                        write_transcript(
                            out,
                            session.conversation(),
                            &mut ctx.renderer,
                            ctx.show_timestamps,
                            false,
                        )?;
                    }
                    Err(message) => writeln!(out, "{message}")?,
                }
            }
            ReplCommand::Unknown(command) => {
                writeln!(out, "Unknown command: {command} (try /help)")?
            }
            ReplCommand::Message(text) => exchange(ctx, &mut session, text, out).await?,
        }
    }
    Ok(session)
}

async fn exchange<W: Write>(
    ctx: &mut ChatContext<'_>,
    session: &mut ChatSession,
    text: &str,
    out: &mut W,
) -> io::Result<()> {
    let pending = match session.begin_exchange(text) {
        Ok(pending) => pending,
        Err(rejected) => return writeln!(out, "{rejected}"),
    };
    writeln!(
        out,
        "{PLACEHOLDER_TEXT} ({})",
        model_display_name(pending.profile().model)
    )?;
    out.flush()?;

    let client = ctx.client;
    let outcome = execute_with_retry(&ctx.policy, || client.complete(pending.request())).await;
    let reply = session
        .complete(pending, outcome, ctx.repository)
        .cloned();
    if let Some(reply) = reply {
        write_message(out, &reply, &mut ctx.renderer, ctx.show_timestamps, false)?;
    }
    Ok(())
}

fn last_reply(session: &ChatSession) -> Option<&Message> {
    session
        .conversation()
        .messages
        .iter()
        .rev()
        .find(|m| !m.is_user() && m.status != Some(MessageStatus::Sending))
}

fn copy_last_reply<W: Write>(
    ctx: &mut ChatContext<'_>,
    session: &ChatSession,
    out: &mut W,
) -> io::Result<()> {
    let Some(reply) = last_reply(session) else {
        return writeln!(out, "Nothing to copy yet.");
    };
    let text = ctx.renderer.to_plain_text(&reply.content);
    if ctx.clipboard.write(&text) {
        writeln!(out, "Copied!")
    } else {
        writeln!(out, "Could not copy to the clipboard.")
    }
}

fn greet<W: Write>(ctx: &mut ChatContext<'_>, session: &ChatSession, out: &mut W) -> io::Result<()> {
    let conversation = session.conversation();
    if conversation.messages.is_empty() {
        // Shown on screen only; never stored with the conversation.
        writeln!(out, "{WELCOME_MESSAGE}")
    } else {
        debug!(id = %conversation.id, "showing resumed conversation");
        write_transcript(
            out,
            conversation,
            &mut ctx.renderer,
            ctx.show_timestamps,
            false,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{failure, reply, ScriptedClient};
    use crate::core::store::MemoryStore;
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingClipboard {
        copied: RefCell<Vec<String>>,
    }

    impl Clipboard for RecordingClipboard {
        fn write(&self, text: &str) -> bool {
            self.copied.borrow_mut().push(text.to_string());
            true
        }
    }

    async fn drive(
        client: &ScriptedClient,
        repository: &Repository,
        clipboard: &RecordingClipboard,
        session: ChatSession,
        script: &str,
    ) -> (ChatSession, String) {
        let mut ctx = ChatContext {
            client,
            policy: RetryPolicy::new(3, Duration::from_millis(1)),
            repository,
            renderer: MarkdownRenderer::new(RenderCache::new(16)),
            clipboard,
            show_timestamps: false,
        };
        let mut out = Vec::new();
        let session = run_repl(&mut ctx, session, Cursor::new(script.to_string()), &mut out)
            .await
            .unwrap();
        (session, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands_and_messages() {
        assert_eq!(parse_line("  \n"), ReplCommand::Empty);
        assert_eq!(parse_line("hello\n"), ReplCommand::Message("hello"));
        assert_eq!(parse_line("/new"), ReplCommand::New);
        assert_eq!(parse_line("/open abc123 \n"), ReplCommand::Open("abc123"));
        assert_eq!(parse_line("/open"), ReplCommand::Unknown("/open"));
        assert_eq!(parse_line("/exit"), ReplCommand::Quit);
        assert_eq!(parse_line("/frobnicate now"), ReplCommand::Unknown("/frobnicate now"));
    }

    #[tokio::test]
    async fn chat_round_trip_prints_welcome_placeholder_and_reply() {
        let client = ScriptedClient::new(vec![reply("**Hi** there")]);
        let repository = Repository::new(Box::new(MemoryStore::new()));
        let clipboard = RecordingClipboard::default();

        let (session, output) = drive(
            &client,
            &repository,
            &clipboard,
            ChatSession::new(),
            "hello, how are you\n/copy\n/quit\n",
        )
        .await;

        assert!(output.starts_with(WELCOME_MESSAGE));
        assert!(output.contains("Thinking... (Mistral)"));
        assert!(output.contains("Mistral:\nHi there\n"));
        assert!(output.contains("Copied!"));
        assert_eq!(clipboard.copied.borrow().as_slice(), ["Hi there".to_string()]);

        // The welcome line is never part of the stored conversation.
        let stored = repository.find_conversation(&session.conversation().id).unwrap();
        assert_eq!(stored.messages.len(), 2);
        assert!(stored.messages.iter().all(|m| m.content != WELCOME_MESSAGE));
        assert_eq!(stored.title, "hello, how are you");
    }

    #[tokio::test]
    async fn failures_are_shown_and_chat_continues() {
        let client = ScriptedClient::new(vec![failure(500, ""), reply("second try works")]);
        let repository = Repository::new(Box::new(MemoryStore::new()));
        let clipboard = RecordingClipboard::default();

        let (session, output) = drive(
            &client,
            &repository,
            &clipboard,
            ChatSession::new(),
            "first\nsecond\n",
        )
        .await;

        assert!(output.contains("(error):\nError: HTTP error! status: 500."));
        assert!(output.contains("second try works"));
        assert_eq!(session.conversation().messages.len(), 4);
        assert_eq!(session.conversation().title, "first");
    }

    #[tokio::test]
    async fn new_and_open_switch_conversations() {
        let client = ScriptedClient::new(vec![reply("one"), reply("two")]);
        let repository = Repository::new(Box::new(MemoryStore::new()));
        let clipboard = RecordingClipboard::default();

        let (first, _) = drive(
            &client,
            &repository,
            &clipboard,
            ChatSession::new(),
            "alpha\n/new\nbeta\n",
        )
        .await;
        assert_eq!(first.conversation().title, "beta");
        assert_eq!(repository.load_conversations().len(), 2);

        let alpha_id = repository
            .load_conversations()
            .into_iter()
            .find(|c| c.title == "alpha")
            .unwrap()
            .id;
        let script = format!("/open {}\n/list\n", &alpha_id[..10]);
        let (opened, output) = drive(
            &ScriptedClient::new(Vec::new()),
            &repository,
            &clipboard,
            ChatSession::new(),
            &script,
        )
        .await;
        assert_eq!(opened.conversation().id, alpha_id);
        assert!(output.contains("# alpha"));
        assert!(output.contains("beta"));
    }

    #[tokio::test]
    async fn resumed_conversation_is_replayed_instead_of_welcome() {
        let repository = Repository::new(Box::new(MemoryStore::new()));
        let clipboard = RecordingClipboard::default();
        let client = ScriptedClient::new(vec![reply("earlier reply")]);
        drive(&client, &repository, &clipboard, ChatSession::new(), "earlier\n").await;

        let (_, output) = drive(
            &ScriptedClient::new(Vec::new()),
            &repository,
            &clipboard,
            ChatSession::resume_or_new(&repository),
            "/copy\n",
        )
        .await;
        assert!(!output.contains(WELCOME_MESSAGE));
        assert!(output.contains("earlier reply"));
        assert_eq!(clipboard.copied.borrow().last().unwrap(), "earlier reply");
    }
}
