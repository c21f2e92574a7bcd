//! Listing, printing, and deleting saved conversations.

use std::error::Error;
use std::io::{self, Write};

use chrono::Local;

use crate::core::config::Config;
use crate::core::conversation::Conversation;
use crate::core::message::Message;
use crate::core::profiles::model_display_name;
use crate::core::store::Repository;
use crate::render::{MarkdownRenderer, RenderCache};

/// Find the conversation whose id equals `query` or uniquely starts with it.
pub fn find_by_prefix<'a>(
    conversations: &'a [Conversation],
    query: &str,
) -> Result<&'a Conversation, String> {
    let query = query.trim();
    if let Some(exact) = conversations.iter().find(|c| c.id == query) {
        return Ok(exact);
    }

    let mut matches = conversations
        .iter()
        .filter(|c| !query.is_empty() && c.id.starts_with(query));
    match (matches.next(), matches.next()) {
        (Some(only), None) => Ok(only),
        (Some(_), Some(_)) => Err(format!(
            "'{query}' matches more than one conversation; use a longer id"
        )),
        (None, _) => Err(format!("No conversation with id '{query}'")),
    }
}

pub fn write_conversation_list<W: Write>(
    out: &mut W,
    conversations: &[Conversation],
) -> io::Result<()> {
    if conversations.is_empty() {
        return writeln!(out, "No saved conversations.");
    }

    let mut sorted: Vec<&Conversation> = conversations.iter().collect();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    for conversation in sorted {
        writeln!(
            out,
            "{}  {}  {:>3} msgs  {}",
            short_id(&conversation.id),
            conversation
                .updated_at
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M"),
            conversation.messages.len(),
            conversation.title
        )?;
    }
    Ok(())
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Header line for one message: who sent it, plus the time when enabled.
pub fn message_header(message: &Message, show_timestamps: bool) -> String {
    let mut header = if message.is_user() {
        "You".to_string()
    } else {
        match message.model.as_deref() {
            Some(model) => model_display_name(model).to_string(),
            None => "Assistant".to_string(),
        }
    };
    if message.is_error() {
        header.push_str(" (error)");
    }
    if show_timestamps {
        if let Some(timestamp) = message.timestamp {
            header.push_str(&format!(
                " [{}]",
                timestamp.with_timezone(&Local).format("%H:%M")
            ));
        }
    }
    header
}

pub fn write_message<W: Write>(
    out: &mut W,
    message: &Message,
    renderer: &mut MarkdownRenderer,
    show_timestamps: bool,
    html: bool,
) -> io::Result<()> {
    writeln!(out, "{}:", message_header(message, show_timestamps))?;
    if message.is_user() || message.is_error() {
        writeln!(out, "{}", message.content)?;
    } else if html {
        write!(out, "{}", renderer.render_to_html(&message.content))?;
    } else {
        writeln!(out, "{}", renderer.to_plain_text(&message.content))?;
    }
    writeln!(out)
}

pub fn write_transcript<W: Write>(
    out: &mut W,
    conversation: &Conversation,
    renderer: &mut MarkdownRenderer,
    show_timestamps: bool,
    html: bool,
) -> io::Result<()> {
    writeln!(out, "# {}", conversation.title)?;
    writeln!(out)?;
    for message in &conversation.messages {
        write_message(out, message, renderer, show_timestamps, html)?;
    }
    Ok(())
}

pub fn list(repository: &Repository) -> Result<(), Box<dyn Error>> {
    write_conversation_list(&mut io::stdout().lock(), &repository.load_conversations())?;
    Ok(())
}

pub fn show(
    repository: &Repository,
    config: &Config,
    id: &str,
    html: bool,
) -> Result<(), Box<dyn Error>> {
    let conversations = repository.load_conversations();
    let conversation = find_by_prefix(&conversations, id)?;
    let settings = repository.load_settings();
    let mut renderer = MarkdownRenderer::new(RenderCache::new(config.render_cache_capacity()));
    write_transcript(
        &mut io::stdout().lock(),
        conversation,
        &mut renderer,
        settings.show_timestamps,
        html,
    )?;
    Ok(())
}

pub fn delete(repository: &Repository, id: &str) -> Result<(), Box<dyn Error>> {
    let conversations = repository.load_conversations();
    let conversation = find_by_prefix(&conversations, id)?;
    if !repository.delete_conversation(&conversation.id) {
        return Err(format!("Failed to delete conversation '{}'", conversation.title).into());
    }
    println!("✅ Deleted \"{}\"", conversation.title);
    Ok(())
}
