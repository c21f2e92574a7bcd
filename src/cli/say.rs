//! One-shot "say" command

use std::error::Error;
use std::io::{self, Write};

use crate::api::CompletionClient;
use crate::core::config::Config;
use crate::core::reconciler::ChatSession;
use crate::core::retry::RetryPolicy;
use crate::core::store::{MemoryStore, Repository};
use crate::render::{MarkdownRenderer, RenderCache};

/// Route `prompt`, print the plain-text reply, and fail when the exchange
/// ended in an error. Nothing is written to the conversation history.
pub async fn run_say(
    prompt: &str,
    client: &dyn CompletionClient,
    config: &Config,
) -> Result<(), Box<dyn Error>> {
    let mut stdout = io::stdout().lock();
    say_to(prompt, client, config.retry_policy(), config, &mut stdout).await
}

async fn say_to<W: Write>(
    prompt: &str,
    client: &dyn CompletionClient,
    policy: RetryPolicy,
    config: &Config,
    out: &mut W,
) -> Result<(), Box<dyn Error>> {
    let repository = Repository::new(Box::new(MemoryStore::new()));
    let mut session = ChatSession::new();
    let reply = session
        .send(prompt, client, &policy, &repository)
        .await?
        .clone();

    if reply.is_error() {
        return Err(reply.content.into());
    }

    let mut renderer = MarkdownRenderer::new(RenderCache::new(config.render_cache_capacity()));
    writeln!(out, "{}", renderer.to_plain_text(&reply.content))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::{failure, reply, ScriptedClient};
    use crate::core::profiles::CODING_MODEL;
    use std::time::Duration;

    fn policy() -> RetryPolicy {
        RetryPolicy::new(1, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn prints_plain_text_reply() {
        let client = ScriptedClient::new(vec![reply("Use `Vec::binary_search`.")]);
        let mut out = Vec::new();
        say_to(
            "implement a binary search in sorted array",
            &client,
            policy(),
            &Config::default(),
            &mut out,
        )
        .await
        .unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Use Vec::binary_search.\n");
        assert_eq!(client.requests()[0].model, CODING_MODEL);
    }

    #[tokio::test]
    async fn error_reply_becomes_command_error() {
        let client = ScriptedClient::new(vec![failure(429, ""), failure(429, "")]);
        let mut out = Vec::new();
        let err = say_to("hello", &client, policy(), &Config::default(), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Rate limit exceeded"));
        assert!(out.is_empty());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected() {
        let client = ScriptedClient::new(Vec::new());
        let mut out = Vec::new();
        let err = say_to("   ", &client, policy(), &Config::default(), &mut out)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot send an empty message");
    }
}
