//! Folds one exchange (user turn plus model outcome) into a conversation.
//!
//! An exchange moves `Idle -> Sending -> Idle`. [`ChatSession::begin_exchange`]
//! appends the user message and a placeholder reply in memory only;
//! [`ChatSession::complete`] swaps the placeholder for the terminal bot
//! message and persists the conversation. A session refuses a second
//! exchange while one is outstanding.

use std::error::Error as StdError;
use std::fmt;

use tracing::{debug, info, warn};

use crate::api::{ChatMessage, ChatRequest, CompletionClient, CompletionReply};
use crate::core::classifier::{classify_detailed, TaskCategory};
use crate::core::conversation::Conversation;
use crate::core::error::RequestError;
use crate::core::message::{Message, MessageStatus};
use crate::core::profiles::{select_model, ModelProfile};
use crate::core::retry::{execute_with_retry, RetryPolicy};
use crate::core::store::Repository;

pub const PLACEHOLDER_TEXT: &str = "Thinking...";
pub const WELCOME_MESSAGE: &str =
    "Hello! I can help with coding, research, or general questions. What would you like to talk about?";

pub const RATE_LIMIT_REPLY: &str = "Rate limit exceeded. Please wait a moment and try again.";
pub const CREDENTIAL_REPLY: &str =
    "Invalid or missing API key. Please check your OpenRouter API key configuration.";

/// Why a send was refused before anything was appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejected {
    /// Another exchange is still outstanding.
    Busy,
    /// The message was empty or whitespace only.
    EmptyMessage,
    /// The exchange was already completed or belongs to another session.
    NotPending,
}

impl fmt::Display for SendRejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejected::Busy => write!(f, "A message is already being sent"),
            SendRejected::EmptyMessage => write!(f, "Cannot send an empty message"),
            SendRejected::NotPending => write!(f, "That exchange is no longer pending"),
        }
    }
}

impl StdError for SendRejected {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    Sending,
}

/// Ticket for the one outstanding exchange, handed back to [`ChatSession::complete`].
#[derive(Debug)]
pub struct PendingExchange {
    user_message_id: String,
    placeholder_id: String,
    category: TaskCategory,
    profile: &'static ModelProfile,
    request: ChatRequest,
}

impl PendingExchange {
    pub fn category(&self) -> TaskCategory {
        self.category
    }

    pub fn profile(&self) -> &'static ModelProfile {
        self.profile
    }

    /// The request to dispatch: one system entry and one user entry, no history.
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

/// User-facing text for a failed exchange.
pub fn failure_reply(error: &RequestError) -> String {
    if error.is_rate_limited() {
        RATE_LIMIT_REPLY.to_string()
    } else if error.mentions_credential() {
        CREDENTIAL_REPLY.to_string()
    } else {
        format!("Error: {error}. Please try rephrasing your request or try again later.")
    }
}

pub fn build_request(profile: &ModelProfile, text: &str) -> ChatRequest {
    ChatRequest {
        model: profile.model.to_string(),
        messages: vec![
            ChatMessage::system(profile.system_prompt),
            ChatMessage::user(text),
        ],
        temperature: profile.temperature,
        max_tokens: profile.max_tokens,
        presence_penalty: profile.presence_penalty,
        frequency_penalty: profile.frequency_penalty,
        top_p: profile.top_p,
    }
}

/// One conversation plus the single-flight guard for its exchanges.
#[derive(Debug)]
pub struct ChatSession {
    conversation: Conversation,
    in_flight: Option<(String, String)>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::from_conversation(Conversation::new())
    }

    pub fn from_conversation(conversation: Conversation) -> Self {
        Self {
            conversation,
            in_flight: None,
        }
    }

    /// Continue the most recently updated stored conversation, or start fresh.
    pub fn resume_or_new(repository: &Repository) -> Self {
        match repository.latest_conversation() {
            Some(conversation) => {
                debug!(id = %conversation.id, "resuming conversation");
                Self::from_conversation(conversation)
            }
            None => Self::new(),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn state(&self) -> ExchangeState {
        if self.in_flight.is_some() {
            ExchangeState::Sending
        } else {
            ExchangeState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.state() == ExchangeState::Sending
    }

    /// Classify `text`, pick its profile, and append the user turn plus a
    /// placeholder reply. Nothing is persisted yet.
    pub fn begin_exchange(&mut self, text: &str) -> Result<PendingExchange, SendRejected> {
        if self.is_busy() {
            return Err(SendRejected::Busy);
        }
        if text.trim().is_empty() {
            return Err(SendRejected::EmptyMessage);
        }

        let classification = classify_detailed(text);
        let profile = select_model(classification.category);
        debug!(
            category = %classification.category,
            model = profile.model,
            "routing message"
        );

        let user = Message::user(text);
        let placeholder = Message::bot(PLACEHOLDER_TEXT, None, MessageStatus::Sending);
        let pending = PendingExchange {
            user_message_id: user.id.clone(),
            placeholder_id: placeholder.id.clone(),
            category: classification.category,
            profile,
            request: build_request(profile, text),
        };

        self.conversation.push(user);
        self.conversation.push(placeholder);
        self.in_flight = Some((
            pending.user_message_id.clone(),
            pending.placeholder_id.clone(),
        ));
        Ok(pending)
    }

    /// Resolve `pending` with the request outcome and persist the result.
    ///
    /// Returns the terminal bot message, or `None` when `pending` is not
    /// this session's outstanding exchange.
    pub fn complete(
        &mut self,
        pending: PendingExchange,
        outcome: Result<CompletionReply, RequestError>,
        repository: &Repository,
    ) -> Option<&Message> {
        let expected = (
            pending.user_message_id.clone(),
            pending.placeholder_id.clone(),
        );
        if self.in_flight.as_ref() != Some(&expected) {
            warn!("ignoring completion for an exchange this session is not waiting on");
            return None;
        }
        self.in_flight = None;

        let succeeded = outcome.is_ok();
        let reply = match outcome {
            Ok(reply) => Message::bot(
                reply.content,
                Some(reply.model.unwrap_or_else(|| pending.profile.model.to_string())),
                MessageStatus::Sent,
            ),
            Err(err) => {
                warn!(error = %err, status = ?err.status(), "exchange failed");
                Message::bot(
                    failure_reply(&err),
                    Some(pending.profile.model.to_string()),
                    MessageStatus::Error,
                )
            }
        };

        if let Some(user) = self.conversation.find_mut(&pending.user_message_id) {
            user.status = Some(MessageStatus::Sent);
        }

        let reply_id = reply.id.clone();
        match self.conversation.find_mut(&pending.placeholder_id) {
            Some(placeholder) => *placeholder = reply,
            None => self.conversation.push(reply),
        }

        if succeeded && !self.conversation.title_locked {
            if let Some(first) = self.conversation.messages.iter().find(|m| m.is_user()) {
                let first = first.content.clone();
                self.conversation.lock_title_from(&first);
                info!(title = %self.conversation.title, "conversation titled");
            }
        }
        self.conversation.touch();

        if !repository.upsert_conversation(&self.conversation) {
            warn!(id = %self.conversation.id, "conversation kept in memory only");
        }

        self.conversation.find(&reply_id)
    }

    /// Run a whole exchange: route, request with retry, reconcile, persist.
    pub async fn send(
        &mut self,
        text: &str,
        client: &dyn CompletionClient,
        policy: &RetryPolicy,
        repository: &Repository,
    ) -> Result<&Message, SendRejected> {
        let pending = self.begin_exchange(text)?;
        let outcome = execute_with_retry(policy, || client.complete(pending.request())).await;
        self.complete(pending, outcome, repository)
            .ok_or(SendRejected::NotPending)
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
