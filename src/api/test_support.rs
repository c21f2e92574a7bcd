use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::api::{ChatRequest, CompletionClient, CompletionReply};
use crate::core::error::RequestError;

/// Replays canned outcomes in order and records every request it was given.
pub struct ScriptedClient {
    outcomes: Mutex<VecDeque<Result<CompletionReply, RequestError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedClient {
    pub fn new(outcomes: Vec<Result<CompletionReply, RequestError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: &ChatRequest) -> Result<CompletionReply, RequestError> {
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected extra request")
    }
}

pub fn reply(content: &str) -> Result<CompletionReply, RequestError> {
    Ok(CompletionReply {
        content: content.to_string(),
        model: None,
    })
}

pub fn failure(status: u16, body: &str) -> Result<CompletionReply, RequestError> {
    Err(RequestError::Status {
        status,
        body: body.to_string(),
    })
}
