//! Request handling, independent of the HTTP server and the upstream client

use super::{system_prompt, ChatError, ChatReply, ChatRequest, Resume, EMPTY_REPLY};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Widget turn type to completion role
    pub fn from_turn(kind: &str) -> Self {
        if kind == "user" {
            Role::User
        } else {
            Role::Assistant
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Body sent to the chat completions endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ChoiceMessage>,
}

/// The part of the completions response the proxy reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

impl CompletionResponse {
    /// First choice's content, if there is any text
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

/// Upstream chat completions API
pub trait CompletionClient: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError>;
}

impl<T: CompletionClient + ?Sized> CompletionClient for Arc<T> {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
        (**self).complete(request)
    }
}

/// Stateless chat handler shared by every request thread
pub struct ChatProxy {
    client: Box<dyn CompletionClient>,
    model: String,
    system_prompt: String,
}

impl ChatProxy {
    pub fn new(client: Box<dyn CompletionClient>, model: impl Into<String>, resume: &Resume) -> Self {
        Self {
            client,
            model: model.into(),
            system_prompt: system_prompt(resume),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// `[system, ...history, user]` for one visitor question
    pub fn completion_request(&self, request: &ChatRequest) -> CompletionRequest {
        let history = request.conversation_history.as_deref().unwrap_or_default();

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::new(Role::System, self.system_prompt.as_str()));
        messages.extend(
            history
                .iter()
                .map(|turn| Message::new(Role::from_turn(&turn.kind), turn.content.as_str())),
        );
        messages.push(Message::new(Role::User, request.message.as_str()));

        CompletionRequest {
            model: self.model.clone(),
            messages,
        }
    }

    fn answer(&self, body: &[u8]) -> Result<String, ChatError> {
        let request: ChatRequest = serde_json::from_slice(body).map_err(ChatError::Request)?;
        let completion = self.client.complete(&self.completion_request(&request))?;
        Ok(completion.first_content().unwrap_or(EMPTY_REPLY).to_string())
    }

    /// Status and reply body for a raw request body
    pub fn handle(&self, body: &[u8]) -> (u16, ChatReply) {
        match self.answer(body) {
            Ok(message) => (200, ChatReply::new(message)),
            Err(e) => {
                log::error!("chat request failed: {}", e);
                e.reply()
            },
        }
    }
}
