//! Résumé chat proxy
//!
//! Answers portfolio visitors' questions by forwarding them, together with a
//! fixed system prompt built from the owner's résumé, to an OpenRouter-style
//! chat completions endpoint. Stateless: the widget sends the conversation
//! so far with every question.

mod config;
mod openrouter;
mod prompt;
mod proxy;
mod resume;
mod server;

pub use config::ChatConfig;
pub use openrouter::OpenRouterClient;
pub use prompt::{assistant_name, system_prompt};
pub use proxy::{ChatProxy, Choice, ChoiceMessage, CompletionClient, CompletionRequest, CompletionResponse, Message, Role};
pub use resume::{Contact, Experience, Project, Resume};
pub use server::{bind, serve, CHAT_PATH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reply when the upstream answers without usable content
pub const EMPTY_REPLY: &str = "I'm sorry, I couldn't process that request.";
/// Reply when the upstream answers with a non-success status
pub const UPSTREAM_REPLY: &str =
    "I'm sorry, I'm having trouble connecting to my brain right now. Please try again later!";
/// Reply for every other failure
pub const FAILURE_REPLY: &str = "Something went wrong. Please try again later.";

/// One earlier message of the visitor's conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// "user" for the visitor, anything else for the assistant
    #[serde(rename = "type")]
    pub kind: String,
    pub content: String,
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Option<Vec<Turn>>,
}

/// Every response body, success or not
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    pub message: String,
}

impl ChatReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("invalid chat request: {0}")]
    Request(#[source] serde_json::Error),
    #[error("upstream returned status {status}")]
    Upstream { status: u16 },
    #[error("upstream unreachable: {0}")]
    Transport(String),
    #[error("invalid upstream response: {0}")]
    Decode(String),
    #[error("invalid résumé {path}: {source}")]
    Resume {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to bind {addr}: {reason}")]
    Bind { addr: String, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ChatError {
    /// HTTP status and body the widget receives for this failure
    pub fn reply(&self) -> (u16, ChatReply) {
        match self {
            ChatError::Upstream { status } => (*status, ChatReply::new(UPSTREAM_REPLY)),
            _ => (500, ChatReply::new(FAILURE_REPLY)),
        }
    }
}
