//! Blocking OpenRouter chat completions client

use super::{ChatConfig, ChatError, CompletionClient, CompletionRequest, CompletionResponse};

use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(30);

pub struct OpenRouterClient {
    agent: ureq::Agent,
    endpoint: String,
    authorization: String,
    referer: String,
    title: String,
}

impl OpenRouterClient {
    pub fn new(config: &ChatConfig) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(TIMEOUT).build(),
            endpoint: config.endpoint.clone(),
            authorization: format!("Bearer {}", config.api_key.trim()),
            referer: config.referer.clone(),
            title: config.title.clone(),
        }
    }
}

impl CompletionClient for OpenRouterClient {
    fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ChatError> {
        let response = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &self.authorization)
            .set("Content-Type", "application/json")
            .set("HTTP-Referer", &self.referer)
            .set("X-Title", &self.title)
            .send_json(request);

        match response {
            Ok(response) => response
                .into_json::<CompletionResponse>()
                .map_err(|e| ChatError::Decode(e.to_string())),
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                log::error!("upstream error {}: {}", status, body);
                Err(ChatError::Upstream { status })
            },
            Err(ureq::Error::Transport(transport)) => Err(ChatError::Transport(transport.to_string())),
        }
    }
}
