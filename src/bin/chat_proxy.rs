//! Résumé chat proxy server
//!
//! Environment:
//!   OPENROUTER_API_KEY   upstream key (sent as a bearer token)
//!   CHAT_PROXY_ADDR      listen address (default 127.0.0.1:3001)
//!   CHAT_MODEL           completion model
//!   CHAT_ENDPOINT        chat completions URL
//!   CHAT_REFERER         HTTP-Referer header
//!   CHAT_TITLE           X-Title header
//!   CHAT_RESUME          résumé JSON file (built-in sample when unset)
//!   RUST_LOG             log filter (default info)

use emberfield::chat::{self, ChatConfig, ChatProxy, OpenRouterClient, Resume};
use std::sync::Arc;

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ChatConfig::from_env();
    log::info!("chat-proxy v{}", emberfield::VERSION);
    log::info!("API key status: {}", config.key_status());
    if config.api_key.is_empty() {
        log::warn!("OPENROUTER_API_KEY is not set, upstream calls will be rejected");
    }

    let resume = match &config.resume_path {
        Some(path) => Resume::load(path),
        None => Resume::builtin(),
    }
    .map_err(|e| e.to_string())?;
    log::info!("résumé: {} ({} projects)", resume.name, resume.projects.len());

    let client = OpenRouterClient::new(&config);
    let proxy = Arc::new(ChatProxy::new(Box::new(client), config.model.as_str(), &resume));

    let server = chat::bind(&config.addr).map_err(|e| e.to_string())?;
    log::info!("listening on http://{}{} (model {})", config.addr, chat::CHAT_PATH, config.model);

    chat::serve(server, proxy);
    Ok(())
}
