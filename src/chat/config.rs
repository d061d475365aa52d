//! Chat proxy settings, read from the environment

use std::path::PathBuf;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_MODEL: &str = "google/gemini-2.0-flash-001";
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_REFERER: &str = "http://localhost:3001";
pub const DEFAULT_TITLE: &str = "Portfolio Assistant";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// OpenRouter key, sent trimmed; empty when unset
    pub api_key: String,
    pub addr: String,
    pub model: String,
    pub endpoint: String,
    pub referer: String,
    pub title: String,
    /// Résumé JSON file, the built-in one when `None`
    pub resume_path: Option<PathBuf>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            addr: DEFAULT_ADDR.to_string(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            resume_path: None,
        }
    }
}

impl ChatConfig {
    /// Build from a variable lookup; unset or blank variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        Self {
            api_key: get("OPENROUTER_API_KEY").map(|k| k.trim().to_string()).unwrap_or_default(),
            addr: get("CHAT_PROXY_ADDR").unwrap_or(defaults.addr),
            model: get("CHAT_MODEL").unwrap_or(defaults.model),
            endpoint: get("CHAT_ENDPOINT").unwrap_or(defaults.endpoint),
            referer: get("CHAT_REFERER").unwrap_or(defaults.referer),
            title: get("CHAT_TITLE").unwrap_or(defaults.title),
            resume_path: get("CHAT_RESUME").map(PathBuf::from),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loggable key status; never more than the last four characters
    pub fn key_status(&self) -> String {
        if self.api_key.is_empty() {
            return "NOT FOUND".to_string();
        }
        let tail: String = {
            let chars: Vec<char> = self.api_key.chars().collect();
            chars[chars.len().saturating_sub(4)..].iter().collect()
        };
        format!("Found (ends with {})", tail)
    }
}
