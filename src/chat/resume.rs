//! Résumé document embedded in the system prompt

use super::ChatError;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Résumé shipped with the crate, used when no file is configured
const BUILTIN: &str = include_str!("../../assets/resume.json");

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
    pub period: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub name: String,
    pub contact: Contact,
    pub summary: String,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub projects: Vec<Project>,
    /// Skill taxonomy, category to skills
    #[serde(default)]
    pub skills: BTreeMap<String, Vec<String>>,
}

impl Resume {
    pub fn from_json(json: &str, origin: &str) -> Result<Self, ChatError> {
        serde_json::from_str(json).map_err(|source| ChatError::Resume {
            path: origin.to_string(),
            source,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ChatError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        Self::from_json(&json, &path.display().to_string())
    }

    pub fn builtin() -> Result<Self, ChatError> {
        Self::from_json(BUILTIN, "builtin")
    }

    /// Compact JSON, as embedded in the prompt
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_parses() {
        let resume = Resume::builtin().unwrap();
        assert!(!resume.name.is_empty());
        assert!(resume.contact.email.contains('@'));
        assert!(!resume.experience.is_empty());
        assert!(!resume.projects.is_empty());
        assert!(!resume.skills.is_empty());
    }

    #[test]
    fn test_minimal_document() {
        let resume = Resume::from_json(
            r#"{"name":"Ada Lovelace","contact":{"email":"ada@example.com"},"summary":"Analyst"}"#,
            "inline",
        )
        .unwrap();
        assert_eq!(resume.first_name(), "Ada");
        assert!(resume.projects.is_empty());
        assert_eq!(resume.contact.phone, "");
    }

    #[test]
    fn test_json_round_trips_through_prompt_form() {
        let resume = Resume::builtin().unwrap();
        let again = Resume::from_json(&resume.to_json(), "compact").unwrap();
        assert_eq!(resume, again);
    }

    #[test]
    fn test_bad_document_names_origin() {
        let err = Resume::from_json(r#"{"name": 3}"#, "me.json").unwrap_err();
        assert!(err.to_string().starts_with("invalid résumé me.json"));
    }
}
