//! GitHub repositories and AI-provider API keys.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ApiKeyId, ProjectId, RepositoryId};

/// A GitHub repository connected to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubRepository {
    pub id: RepositoryId,
    pub project: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_account_username: Option<String>,
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub created_at: String,
}

fn default_branch() -> String {
    "main".to_string()
}

/// AI provider a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Opencode,
    Openai,
    Anthropic,
    Google,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [
        ServiceType::Opencode,
        ServiceType::Openai,
        ServiceType::Anthropic,
        ServiceType::Google,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Opencode => "opencode",
            ServiceType::Openai => "openai",
            ServiceType::Anthropic => "anthropic",
            ServiceType::Google => "google",
        }
    }

    /// Model used when a run is started without naming one.
    pub fn default_model(self) -> &'static str {
        match self {
            ServiceType::Openai | ServiceType::Opencode => "gpt-4",
            ServiceType::Anthropic => "claude-3-opus-20240229",
            ServiceType::Google => "gemini-pro",
        }
    }

    /// Expected key format, `*` standing for the secret part.
    pub fn key_format(self) -> &'static str {
        match self {
            ServiceType::Opencode => "oc-*",
            ServiceType::Openai => "sk-*",
            ServiceType::Anthropic => "sk-ant-*",
            ServiceType::Google => "AI*",
        }
    }

    /// Cheap prefix check against [`key_format`](Self::key_format).
    ///
    /// This is only a hint for the user; the backend decides.
    pub fn looks_like_key(self, key: &str) -> bool {
        let format = self.key_format();
        match format.split_once('*') {
            Some((prefix, _)) => key.starts_with(prefix),
            None => true,
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ServiceType::ALL
            .into_iter()
            .find(|service| service.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown service '{s}' (expected opencode, openai, anthropic, or google)")
            })
    }
}

/// A stored API key. The secret itself is never returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: ApiKeyId,
    pub service_type: ServiceType,
    #[serde(default)]
    pub service_name: String,
    pub is_active: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<String>,
}

/// Catalogue entry describing a supported AI service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiService {
    pub service_type: ServiceType,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub signup_url: String,
    #[serde(default)]
    pub docs_url: String,
    #[serde(default)]
    pub key_format: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_per_provider() {
        assert_eq!(ServiceType::Openai.default_model(), "gpt-4");
        assert_eq!(ServiceType::Anthropic.default_model(), "claude-3-opus-20240229");
        assert_eq!(ServiceType::Google.default_model(), "gemini-pro");
        assert_eq!(ServiceType::Opencode.default_model(), "gpt-4");
    }

    #[test]
    fn test_key_format_hint() {
        assert!(ServiceType::Anthropic.looks_like_key("sk-ant-abc"));
        assert!(!ServiceType::Anthropic.looks_like_key("sk-abc"));
        assert!(ServiceType::Openai.looks_like_key("sk-abc"));
        assert!(ServiceType::Google.looks_like_key("AIzaSy"));
        assert!(!ServiceType::Opencode.looks_like_key("sk-abc"));
    }

    #[test]
    fn test_deserialize_repository() {
        let json = r#"{
            "id": 2,
            "project": 1,
            "github_account": 1,
            "github_account_username": "octo",
            "project_name": "Shop",
            "repo_id": 99,
            "name": "shop",
            "full_name": "octo/shop",
            "html_url": "https://github.com/octo/shop",
            "clone_url": "https://github.com/octo/shop.git",
            "default_branch": "main",
            "is_private": true,
            "created_at": "2025-01-01T00:00:00Z"
        }"#;
        let repo: GitHubRepository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.full_name, "octo/shop");
        assert!(repo.is_private);
    }
}
