use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scanned competitor and, once generated, its landing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Idea {
    pub id: i64,
    pub source_url: String,
    pub competitor_name: String,
    pub weaknesses: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_markup: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Idea {
    pub fn is_published(&self) -> bool {
        self.published_markup.is_some()
    }
}

/// Insert payload; `published_markup` always starts absent.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub source_url: String,
    pub competitor_name: String,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub id: i64,
    pub competitor_name: String,
    pub weaknesses: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    /// Payment link, or the sentinel when issuance failed
    pub destination_url: String,
    pub artifact_ref: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}
