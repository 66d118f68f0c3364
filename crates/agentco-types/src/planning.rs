//! Planning documents: the generated requirements document for a project
//! and the agent roles it recommends.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{PlanningDocumentId, Priority, ProjectId, RecommendationId};

/// Estimated project complexity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    #[default]
    Medium,
    High,
}

impl Complexity {
    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "low",
            Complexity::Medium => "medium",
            Complexity::High => "high",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requirements document generated from a project's survey answers.
///
/// The analysis fields are free-form JSON produced by the backend's model
/// and are kept as [`serde_json::Value`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanningDocument {
    pub id: PlanningDocumentId,
    pub project: ProjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default)]
    pub tech_stack: serde_json::Value,
    #[serde(default)]
    pub required_roles: Vec<serde_json::Value>,
    #[serde(default)]
    pub complexity: Complexity,
    #[serde(default)]
    pub key_features: Vec<serde_json::Value>,
    #[serde(default)]
    pub challenges: Vec<serde_json::Value>,
    #[serde(default)]
    pub executive_summary: String,
    #[serde(default)]
    pub technical_requirements: String,
    #[serde(default)]
    pub feature_specifications: String,
    #[serde(default)]
    pub development_plan: String,
    #[serde(default)]
    pub timeline: String,
    /// The whole document as Markdown.
    #[serde(default)]
    pub full_document: String,
    #[serde(default)]
    pub tokens_used: u64,
    #[serde(default)]
    pub agent_recommendations: Vec<AgentRecommendation>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl PlanningDocument {
    /// The named sections, in reading order, skipping empty ones.
    pub fn sections(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Executive Summary", self.executive_summary.as_str()),
            ("Technical Requirements", self.technical_requirements.as_str()),
            ("Features", self.feature_specifications.as_str()),
            ("Development Plan", self.development_plan.as_str()),
            ("Timeline", self.timeline.as_str()),
        ]
        .into_iter()
        .filter(|(_, body)| !body.trim().is_empty())
    }
}

/// An agent role the planner suggests staffing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentRecommendation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecommendationId>,
    pub role: String,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub skills: Vec<String>,
    /// Hours.
    #[serde(default)]
    pub estimated_workload: u32,
    #[serde(default)]
    pub created_at: String,
}

/// Response of `POST /planning/generate/`.
///
/// When the project already has a document the backend returns it unchanged
/// and `agents_created` is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedPlan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub planning_document: PlanningDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agents_created: Option<u32>,
}

impl GeneratedPlan {
    /// Whether this call produced a new document.
    pub fn is_new(&self) -> bool {
        self.agents_created.is_some()
    }
}
