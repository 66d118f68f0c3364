//! Request types for the agentco API.
//!
//! Response records live in `agentco-types` and are re-exported from the
//! crate root.

use serde::{Deserialize, Serialize};

use agentco_types::{
    AgentId, AgentRole, AgentStatus, Department, Priority, Progress, ProjectId, ServiceType,
    TaskId, TaskStatus,
};

// ─────────────────────────────────────────────────────────────────────────────
// Projects
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a project with its survey answers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<RequirementAnswer>,
}

/// One survey answer submitted with a new project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementAnswer {
    pub category: String,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// Partial update of a project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Agents
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create an agent persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAgentRequest {
    pub project: ProjectId,
    pub name: String,
    pub role: AgentRole,
    pub department: Department,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct AgentStatusBody {
    pub status: AgentStatus,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tasks
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub project: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
}

/// Partial update of a task's editable fields.
///
/// Status and progress change only through their dedicated endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<AgentId>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskStatusBody {
    pub status: TaskStatus,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TaskProgressBody {
    pub progress: Progress,
}

// ─────────────────────────────────────────────────────────────────────────────
// Development runs
// ─────────────────────────────────────────────────────────────────────────────

/// Options for starting an automated development run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartDevelopmentRequest {
    pub provider: ServiceType,
    pub model: String,
    #[serde(default)]
    pub parallel_execution: bool,
    #[serde(default)]
    pub auto_commit: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Planning
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub(crate) struct GeneratePlanBody {
    pub project_id: ProjectId,
}

// ─────────────────────────────────────────────────────────────────────────────
// GitHub
// ─────────────────────────────────────────────────────────────────────────────

/// Request to create a GitHub repository for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRepositoryRequest {
    pub project_id: ProjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub private: bool,
    #[serde(default = "default_true")]
    pub auto_init: bool,
}

impl CreateRepositoryRequest {
    /// Private, auto-initialised repository with no description.
    pub fn new(project_id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: None,
            private: true,
            auto_init: true,
        }
    }
}

fn default_true() -> bool {
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// API keys
// ─────────────────────────────────────────────────────────────────────────────

/// Request to store a new API key.
#[derive(Clone, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    pub service_type: ServiceType,
    pub api_key: String,
}

impl std::fmt::Debug for CreateApiKeyRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreateApiKeyRequest")
            .field("service_type", &self.service_type)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Partial update of a stored key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateApiKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}
