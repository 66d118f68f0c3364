//! Shared types for the agentco console.
//!
//! Everything here is pure data: the records served by the backend, the task
//! status state machine, the board projection, and the bounded log buffer
//! used by the development progress tracker. No I/O happens in this crate.

pub mod agent;
pub mod board;
pub mod development;
pub mod ids;
pub mod integrations;
pub mod log_buffer;
pub mod planning;
pub mod progress;
pub mod project;
pub mod status;
pub mod task;

pub use agent::{Agent, AgentRole, AgentStatus, Department};
pub use board::{Board, BoardCard, BoardColumn, COLUMNS, SIDELINED_TITLE};
pub use development::{DevelopmentStatus, LogEntry, LogLevel, RunStatus, TaskProgress};
pub use ids::{
    AgentId, ApiKeyId, PlanningDocumentId, ProjectId, RecommendationId, RepositoryId, RequirementId,
    TaskId,
};
pub use integrations::{AiService, ApiKey, GitHubRepository, ServiceType};
pub use log_buffer::{DEFAULT_LOG_CAPACITY, LogBuffer};
pub use planning::{AgentRecommendation, Complexity, GeneratedPlan, PlanningDocument};
pub use progress::{Progress, ProgressError};
pub use project::{Project, ProjectRequirement, ProjectStats, ProjectStatus};
pub use status::{StepStatus, TaskStatus, TransitionError};
pub use task::{OutputFile, OutputType, Priority, Task, TaskOutput};

/// Current time as an RFC 3339 string, the timestamp format the backend uses.
pub fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}
