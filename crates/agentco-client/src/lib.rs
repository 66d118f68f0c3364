//! HTTP client SDK for the agentco company-simulation backend.
//!
//! This crate provides a typed client for the backend's REST API. The session
//! lives in a cookie jar shared by every clone of the client, and mutating
//! requests echo the `csrftoken` cookie in the `X-CSRFToken` header.
//!
//! # Example
//!
//! ```no_run
//! use agentco_client::{AgentcoClient, Result, TaskStatus};
//!
//! # async fn example() -> Result<()> {
//! let client = AgentcoClient::builder()
//!     .base_url("http://localhost:8000/api")
//!     .session_id("abc123")
//!     .csrf_token("tok")
//!     .build()?;
//!
//! let project = "1".into();
//! for task in client.tasks().list_for_project(&project).await? {
//!     println!("{} [{}] {}", task.id, task.status, task.title);
//! }
//!
//! client.tasks().update_status(&"12".into(), TaskStatus::InProgress).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **Projects**: CRUD, survey answers, aggregate stats
//! - **Agents**: list, create, status updates, assigned tasks
//! - **Tasks**: list, create, update, status and progress reports
//! - **Development**: start, pause and poll automated runs
//! - **GitHub**: list and create connected repositories
//! - **API keys**: manage AI-provider keys

mod api;
mod client;
mod error;
mod types;

pub use api::{
    AgentsApi, ApiKeysApi, DevelopmentApi, GitHubApi, ListTasksQuery, PlanningApi, ProjectsApi,
    TasksApi,
};
pub use client::{
    AgentcoClient, ClientBuilder, CSRF_COOKIE, CSRF_HEADER, DEFAULT_BASE_URL, SESSION_COOKIE,
};
pub use error::{Error, Result};
pub use types::*;

pub use agentco_types::*;
