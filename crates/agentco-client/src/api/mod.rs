//! API endpoint implementations.

mod agents;
mod api_keys;
mod development;
mod github;
mod planning;
mod projects;
mod tasks;

pub use agents::AgentsApi;
pub use api_keys::ApiKeysApi;
pub use development::DevelopmentApi;
pub use github::GitHubApi;
pub use planning::PlanningApi;
pub use projects::ProjectsApi;
pub use tasks::{ListTasksQuery, TasksApi};
