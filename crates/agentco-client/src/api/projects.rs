//! Projects API.

use agentco_types::{Project, ProjectId, ProjectRequirement, ProjectStats};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::{CreateProjectRequest, UpdateProjectRequest};

/// Projects API client.
pub struct ProjectsApi {
    client: AgentcoClient,
}

impl ProjectsApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// List all projects.
    pub async fn list(&self) -> Result<Vec<Project>> {
        self.client.get("projects/").await
    }

    /// Get a project by ID.
    pub async fn get(&self, id: &ProjectId) -> Result<Project> {
        self.client.get(&format!("projects/{}/", id)).await
    }

    /// Create a project together with its survey answers.
    pub async fn create(&self, request: &CreateProjectRequest) -> Result<Project> {
        self.client.post("projects/", request).await
    }

    /// Update a project.
    pub async fn update(&self, id: &ProjectId, request: &UpdateProjectRequest) -> Result<Project> {
        self.client.patch(&format!("projects/{}/", id), request).await
    }

    /// Delete a project and everything it owns.
    pub async fn delete(&self, id: &ProjectId) -> Result<()> {
        self.client.delete(&format!("projects/{}/", id)).await
    }

    /// Get the survey answers recorded for a project.
    pub async fn requirements(&self, id: &ProjectId) -> Result<Vec<ProjectRequirement>> {
        self.client
            .get(&format!("projects/{}/requirements/", id))
            .await
    }

    /// Get aggregate agent and task counters.
    pub async fn stats(&self, id: &ProjectId) -> Result<ProjectStats> {
        self.client.get(&format!("projects/{}/stats/", id)).await
    }
}
