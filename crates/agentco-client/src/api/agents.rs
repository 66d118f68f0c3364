//! Agents API.

use agentco_types::{Agent, AgentId, AgentStatus, ProjectId, Task};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::{AgentStatusBody, CreateAgentRequest};

#[derive(serde::Serialize)]
struct ProjectFilter<'a> {
    project: &'a ProjectId,
}

/// Agents API client.
pub struct AgentsApi {
    client: AgentcoClient,
}

impl AgentsApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// List all agents.
    pub async fn list(&self) -> Result<Vec<Agent>> {
        self.client.get("agents/").await
    }

    /// List the agents of one project.
    pub async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<Agent>> {
        self.client
            .get_with_query("agents/", &ProjectFilter { project })
            .await
    }

    /// Get an agent by ID.
    pub async fn get(&self, id: &AgentId) -> Result<Agent> {
        self.client.get(&format!("agents/{}/", id)).await
    }

    /// Create an agent persona.
    pub async fn create(&self, request: &CreateAgentRequest) -> Result<Agent> {
        self.client.post("agents/", request).await
    }

    /// Set an agent's activity status.
    pub async fn update_status(&self, id: &AgentId, status: AgentStatus) -> Result<Agent> {
        self.client
            .post(
                &format!("agents/{}/update_status/", id),
                &AgentStatusBody { status },
            )
            .await
    }

    /// List the tasks assigned to an agent.
    pub async fn tasks(&self, id: &AgentId) -> Result<Vec<Task>> {
        self.client.get(&format!("agents/{}/tasks/", id)).await
    }
}
