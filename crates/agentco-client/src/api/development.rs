//! Development run API.

use agentco_types::{DevelopmentStatus, ProjectId};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::StartDevelopmentRequest;

/// Development run API client.
pub struct DevelopmentApi {
    client: AgentcoClient,
}

impl DevelopmentApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// Fetch the current run snapshot for a project.
    pub async fn status(&self, project: &ProjectId) -> Result<DevelopmentStatus> {
        self.client
            .get(&format!("projects/{}/development-status/", project))
            .await
    }

    /// Start an automated development run.
    pub async fn start(&self, project: &ProjectId, request: &StartDevelopmentRequest) -> Result<()> {
        self.client
            .post_unit(&format!("projects/{}/start-development/", project), request)
            .await
    }

    /// Ask the backend to pause the running job.
    pub async fn pause(&self, project: &ProjectId) -> Result<()> {
        self.client
            .post_unit(
                &format!("projects/{}/pause-development/", project),
                &serde_json::json!({}),
            )
            .await
    }
}
