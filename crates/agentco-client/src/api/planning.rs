//! Planning documents API.

use agentco_types::{GeneratedPlan, PlanningDocument, ProjectId};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::GeneratePlanBody;

/// Planning documents API client.
pub struct PlanningApi {
    client: AgentcoClient,
}

impl PlanningApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// Get the planning document of a project.
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when none has been
    /// generated yet.
    pub async fn by_project(&self, project: &ProjectId) -> Result<PlanningDocument> {
        self.client
            .get(&format!("planning/by-project/{}/", project))
            .await
    }

    /// Generate the planning document and the recommended agents.
    ///
    /// An existing document is returned as is.
    pub async fn generate(&self, project: &ProjectId) -> Result<GeneratedPlan> {
        let body = GeneratePlanBody {
            project_id: project.clone(),
        };
        self.client.post("planning/generate/", &body).await
    }
}
