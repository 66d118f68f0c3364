//! GitHub integration API.

use agentco_types::GitHubRepository;

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::CreateRepositoryRequest;

/// GitHub integration API client.
pub struct GitHubApi {
    client: AgentcoClient,
}

impl GitHubApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// List repositories connected to the current account.
    pub async fn repositories(&self) -> Result<Vec<GitHubRepository>> {
        self.client.get("github/repositories/").await
    }

    /// Create a repository on GitHub and connect it to a project.
    ///
    /// The backend refuses a second repository for the same project.
    pub async fn create_repository(
        &self,
        request: &CreateRepositoryRequest,
    ) -> Result<GitHubRepository> {
        self.client
            .post("github/repositories/create_repository/", request)
            .await
    }
}
