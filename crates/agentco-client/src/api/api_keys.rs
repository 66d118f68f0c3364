//! AI-provider API key API.

use agentco_types::{AiService, ApiKey, ApiKeyId};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::{CreateApiKeyRequest, UpdateApiKeyRequest};

/// API key API client.
pub struct ApiKeysApi {
    client: AgentcoClient,
}

impl ApiKeysApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// List all stored keys.
    pub async fn list(&self) -> Result<Vec<ApiKey>> {
        self.client.get("api-keys/").await
    }

    /// List only active keys.
    pub async fn active(&self) -> Result<Vec<ApiKey>> {
        self.client.get("api-keys/active/").await
    }

    /// List the supported AI services.
    pub async fn services(&self) -> Result<Vec<AiService>> {
        self.client.get("api-keys/services/").await
    }

    /// Store a new key.
    pub async fn create(&self, request: &CreateApiKeyRequest) -> Result<ApiKey> {
        self.client.post("api-keys/", request).await
    }

    /// Update a stored key.
    pub async fn update(&self, id: &ApiKeyId, request: &UpdateApiKeyRequest) -> Result<ApiKey> {
        self.client.patch(&format!("api-keys/{}/", id), request).await
    }

    /// Activate or deactivate a key.
    pub async fn set_active(&self, id: &ApiKeyId, active: bool) -> Result<ApiKey> {
        self.update(
            id,
            &UpdateApiKeyRequest {
                is_active: Some(active),
            },
        )
        .await
    }

    /// Delete a key.
    pub async fn delete(&self, id: &ApiKeyId) -> Result<()> {
        self.client.delete(&format!("api-keys/{}/", id)).await
    }
}
