//! Trait implementations backed by the HTTP client.

use async_trait::async_trait;

use agentco_client::{AgentcoClient, CreateTaskRequest};
use agentco_types::{Agent, DevelopmentStatus, Progress, ProjectId, Task, TaskId, TaskStatus};

use crate::error::Result;
use crate::tracker::StatusSource;
use crate::workflow::TaskBackend;

#[async_trait]
impl TaskBackend for AgentcoClient {
    async fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>> {
        Ok(self.tasks().list_for_project(project).await?)
    }

    async fn list_agents(&self, project: &ProjectId) -> Result<Vec<Agent>> {
        Ok(self.agents().list_for_project(project).await?)
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task> {
        Ok(self.tasks().create(request).await?)
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task> {
        Ok(self.tasks().update_status(id, status).await?)
    }

    async fn update_progress(&self, id: &TaskId, progress: Progress) -> Result<Task> {
        Ok(self.tasks().update_progress(id, progress).await?)
    }
}

#[async_trait]
impl StatusSource for AgentcoClient {
    async fn fetch(&self, project: &ProjectId) -> Result<DevelopmentStatus> {
        Ok(self.development().status(project).await?)
    }

    async fn pause(&self, project: &ProjectId) -> Result<()> {
        Ok(self.development().pause(project).await?)
    }
}
