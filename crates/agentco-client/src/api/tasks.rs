//! Tasks API.

use agentco_types::{AgentId, Progress, ProjectId, Task, TaskId, TaskStatus};

use crate::client::AgentcoClient;
use crate::error::Result;
use crate::types::{CreateTaskRequest, TaskProgressBody, TaskStatusBody, UpdateTaskRequest};

/// Query parameters for listing tasks.
#[derive(Debug, Default, Clone, serde::Serialize)]
pub struct ListTasksQuery {
    /// Filter by project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectId>,
    /// Filter by assigned agent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentId>,
}

/// Tasks API client.
pub struct TasksApi {
    client: AgentcoClient,
}

impl TasksApi {
    pub(crate) fn new(client: AgentcoClient) -> Self {
        Self { client }
    }

    /// List all tasks.
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.client.get("tasks/").await
    }

    /// List tasks with query parameters.
    pub async fn list_with_query(&self, query: &ListTasksQuery) -> Result<Vec<Task>> {
        self.client.get_with_query("tasks/", query).await
    }

    /// List the tasks of one project.
    pub async fn list_for_project(&self, project: &ProjectId) -> Result<Vec<Task>> {
        self.list_with_query(&ListTasksQuery {
            project: Some(project.clone()),
            ..Default::default()
        })
        .await
    }

    /// Get a task by ID.
    pub async fn get(&self, id: &TaskId) -> Result<Task> {
        self.client.get(&format!("tasks/{}/", id)).await
    }

    /// Create a task.
    pub async fn create(&self, request: &CreateTaskRequest) -> Result<Task> {
        self.client.post("tasks/", request).await
    }

    /// Update a task's editable fields.
    pub async fn update(&self, id: &TaskId, request: &UpdateTaskRequest) -> Result<Task> {
        self.client.patch(&format!("tasks/{}/", id), request).await
    }

    /// Request a status change.
    ///
    /// This is the raw endpoint; the transition table is enforced by the
    /// workflow controller, which knows the task's current status.
    pub async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task> {
        self.client
            .post(
                &format!("tasks/{}/update_status/", id),
                &TaskStatusBody { status },
            )
            .await
    }

    /// Report progress on a task.
    pub async fn update_progress(&self, id: &TaskId, progress: Progress) -> Result<Task> {
        self.client
            .post(
                &format!("tasks/{}/update_progress/", id),
                &TaskProgressBody { progress },
            )
            .await
    }
}
