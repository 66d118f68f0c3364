//! Task workflow controller.
//!
//! Holds the task and agent collections of one project and mediates every
//! change to them. Nothing is updated optimistically: a mutation is sent to
//! the backend and, on success, both collections are reloaded in full. If that
//! reload fails the change still stands, and the task the backend returned
//! replaces the local copy.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use agentco_client::CreateTaskRequest;
use agentco_types::{Agent, Board, Progress, ProjectId, Task, TaskId, TaskStatus};

use crate::error::{DomainError, Result};

/// Backend operations the workflow needs.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// All tasks of a project.
    async fn list_tasks(&self, project: &ProjectId) -> Result<Vec<Task>>;

    /// All agents of a project.
    async fn list_agents(&self, project: &ProjectId) -> Result<Vec<Agent>>;

    /// Create a task.
    async fn create_task(&self, request: &CreateTaskRequest) -> Result<Task>;

    /// Persist a status change.
    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> Result<Task>;

    /// Persist a progress report.
    async fn update_progress(&self, id: &TaskId, progress: Progress) -> Result<Task>;
}

/// Task workflow for a single project.
pub struct TaskWorkflow<B> {
    backend: B,
    project: ProjectId,
    tasks: Vec<Task>,
    agents: Vec<Agent>,
}

impl<B: TaskBackend> TaskWorkflow<B> {
    /// Create an empty workflow. Call [`reload`](Self::reload) to populate it.
    pub fn new(backend: B, project: ProjectId) -> Self {
        Self {
            backend,
            project,
            tasks: Vec::new(),
            agents: Vec::new(),
        }
    }

    /// Create a workflow and load its collections.
    pub async fn load(backend: B, project: ProjectId) -> Result<Self> {
        let mut workflow = Self::new(backend, project);
        workflow.reload().await?;
        Ok(workflow)
    }

    pub fn project(&self) -> &ProjectId {
        &self.project
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loaded tasks, in backend order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Loaded agents, in backend order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Board projection of the loaded collections.
    pub fn board(&self) -> Board<'_> {
        Board::project(&self.tasks, &self.agents)
    }

    /// Replace both collections with fresh copies from the backend.
    ///
    /// Both lists are fetched before either is replaced, so a failed reload
    /// leaves the previous state in place.
    pub async fn reload(&mut self) -> Result<()> {
        let (tasks, agents) = tokio::try_join!(
            self.backend.list_tasks(&self.project),
            self.backend.list_agents(&self.project),
        )?;
        debug!(
            project = %self.project,
            tasks = tasks.len(),
            agents = agents.len(),
            "Reloaded task workflow"
        );
        self.tasks = tasks;
        self.agents = agents;
        Ok(())
    }

    /// Move a task to another status.
    ///
    /// The request is checked against the task's currently loaded status
    /// first; a refused transition never reaches the backend. If the backend
    /// rejects the change, the error is returned and nothing local changes.
    pub async fn transition(&mut self, id: &TaskId, to: TaskStatus) -> Result<&Task> {
        let from = self.loaded(id)?.status;
        if let Err(err) = from.validate_transition(to) {
            warn!(task_id = %id, %from, %to, "Refused task transition");
            return Err(err.into());
        }

        let applied = self.backend.update_status(id, to).await?;
        info!(task_id = %id, %from, %to, "Task status updated");

        self.refresh_after(applied).await;
        self.loaded(id)
    }

    /// Report progress on a task.
    pub async fn set_progress(&mut self, id: &TaskId, progress: Progress) -> Result<&Task> {
        let status = self.loaded(id)?.status;
        if !status.tracks_progress() {
            debug!(task_id = %id, %status, "Progress reported on a task that is not in progress");
        }

        let applied = self.backend.update_progress(id, progress).await?;
        info!(task_id = %id, %progress, "Task progress updated");

        self.refresh_after(applied).await;
        self.loaded(id)
    }

    /// Create a task in this workflow's project and return its ID.
    pub async fn create_task(&mut self, mut request: CreateTaskRequest) -> Result<TaskId> {
        request.project = self.project.clone();
        let task = self.backend.create_task(&request).await?;
        info!(task_id = %task.id, title = %task.title, "Task created");

        let id = task.id.clone();
        self.refresh_after(task).await;
        Ok(id)
    }

    /// Reload after an applied mutation, falling back to the backend's copy
    /// of the changed task.
    async fn refresh_after(&mut self, applied: Task) {
        if let Err(err) = self.reload().await {
            warn!(
                task_id = %applied.id,
                error = %err,
                "Reload after update failed; keeping the returned task"
            );
            match self.tasks.iter_mut().find(|t| t.id == applied.id) {
                Some(slot) => *slot = applied,
                None => self.tasks.push(applied),
            }
        }
    }

    fn loaded(&self, id: &TaskId) -> Result<&Task> {
        self.task(id)
            .ok_or_else(|| DomainError::TaskNotFound(id.clone()))
    }
}
