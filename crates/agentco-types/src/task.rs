//! Task records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AgentId, Progress, ProjectId, TaskId, TaskStatus};

/// A unit of project work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub project: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub progress: Progress,
    /// Weak reference; the agent may no longer exist.
    #[serde(default)]
    pub assigned_to: Option<AgentId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskId>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<TaskOutput>,
}

impl Task {
    /// Progress to display: only meaningful while the task is in progress.
    pub fn visible_progress(&self) -> Option<Progress> {
        self.status.tracks_progress().then_some(self.progress)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "unknown priority '{other}' (expected high, medium, or low)"
            )),
        }
    }
}

/// Output produced by a completed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    pub output_type: OutputType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub files: Vec<OutputFile>,
}

/// Kind of task output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Code,
    Design,
    Document,
    Analysis,
}

/// A file attached to a task output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputFile {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_task() {
        let json = r#"{
            "id": 12,
            "project": 3,
            "assigned_to": null,
            "assigned_to_name": null,
            "title": "Design login page",
            "description": "Wireframes first",
            "status": "in_progress",
            "status_display": "In Progress",
            "priority": "high",
            "priority_display": "High",
            "progress": 40,
            "dependencies": [10, 11],
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z",
            "completed_at": null,
            "output": null
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id.as_str(), "12");
        assert_eq!(task.project.as_str(), "3");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.progress.get(), 40);
        assert!(task.assigned_to.is_none());
        assert_eq!(task.dependencies.len(), 2);
        assert_eq!(task.visible_progress().map(Progress::get), Some(40));
    }

    #[test]
    fn test_progress_hidden_outside_in_progress() {
        let json = r#"{"id": "1", "project": "1", "title": "t", "status": "review", "progress": 80}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(task.visible_progress().is_none());
    }

    #[test]
    fn test_out_of_range_progress_does_not_reject_the_list() {
        let json = r#"[
            {"id": "1", "project": "1", "title": "ok", "status": "in_progress", "progress": 30},
            {"id": "2", "project": "1", "title": "overshot", "status": "in_progress", "progress": 150}
        ]"#;
        let tasks: Vec<Task> = serde_json::from_str(json).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].progress.get(), 30);
        assert_eq!(tasks[1].progress, Progress::COMPLETE);
    }

    #[test]
    fn test_parse_priority() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert!("urgent".parse::<Priority>().is_err());
    }
}
