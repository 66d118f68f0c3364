//! Task status state machine.
//!
//! [`TaskStatus`] is the one canonical status type. The development run
//! reports per-step status using a narrower vocabulary; that view is
//! [`StepStatus`], reachable only through `StepStatus::from(TaskStatus)`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle status of a task.
///
/// ```text
/// pending ──► in_progress ──► review ──► completed
///                  │
///                  └──► blocked
///
/// any active state ──► failed   (backend only)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Review,
    Completed,
    Blocked,
    Failed,
}

impl TaskStatus {
    /// Every status, in pipeline order.
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
        TaskStatus::Blocked,
        TaskStatus::Failed,
    ];

    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Review => "review",
            TaskStatus::Completed => "completed",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Failed => "failed",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Review => "Review",
            TaskStatus::Completed => "Completed",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::Failed => "Failed",
        }
    }

    /// Targets a user may request from this status.
    ///
    /// Transitions into `failed` are decided by the backend and never
    /// offered here.
    pub fn allowed_transitions(self) -> &'static [TaskStatus] {
        match self {
            TaskStatus::Pending => &[TaskStatus::InProgress],
            TaskStatus::InProgress => &[TaskStatus::Review, TaskStatus::Blocked],
            TaskStatus::Review => &[TaskStatus::Completed],
            TaskStatus::Completed | TaskStatus::Blocked | TaskStatus::Failed => &[],
        }
    }

    /// Whether `self -> to` is in the transition table.
    pub fn can_transition_to(self, to: TaskStatus) -> bool {
        self.allowed_transitions().contains(&to)
    }

    /// Check `self -> to` against the transition table.
    pub fn validate_transition(self, to: TaskStatus) -> Result<(), TransitionError> {
        if self.can_transition_to(to) {
            Ok(())
        } else {
            Err(TransitionError { from: self, to })
        }
    }

    /// No further transitions happen from a terminal status.
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }

    /// Statuses where `progress` carries meaning.
    pub fn tracks_progress(self) -> bool {
        self == TaskStatus::InProgress
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        TaskStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                format!(
                    "unknown task status '{s}' (expected one of: pending, in_progress, review, completed, blocked, failed)"
                )
            })
    }
}

/// A requested transition that is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move task from {from} to {to}")]
pub struct TransitionError {
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Narrow status view used for the steps of a development run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl StepStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::InProgress => "in_progress",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }
}

/// Projection from the canonical status.
///
/// `review` and `blocked` are both "started, not finished" and project to
/// `in_progress`.
impl From<TaskStatus> for StepStatus {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Pending => StepStatus::Pending,
            TaskStatus::InProgress | TaskStatus::Review | TaskStatus::Blocked => {
                StepStatus::InProgress
            }
            TaskStatus::Completed => StepStatus::Completed,
            TaskStatus::Failed => StepStatus::Failed,
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        use TaskStatus::*;

        let allowed = [
            (Pending, InProgress),
            (InProgress, Review),
            (InProgress, Blocked),
            (Review, Completed),
        ];

        for from in TaskStatus::ALL {
            for to in TaskStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.can_transition_to(to),
                    expected,
                    "{from} -> {to} should be {}",
                    if expected { "allowed" } else { "rejected" }
                );
            }
        }
    }

    #[test]
    fn test_skipping_review_is_rejected() {
        let err = TaskStatus::InProgress
            .validate_transition(TaskStatus::Completed)
            .unwrap_err();
        assert_eq!(err.from, TaskStatus::InProgress);
        assert_eq!(err.to, TaskStatus::Completed);
        assert_eq!(err.to_string(), "cannot move task from in_progress to completed");
    }

    #[test]
    fn test_failed_never_offered() {
        for status in TaskStatus::ALL {
            assert!(!status.can_transition_to(TaskStatus::Failed));
        }
    }

    #[test]
    fn test_terminal_statuses_have_no_exits() {
        assert!(TaskStatus::Completed.allowed_transitions().is_empty());
        assert!(TaskStatus::Failed.allowed_transitions().is_empty());
        assert!(TaskStatus::Completed.is_terminal());
        assert!(!TaskStatus::Blocked.is_terminal());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!("in_progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("In-Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("review".parse::<TaskStatus>(), Ok(TaskStatus::Review));
        assert!("done".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let parsed: TaskStatus = serde_json::from_str("\"blocked\"").unwrap();
        assert_eq!(parsed, TaskStatus::Blocked);
    }

    #[test]
    fn test_step_projection() {
        assert_eq!(StepStatus::from(TaskStatus::Pending), StepStatus::Pending);
        assert_eq!(StepStatus::from(TaskStatus::Review), StepStatus::InProgress);
        assert_eq!(StepStatus::from(TaskStatus::Blocked), StepStatus::InProgress);
        assert_eq!(StepStatus::from(TaskStatus::Completed), StepStatus::Completed);
        assert_eq!(StepStatus::from(TaskStatus::Failed), StepStatus::Failed);
    }
}
