//! Board projection: tasks grouped into status columns.

use std::collections::HashMap;

use serde::Serialize;

use crate::{Agent, AgentId, Task, TaskStatus};

/// Pipeline columns, in display order.
pub static COLUMNS: [(TaskStatus, &str); 4] = [
    (TaskStatus::Pending, "To Do"),
    (TaskStatus::InProgress, "In Progress"),
    (TaskStatus::Review, "Review"),
    (TaskStatus::Completed, "Completed"),
];

/// Title of the bucket holding tasks that left the pipeline.
pub const SIDELINED_TITLE: &str = "Blocked / Failed";

static SIDELINED: [TaskStatus; 2] = [TaskStatus::Blocked, TaskStatus::Failed];

/// A task with its assignee resolved.
#[derive(Debug, Clone, Serialize)]
pub struct BoardCard<'a> {
    pub task: &'a Task,
    /// `None` when the task is unassigned or its agent is not in the loaded
    /// collection.
    pub assignee: Option<&'a Agent>,
}

/// A titled column of cards.
#[derive(Debug, Clone, Serialize)]
pub struct BoardColumn<'a> {
    pub title: &'static str,
    pub statuses: &'static [TaskStatus],
    pub cards: Vec<BoardCard<'a>>,
}

impl BoardColumn<'_> {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Tasks partitioned into the four pipeline columns plus the
/// blocked/failed bucket.
#[derive(Debug, Clone, Serialize)]
pub struct Board<'a> {
    pub columns: Vec<BoardColumn<'a>>,
    pub sidelined: BoardColumn<'a>,
}

impl<'a> Board<'a> {
    /// Stable partition of `tasks` by exact status.
    ///
    /// Input order is preserved within each column. Assignees are looked up
    /// in `agents`; stale references resolve to `None`.
    pub fn project(tasks: &'a [Task], agents: &'a [Agent]) -> Self {
        let by_id: HashMap<&AgentId, &Agent> = agents.iter().map(|a| (&a.id, a)).collect();

        let mut columns: Vec<BoardColumn<'a>> = COLUMNS
            .iter()
            .map(|(status, title)| BoardColumn {
                title: *title,
                statuses: std::slice::from_ref(status),
                cards: Vec::new(),
            })
            .collect();
        let mut sidelined = BoardColumn {
            title: SIDELINED_TITLE,
            statuses: &SIDELINED,
            cards: Vec::new(),
        };

        for task in tasks {
            let card = BoardCard {
                task,
                assignee: task
                    .assigned_to
                    .as_ref()
                    .and_then(|id| by_id.get(id).copied()),
            };
            match COLUMNS.iter().position(|(status, _)| *status == task.status) {
                Some(index) => columns[index].cards.push(card),
                None => sidelined.cards.push(card),
            }
        }

        Self { columns, sidelined }
    }

    /// Column for a pipeline status, if it has one.
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn<'a>> {
        self.columns.iter().find(|c| c.statuses.contains(&status))
    }

    /// Total number of cards, sidelined included.
    pub fn len(&self) -> usize {
        self.columns.iter().map(BoardColumn::len).sum::<usize>() + self.sidelined.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
