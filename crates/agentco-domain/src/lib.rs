//! Domain layer for agentco.
//!
//! This crate sits between the HTTP client and the console front end and
//! owns the two pieces with real behaviour:
//!
//! - **Task workflow**: loaded task and agent collections, the board
//!   projection, and transition requests validated against the status table
//!   before any network call. Every successful mutation is followed by a
//!   full reload; the backend stays the source of truth.
//! - **Progress tracking**: a single-flight poll of a development run with a
//!   bounded log buffer and a completion callback that fires exactly once.
//!
//! Both are written against small trait seams ([`TaskBackend`],
//! [`StatusSource`]) that [`AgentcoClient`] implements.
//!
//! # Example
//!
//! ```ignore
//! use agentco_domain::{TaskStatus, TaskWorkflow};
//!
//! let mut workflow = TaskWorkflow::load(client, "1".into()).await?;
//! workflow.transition(&"12".into(), TaskStatus::InProgress).await?;
//! for column in &workflow.board().columns {
//!     println!("{}: {}", column.title, column.len());
//! }
//! ```

mod backend;
mod error;
pub mod tracker;
pub mod workflow;

pub use error::{DomainError, Result};
#[cfg(any(test, feature = "simulation"))]
pub use tracker::SimulatedRun;
pub use tracker::{
    DEFAULT_POLL_INTERVAL, ProgressTracker, StatusSource, TrackerConfig, TrackerHandle, TrackerView,
};
pub use workflow::{TaskBackend, TaskWorkflow};

// Re-export key types for convenience
pub use agentco_client::{AgentcoClient, CreateTaskRequest};
pub use agentco_types::{
    Board, DevelopmentStatus, LogBuffer, LogEntry, Progress, ProjectId, RunStatus, Task, TaskId,
    TaskStatus,
};
