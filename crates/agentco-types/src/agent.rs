//! Agent personas.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{AgentId, ProjectId};

/// A named persona assigned to a role and department within a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub project: ProjectId,
    pub name: String,
    pub role: AgentRole,
    pub department: Department,
    #[serde(default)]
    pub status: AgentStatus,
    #[serde(default = "default_avatar")]
    pub avatar: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub task_count: u32,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

fn default_avatar() -> String {
    "🤖".to_string()
}

/// Agent activity status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    #[default]
    Idle,
    Working,
    Completed,
    Error,
}

impl AgentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentStatus::Idle => "idle",
            AgentStatus::Working => "working",
            AgentStatus::Completed => "completed",
            AgentStatus::Error => "error",
        }
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(AgentStatus::Idle),
            "working" => Ok(AgentStatus::Working),
            "completed" => Ok(AgentStatus::Completed),
            "error" => Ok(AgentStatus::Error),
            other => Err(format!(
                "unknown agent status '{other}' (expected idle, working, completed, or error)"
            )),
        }
    }
}

/// Role of an agent persona.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    ProductManager,
    UiUxDesigner,
    FrontendDeveloper,
    BackendDeveloper,
    QaEngineer,
    DevopsEngineer,
    DataAnalyst,
}

impl AgentRole {
    pub const ALL: [AgentRole; 7] = [
        AgentRole::ProductManager,
        AgentRole::UiUxDesigner,
        AgentRole::FrontendDeveloper,
        AgentRole::BackendDeveloper,
        AgentRole::QaEngineer,
        AgentRole::DevopsEngineer,
        AgentRole::DataAnalyst,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentRole::ProductManager => "product_manager",
            AgentRole::UiUxDesigner => "ui_ux_designer",
            AgentRole::FrontendDeveloper => "frontend_developer",
            AgentRole::BackendDeveloper => "backend_developer",
            AgentRole::QaEngineer => "qa_engineer",
            AgentRole::DevopsEngineer => "devops_engineer",
            AgentRole::DataAnalyst => "data_analyst",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AgentRole::ProductManager => "Product Manager",
            AgentRole::UiUxDesigner => "UI/UX Designer",
            AgentRole::FrontendDeveloper => "Frontend Developer",
            AgentRole::BackendDeveloper => "Backend Developer",
            AgentRole::QaEngineer => "QA Engineer",
            AgentRole::DevopsEngineer => "DevOps Engineer",
            AgentRole::DataAnalyst => "Data Analyst",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for AgentRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' ', '/'], "_");
        AgentRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Department an agent belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    Development,
    Design,
    Marketing,
    Sales,
    Hr,
    Finance,
    Support,
}

impl Department {
    pub const ALL: [Department; 7] = [
        Department::Development,
        Department::Design,
        Department::Marketing,
        Department::Sales,
        Department::Hr,
        Department::Finance,
        Department::Support,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Development => "development",
            Department::Design => "design",
            Department::Marketing => "marketing",
            Department::Sales => "sales",
            Department::Hr => "hr",
            Department::Finance => "finance",
            Department::Support => "support",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Department::Development => "Development",
            Department::Design => "Design",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Hr => "Human Resources",
            Department::Finance => "Finance",
            Department::Support => "Customer Support",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        Department::ALL
            .into_iter()
            .find(|dept| dept.as_str() == normalized)
            .ok_or_else(|| format!("unknown department '{s}'"))
    }
}
