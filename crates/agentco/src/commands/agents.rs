//! Agents command - agent personas.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use agentco_client::CreateAgentRequest;
use agentco_types::{Agent, AgentId, AgentRole, AgentStatus, Department};

use super::{Context, heading, print_error, print_json, print_success, truncate};

/// Arguments for the agents command.
#[derive(Args, Debug)]
pub struct AgentsArgs {
    #[command(subcommand)]
    pub command: Option<AgentsCommand>,
}

#[derive(Subcommand, Debug)]
pub enum AgentsCommand {
    /// List agents (default)
    List {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,

        /// List agents of every project
        #[arg(long, conflicts_with = "project")]
        all: bool,
    },

    /// Show an agent
    Show {
        /// Agent ID
        id: String,
    },

    /// Create an agent persona
    Create {
        /// Display name
        #[arg(long)]
        name: String,

        /// Role, e.g. backend_developer or "UI/UX Designer"
        #[arg(long)]
        role: AgentRole,

        /// Department, e.g. development
        #[arg(long)]
        department: Department,

        /// Skill tag (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,

        /// Avatar emoji
        #[arg(long)]
        avatar: Option<String>,

        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Set an agent's activity status
    SetStatus {
        /// Agent ID
        id: String,

        /// idle, working, completed or error
        status: AgentStatus,
    },

    /// List the tasks assigned to an agent
    Tasks {
        /// Agent ID
        id: String,
    },
}

/// Run the agents command.
pub async fn run(args: AgentsArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    let command = args.command.unwrap_or(AgentsCommand::List {
        project: None,
        all: false,
    });

    match command {
        AgentsCommand::List { project, all } => {
            let result = if all {
                client.agents().list().await
            } else {
                let project = ctx.project(project)?;
                client.agents().list_for_project(&project).await
            };
            match result {
                Ok(agents) if ctx.json_output => print_json(&agents)?,
                Ok(agents) => {
                    heading("Agents", 70);
                    if agents.is_empty() {
                        println!("{}", dim.apply_to("No agents yet"));
                    }
                    for agent in &agents {
                        print_agent_row(agent);
                    }
                }
                Err(e) => print_error(e),
            }
        }

        AgentsCommand::Show { id } => match client.agents().get(&AgentId::from(id)).await {
            Ok(agent) if ctx.json_output => print_json(&agent)?,
            Ok(agent) => {
                heading(format!("{} {}", agent.avatar, agent.name), 50);
                println!("  {} {}", dim.apply_to("ID:"), agent.id);
                println!("  {} {}", dim.apply_to("Role:"), agent.role.display_name());
                println!(
                    "  {} {}",
                    dim.apply_to("Department:"),
                    agent.department.display_name()
                );
                println!("  {} {}", dim.apply_to("Status:"), agent.status);
                println!(
                    "  {} {} assigned, {} completed",
                    dim.apply_to("Tasks:"),
                    agent.task_count,
                    agent.completed_tasks
                );
                if !agent.skills.is_empty() {
                    println!("  {} {}", dim.apply_to("Skills:"), agent.skills.join(", "));
                }
            }
            Err(e) => print_error(e),
        },

        AgentsCommand::Create {
            name,
            role,
            department,
            skills,
            avatar,
            project,
        } => {
            let request = CreateAgentRequest {
                project: ctx.project(project)?,
                name,
                role,
                department,
                avatar,
                skills,
            };
            match client.agents().create(&request).await {
                Ok(agent) if ctx.json_output => print_json(&agent)?,
                Ok(agent) => print_success(format!(
                    "Agent created: {} {}",
                    agent.name,
                    dim.apply_to(format!("[{}]", agent.id))
                )),
                Err(e) => print_error(e),
            }
        }

        AgentsCommand::SetStatus { id, status } => {
            match client.agents().update_status(&AgentId::from(id), status).await {
                Ok(agent) if ctx.json_output => print_json(&agent)?,
                Ok(agent) => print_success(format!("{} is now {}", agent.name, agent.status)),
                Err(e) => print_error(e),
            }
        }

        AgentsCommand::Tasks { id } => match client.agents().tasks(&AgentId::from(id)).await {
            Ok(tasks) if ctx.json_output => print_json(&tasks)?,
            Ok(tasks) => {
                heading("Assigned Tasks", 60);
                if tasks.is_empty() {
                    println!("{}", dim.apply_to("No tasks assigned"));
                }
                for task in &tasks {
                    println!(
                        "{} {:<12} {}",
                        dim.apply_to(format!("[{}]", task.id)),
                        task.status.as_str(),
                        truncate(&task.title, 50)
                    );
                }
            }
            Err(e) => print_error(e),
        },
    }

    Ok(())
}

fn print_agent_row(agent: &Agent) {
    let dim = Style::new().dim();
    let status = match agent.status {
        AgentStatus::Working => Style::new().green(),
        AgentStatus::Error => Style::new().red(),
        _ => Style::new(),
    };
    println!(
        "{} {} {:<20} {:<22} {}",
        dim.apply_to(format!("[{}]", agent.id)),
        agent.avatar,
        truncate(&agent.name, 20),
        agent.role.display_name(),
        status.apply_to(agent.status)
    );
}
