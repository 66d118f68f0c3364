//! Project command - projects, their requirements survey, and planning documents.

use std::time::Duration;

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use agentco_client::{CreateProjectRequest, RequirementAnswer, UpdateProjectRequest};
use agentco_types::{PlanningDocument, Priority, ProjectId};

use super::{Context, heading, print_error, print_json, print_success, truncate};

/// Arguments for the project command.
#[derive(Args, Debug)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: Option<ProjectCommand>,
}

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    /// List all projects (default)
    List,

    /// Show a project with its survey answers
    Show {
        /// Project ID (defaults to the context's project)
        id: Option<String>,
    },

    /// Show agent and task counters
    Stats {
        /// Project ID (defaults to the context's project)
        id: Option<String>,
    },

    /// List the survey answers of a project
    Requirements {
        /// Project ID (defaults to the context's project)
        id: Option<String>,
    },

    /// Show or generate the planning document
    Plan {
        /// Project ID (defaults to the context's project)
        id: Option<String>,

        /// Generate the document and recommended agents if none exists
        #[arg(long)]
        generate: bool,

        /// Print the full Markdown document instead of the summary
        #[arg(long)]
        full: bool,
    },

    /// Create a project
    Create {
        /// Project name
        #[arg(long)]
        name: String,

        /// What the project should build
        #[arg(long, default_value = "")]
        description: String,

        /// Existing GitHub repository URL
        #[arg(long)]
        github_repo: Option<String>,

        /// Survey answer as CATEGORY:QUESTION=ANSWER (repeatable)
        #[arg(long = "answer", value_parser = parse_answer)]
        answers: Vec<RequirementAnswer>,
    },

    /// Update a project's name or description
    Update {
        /// Project ID
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a project and everything it owns
    Delete {
        /// Project ID
        id: String,

        /// Skip the confirmation check
        #[arg(long)]
        yes: bool,
    },
}

/// Run the project command.
pub async fn run(args: ProjectArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let dim = Style::new().dim();

    match args.command.unwrap_or(ProjectCommand::List) {
        ProjectCommand::List => match client.projects().list().await {
            Ok(projects) if ctx.json_output => print_json(&projects)?,
            Ok(projects) => {
                heading("Projects", 60);
                if projects.is_empty() {
                    println!("{}", dim.apply_to("No projects yet"));
                }
                for project in &projects {
                    println!(
                        "{} {:<24} {:<12} {}",
                        dim.apply_to(format!("[{}]", project.id)),
                        truncate(&project.name, 24),
                        project.status.as_str(),
                        dim.apply_to(truncate(&project.description, 40))
                    );
                }
            }
            Err(e) => print_error(e),
        },

        ProjectCommand::Show { id } => {
            let id = ctx.project(id)?;
            match client.projects().get(&id).await {
                Ok(project) if ctx.json_output => print_json(&project)?,
                Ok(project) => {
                    heading(&project.name, 60);
                    println!("  {} {}", dim.apply_to("ID:"), project.id);
                    println!("  {} {}", dim.apply_to("Status:"), project.status.as_str());
                    if let Some(repo) = &project.github_repo {
                        println!("  {} {}", dim.apply_to("GitHub:"), repo);
                    }
                    println!("  {} {}", dim.apply_to("Created:"), project.created_at);
                    if !project.description.is_empty() {
                        println!();
                        println!("{}", project.description);
                    }
                    if !project.requirements.is_empty() {
                        println!();
                        println!(
                            "{}",
                            dim.apply_to(format!("{} survey answers", project.requirements.len()))
                        );
                    }
                }
                Err(e) => print_error(e),
            }
        }

        ProjectCommand::Stats { id } => {
            let id = ctx.project(id)?;
            match client.projects().stats(&id).await {
                Ok(stats) if ctx.json_output => print_json(&stats)?,
                Ok(stats) => {
                    heading(format!("Project {id} Stats"), 40);
                    println!(
                        "  {} {} ({} active)",
                        dim.apply_to("Agents:"),
                        stats.total_agents,
                        stats.active_agents
                    );
                    println!("  {} {}", dim.apply_to("Tasks:"), stats.total_tasks);
                    println!("  {} {}", dim.apply_to("In progress:"), stats.in_progress_tasks);
                    println!("  {} {}", dim.apply_to("Completed:"), stats.completed_tasks);
                    println!(
                        "  {} {:.1}%",
                        dim.apply_to("Completion:"),
                        stats.completion_rate
                    );
                }
                Err(e) => print_error(e),
            }
        }

        ProjectCommand::Requirements { id } => {
            let id = ctx.project(id)?;
            match client.projects().requirements(&id).await {
                Ok(requirements) if ctx.json_output => print_json(&requirements)?,
                Ok(requirements) => {
                    heading("Requirements", 60);
                    if requirements.is_empty() {
                        println!("{}", dim.apply_to("No survey answers recorded"));
                    }
                    for req in &requirements {
                        println!(
                            "{} {}",
                            dim.apply_to(format!("[{} / {}]", req.category, req.priority)),
                            req.question
                        );
                        println!("    {}", req.answer);
                    }
                }
                Err(e) => print_error(e),
            }
        }

        ProjectCommand::Plan { id, generate, full } => {
            let id = ctx.project(id)?;
            if generate {
                let spinner = generating_spinner(ctx.json_output)?;
                let result = client.planning().generate(&id).await;
                spinner.finish_and_clear();
                match result {
                    Ok(plan) if ctx.json_output => print_json(&plan)?,
                    Ok(plan) => {
                        match plan.agents_created {
                            Some(created) => print_success(format!(
                                "Planning document generated, {created} agents created"
                            )),
                            None => println!(
                                "{}",
                                dim.apply_to(
                                    plan.message
                                        .as_deref()
                                        .unwrap_or("Planning document already exists")
                                )
                            ),
                        }
                        println!();
                        print_plan(&plan.planning_document, full);
                    }
                    Err(e) => print_error(e),
                }
            } else {
                match client.planning().by_project(&id).await {
                    Ok(doc) if ctx.json_output => print_json(&doc)?,
                    Ok(doc) => print_plan(&doc, full),
                    Err(e) if e.is_not_found() && !ctx.json_output => println!(
                        "{}",
                        dim.apply_to(format!(
                            "No planning document for project {id}; run 'agentco project plan {id} --generate'"
                        ))
                    ),
                    Err(e) => print_error(e),
                }
            }
        }

        ProjectCommand::Create {
            name,
            description,
            github_repo,
            answers,
        } => {
            let request = CreateProjectRequest {
                name,
                description,
                github_repo,
                requirements: answers,
            };
            match client.projects().create(&request).await {
                Ok(project) if ctx.json_output => print_json(&project)?,
                Ok(project) => {
                    print_success(format!(
                        "Project created: {} {}",
                        project.name,
                        dim.apply_to(format!("[{}]", project.id))
                    ));
                }
                Err(e) => print_error(e),
            }
        }

        ProjectCommand::Update {
            id,
            name,
            description,
        } => {
            if name.is_none() && description.is_none() {
                bail!("nothing to update; pass --name and/or --description");
            }
            let request = UpdateProjectRequest {
                name,
                description,
                github_repo: None,
            };
            match client.projects().update(&ProjectId::from(id), &request).await {
                Ok(project) if ctx.json_output => print_json(&project)?,
                Ok(project) => print_success(format!("Project updated: {}", project.name)),
                Err(e) => print_error(e),
            }
        }

        ProjectCommand::Delete { id, yes } => {
            if !yes {
                bail!("refusing to delete project {id} without --yes");
            }
            match client.projects().delete(&ProjectId::from(id.as_str())).await {
                Ok(()) => print_success(format!("Project {id} deleted")),
                Err(e) => print_error(e),
            }
        }
    }

    Ok(())
}

fn generating_spinner(hidden: bool) -> Result<ProgressBar> {
    if hidden {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}")?);
    spinner.set_message("Generating planning document...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    Ok(spinner)
}

fn print_plan(doc: &PlanningDocument, full: bool) {
    let dim = Style::new().dim();
    let title = doc.project_name.as_deref().unwrap_or("Planning Document");
    heading(title, 60);
    println!("  {} {}", dim.apply_to("Complexity:"), doc.complexity.as_str());
    println!("  {} {}", dim.apply_to("Tokens used:"), doc.tokens_used);
    println!("  {} {}", dim.apply_to("Updated:"), doc.updated_at);

    if full && !doc.full_document.is_empty() {
        println!();
        println!("{}", doc.full_document);
        return;
    }

    if !doc.key_features.is_empty() {
        println!();
        println!("{}", Style::new().bold().apply_to("Key Features"));
        for feature in &doc.key_features {
            println!("  - {}", json_label(feature));
        }
    }
    for (title, body) in doc.sections() {
        println!();
        println!("{}", Style::new().bold().apply_to(title));
        println!("{}", body.trim());
    }
    if !doc.agent_recommendations.is_empty() {
        println!();
        println!("{}", Style::new().bold().apply_to("Recommended Agents"));
        for rec in &doc.agent_recommendations {
            println!(
                "  {:<24} {:<8} {:>4}h  {}",
                truncate(&rec.role, 24),
                rec.priority.as_str(),
                rec.estimated_workload,
                dim.apply_to(truncate(&rec.reason, 40))
            );
        }
    }
}

/// One-line label for a free-form analysis entry.
fn json_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(map) => ["name", "title", "feature", "role"]
            .iter()
            .find_map(|key| map.get(*key).and_then(|v| v.as_str()))
            .map(str::to_string)
            .unwrap_or_else(|| value.to_string()),
        other => other.to_string(),
    }
}

/// Parse `CATEGORY:QUESTION=ANSWER`, with an optional `!high`/`!low` suffix
/// on the category to set priority.
fn parse_answer(s: &str) -> std::result::Result<RequirementAnswer, String> {
    let (category, rest) = s
        .split_once(':')
        .ok_or_else(|| format!("expected CATEGORY:QUESTION=ANSWER, got '{s}'"))?;
    let (question, answer) = rest
        .rsplit_once('=')
        .ok_or_else(|| format!("expected CATEGORY:QUESTION=ANSWER, got '{s}'"))?;

    let (category, priority) = match category.split_once('!') {
        Some((category, priority)) => (category, Some(priority.parse::<Priority>()?)),
        None => (category, None),
    };

    if category.trim().is_empty() || question.trim().is_empty() {
        return Err(format!("category and question must not be empty in '{s}'"));
    }

    Ok(RequirementAnswer {
        category: category.trim().to_string(),
        question: question.trim().to_string(),
        answer: answer.trim().to_string(),
        priority,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        let answer = parse_answer("technical:Preferred stack?=Rust and Postgres").unwrap();
        assert_eq!(answer.category, "technical");
        assert_eq!(answer.question, "Preferred stack?");
        assert_eq!(answer.answer, "Rust and Postgres");
        assert!(answer.priority.is_none());
    }

    #[test]
    fn test_parse_answer_with_priority() {
        let answer = parse_answer("business!high:Launch date?=Q3").unwrap();
        assert_eq!(answer.category, "business");
        assert_eq!(answer.priority, Some(Priority::High));
    }

    #[test]
    fn test_json_label() {
        assert_eq!(json_label(&serde_json::json!("Cart")), "Cart");
        assert_eq!(json_label(&serde_json::json!({"name": "Checkout", "x": 1})), "Checkout");
        assert_eq!(json_label(&serde_json::json!({"x": 1})), r#"{"x":1}"#);
        assert_eq!(json_label(&serde_json::json!(3)), "3");
    }

    #[test]
    fn test_parse_answer_rejects_malformed() {
        assert!(parse_answer("no separators").is_err());
        assert!(parse_answer("category:question without answer").is_err());
        assert!(parse_answer(":question=answer").is_err());
    }
}
