//! Status command - backend reachability and a project summary.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use agentco_types::ProjectStats;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Project to summarise (defaults to the context's project)
    #[arg(short, long)]
    pub project: Option<String>,
}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    reachable: bool,
    server_url: String,
    context: Option<String>,
    projects: Option<usize>,
    project: Option<String>,
    stats: Option<ProjectStats>,
    error: Option<String>,
}

/// Run the status command.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let project = ctx.project(args.project).ok();

    let mut output = StatusOutput {
        reachable: false,
        server_url: ctx.server_url().to_string(),
        context: ctx.settings.name.clone(),
        projects: None,
        project: project.as_ref().map(ToString::to_string),
        stats: None,
        error: None,
    };

    match client.projects().list().await {
        Ok(projects) => {
            output.reachable = true;
            output.projects = Some(projects.len());
            if let Some(id) = &project {
                match client.projects().stats(id).await {
                    Ok(stats) => output.stats = Some(stats),
                    Err(e) => output.error = Some(e.to_string()),
                }
            }
        }
        Err(e) => output.error = Some(e.to_string()),
    }

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let green = Style::new().green();
    let red = Style::new().red();
    let dim = Style::new().dim();

    println!();
    println!("{}", style("agentco Backend Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();
    if output.reachable {
        println!("  {} {}", dim.apply_to("Status:"), green.apply_to("● reachable"));
    } else {
        println!("  {} {}", dim.apply_to("Status:"), red.apply_to("● unreachable"));
    }
    println!("  {} {}", dim.apply_to("Server:"), output.server_url);
    if let Some(name) = &output.context {
        println!("  {} {}", dim.apply_to("Context:"), name);
    }
    if let Some(count) = output.projects {
        println!("  {} {}", dim.apply_to("Projects:"), count);
    }

    if let (Some(id), Some(stats)) = (&output.project, &output.stats) {
        println!();
        println!("{}", dim.apply_to("─".repeat(40)));
        println!();
        println!("  {} {}", dim.apply_to("Project:"), id);
        println!(
            "  {} {} ({} active)",
            dim.apply_to("Agents:"),
            stats.total_agents,
            stats.active_agents
        );
        println!(
            "  {} {} total, {} in progress, {} completed",
            dim.apply_to("Tasks:"),
            stats.total_tasks,
            stats.in_progress_tasks,
            stats.completed_tasks
        );
        println!(
            "  {} {:.1}%",
            dim.apply_to("Completion:"),
            stats.completion_rate
        );
    }

    if let Some(err) = &output.error
        && (ctx.verbose || !output.reachable)
    {
        println!();
        println!("  {} {}", dim.apply_to("Error:"), err);
    }
    println!();

    Ok(())
}
