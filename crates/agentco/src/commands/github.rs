//! GitHub command - repositories connected to projects.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use agentco_client::CreateRepositoryRequest;

use super::{Context, heading, print_error, print_json, print_success, truncate};

/// Arguments for the github command.
#[derive(Args, Debug)]
pub struct GithubArgs {
    #[command(subcommand)]
    pub command: Option<GithubCommand>,
}

#[derive(Subcommand, Debug)]
pub enum GithubCommand {
    /// List connected repositories (default)
    List,

    /// Create a repository and connect it to a project
    Create {
        /// Repository name
        #[arg(long)]
        name: String,

        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Create a public repository (private by default)
        #[arg(long)]
        public: bool,

        /// Skip the initial commit
        #[arg(long)]
        no_init: bool,
    },
}

/// Run the github command.
pub async fn run(args: GithubArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(GithubCommand::List) {
        GithubCommand::List => cmd_list(ctx).await,
        GithubCommand::Create {
            name,
            project,
            description,
            public,
            no_init,
        } => {
            let mut request = CreateRepositoryRequest::new(ctx.project(project)?, name);
            request.description = description;
            request.private = !public;
            request.auto_init = !no_init;
            cmd_create(ctx, &request).await
        }
    }
}

async fn cmd_list(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    match client.github().repositories().await {
        Ok(repos) if ctx.json_output => print_json(&repos)?,
        Ok(repos) => {
            let dim = Style::new().dim();
            heading("Repositories", 70);
            if repos.is_empty() {
                println!("{}", dim.apply_to("No repositories connected"));
            }
            for repo in &repos {
                let visibility = if repo.is_private { "private" } else { "public" };
                let project = repo
                    .project_name
                    .clone()
                    .unwrap_or_else(|| repo.project.to_string());
                println!(
                    "{:<32} {:<8} {}",
                    truncate(&repo.full_name, 32),
                    visibility,
                    dim.apply_to(format!("project: {project}"))
                );
                println!("  {}", dim.apply_to(&repo.html_url));
            }
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_create(ctx: &Context, request: &CreateRepositoryRequest) -> Result<()> {
    let client = ctx.client()?;
    match client.github().create_repository(request).await {
        Ok(repo) if ctx.json_output => print_json(&repo)?,
        Ok(repo) => {
            print_success(format!("Repository created: {}", repo.full_name));
            println!("  {}", repo.html_url);
            if !repo.clone_url.is_empty() {
                println!("  git clone {}", repo.clone_url);
            }
        }
        Err(e) => print_error(e),
    }
    Ok(())
}
