//! Tasks command - the task board.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};

use agentco_client::{CreateTaskRequest, ListTasksQuery};
use agentco_domain::{DomainError, TaskWorkflow};
use agentco_types::{AgentId, Board, BoardColumn, Priority, Progress, Task, TaskId, TaskStatus};

use super::{Context, heading, print_error, print_json, print_success, truncate};

/// Arguments for the tasks command.
#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: Option<TasksCommand>,
}

#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List tasks (default)
    List {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,

        /// Only tasks assigned to this agent
        #[arg(long)]
        agent: Option<String>,

        /// Only tasks with this status
        #[arg(long)]
        status: Option<TaskStatus>,
    },

    /// Show the board: To Do, In Progress, Review, Completed
    Board {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Show a task
    Show {
        /// Task ID
        id: String,
    },

    /// Create a task
    Create {
        /// Task title
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// high, medium or low
        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Agent ID to assign
        #[arg(long)]
        assign: Option<String>,

        /// Task ID this one depends on (repeatable)
        #[arg(long = "depends-on")]
        dependencies: Vec<String>,

        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Move a task to another status
    Move {
        /// Task ID
        id: String,

        /// Target status: in_progress, review, completed or blocked
        status: TaskStatus,
    },

    /// Report progress on a task (0-100)
    Progress {
        /// Task ID
        id: String,

        /// Percentage
        #[arg(allow_negative_numbers = true)]
        percent: i64,
    },
}

/// Run the tasks command.
pub async fn run(args: TasksArgs, ctx: &Context) -> Result<()> {
    let command = args.command.unwrap_or(TasksCommand::List {
        project: None,
        agent: None,
        status: None,
    });

    match command {
        TasksCommand::List {
            project,
            agent,
            status,
        } => cmd_list(ctx, project, agent, status).await,
        TasksCommand::Board { project } => cmd_board(ctx, project).await,
        TasksCommand::Show { id } => cmd_show(ctx, TaskId::from(id)).await,
        TasksCommand::Create {
            title,
            description,
            priority,
            assign,
            dependencies,
            project,
        } => {
            let request = CreateTaskRequest {
                project: ctx.project(project)?,
                title,
                description,
                priority,
                assigned_to: assign.map(AgentId::from),
                dependencies: dependencies.into_iter().map(TaskId::from).collect(),
            };
            cmd_create(ctx, request).await
        }
        TasksCommand::Move { id, status } => cmd_move(ctx, TaskId::from(id), status).await,
        TasksCommand::Progress { id, percent } => {
            cmd_progress(ctx, TaskId::from(id), percent).await
        }
    }
}

async fn cmd_list(
    ctx: &Context,
    project: Option<String>,
    agent: Option<String>,
    status: Option<TaskStatus>,
) -> Result<()> {
    let client = ctx.client()?;
    let query = ListTasksQuery {
        project: ctx.project(project).ok(),
        agent: agent.map(AgentId::from),
    };

    let tasks = match client.tasks().list_with_query(&query).await {
        Ok(tasks) => tasks,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };
    let tasks: Vec<Task> = tasks
        .into_iter()
        .filter(|t| status.is_none_or(|s| t.status == s))
        .collect();

    if ctx.json_output {
        return print_json(&tasks);
    }

    let dim = Style::new().dim();
    heading("Tasks", 70);
    if tasks.is_empty() {
        println!("{}", dim.apply_to("No tasks found"));
    }
    for task in &tasks {
        println!(
            "{} {:<12} {:<7} {}",
            dim.apply_to(format!("[{}]", task.id)),
            task.status.as_str(),
            task.priority.as_str(),
            truncate(&task.title, 44)
        );
    }
    Ok(())
}

async fn cmd_board(ctx: &Context, project: Option<String>) -> Result<()> {
    let project = ctx.project(project)?;
    let workflow = match TaskWorkflow::load(ctx.client()?, project).await {
        Ok(workflow) => workflow,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };
    let board = workflow.board();

    if ctx.json_output {
        return print_json(&board);
    }

    print_board(&board);
    Ok(())
}

fn print_board(board: &Board<'_>) {
    for column in &board.columns {
        print_column(column);
    }
    if !board.sidelined.is_empty() {
        print_column(&board.sidelined);
    }
}

fn print_column(column: &BoardColumn<'_>) {
    let dim = Style::new().dim();
    println!();
    println!(
        "{} {}",
        style(column.title).bold(),
        dim.apply_to(format!("({})", column.len()))
    );
    println!("{}", dim.apply_to("─".repeat(50)));
    if column.is_empty() {
        println!("  {}", dim.apply_to("empty"));
    }
    for card in &column.cards {
        let assignee = card
            .assignee
            .map(|a| format!("{} {}", a.avatar, a.name))
            .unwrap_or_else(|| "Unassigned".to_string());
        let progress = card
            .task
            .visible_progress()
            .map(|p| format!(" {p}"))
            .unwrap_or_default();
        println!(
            "  {} {}{}",
            dim.apply_to(format!("[{}]", card.task.id)),
            truncate(&card.task.title, 36),
            progress
        );
        println!(
            "      {} {}",
            dim.apply_to(card.task.priority.as_str()),
            dim.apply_to(assignee)
        );
    }
}

async fn cmd_show(ctx: &Context, id: TaskId) -> Result<()> {
    let client = ctx.client()?;
    let task = match client.tasks().get(&id).await {
        Ok(task) => task,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    if ctx.json_output {
        return print_json(&task);
    }

    let dim = Style::new().dim();
    heading(&task.title, 50);
    println!("  {} {}", dim.apply_to("ID:"), task.id);
    println!("  {} {}", dim.apply_to("Project:"), task.project);
    println!("  {} {}", dim.apply_to("Status:"), task.status.label());
    println!("  {} {}", dim.apply_to("Priority:"), task.priority);
    if let Some(progress) = task.visible_progress() {
        println!("  {} {}", dim.apply_to("Progress:"), progress);
    }
    let assignee = task
        .assigned_to_name
        .clone()
        .or_else(|| task.assigned_to.as_ref().map(ToString::to_string));
    println!(
        "  {} {}",
        dim.apply_to("Assigned:"),
        assignee.as_deref().unwrap_or("Unassigned")
    );
    if !task.dependencies.is_empty() {
        let deps: Vec<&str> = task.dependencies.iter().map(TaskId::as_str).collect();
        println!("  {} {}", dim.apply_to("Depends on:"), deps.join(", "));
    }
    let next: Vec<&str> = task
        .status
        .allowed_transitions()
        .iter()
        .map(|s| s.as_str())
        .collect();
    if !next.is_empty() {
        println!("  {} {}", dim.apply_to("Can move to:"), next.join(", "));
    }
    if !task.description.is_empty() {
        println!();
        println!("{}", task.description);
    }
    if let Some(output) = &task.output {
        println!();
        println!(
            "{}",
            dim.apply_to(format!("Output: {} file(s)", output.files.len()))
        );
        for file in &output.files {
            println!("  {}", file.path);
        }
    }
    Ok(())
}

async fn cmd_create(ctx: &Context, request: CreateTaskRequest) -> Result<()> {
    let project = request.project.clone();
    let mut workflow = TaskWorkflow::new(ctx.client()?, project);
    match workflow.create_task(request).await {
        Ok(id) => {
            let created = workflow.task(&id);
            if ctx.json_output {
                return print_json(&created);
            }
            let title = created.map(|t| t.title.as_str()).unwrap_or_default();
            print_success(format!("Task created: {title} [{id}]"));
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_move(ctx: &Context, id: TaskId, to: TaskStatus) -> Result<()> {
    let client = ctx.client()?;

    // The workflow validates against the status it loads, so start from the
    // task's own project.
    let project = match client.tasks().get(&id).await {
        Ok(task) => task.project,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };
    let mut workflow = match TaskWorkflow::load(client, project).await {
        Ok(workflow) => workflow,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    match workflow.transition(&id, to).await {
        Ok(task) if ctx.json_output => print_json(task)?,
        Ok(task) => print_success(format!("{} moved to {}", task.title, task.status.label())),
        Err(DomainError::Transition(err)) => {
            print_error(err);
            let allowed: Vec<&str> = err
                .from
                .allowed_transitions()
                .iter()
                .map(|s| s.as_str())
                .collect();
            let dim = Style::new().dim();
            if allowed.is_empty() {
                eprintln!("{}", dim.apply_to(format!("{} has no manual exits", err.from)));
            } else {
                eprintln!(
                    "{}",
                    dim.apply_to(format!("Allowed from {}: {}", err.from, allowed.join(", ")))
                );
            }
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_progress(ctx: &Context, id: TaskId, percent: i64) -> Result<()> {
    // Out-of-range values never leave the process.
    let progress = match Progress::try_from(percent) {
        Ok(progress) => progress,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    let client = ctx.client()?;
    let project = match client.tasks().get(&id).await {
        Ok(task) => task.project,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };
    let mut workflow = match TaskWorkflow::load(client, project).await {
        Ok(workflow) => workflow,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    match workflow.set_progress(&id, progress).await {
        Ok(task) if ctx.json_output => print_json(task)?,
        Ok(task) => print_success(format!("{} at {}", task.title, task.progress)),
        Err(e) => print_error(e),
    }
    Ok(())
}
