//! Dev command - automated development runs.

use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::{Style, style};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use agentco_client::{AgentcoClient, StartDevelopmentRequest};
use agentco_domain::{ProgressTracker, StatusSource, TrackerConfig, TrackerView};
use agentco_types::{
    ApiKey, DevelopmentStatus, LogEntry, LogLevel, ProjectId, RunStatus, ServiceType, StepStatus,
};

use super::{Context, heading, print_error, print_json, print_success, truncate};

/// Arguments for the dev command.
#[derive(Args, Debug)]
pub struct DevArgs {
    #[command(subcommand)]
    pub command: DevCommand,
}

#[derive(Subcommand, Debug)]
pub enum DevCommand {
    /// Start a development run for a project
    Start {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,

        /// AI provider: opencode, openai, anthropic or google
        /// [default: the service of the first active API key]
        #[arg(long)]
        provider: Option<ServiceType>,

        /// Model name passed to the provider [default: the provider's default model]
        #[arg(long)]
        model: Option<String>,

        /// Let the backend work on independent steps in parallel
        #[arg(long)]
        parallel: bool,

        /// Commit generated files to the project's repository
        #[arg(long)]
        auto_commit: bool,

        /// Follow the run until it completes
        #[arg(short, long)]
        watch: bool,
    },

    /// Show a one-off snapshot of the run
    Status {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,

        /// Number of log lines to show
        #[arg(short = 'n', long, default_value = "20")]
        lines: usize,
    },

    /// Ask the backend to pause the run
    Pause {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,
    },

    /// Follow the run until it completes (Ctrl-C stops watching)
    Watch {
        /// Project ID (defaults to the context's project)
        #[arg(short, long)]
        project: Option<String>,
    },
}

/// Run the dev command.
pub async fn run(args: DevArgs, ctx: &Context) -> Result<()> {
    match args.command {
        DevCommand::Start {
            project,
            provider,
            model,
            parallel,
            auto_commit,
            watch,
        } => {
            let project = ctx.project(project)?;
            let provider = match provider {
                Some(provider) => provider,
                None => default_provider(&ctx.client()?).await,
            };
            let model = model.unwrap_or_else(|| provider.default_model().to_string());
            let request = StartDevelopmentRequest {
                provider,
                model,
                parallel_execution: parallel,
                auto_commit,
            };
            let started = cmd_start(ctx, &project, &request).await?;
            if started && watch {
                cmd_watch(ctx, project).await?;
            }
            Ok(())
        }
        DevCommand::Status { project, lines } => cmd_status(ctx, ctx.project(project)?, lines).await,
        DevCommand::Pause { project } => cmd_pause(ctx, ctx.project(project)?).await,
        DevCommand::Watch { project } => cmd_watch(ctx, ctx.project(project)?).await,
    }
}

/// The provider of the first active key, or OpenAI when none is stored.
async fn default_provider(client: &AgentcoClient) -> ServiceType {
    match client.api_keys().active().await {
        Ok(keys) => provider_from_keys(&keys),
        Err(e) => {
            warn!(error = %e, "Could not list active API keys");
            ServiceType::Openai
        }
    }
}

fn provider_from_keys(keys: &[ApiKey]) -> ServiceType {
    keys.iter()
        .find(|key| key.is_active)
        .map(|key| key.service_type)
        .unwrap_or(ServiceType::Openai)
}

async fn cmd_start(
    ctx: &Context,
    project: &ProjectId,
    request: &StartDevelopmentRequest,
) -> Result<bool> {
    let client = ctx.client()?;
    match client.development().start(project, request).await {
        Ok(()) => {
            info!(project = %project, provider = %request.provider, "Development run started");
            if !ctx.json_output {
                print_success(format!(
                    "Development started for project {project} ({} / {})",
                    request.provider, request.model
                ));
            }
            Ok(true)
        }
        Err(e) => {
            print_error(e);
            Ok(false)
        }
    }
}

async fn cmd_status(ctx: &Context, project: ProjectId, lines: usize) -> Result<()> {
    let client = ctx.client()?;
    let status = match client.development().status(&project).await {
        Ok(status) => status,
        Err(e) => {
            print_error(e);
            return Ok(());
        }
    };

    if ctx.json_output {
        return print_json(&status);
    }

    print_snapshot(&status);

    if !status.logs.is_empty() {
        println!();
        println!("{}", style("Logs").bold());
        let skip = status.logs.len().saturating_sub(lines);
        for entry in &status.logs[skip..] {
            println!("{}", format_log(entry));
        }
    }
    Ok(())
}

async fn cmd_pause(ctx: &Context, project: ProjectId) -> Result<()> {
    let client = ctx.client()?;
    match client.development().pause(&project).await {
        Ok(()) => print_success(format!("Pause requested for project {project}")),
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_watch(ctx: &Context, project: ProjectId) -> Result<()> {
    let source: Arc<dyn StatusSource> = Arc::new(ctx.client()?);
    let tracker = ProgressTracker::new(TrackerConfig {
        poll_interval: ctx.settings.poll_interval,
        log_capacity: ctx.settings.log_capacity,
    });
    let handle = tracker.start(source, project.clone(), |status| {
        info!(
            files = status.generated_files.len(),
            "Development run completed"
        );
    });
    let mut views = handle.subscribe();

    let bar = if ctx.json_output {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
                .progress_chars("█▓░"),
        );
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        bar
    };

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut printed: u64 = 0;
    let mut reported_failures = 0;
    let mut interrupted = false;

    let last = loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                interrupted = true;
                break views.borrow().clone();
            }
            changed = views.changed() => {
                if changed.is_err() {
                    break views.borrow().clone();
                }
            }
        }

        let view = views.borrow_and_update().clone();

        for entry in unseen_logs(&view, &mut printed) {
            bar.println(format_log(entry));
        }

        if view.consecutive_failures > reported_failures
            && let Some(error) = &view.last_error
        {
            bar.println(format!(
                "{} {}",
                Style::new().yellow().apply_to("fetch failed, retrying:"),
                error
            ));
        }
        reported_failures = view.consecutive_failures;

        if let Some(snapshot) = &view.snapshot {
            bar.set_position(u64::from(snapshot.overall_progress.get()));
            bar.set_message(current_step(snapshot));
        }

        if view.finished || view.is_failed() {
            break view;
        }
    };

    bar.finish_and_clear();
    handle.close().await?;
    debug!(polls = last.polls, "Tracker closed");

    if ctx.json_output {
        return match &last.snapshot {
            Some(snapshot) => print_json(snapshot),
            None => Ok(()),
        };
    }

    match &last.snapshot {
        _ if interrupted => {
            let dim = Style::new().dim();
            println!(
                "{}",
                dim.apply_to(format!(
                    "Stopped watching; the run continues. Resume with 'agentco dev watch -p {project}'"
                ))
            );
        }
        Some(snapshot) if snapshot.is_completed() => {
            print_success(format!(
                "Development completed: {} file(s) generated",
                snapshot.generated_files.len()
            ));
            for file in &snapshot.generated_files {
                println!("  {file}");
            }
        }
        Some(snapshot) if snapshot.is_failed() => {
            print_error(
                snapshot
                    .error_message
                    .as_deref()
                    .unwrap_or("development run failed"),
            );
        }
        Some(snapshot) => println!("Run is {}", snapshot.status),
        None => {
            if let Some(error) = &last.last_error {
                print_error(error);
            }
        }
    }
    Ok(())
}

/// Entries in `view` that have not been printed yet.
///
/// `printed` counts every entry ever shown, evicted ones included.
fn unseen_logs<'a>(view: &'a TrackerView, printed: &mut u64) -> impl Iterator<Item = &'a LogEntry> {
    let total = view.logs.dropped() + view.logs.len() as u64;
    let fresh = total.saturating_sub(*printed).min(view.logs.len() as u64) as usize;
    *printed = total;
    view.logs.tail(fresh)
}

fn current_step(status: &DevelopmentStatus) -> String {
    let step = status
        .tasks
        .iter()
        .find(|t| t.step_status() == StepStatus::InProgress)
        .map(|t| truncate(&t.title, 40));
    match (status.status, step) {
        (RunStatus::Paused, _) => "paused".to_string(),
        (_, Some(step)) => step,
        (run, None) => run.to_string(),
    }
}

fn print_snapshot(status: &DevelopmentStatus) {
    let dim = Style::new().dim();
    heading("Development", 60);
    println!(
        "  {} {}  {}",
        dim.apply_to("Status:"),
        run_style(status.status).apply_to(status.status),
        status.overall_progress
    );
    if let Some(message) = &status.error_message {
        println!("  {} {}", Style::new().red().apply_to("Error:"), message);
    }

    if !status.tasks.is_empty() {
        println!();
        for step in &status.tasks {
            let (marker, marker_style) = match step.step_status() {
                StepStatus::Completed => ("✓", Style::new().green()),
                StepStatus::InProgress => ("▸", Style::new().cyan()),
                StepStatus::Failed => ("✗", Style::new().red()),
                StepStatus::Pending => ("·", Style::new().dim()),
            };
            println!(
                "  {} {:<44} {:>4}",
                marker_style.apply_to(marker),
                truncate(&step.title, 44),
                step.progress.to_string()
            );
            if let Some(message) = &step.message {
                println!("      {}", dim.apply_to(truncate(message, 60)));
            }
        }
    }

    if !status.generated_files.is_empty() {
        println!();
        println!(
            "  {} {}",
            dim.apply_to("Generated files:"),
            status.generated_files.len()
        );
    }
}

fn run_style(status: RunStatus) -> Style {
    match status {
        RunStatus::Completed => Style::new().green(),
        RunStatus::Failed => Style::new().red(),
        RunStatus::Paused => Style::new().yellow(),
        RunStatus::InProgress => Style::new().cyan(),
        RunStatus::Pending => Style::new().dim(),
    }
}

fn format_log(entry: &LogEntry) -> String {
    let level_style = match entry.level {
        LogLevel::Info => Style::new().dim(),
        LogLevel::Warning => Style::new().yellow(),
        LogLevel::Error => Style::new().red(),
        LogLevel::Success => Style::new().green(),
    };
    format!(
        "{} {:<7} {}",
        Style::new().dim().apply_to(short_time(&entry.timestamp)),
        level_style.apply_to(entry.level.as_str()),
        entry.message
    )
}

/// `HH:MM:SS` from an RFC 3339 timestamp, or the input unchanged.
fn short_time(timestamp: &str) -> &str {
    timestamp
        .split_once('T')
        .and_then(|(_, time)| time.get(..8))
        .unwrap_or(timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentco_types::{LogBuffer, TaskProgress, TaskStatus};

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            timestamp: "2026-01-02T10:11:12Z".to_string(),
            level: LogLevel::Info,
            message: message.to_string(),
        }
    }

    fn view_with(logs: LogBuffer) -> TrackerView {
        TrackerView {
            snapshot: None,
            logs,
            polls: 1,
            last_error: None,
            consecutive_failures: 0,
            finished: false,
        }
    }

    fn key(id: &str, service_type: ServiceType, is_active: bool) -> ApiKey {
        ApiKey {
            id: id.into(),
            service_type,
            service_name: String::new(),
            is_active,
            created_at: String::new(),
            last_used_at: None,
        }
    }

    #[test]
    fn test_provider_from_keys() {
        let keys = [
            key("1", ServiceType::Google, false),
            key("2", ServiceType::Anthropic, true),
            key("3", ServiceType::Openai, true),
        ];
        assert_eq!(provider_from_keys(&keys), ServiceType::Anthropic);
        assert_eq!(provider_from_keys(&keys[..1]), ServiceType::Openai);
        assert_eq!(provider_from_keys(&[]), ServiceType::Openai);
    }

    #[test]
    fn test_short_time() {
        assert_eq!(short_time("2026-01-02T10:11:12.345Z"), "10:11:12");
        assert_eq!(short_time("yesterday"), "yesterday");
    }

    #[test]
    fn test_unseen_logs_only_returns_new_entries() {
        let mut logs = LogBuffer::new(10);
        logs.extend([entry("a"), entry("b")]);
        let mut printed = 0;

        let first: Vec<_> = unseen_logs(&view_with(logs.clone()), &mut printed)
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(first, ["a", "b"]);

        logs.push(entry("c"));
        let second: Vec<_> = unseen_logs(&view_with(logs.clone()), &mut printed)
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(second, ["c"]);

        let third = unseen_logs(&view_with(logs), &mut printed).count();
        assert_eq!(third, 0);
    }

    #[test]
    fn test_unseen_logs_survives_eviction() {
        let mut logs = LogBuffer::new(2);
        logs.push(entry("a"));
        let mut printed = 0;
        assert_eq!(unseen_logs(&view_with(logs.clone()), &mut printed).count(), 1);

        logs.extend([entry("b"), entry("c"), entry("d")]);
        let fresh: Vec<_> = unseen_logs(&view_with(logs), &mut printed)
            .map(|e| e.message.clone())
            .collect();
        assert_eq!(fresh, ["c", "d"]);
    }

    #[test]
    fn test_current_step_prefers_running_step() {
        let status = DevelopmentStatus {
            status: RunStatus::InProgress,
            tasks: vec![
                TaskProgress {
                    id: "1".to_string(),
                    title: "Scaffold".to_string(),
                    status: TaskStatus::Completed,
                    progress: agentco_types::Progress::COMPLETE,
                    message: None,
                },
                TaskProgress {
                    id: "2".to_string(),
                    title: "Write API".to_string(),
                    status: TaskStatus::Review,
                    progress: agentco_types::Progress::ZERO,
                    message: None,
                },
            ],
            ..Default::default()
        };
        assert_eq!(current_step(&status), "Write API");

        let paused = DevelopmentStatus {
            status: RunStatus::Paused,
            ..status
        };
        assert_eq!(current_step(&paused), "paused");
    }
}
