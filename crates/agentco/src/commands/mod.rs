//! CLI command handlers.

pub mod agents;
pub mod config;
pub mod dev;
pub mod github;
pub mod keys;
pub mod project;
pub mod status;
pub mod tasks;

use std::fmt::Display;

use anyhow::Result;
use console::{Style, style};

use agentco_client::AgentcoClient;
use agentco_config::ResolvedContext;
use agentco_types::ProjectId;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Resolved server, credentials and tuning.
    pub settings: ResolvedContext,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Load the client config and resolve the settings for this invocation.
    pub fn load(
        context: Option<&str>,
        server: Option<&str>,
        json_output: bool,
        verbose: bool,
    ) -> Result<Self> {
        let config = agentco_config::load_client_config()?;
        let settings = config.resolve(context, server)?;
        tracing::debug!(
            server = %settings.server,
            context = settings.name.as_deref().unwrap_or("-"),
            "Resolved client settings"
        );
        Ok(Self {
            settings,
            json_output,
            verbose,
        })
    }

    pub fn server_url(&self) -> &str {
        &self.settings.server
    }

    /// Build an API client from the resolved settings.
    pub fn client(&self) -> Result<AgentcoClient> {
        let mut builder = AgentcoClient::builder()
            .base_url(&self.settings.server)
            .timeout(self.settings.timeout);
        if let Some(session) = &self.settings.credentials.session_id {
            builder = builder.session_id(session);
        }
        if let Some(token) = &self.settings.credentials.csrf_token {
            builder = builder.csrf_token(token);
        }
        Ok(builder.build()?)
    }

    /// The project to act on: the flag if given, else the context default.
    pub fn project(&self, explicit: Option<String>) -> Result<ProjectId> {
        explicit
            .or_else(|| self.settings.project.clone())
            .map(ProjectId::from)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no project given; pass --project or set one with 'agentco config set-context <name> --project <id>'"
                )
            })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Print a bold title with a dim rule underneath.
pub(crate) fn heading(title: impl Display, width: usize) {
    let dim = Style::new().dim();
    println!("{}", style(title).bold());
    println!("{}", dim.apply_to("─".repeat(width)));
}

/// Report a failed action without aborting the command.
pub(crate) fn print_error(err: impl Display) {
    let red = Style::new().red();
    eprintln!("{} {}", red.apply_to("Error:"), err);
}

pub(crate) fn print_success(message: impl Display) {
    let green = Style::new().green();
    println!("{} {}", green.apply_to("✓"), message);
}

pub(crate) fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Shorten to `max_len` characters, on one line.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let s = s.replace('\n', " ");
    if s.chars().count() <= max_len {
        s
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
