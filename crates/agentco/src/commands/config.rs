//! Config command - client context management.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;
use serde::Serialize;

use agentco_config::{AuthConfig, ClientConfig, Context as ClientContext};

use super::{print_json, print_success};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the client config file path
    Path,

    /// Show the current context name
    CurrentContext,

    /// List available contexts
    GetContexts,

    /// Switch to a different context
    UseContext {
        /// Context name to switch to
        name: String,
    },

    /// Create or update a context
    SetContext {
        /// Context name
        name: String,

        /// Server URL including the /api prefix (e.g., http://localhost:8000/api)
        #[arg(long)]
        server: Option<String>,

        /// Default project for this context
        #[arg(long)]
        project: Option<String>,

        /// Request timeout in seconds
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        timeout: Option<u64>,

        #[command(flatten)]
        auth: AuthArgs,
    },

    /// Delete a context
    DeleteContext {
        /// Context name to delete
        name: String,
    },
}

/// Where the session cookie and anti-forgery token come from.
#[derive(Args, Debug, Default)]
pub struct AuthArgs {
    /// Environment variable holding the sessionid cookie
    #[arg(long, value_name = "VAR")]
    session_env: Option<String>,

    /// File holding the sessionid cookie
    #[arg(long, value_name = "PATH")]
    session_file: Option<PathBuf>,

    /// Environment variable holding the csrftoken cookie
    #[arg(long, value_name = "VAR")]
    csrf_env: Option<String>,

    /// File holding the csrftoken cookie
    #[arg(long, value_name = "PATH")]
    csrf_file: Option<PathBuf>,

    /// Remove any stored auth settings
    #[arg(long, conflicts_with_all = ["session_env", "session_file", "csrf_env", "csrf_file"])]
    no_auth: bool,
}

impl AuthArgs {
    /// `None` when no auth flag was given, so an update keeps what is stored.
    fn into_auth(self) -> Option<AuthConfig> {
        if self.no_auth {
            return Some(AuthConfig::None);
        }
        if self.session_env.is_some() || self.session_file.is_some() {
            return Some(AuthConfig::Session {
                cookie_file: self.session_file,
                cookie_env: self.session_env,
                csrf_token_file: self.csrf_file,
                csrf_token_env: self.csrf_env,
            });
        }
        if self.csrf_env.is_some() || self.csrf_file.is_some() {
            return Some(AuthConfig::Csrf {
                token_file: self.csrf_file,
                token_env: self.csrf_env,
            });
        }
        None
    }
}

/// Run the config command.
///
/// Works without a reachable server, so it takes the output mode instead of
/// a full command context.
pub async fn run(args: ConfigArgs, json_output: bool) -> Result<()> {
    match args.command {
        ConfigCommand::Path => cmd_path(json_output),
        ConfigCommand::CurrentContext => cmd_current_context(json_output),
        ConfigCommand::GetContexts => cmd_get_contexts(json_output),
        ConfigCommand::UseContext { name } => cmd_use_context(&name),
        ConfigCommand::SetContext {
            name,
            server,
            project,
            timeout,
            auth,
        } => cmd_set_context(&name, server, project, timeout, auth.into_auth()),
        ConfigCommand::DeleteContext { name } => cmd_delete_context(&name),
    }
}

fn cmd_path(json_output: bool) -> Result<()> {
    let path = agentco_config::client_config_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    if json_output {
        return print_json(&serde_json::json!({
            "path": path,
            "exists": path.exists(),
        }));
    }
    println!("{}", path.display());
    Ok(())
}

fn cmd_current_context(json_output: bool) -> Result<()> {
    let config = agentco_config::load_client_config()?;

    if json_output {
        return print_json(&serde_json::json!({
            "current_context": config.current_context,
        }));
    }

    match &config.current_context {
        Some(name) => println!("{name}"),
        None => {
            println!("No current context set. Use 'agentco config use-context <name>' to set one.")
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ContextRow<'a> {
    current: bool,
    #[serde(flatten)]
    context: &'a ClientContext,
}

fn cmd_get_contexts(json_output: bool) -> Result<()> {
    let config = agentco_config::load_client_config()?;
    let current = config.current_context.as_deref();

    if json_output {
        let rows: Vec<ContextRow<'_>> = config
            .contexts
            .iter()
            .map(|context| ContextRow {
                current: current == Some(context.name.as_str()),
                context,
            })
            .collect();
        return print_json(&rows);
    }

    if config.contexts.is_empty() {
        println!("No contexts configured.");
        println!();
        println!("Create one with:");
        println!("  agentco config set-context local --server=http://localhost:8000/api");
        return Ok(());
    }

    let dim = Style::new().dim();
    println!(
        "{}",
        dim.apply_to(format!(
            "{:<9} {:<15} {:<32} {}",
            "CURRENT", "NAME", "SERVER", "PROJECT"
        ))
    );
    for context in &config.contexts {
        let marker = if current == Some(context.name.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{:<9} {:<15} {:<32} {}",
            marker,
            context.name,
            context.server,
            context.project.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn cmd_use_context(name: &str) -> Result<()> {
    let mut config = agentco_config::load_client_config()?;
    config.use_context(name)?;
    agentco_config::save_client_config(&config)?;
    print_success(format!("Switched to context \"{name}\"."));
    Ok(())
}

fn cmd_set_context(
    name: &str,
    server: Option<String>,
    project: Option<String>,
    timeout: Option<u64>,
    auth: Option<AuthConfig>,
) -> Result<()> {
    let mut config = agentco_config::load_client_config()?;
    let created = apply_context(&mut config, name, server, project, timeout, auth)?;
    agentco_config::save_client_config(&config)?;

    if created {
        print_success(format!("Context \"{name}\" created."));
    } else {
        print_success(format!("Context \"{name}\" modified."));
    }
    if config.current_context.as_deref() == Some(name) && created {
        println!("Context \"{name}\" set as current context.");
    }
    Ok(())
}

/// Create or update `name` in `config`. Returns whether it was created.
///
/// A new context needs a server. The first context becomes current.
fn apply_context(
    config: &mut ClientConfig,
    name: &str,
    server: Option<String>,
    project: Option<String>,
    timeout: Option<u64>,
    auth: Option<AuthConfig>,
) -> Result<bool> {
    if let Some(context) = config.get_context_mut(name) {
        if let Some(url) = server {
            context.server = url;
        }
        if let Some(project) = project {
            context.project = Some(project);
        }
        if let Some(timeout) = timeout {
            context.timeout = Some(timeout);
        }
        if let Some(auth) = auth {
            context.auth = match auth {
                AuthConfig::None => None,
                auth => Some(auth),
            };
        }
        return Ok(false);
    }

    let server =
        server.ok_or_else(|| anyhow::anyhow!("--server is required when creating a new context"))?;
    let mut context = ClientContext::new(name, server);
    if let Some(project) = project {
        context = context.with_project(project);
    }
    if let Some(timeout) = timeout {
        context = context.with_timeout(timeout);
    }
    if let Some(auth) = auth.filter(|a| !matches!(a, AuthConfig::None)) {
        context = context.with_auth(auth);
    }
    config.set_context(context);

    if config.current_context.is_none() && config.contexts.len() == 1 {
        config.current_context = Some(name.to_string());
    }
    Ok(true)
}

fn cmd_delete_context(name: &str) -> Result<()> {
    let mut config = agentco_config::load_client_config()?;

    match config.remove_context(name) {
        Some(_) => {
            agentco_config::save_client_config(&config)?;
            print_success(format!("Context \"{name}\" deleted."));
            if config.current_context.is_none() {
                println!(
                    "Note: No current context. Use 'agentco config use-context <name>' to set one."
                );
            }
        }
        None => println!("Context \"{name}\" not found."),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_requires_server() {
        let mut config = ClientConfig::new();
        let err = apply_context(&mut config, "local", None, None, None, None).unwrap_err();
        assert!(err.to_string().contains("--server"));
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_first_context_becomes_current() {
        let mut config = ClientConfig::new();
        let created = apply_context(
            &mut config,
            "local",
            Some("http://localhost:8000/api".to_string()),
            Some("7".to_string()),
            None,
            None,
        )
        .unwrap();
        assert!(created);
        assert_eq!(config.current_context.as_deref(), Some("local"));
        assert_eq!(config.contexts[0].project.as_deref(), Some("7"));

        apply_context(
            &mut config,
            "staging",
            Some("https://staging.example.com/api".to_string()),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(config.current_context.as_deref(), Some("local"));
    }

    #[test]
    fn test_update_keeps_unset_fields() {
        let mut config = ClientConfig::new();
        apply_context(
            &mut config,
            "local",
            Some("http://localhost:8000/api".to_string()),
            Some("7".to_string()),
            Some(10),
            Some(AuthConfig::session_env("SID", "CSRF")),
        )
        .unwrap();

        let created =
            apply_context(&mut config, "local", None, None, Some(60), None).unwrap();
        assert!(!created);

        let context = config.get_context("local").unwrap();
        assert_eq!(context.server, "http://localhost:8000/api");
        assert_eq!(context.project.as_deref(), Some("7"));
        assert_eq!(context.timeout, Some(60));
        assert!(matches!(context.auth, Some(AuthConfig::Session { .. })));
    }

    #[test]
    fn test_no_auth_clears_stored_auth() {
        let mut config = ClientConfig::new();
        apply_context(
            &mut config,
            "local",
            Some("http://localhost:8000/api".to_string()),
            None,
            None,
            Some(AuthConfig::session_env("SID", "CSRF")),
        )
        .unwrap();
        apply_context(&mut config, "local", None, None, None, Some(AuthConfig::None)).unwrap();
        assert!(config.get_context("local").unwrap().auth.is_none());
    }

    #[test]
    fn test_auth_args_choose_variant() {
        let session = AuthArgs {
            session_env: Some("SID".to_string()),
            csrf_env: Some("CSRF".to_string()),
            ..Default::default()
        };
        match session.into_auth() {
            Some(AuthConfig::Session {
                cookie_env,
                csrf_token_env,
                ..
            }) => {
                assert_eq!(cookie_env.as_deref(), Some("SID"));
                assert_eq!(csrf_token_env.as_deref(), Some("CSRF"));
            }
            other => panic!("expected session auth, got {other:?}"),
        }

        let csrf = AuthArgs {
            csrf_file: Some(PathBuf::from("/tmp/csrf")),
            ..Default::default()
        };
        assert!(matches!(csrf.into_auth(), Some(AuthConfig::Csrf { .. })));

        assert!(AuthArgs::default().into_auth().is_none());
    }
}
