//! Keys command - AI provider API keys.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::Style;

use agentco_client::CreateApiKeyRequest;
use agentco_types::{ApiKey, ApiKeyId, ServiceType};

use super::{Context, heading, print_error, print_json, print_success};

/// Arguments for the keys command.
#[derive(Args, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub command: Option<KeysCommand>,
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// List stored keys (default)
    List,

    /// List only active keys
    Active,

    /// Show supported AI services and their key formats
    Services,

    /// Store a key (prompts when the key is not given)
    Add {
        /// opencode, openai, anthropic or google
        service: ServiceType,

        /// The key itself; omit to type it without echo
        key: Option<String>,

        /// Store the key even if it does not match the expected format
        #[arg(long)]
        force: bool,
    },

    /// Activate a stored key
    Enable {
        /// Key ID
        id: String,
    },

    /// Deactivate a stored key
    Disable {
        /// Key ID
        id: String,
    },

    /// Delete a stored key
    Delete {
        /// Key ID
        id: String,
    },
}

/// Run the keys command.
pub async fn run(args: KeysArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(KeysCommand::List) {
        KeysCommand::List => cmd_list(ctx, false).await,
        KeysCommand::Active => cmd_list(ctx, true).await,
        KeysCommand::Services => cmd_services(ctx).await,
        KeysCommand::Add {
            service,
            key,
            force,
        } => cmd_add(ctx, service, key, force).await,
        KeysCommand::Enable { id } => cmd_set_active(ctx, ApiKeyId::from(id), true).await,
        KeysCommand::Disable { id } => cmd_set_active(ctx, ApiKeyId::from(id), false).await,
        KeysCommand::Delete { id } => cmd_delete(ctx, ApiKeyId::from(id)).await,
    }
}

async fn cmd_list(ctx: &Context, only_active: bool) -> Result<()> {
    let client = ctx.client()?;
    let keys = if only_active {
        client.api_keys().active().await
    } else {
        client.api_keys().list().await
    };

    match keys {
        Ok(keys) if ctx.json_output => print_json(&keys)?,
        Ok(keys) => {
            heading("API keys", 60);
            if keys.is_empty() {
                println!("{}", Style::new().dim().apply_to("No keys stored"));
            }
            for key in &keys {
                print_key_row(key);
            }
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

fn print_key_row(key: &ApiKey) {
    let dim = Style::new().dim();
    let state = if key.is_active {
        Style::new().green().apply_to("active")
    } else {
        dim.apply_to("inactive")
    };
    let name = if key.service_name.is_empty() {
        key.service_type.as_str()
    } else {
        key.service_name.as_str()
    };
    let last_used = key.last_used_at.as_deref().unwrap_or("never");
    println!(
        "{} {:<12} {:<8} {}",
        dim.apply_to(format!("[{}]", key.id)),
        name,
        state,
        dim.apply_to(format!("last used: {last_used}"))
    );
}

async fn cmd_services(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    match client.api_keys().services().await {
        Ok(services) if ctx.json_output => print_json(&services)?,
        Ok(services) => {
            let dim = Style::new().dim();
            heading("AI services", 60);
            for service in &services {
                println!(
                    "{:<12} {:<20} {}",
                    service.service_type.as_str(),
                    service.name,
                    dim.apply_to(&service.key_format)
                );
                if !service.signup_url.is_empty() {
                    println!("  {}", dim.apply_to(&service.signup_url));
                }
            }
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_add(ctx: &Context, service: ServiceType, key: Option<String>, force: bool) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => rpassword::prompt_password(format!("API key for {service} (input hidden): "))?,
    };
    let key = key.trim().to_string();

    if key.is_empty() {
        println!("No key provided, aborting.");
        return Ok(());
    }
    if !force && !service.looks_like_key(&key) {
        print_error(format!(
            "key does not match the {service} format {}",
            service.key_format()
        ));
        eprintln!(
            "{}",
            Style::new().dim().apply_to("Pass --force to store it anyway.")
        );
        return Ok(());
    }

    let client = ctx.client()?;
    let request = CreateApiKeyRequest {
        service_type: service,
        api_key: key,
    };
    match client.api_keys().create(&request).await {
        Ok(stored) if ctx.json_output => print_json(&stored)?,
        Ok(stored) => print_success(format!("Key stored for {service} [{}]", stored.id)),
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_set_active(ctx: &Context, id: ApiKeyId, active: bool) -> Result<()> {
    let client = ctx.client()?;
    match client.api_keys().set_active(&id, active).await {
        Ok(key) if ctx.json_output => print_json(&key)?,
        Ok(key) => {
            let state = if key.is_active { "enabled" } else { "disabled" };
            print_success(format!("Key {} {state}", key.id));
        }
        Err(e) => print_error(e),
    }
    Ok(())
}

async fn cmd_delete(ctx: &Context, id: ApiKeyId) -> Result<()> {
    let client = ctx.client()?;
    match client.api_keys().delete(&id).await {
        Ok(()) => print_success(format!("Key {id} deleted")),
        Err(e) => print_error(e),
    }
    Ok(())
}
