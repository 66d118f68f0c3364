//! Client configuration for agentco.
//!
//! A single YAML file, `client.yaml`, holds named contexts. Each context
//! bundles a backend URL, session credentials, and an optional default
//! project. The file lives in the agentco config directory:
//!
//! 1. `$AGENTCO_CONFIG_DIR` if set
//! 2. `dirs::config_dir()/agentco` otherwise

mod client;
mod error;
mod paths;

pub use client::{
    API_VERSION, AuthConfig, ClientConfig, ClientDefaults, Context, Credentials, KIND,
    ResolvedContext, client_config_path, load_client_config, load_client_config_from,
    save_client_config, save_client_config_to,
};
pub use error::{ConfigError, Result};
pub use paths::{APP_NAME, CONFIG_DIR_ENV, DEFAULT_SERVER_URL, log_dir, xdg_config_dir};
