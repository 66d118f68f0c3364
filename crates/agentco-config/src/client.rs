//! Client configuration for connecting to agentco backends.
//!
//! Implements a kubeconfig-style configuration with named contexts:
//!
//! ```yaml
//! api-version: v1
//! kind: ClientConfig
//!
//! current-context: local
//!
//! contexts:
//!   - name: local
//!     server: http://localhost:8000/api
//!     project: "1"
//!     auth:
//!       type: session
//!       cookie-env: AGENTCO_SESSION
//!       csrf-token-env: AGENTCO_CSRF_TOKEN
//!
//! defaults:
//!   timeout: 30
//!   poll-interval-ms: 2000
//!   log-capacity: 500
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::paths::{DEFAULT_SERVER_URL, xdg_config_dir};
use crate::{ConfigError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Client Config
// ─────────────────────────────────────────────────────────────────────────────

/// API version for the client config file format.
pub const API_VERSION: &str = "v1";

/// Kind identifier for client config files.
pub const KIND: &str = "ClientConfig";

/// Default config filename.
const CLIENT_CONFIG_FILE: &str = "client.yaml";

/// Root client configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ClientConfig {
    /// API version (always "v1" currently).
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Config kind (always "ClientConfig").
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Name of the current/default context.
    #[serde(default)]
    pub current_context: Option<String>,

    /// Named connection contexts.
    #[serde(default)]
    pub contexts: Vec<Context>,

    /// Default settings applied to all contexts.
    #[serde(default)]
    pub defaults: ClientDefaults,
}

fn default_api_version() -> String {
    API_VERSION.to_string()
}

fn default_kind() -> String {
    KIND.to_string()
}

impl ClientConfig {
    /// Create an empty client config.
    pub fn new() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            ..Default::default()
        }
    }

    /// Parse from a YAML string.
    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        serde_yaml::from_str(yaml_str).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::ParseYaml(e.to_string()))
    }

    /// Get the current context, if set and valid.
    pub fn current(&self) -> Option<&Context> {
        self.current_context
            .as_ref()
            .and_then(|name| self.get_context(name))
    }

    /// Get a context by name.
    pub fn get_context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    /// Get a mutable context by name.
    pub fn get_context_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    /// Add or update a context.
    pub fn set_context(&mut self, context: Context) {
        if let Some(existing) = self.get_context_mut(&context.name) {
            *existing = context;
        } else {
            self.contexts.push(context);
        }
    }

    /// Remove a context by name. Clears the current context if it was the one removed.
    pub fn remove_context(&mut self, name: &str) -> Option<Context> {
        let pos = self.contexts.iter().position(|c| c.name == name)?;
        if self.current_context.as_deref() == Some(name) {
            self.current_context = None;
        }
        Some(self.contexts.remove(pos))
    }

    /// Set the current context by name.
    ///
    /// Returns an error if the context doesn't exist.
    pub fn use_context(&mut self, name: &str) -> Result<()> {
        if self.get_context(name).is_some() {
            self.current_context = Some(name.to_string());
            Ok(())
        } else {
            Err(ConfigError::ContextNotFound(name.to_string()))
        }
    }

    /// List all context names.
    pub fn context_names(&self) -> Vec<&str> {
        self.contexts.iter().map(|c| c.name.as_str()).collect()
    }

    /// Resolve the effective connection settings.
    ///
    /// `context` selects a context by name (an unknown name is an error);
    /// without it the current context is used, if any. `server` overrides the
    /// context's URL. With neither, the local development backend is used.
    pub fn resolve(&self, context: Option<&str>, server: Option<&str>) -> Result<ResolvedContext> {
        let selected = match context {
            Some(name) => Some(
                self.get_context(name)
                    .ok_or_else(|| ConfigError::ContextNotFound(name.to_string()))?,
            ),
            None => self.current(),
        };

        let server = server
            .map(str::to_string)
            .or_else(|| selected.map(|c| c.server.clone()))
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        let credentials = match selected.and_then(|c| c.auth.as_ref()) {
            Some(auth) => auth.resolve()?,
            None => Credentials::default(),
        };

        let (timeout_field, timeout) = match selected.and_then(|c| c.timeout) {
            Some(timeout) => ("contexts[].timeout", timeout),
            None => ("defaults.timeout", self.defaults.timeout),
        };
        non_zero(timeout_field, timeout)?;
        non_zero("defaults.poll-interval-ms", self.defaults.poll_interval_ms)?;

        Ok(ResolvedContext {
            name: selected.map(|c| c.name.clone()),
            server,
            project: selected.and_then(|c| c.project.clone()),
            credentials,
            timeout: Duration::from_secs(timeout),
            poll_interval: Duration::from_millis(self.defaults.poll_interval_ms),
            log_capacity: self.defaults.log_capacity,
        })
    }
}

/// A zero timeout fails every request and a zero interval polls without pause.
fn non_zero(field: &str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Context
// ─────────────────────────────────────────────────────────────────────────────

/// A named connection context (server + auth bundle).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Context {
    /// Unique name for this context.
    pub name: String,

    /// Backend URL including the `/api` prefix.
    pub server: String,

    /// Authentication configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth: Option<AuthConfig>,

    /// Project used when a command is given no `--project`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    /// Request timeout override (seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

impl Context {
    /// Create a new context with just a name and server URL.
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            auth: None,
            project: None,
            timeout: None,
        }
    }

    /// Set the auth configuration.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the default project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: u64) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

/// Authentication configuration for a context.
///
/// The backend authenticates with a `sessionid` cookie and expects the
/// `csrftoken` cookie to be echoed on mutating requests. Each value can come
/// from a file or an environment variable; a file that exists wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AuthConfig {
    /// No authentication.
    None,

    /// Logged-in session.
    #[serde(rename_all = "kebab-case")]
    Session {
        /// Path to file containing the `sessionid` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cookie_file: Option<PathBuf>,
        /// Environment variable containing the `sessionid` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cookie_env: Option<String>,
        /// Path to file containing the `csrftoken` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        csrf_token_file: Option<PathBuf>,
        /// Environment variable containing the `csrftoken` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        csrf_token_env: Option<String>,
    },

    /// Anti-forgery token only, for backends that allow anonymous writes.
    #[serde(rename_all = "kebab-case")]
    Csrf {
        /// Path to file containing the `csrftoken` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_file: Option<PathBuf>,
        /// Environment variable containing the `csrftoken` value.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token_env: Option<String>,
    },
}

impl AuthConfig {
    /// Session auth reading both values from environment variables.
    pub fn session_env(cookie_var: impl Into<String>, csrf_var: impl Into<String>) -> Self {
        Self::Session {
            cookie_file: None,
            cookie_env: Some(cookie_var.into()),
            csrf_token_file: None,
            csrf_token_env: Some(csrf_var.into()),
        }
    }

    /// Session auth reading both values from files.
    pub fn session_files(cookie: impl Into<PathBuf>, csrf: impl Into<PathBuf>) -> Self {
        Self::Session {
            cookie_file: Some(cookie.into()),
            cookie_env: None,
            csrf_token_file: Some(csrf.into()),
            csrf_token_env: None,
        }
    }

    /// Resolve the actual credential values.
    ///
    /// Reads from file or environment variable as configured. Missing
    /// sources resolve to `None`; an unreadable existing file is an error.
    pub fn resolve(&self) -> Result<Credentials> {
        match self {
            AuthConfig::None => Ok(Credentials::default()),

            AuthConfig::Session {
                cookie_file,
                cookie_env,
                csrf_token_file,
                csrf_token_env,
            } => Ok(Credentials {
                session_id: read_secret(cookie_file.as_deref(), cookie_env.as_deref())?,
                csrf_token: read_secret(csrf_token_file.as_deref(), csrf_token_env.as_deref())?,
            }),

            AuthConfig::Csrf {
                token_file,
                token_env,
            } => Ok(Credentials {
                session_id: None,
                csrf_token: read_secret(token_file.as_deref(), token_env.as_deref())?,
            }),
        }
    }
}

/// Resolved cookie values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub session_id: Option<String>,
    pub csrf_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Credentials")
            .field("session_id", &redact(&self.session_id))
            .field("csrf_token", &redact(&self.csrf_token))
            .finish()
    }
}

fn read_secret(file: Option<&Path>, env: Option<&str>) -> Result<Option<String>> {
    if let Some(path) = file {
        let expanded = expand_path(path);
        if expanded.exists() {
            let value = std::fs::read_to_string(&expanded)
                .map_err(|e| ConfigError::ReadFile {
                    path: expanded.display().to_string(),
                    source: e,
                })?
                .trim()
                .to_string();
            return Ok(Some(value).filter(|v| !v.is_empty()));
        }
    }
    if let Some(var) = env
        && let Ok(value) = std::env::var(var)
        && !value.is_empty()
    {
        return Ok(Some(value));
    }
    Ok(None)
}

// ─────────────────────────────────────────────────────────────────────────────
// Defaults
// ─────────────────────────────────────────────────────────────────────────────

/// Default settings applied to all contexts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClientDefaults {
    /// Default request timeout in seconds.
    pub timeout: u64,

    /// Delay between development-status polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Number of run log entries kept in memory.
    pub log_capacity: usize,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        Self {
            timeout: 30,
            poll_interval_ms: 2000,
            log_capacity: 500,
        }
    }
}

/// Effective settings for one invocation.
#[derive(Debug, Clone)]
pub struct ResolvedContext {
    /// Name of the context used, if any.
    pub name: Option<String>,
    pub server: String,
    pub project: Option<String>,
    pub credentials: Credentials,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub log_capacity: usize,
}

// ─────────────────────────────────────────────────────────────────────────────
// Loading / Saving
// ─────────────────────────────────────────────────────────────────────────────

/// Get the path to the client config file.
pub fn client_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(CLIENT_CONFIG_FILE))
}

/// Load the client configuration.
///
/// Returns a default config if the file doesn't exist.
pub fn load_client_config() -> Result<ClientConfig> {
    load_client_config_from(client_config_path().as_deref())
}

/// Load client config from a specific path.
pub fn load_client_config_from(path: Option<&Path>) -> Result<ClientConfig> {
    let Some(path) = path else {
        return Ok(ClientConfig::new());
    };

    if !path.exists() {
        return Ok(ClientConfig::new());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;

    ClientConfig::from_yaml(&contents)
}

/// Save the client configuration.
pub fn save_client_config(config: &ClientConfig) -> Result<()> {
    let path = client_config_path()
        .ok_or_else(|| ConfigError::Other("Could not determine config directory".to_string()))?;
    save_client_config_to(config, &path)
}

/// Save client config to a specific path, creating parent directories.
pub fn save_client_config_to(config: &ClientConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteFile {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let contents = config.to_yaml()?;
    std::fs::write(path, contents).map_err(|e| ConfigError::WriteFile {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

/// Expand ~ to home directory in paths.
fn expand_path(path: &Path) -> PathBuf {
    if let Some(rest) = path.to_str().and_then(|s| s.strip_prefix("~/"))
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config() {
        let config = ClientConfig::new();
        assert_eq!(config.api_version, API_VERSION);
        assert_eq!(config.kind, KIND);
        assert!(config.current_context.is_none());
        assert_eq!(config.defaults.poll_interval_ms, 2000);
        assert_eq!(config.defaults.log_capacity, 500);
    }

    #[test]
    fn test_parse_full_yaml() {
        let yaml = r#"
api-version: v1
kind: ClientConfig
current-context: staging

contexts:
  - name: local
    server: http://localhost:8000/api

  - name: staging
    server: https://agentco.staging.example.com/api
    project: "12"
    timeout: 60
    auth:
      type: session
      cookie-file: ~/.config/agentco/staging.session
      csrf-token-env: STAGING_CSRF

  - name: kiosk
    server: http://kiosk.lan/api
    auth:
      type: csrf
      token-env: KIOSK_CSRF

defaults:
  poll-interval-ms: 500
"#;
        let config = ClientConfig::from_yaml(yaml).unwrap();

        assert_eq!(config.contexts.len(), 3);
        let staging = config.current().unwrap();
        assert_eq!(staging.name, "staging");
        assert_eq!(staging.project.as_deref(), Some("12"));
        assert_eq!(staging.timeout, Some(60));
        match &staging.auth {
            Some(AuthConfig::Session {
                cookie_file,
                csrf_token_env,
                ..
            }) => {
                assert_eq!(
                    cookie_file.as_deref().and_then(Path::to_str),
                    Some("~/.config/agentco/staging.session")
                );
                assert_eq!(csrf_token_env.as_deref(), Some("STAGING_CSRF"));
            }
            other => panic!("expected session auth, got {other:?}"),
        }

        let kiosk = config.get_context("kiosk").unwrap();
        assert!(matches!(kiosk.auth, Some(AuthConfig::Csrf { .. })));

        // Partial defaults keep the rest.
        assert_eq!(config.defaults.poll_interval_ms, 500);
        assert_eq!(config.defaults.timeout, 30);
    }

    #[test]
    fn test_set_and_remove_context() {
        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", "http://localhost:8000/api"));
        config.set_context(Context::new("local", "http://localhost:9000/api"));
        assert_eq!(config.contexts.len(), 1);
        assert_eq!(config.contexts[0].server, "http://localhost:9000/api");

        config.use_context("local").unwrap();
        assert!(config.remove_context("local").is_some());
        assert!(config.current_context.is_none());
        assert!(config.remove_context("local").is_none());
    }

    #[test]
    fn test_use_unknown_context() {
        let mut config = ClientConfig::new();
        let err = config.use_context("nope").unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_resolve_falls_back_to_default_server() {
        let resolved = ClientConfig::new().resolve(None, None).unwrap();
        assert_eq!(resolved.server, DEFAULT_SERVER_URL);
        assert!(resolved.name.is_none());
        assert_eq!(resolved.timeout, Duration::from_secs(30));
        assert_eq!(resolved.poll_interval, Duration::from_millis(2000));
        assert_eq!(resolved.credentials, Credentials::default());
    }

    #[test]
    fn test_resolve_order() {
        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("staging", "https://staging.example.com/api")
                .with_project("4")
                .with_timeout(5),
        );
        config.set_context(Context::new("prod", "https://prod.example.com/api"));
        config.use_context("staging").unwrap();

        let current = config.resolve(None, None).unwrap();
        assert_eq!(current.server, "https://staging.example.com/api");
        assert_eq!(current.project.as_deref(), Some("4"));
        assert_eq!(current.timeout, Duration::from_secs(5));

        let named = config.resolve(Some("prod"), None).unwrap();
        assert_eq!(named.server, "https://prod.example.com/api");
        assert!(named.project.is_none());

        let overridden = config
            .resolve(Some("prod"), Some("http://127.0.0.1:9/api"))
            .unwrap();
        assert_eq!(overridden.server, "http://127.0.0.1:9/api");
        assert_eq!(overridden.name.as_deref(), Some("prod"));

        let err = config.resolve(Some("missing"), None).unwrap_err();
        assert!(matches!(err, ConfigError::ContextNotFound(_)));
    }

    #[test]
    fn test_resolve_rejects_zero_poll_interval() {
        let config = ClientConfig::from_yaml("defaults:\n  poll-interval-ms: 0\n").unwrap();
        let err = config.resolve(None, None).unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "defaults.poll-interval-ms")
        );
    }

    #[test]
    fn test_resolve_rejects_zero_timeout() {
        let config = ClientConfig::from_yaml("defaults:\n  timeout: 0\n").unwrap();
        let err = config.resolve(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "defaults.timeout"));

        let mut config = ClientConfig::new();
        config.set_context(Context::new("local", DEFAULT_SERVER_URL).with_timeout(0));
        let err = config.resolve(Some("local"), None).unwrap_err();
        assert!(err.to_string().contains("must be greater than zero"));
    }

    #[test]
    fn test_context_timeout_overrides_zero_default() {
        let mut config = ClientConfig::from_yaml("defaults:\n  timeout: 0\n").unwrap();
        config.set_context(Context::new("local", DEFAULT_SERVER_URL).with_timeout(10));
        let resolved = config.resolve(Some("local"), None).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_session_auth_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let cookie = dir.path().join("session");
        let csrf = dir.path().join("csrf");
        std::fs::write(&cookie, "abc123\n").unwrap();
        std::fs::write(&csrf, "  tok  ").unwrap();

        let creds = AuthConfig::session_files(&cookie, &csrf).resolve().unwrap();
        assert_eq!(creds.session_id.as_deref(), Some("abc123"));
        assert_eq!(creds.csrf_token.as_deref(), Some("tok"));
        assert!(!format!("{creds:?}").contains("abc123"));
    }

    #[test]
    fn test_session_auth_from_env() {
        // SAFETY: Test is single-threaded, env vars are test-specific
        unsafe {
            std::env::set_var("AGENTCO_TEST_SESSION", "sess-from-env");
        }
        let auth = AuthConfig::session_env("AGENTCO_TEST_SESSION", "AGENTCO_TEST_CSRF_UNSET");
        let creds = auth.resolve().unwrap();
        assert_eq!(creds.session_id.as_deref(), Some("sess-from-env"));
        assert!(creds.csrf_token.is_none());
        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("AGENTCO_TEST_SESSION");
        }
    }

    #[test]
    fn test_missing_file_falls_through_to_none() {
        let auth = AuthConfig::Csrf {
            token_file: Some(PathBuf::from("/nonexistent/agentco/csrf")),
            token_env: None,
        };
        assert_eq!(auth.resolve().unwrap(), Credentials::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CLIENT_CONFIG_FILE);

        let mut config = ClientConfig::new();
        config.set_context(
            Context::new("local", DEFAULT_SERVER_URL)
                .with_project("1")
                .with_auth(AuthConfig::session_env("S", "C")),
        );
        config.use_context("local").unwrap();
        save_client_config_to(&config, &path).unwrap();

        let loaded = load_client_config_from(Some(&path)).unwrap();
        assert_eq!(loaded.current_context.as_deref(), Some("local"));
        assert_eq!(loaded.contexts[0].project.as_deref(), Some("1"));
        assert!(matches!(
            loaded.contexts[0].auth,
            Some(AuthConfig::Session { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_client_config_from(Some(&dir.path().join("absent.yaml"))).unwrap();
        assert!(config.contexts.is_empty());
    }

    #[test]
    fn test_expand_path() {
        let path = PathBuf::from("~/agentco/session");
        let expanded = expand_path(&path);
        if dirs::home_dir().is_some() {
            assert!(!expanded.to_string_lossy().starts_with("~/"));
        }

        let absolute = PathBuf::from("/absolute/path");
        assert_eq!(expand_path(&absolute), absolute);
    }
}
