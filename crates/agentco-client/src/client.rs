//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::api::{
    AgentsApi, ApiKeysApi, DevelopmentApi, GitHubApi, PlanningApi, ProjectsApi, TasksApi,
};
use crate::error::{Error, Result};

/// Backend origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Name of the cookie holding the anti-forgery token.
pub const CSRF_COOKIE: &str = "csrftoken";

/// Header the anti-forgery token is echoed in on mutating requests.
pub const CSRF_HEADER: &str = "X-CSRFToken";

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "sessionid";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// agentco API client.
///
/// Cheap to clone; clones share one connection pool and one cookie jar.
///
/// # Example
///
/// ```no_run
/// use agentco_client::AgentcoClient;
///
/// # async fn example() -> agentco_client::Result<()> {
/// let client = AgentcoClient::builder()
///     .base_url("http://localhost:8000/api")
///     .session_id("abc123")
///     .csrf_token("tok")
///     .build()?;
///
/// let tasks = client.tasks().list_for_project(&"1".into()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct AgentcoClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: Url,
    pub(crate) cookies: Arc<Jar>,
    pub(crate) timeout: Duration,
}

impl AgentcoClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client pointing at the local development backend.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url(DEFAULT_BASE_URL).build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Current anti-forgery token, read from the `csrftoken` cookie.
    pub fn csrf_token(&self) -> Option<String> {
        let header = self.inner.cookies.cookies(&self.inner.base_url)?;
        let header = header.to_str().ok()?;
        header
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == CSRF_COOKIE)
            .map(|(_, value)| value.to_string())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the projects API.
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access the agents API.
    pub fn agents(&self) -> AgentsApi {
        AgentsApi::new(self.clone())
    }

    /// Access the tasks API.
    pub fn tasks(&self) -> TasksApi {
        TasksApi::new(self.clone())
    }

    /// Access the development-run API.
    pub fn development(&self) -> DevelopmentApi {
        DevelopmentApi::new(self.clone())
    }

    /// Access the GitHub integration API.
    pub fn github(&self) -> GitHubApi {
        GitHubApi::new(self.clone())
    }

    /// Access the planning documents API.
    pub fn planning(&self) -> PlanningApi {
        PlanningApi::new(self.clone())
    }

    /// Access the AI-provider API key API.
    pub fn api_keys(&self) -> ApiKeysApi {
        ApiKeysApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner.base_url.join(path).map_err(Error::from)
    }

    /// Start a request, attaching the anti-forgery header on mutating methods.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.url(path)?;
        let mutating = !matches!(method, Method::GET | Method::HEAD | Method::OPTIONS);
        tracing::debug!(method = %method, path = url.path(), "api request");

        let mut builder = self
            .inner
            .http
            .request(method, url)
            .timeout(self.inner.timeout);

        if mutating {
            match self.csrf_token() {
                Some(token) => builder = builder.header(CSRF_HEADER, token),
                None => tracing::debug!("no csrftoken cookie; sending mutating request without it"),
            }
        }

        Ok(builder)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.request(Method::GET, path)?.send().await?;
        self.handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::GET, path)?.query(query).send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        self.handle_response(response).await
    }

    /// Make a POST request whose response body is ignored.
    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        self.check_status(response).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let response = self.request(Method::PATCH, path)?.json(body).send().await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let response = self.request(Method::DELETE, path)?.send().await?;
        self.check_status(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    async fn check_status(&self, response: reqwest::Response) -> Result<()> {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let error = Error::from_response(status, &body);
        tracing::debug!(status = status.as_u16(), error = %error, "api request failed");
        error
    }
}

/// Builder for creating an [`AgentcoClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    session_id: Option<String>,
    csrf_token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            session_id: None,
            csrf_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL, including the `/api` prefix.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Seed the cookie jar with an existing session.
    pub fn session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Seed the cookie jar with an anti-forgery token.
    pub fn csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<AgentcoClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let cookies = Arc::new(Jar::default());
        for (name, value) in [
            (SESSION_COOKIE, self.session_id.as_deref()),
            (CSRF_COOKIE, self.csrf_token.as_deref()),
        ] {
            if let Some(value) = value {
                if value.contains([';', '\r', '\n']) {
                    return Err(Error::Config(format!("invalid {name} cookie value")));
                }
                cookies.add_cookie_str(&format!("{name}={value}; Path=/"), &base_url);
            }
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("agentco-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .cookie_provider(cookies.clone())
            .build()?;

        Ok(AgentcoClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                cookies,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
