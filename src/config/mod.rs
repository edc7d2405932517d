//! Configuration types for the Asana API SDK.
//!
//! This module provides the configuration used to build a
//! [`Client`](crate::Client) and the transport underneath it.
//!
//! # Overview
//!
//! The main types in this module are:
//!
//! - [`ClientConfig`]: The immutable configuration record
//! - [`ClientConfigBuilder`]: A builder for constructing [`ClientConfig`] instances
//! - [`ApiToken`]: A validated API token (HTTP Basic)
//! - [`BearerToken`]: A validated bearer token with masked debug output
//! - [`ClientSecret`]: A validated OAuth2 client secret
//! - [`BaseUrl`]: A validated API base URL
//!
//! # Example
//!
//! ```rust
//! use asana_api::{Authentication, BearerToken, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .authentication(Authentication::bearer(BearerToken::new("1/abc").unwrap()))
//!     .user_agent("my-integration/1.0")
//!     .build()
//!     .unwrap();
//!
//! assert!(config.log_asana_change_warnings());
//! ```

mod newtypes;

pub use newtypes::{ApiToken, BaseUrl, BearerToken, ClientSecret};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::Authentication;
use crate::error::ConfigError;

/// Environment variable holding a personal access token (bearer auth).
pub const ACCESS_TOKEN_ENV: &str = "ASANA_ACCESS_TOKEN";

/// Environment variable holding a legacy API token (basic auth).
pub const API_TOKEN_ENV: &str = "ASANA_API_TOKEN";

/// Environment variable overriding the API base URL.
pub const BASE_URL_ENV: &str = "ASANA_BASE_URL";

/// A hook applied to every outgoing request before it is sent.
///
/// This is the escape hatch for arbitrary request customization (extra
/// headers, proxies, request-level middleware).
pub type RequestHook =
    Arc<dyn Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync>;

/// Configuration for the Asana API SDK.
///
/// `ClientConfig` is created once, handed to [`Client::new`](crate::Client::new)
/// and never mutated afterwards.
///
/// # Thread Safety
///
/// `ClientConfig` is `Clone`, `Send`, and `Sync`. Cloning shares the
/// authentication strategy, so a refreshed OAuth2 token is visible to every
/// clone.
///
/// # Example
///
/// ```rust
/// use asana_api::{ApiToken, Authentication, ClientConfig};
/// use std::time::Duration;
///
/// let config = ClientConfig::builder()
///     .authentication(Authentication::api_token(ApiToken::new("0/abc").unwrap()))
///     .debug_mode(true)
///     .timeout(Duration::from_secs(30))
///     .build()
///     .unwrap();
///
/// assert!(config.debug_mode());
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    authentication: Authentication,
    base_url: BaseUrl,
    user_agent: Option<String>,
    debug_mode: bool,
    log_asana_change_warnings: bool,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    configure_request: Option<RequestHook>,
}

impl ClientConfig {
    /// Creates a new builder for constructing a `ClientConfig`.
    #[must_use]
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::new()
    }

    /// Returns the authentication strategy.
    #[must_use]
    pub const fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the custom user agent, if configured.
    #[must_use]
    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    /// Returns whether every outgoing request is logged.
    #[must_use]
    pub const fn debug_mode(&self) -> bool {
        self.debug_mode
    }

    /// Returns whether `Asana-Change` deprecation warnings are logged.
    #[must_use]
    pub const fn log_asana_change_warnings(&self) -> bool {
        self.log_asana_change_warnings
    }

    /// Returns the headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the per-attempt request timeout, if configured.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Returns the caller-supplied network adapter, if configured.
    #[must_use]
    pub const fn http_client(&self) -> Option<&reqwest::Client> {
        self.http_client.as_ref()
    }

    /// Returns the request customization hook, if configured.
    #[must_use]
    pub fn configure_request(&self) -> Option<&RequestHook> {
        self.configure_request.as_ref()
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("authentication", &self.authentication)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("debug_mode", &self.debug_mode)
            .field("log_asana_change_warnings", &self.log_asana_change_warnings)
            .field("default_headers", &self.default_headers)
            .field("timeout", &self.timeout)
            .field("http_client", &self.http_client.is_some())
            .field("configure_request", &self.configure_request.is_some())
            .finish()
    }
}

// Verify ClientConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ClientConfig>();
};

/// Builder for constructing [`ClientConfig`] instances.
///
/// `authentication` is the only required field.
///
/// # Defaults
///
/// - `base_url`: `https://app.asana.com/api/1.0`
/// - `user_agent`: `Asana Rust Library v{version} | Rust {rust-version}`
/// - `debug_mode`: `false`
/// - `log_asana_change_warnings`: `true`
/// - `default_headers`: empty
/// - `timeout`: none (the adapter's own default)
#[derive(Default)]
pub struct ClientConfigBuilder {
    authentication: Option<Authentication>,
    base_url: Option<BaseUrl>,
    user_agent: Option<String>,
    debug_mode: Option<bool>,
    log_asana_change_warnings: Option<bool>,
    default_headers: HashMap<String, String>,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    configure_request: Option<RequestHook>,
}

impl ClientConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder pre-populated from the environment.
    ///
    /// Reads `ASANA_ACCESS_TOKEN` (bearer) and falls back to `ASANA_API_TOKEN`
    /// (basic). `ASANA_BASE_URL` overrides the API base URL when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if neither token variable
    /// is set, or a validation error if a value is empty or malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let authentication = match (
            std::env::var(ACCESS_TOKEN_ENV).ok(),
            std::env::var(API_TOKEN_ENV).ok(),
        ) {
            (Some(token), _) => Authentication::bearer(BearerToken::new(token)?),
            (None, Some(token)) => Authentication::api_token(ApiToken::new(token)?),
            (None, None) => {
                return Err(ConfigError::MissingRequiredField {
                    field: ACCESS_TOKEN_ENV,
                })
            }
        };

        let mut builder = Self::new().authentication(authentication);
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            builder = builder.base_url(BaseUrl::new(url)?);
        }
        Ok(builder)
    }

    /// Sets the authentication strategy (required).
    #[must_use]
    pub fn authentication(mut self, authentication: Authentication) -> Self {
        self.authentication = Some(authentication);
        self
    }

    /// Sets the API base URL.
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the `User-Agent` header value.
    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Enables logging of every outgoing request.
    #[must_use]
    pub const fn debug_mode(mut self, enabled: bool) -> Self {
        self.debug_mode = Some(enabled);
        self
    }

    /// Enables or disables `Asana-Change` deprecation warnings.
    #[must_use]
    pub const fn log_asana_change_warnings(mut self, enabled: bool) -> Self {
        self.log_asana_change_warnings = Some(enabled);
        self
    }

    /// Replaces all default headers at once.
    #[must_use]
    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Adds a single default header.
    ///
    /// Per-call headers with the same name take precedence.
    #[must_use]
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(key.into(), value.into());
        self
    }

    /// Sets the per-attempt request timeout.
    ///
    /// Timed out attempts are retried by the transport before the timeout
    /// is surfaced to the caller.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses a caller-supplied `reqwest::Client` as the network adapter.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Installs a hook applied to every outgoing request.
    ///
    /// # Example
    ///
    /// ```rust
    /// use asana_api::{Authentication, BearerToken, ClientConfig};
    ///
    /// let config = ClientConfig::builder()
    ///     .authentication(Authentication::bearer(BearerToken::new("1/abc").unwrap()))
    ///     .configure_request(|request| request.header("Asana-Enable", "new_user_task_lists"))
    ///     .build()
    ///     .unwrap();
    ///
    /// assert!(config.configure_request().is_some());
    /// ```
    #[must_use]
    pub fn configure_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(reqwest::RequestBuilder) -> reqwest::RequestBuilder + Send + Sync + 'static,
    {
        self.configure_request = Some(Arc::new(hook));
        self
    }

    /// Builds the [`ClientConfig`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `authentication` is
    /// not set.
    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let authentication = self
            .authentication
            .ok_or(ConfigError::MissingRequiredField {
                field: "authentication",
            })?;

        Ok(ClientConfig {
            authentication,
            base_url: self.base_url.unwrap_or_default(),
            user_agent: self.user_agent,
            debug_mode: self.debug_mode.unwrap_or(false),
            log_asana_change_warnings: self.log_asana_change_warnings.unwrap_or(true),
            default_headers: self.default_headers,
            timeout: self.timeout,
            http_client: self.http_client,
            configure_request: self.configure_request,
        })
    }
}

impl fmt::Debug for ClientConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigBuilder")
            .field("authentication", &self.authentication)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
