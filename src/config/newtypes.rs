//! Validated newtype wrappers for configuration values.
//!
//! This module provides type-safe wrappers around string values that validate
//! their contents on construction. Invalid values are rejected with clear error messages.

use crate::error::ConfigError;
use std::fmt;

/// A validated Asana API token (the legacy API key, sent as HTTP Basic auth).
///
/// The `Debug` implementation masks the token so it never ends up in logs.
///
/// # Example
///
/// ```rust
/// use asana_api::ApiToken;
///
/// let token = ApiToken::new("0/abc123").unwrap();
/// assert_eq!(token.as_ref(), "0/abc123");
/// assert_eq!(format!("{:?}", token), "ApiToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiToken(String);

impl ApiToken {
    /// Creates a new validated API token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyCredential { kind: "API token" });
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for ApiToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiToken(*****)")
    }
}

/// A validated bearer token (personal access token or OAuth2 access token).
///
/// # Example
///
/// ```rust
/// use asana_api::BearerToken;
///
/// let token = BearerToken::new("1/12345:abcdef").unwrap();
/// assert_eq!(format!("{:?}", token), "BearerToken(*****)");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Creates a new validated bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the token is empty.
    pub fn new(token: impl Into<String>) -> Result<Self, ConfigError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ConfigError::EmptyCredential {
                kind: "Bearer token",
            });
        }
        Ok(Self(token))
    }
}

impl AsRef<str> for BearerToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(*****)")
    }
}

/// A validated OAuth2 client secret.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientSecret(String);

impl ClientSecret {
    /// Creates a new validated client secret.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCredential`] if the secret is empty.
    pub fn new(secret: impl Into<String>) -> Result<Self, ConfigError> {
        let secret = secret.into();
        if secret.trim().is_empty() {
            return Err(ConfigError::EmptyCredential {
                kind: "Client secret",
            });
        }
        Ok(Self(secret))
    }
}

impl AsRef<str> for ClientSecret {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(*****)")
    }
}

/// A validated API base URL.
///
/// The URL must carry an `http` or `https` scheme and a host. A trailing
/// slash is removed so that relative resource paths (which always start with
/// `/`) can be appended directly.
///
/// # Example
///
/// ```rust
/// use asana_api::BaseUrl;
///
/// let url = BaseUrl::new("https://app.asana.com/api/1.0/").unwrap();
/// assert_eq!(url.as_ref(), "https://app.asana.com/api/1.0");
/// assert_eq!(url.join("/users/me"), "https://app.asana.com/api/1.0/users/me");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// The production Asana API base URL.
    pub const DEFAULT: &'static str = "https://app.asana.com/api/1.0";

    /// Creates a new validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] if the URL has no http(s)
    /// scheme or no host.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        let trimmed = url.trim().trim_end_matches('/');

        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .ok_or_else(|| ConfigError::InvalidBaseUrl { url: url.clone() })?;

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::InvalidBaseUrl { url });
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Joins a relative resource path onto this base URL.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.0)
        } else {
            format!("{}/{path}", self.0)
        }
    }
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_token_rejects_empty_string() {
        let result = ApiToken::new("");
        assert!(matches!(
            result,
            Err(ConfigError::EmptyCredential { kind: "API token" })
        ));
    }

    #[test]
    fn test_bearer_token_rejects_whitespace() {
        assert!(BearerToken::new("   ").is_err());
    }

    #[test]
    fn test_secrets_are_masked_in_debug() {
        let secret = ClientSecret::new("super-secret").unwrap();
        assert_eq!(format!("{secret:?}"), "ClientSecret(*****)");

        let token = BearerToken::new("1/abc").unwrap();
        assert!(!format!("{token:?}").contains("1/abc"));
    }

    #[test]
    fn test_base_url_strips_trailing_slash() {
        let url = BaseUrl::new("http://localhost:8080/").unwrap();
        assert_eq!(url.as_ref(), "http://localhost:8080");
    }

    #[test]
    fn test_base_url_rejects_missing_scheme_or_host() {
        assert!(BaseUrl::new("app.asana.com/api/1.0").is_err());
        assert!(BaseUrl::new("https://").is_err());
        assert!(BaseUrl::new("ftp://app.asana.com").is_err());
    }

    #[test]
    fn test_base_url_join() {
        let url = BaseUrl::default();
        assert_eq!(url.join("/tasks/1"), "https://app.asana.com/api/1.0/tasks/1");
        assert_eq!(url.join("tasks/1"), "https://app.asana.com/api/1.0/tasks/1");
    }
}
