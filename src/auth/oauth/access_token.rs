//! OAuth2 access tokens.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use std::fmt;

/// An OAuth2 access token, optionally refreshable.
///
/// Tokens without an expiry never report themselves as expired.
///
/// # Example
///
/// ```rust
/// use asana_api::AccessToken;
/// use chrono::{Duration, Utc};
///
/// let token = AccessToken::new("access")
///     .with_refresh_token("refresh")
///     .with_expires_at(Utc::now() - Duration::minutes(1));
///
/// assert!(token.expired());
/// assert_eq!(token.refresh_token(), Some("refresh"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a non-expiring access token without a refresh token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attaches a refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the instant after which the token is considered expired.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The bearer token value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// The expiry instant, if any.
    #[must_use]
    pub const fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns `true` once the expiry instant has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// Builds a token from a token-endpoint response.
    ///
    /// The previous refresh token is kept when the server does not rotate it.
    /// An `expires_in` too large to represent is treated as no expiry.
    pub(crate) fn from_response(response: TokenResponse, previous_refresh: Option<&str>) -> Self {
        Self {
            token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| previous_refresh.map(String::from)),
            expires_at: response
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| Utc::now().checked_add_signed(lifetime)),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body returned by the OAuth2 token endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = AccessToken::new("abc");
        assert!(!token.expired());
        assert!(token.expires_at().is_none());
    }

    #[test]
    fn test_token_with_future_expiry_is_not_expired() {
        let token = AccessToken::new("abc").with_expires_at(Utc::now() + Duration::hours(1));
        assert!(!token.expired());
    }

    #[test]
    fn test_from_response_keeps_previous_refresh_token() {
        let response: TokenResponse =
            serde_json::from_value(json!({"access_token": "new", "expires_in": 3600})).unwrap();
        let token = AccessToken::from_response(response, Some("old-refresh"));

        assert_eq!(token.token(), "new");
        assert_eq!(token.refresh_token(), Some("old-refresh"));
        assert!(!token.expired());
    }

    #[test]
    fn test_from_response_prefers_rotated_refresh_token() {
        let response: TokenResponse = serde_json::from_value(
            json!({"access_token": "new", "refresh_token": "rotated", "token_type": "bearer"}),
        )
        .unwrap();
        let token = AccessToken::from_response(response, Some("old-refresh"));

        assert_eq!(token.refresh_token(), Some("rotated"));
    }

    #[test]
    fn test_from_response_with_out_of_range_expiry_does_not_expire() {
        for expires_in in [i64::MAX, i64::MAX / 1000] {
            let response: TokenResponse =
                serde_json::from_value(json!({"access_token": "x", "expires_in": expires_in}))
                    .unwrap();
            let token = AccessToken::from_response(response, None);

            assert!(token.expires_at().is_none());
            assert!(!token.expired());
        }
    }

    #[test]
    fn test_debug_masks_tokens() {
        let token = AccessToken::new("secret-access").with_refresh_token("secret-refresh");
        let debug_str = format!("{token:?}");
        assert!(!debug_str.contains("secret-access"));
        assert!(!debug_str.contains("secret-refresh"));
    }
}
