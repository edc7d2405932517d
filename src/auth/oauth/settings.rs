//! Key-based OAuth2 configuration.
//!
//! [`OAuthSettings`] collects the loose OAuth2 keys an application usually
//! reads from its own configuration file and validates them into an
//! [`OAuthGrant`].

use super::client::OAuthClient;
use super::error::OAuthError;
use crate::auth::Authentication;
use crate::config::{BearerToken, ClientSecret};
use crate::error::ConfigError;

/// Loose OAuth2 keys, validated by [`OAuthSettings::build`].
///
/// Either `refresh_token` (together with `client_id`, `client_secret` and
/// `redirect_uri`) or `bearer_token` must be set. A refresh token wins when
/// both are present.
///
/// # Example
///
/// ```rust
/// use asana_api::{ConfigError, OAuthSettings};
///
/// let result = OAuthSettings::new()
///     .refresh_token("r1")
///     .client_id("id")
///     .build();
///
/// assert!(matches!(result, Err(ConfigError::InvalidOAuthConfig { .. })));
/// ```
#[derive(Clone, Default)]
pub struct OAuthSettings {
    refresh_token: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    redirect_uri: Option<String>,
    bearer_token: Option<String>,
    site: Option<String>,
}

impl OAuthSettings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn refresh_token(mut self, value: impl Into<String>) -> Self {
        self.refresh_token = Some(value.into());
        self
    }

    /// Sets the OAuth2 client id.
    #[must_use]
    pub fn client_id(mut self, value: impl Into<String>) -> Self {
        self.client_id = Some(value.into());
        self
    }

    /// Sets the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(mut self, value: impl Into<String>) -> Self {
        self.client_secret = Some(value.into());
        self
    }

    /// Sets the redirect URI registered for the application.
    #[must_use]
    pub fn redirect_uri(mut self, value: impl Into<String>) -> Self {
        self.redirect_uri = Some(value.into());
        self
    }

    /// Sets a plain bearer token, used when no refresh token is given.
    #[must_use]
    pub fn bearer_token(mut self, value: impl Into<String>) -> Self {
        self.bearer_token = Some(value.into());
        self
    }

    /// Overrides the OAuth2 site the token endpoint lives on.
    #[must_use]
    pub fn site(mut self, value: impl Into<String>) -> Self {
        self.site = Some(value.into());
        self
    }

    /// Validates the keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOAuthConfig`] naming the missing keys
    /// when a refresh token is given without its client keys, or when
    /// neither a refresh token nor a bearer token is set. Returns
    /// [`ConfigError::EmptyCredential`] for an empty secret or bearer token.
    pub fn build(self) -> Result<OAuthGrant, ConfigError> {
        if let Some(refresh_token) = self.refresh_token {
            let missing: Vec<&str> = [
                ("client_id", self.client_id.is_none()),
                ("client_secret", self.client_secret.is_none()),
                ("redirect_uri", self.redirect_uri.is_none()),
            ]
            .into_iter()
            .filter_map(|(key, absent)| absent.then_some(key))
            .collect();

            let (Some(client_id), Some(client_secret), Some(redirect_uri)) =
                (self.client_id, self.client_secret, self.redirect_uri)
            else {
                return Err(ConfigError::InvalidOAuthConfig {
                    reason: format!("Missing keys: {}", missing.join(", ")),
                });
            };

            let mut client =
                OAuthClient::new(client_id, ClientSecret::new(client_secret)?, redirect_uri);
            if let Some(site) = self.site {
                client = client.with_site(site);
            }
            return Ok(OAuthGrant::RefreshToken {
                refresh_token,
                client,
            });
        }

        match self.bearer_token {
            Some(token) => Ok(OAuthGrant::Bearer(BearerToken::new(token)?)),
            None => Err(ConfigError::InvalidOAuthConfig {
                reason: "pass either a refresh_token or a bearer_token".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for OAuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = |value: &Option<String>| value.as_ref().map(|_| "*****");
        f.debug_struct("OAuthSettings")
            .field("refresh_token", &masked(&self.refresh_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &masked(&self.client_secret))
            .field("redirect_uri", &self.redirect_uri)
            .field("bearer_token", &masked(&self.bearer_token))
            .field("site", &self.site)
            .finish()
    }
}

/// A validated OAuth2 configuration.
#[derive(Clone)]
pub enum OAuthGrant {
    /// Exchange a refresh token for an access token, refreshing as needed.
    RefreshToken {
        /// The refresh token to exchange.
        refresh_token: String,
        /// The client used for the exchange and later refreshes.
        client: OAuthClient,
    },
    /// Use a plain bearer token as is.
    Bearer(BearerToken),
}

impl std::fmt::Debug for OAuthGrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RefreshToken { client, .. } => f
                .debug_struct("RefreshToken")
                .field("refresh_token", &"*****")
                .field("client", client)
                .finish(),
            Self::Bearer(token) => f.debug_tuple("Bearer").field(token).finish(),
        }
    }
}

impl OAuthGrant {
    /// Turns the grant into an authentication strategy.
    ///
    /// A refresh-token grant performs the exchange immediately.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError`] if the token endpoint rejects the refresh token
    /// or cannot be reached.
    pub async fn authenticate(self) -> Result<Authentication, OAuthError> {
        match self {
            Self::RefreshToken {
                refresh_token,
                client,
            } => Authentication::from_refresh_token(&refresh_token, client).await,
            Self::Bearer(token) => Ok(Authentication::bearer(token)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> OAuthSettings {
        OAuthSettings::new()
            .refresh_token("r1")
            .client_id("id")
            .client_secret("secret")
            .redirect_uri(OAuthClient::OUT_OF_BAND_REDIRECT_URI)
    }

    #[test]
    fn test_complete_refresh_settings_build_a_refresh_grant() {
        match complete().build().unwrap() {
            OAuthGrant::RefreshToken {
                refresh_token,
                client,
            } => {
                assert_eq!(refresh_token, "r1");
                assert_eq!(client.client_id(), "id");
                assert_eq!(client.redirect_uri(), OAuthClient::OUT_OF_BAND_REDIRECT_URI);
            }
            other => panic!("unexpected grant {other:?}"),
        }
    }

    #[test]
    fn test_missing_keys_are_listed() {
        let error = OAuthSettings::new()
            .refresh_token("r1")
            .client_secret("secret")
            .build()
            .unwrap_err();

        assert_eq!(
            error,
            ConfigError::InvalidOAuthConfig {
                reason: "Missing keys: client_id, redirect_uri".to_string()
            }
        );
    }

    #[test]
    fn test_bearer_token_is_used_without_refresh_token() {
        let grant = OAuthSettings::new().bearer_token("b").build().unwrap();
        assert!(matches!(grant, OAuthGrant::Bearer(_)));
    }

    #[test]
    fn test_refresh_token_wins_over_bearer_token() {
        let grant = complete().bearer_token("b").build().unwrap();
        assert!(matches!(grant, OAuthGrant::RefreshToken { .. }));
    }

    #[test]
    fn test_neither_token_is_rejected() {
        let error = OAuthSettings::new().client_id("id").build().unwrap_err();
        assert!(matches!(error, ConfigError::InvalidOAuthConfig { .. }));
        assert!(error.to_string().contains("refresh_token or a bearer_token"));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let error = complete().client_secret("").build().unwrap_err();
        assert!(matches!(error, ConfigError::EmptyCredential { .. }));
    }

    #[test]
    fn test_debug_masks_secrets() {
        let settings = complete()
            .refresh_token("refresh-value")
            .client_secret("secret-value")
            .bearer_token("bearer-value");
        let debug_str = format!("{settings:?}");
        assert!(!debug_str.contains("refresh-value"));
        assert!(!debug_str.contains("secret-value"));
        assert!(!debug_str.contains("bearer-value"));
    }

    #[tokio::test]
    async fn test_bearer_grant_authenticates_without_network() {
        let auth = OAuthSettings::new()
            .bearer_token("b")
            .build()
            .unwrap()
            .authenticate()
            .await
            .unwrap();
        assert!(matches!(auth, Authentication::Bearer(_)));
    }
}
