//! Authentication strategies for Asana API requests.
//!
//! Every outgoing request is passed through [`Authentication::configure`]
//! before it is sent. The strategies are:
//!
//! - [`Authentication::ApiToken`]: HTTP Basic with the token as username
//!   and an empty password
//! - [`Authentication::Bearer`]: a static `Authorization: Bearer` token
//!   (personal access tokens, externally obtained OAuth2 tokens)
//! - [`Authentication::OAuth2`]: an OAuth2 access token that is refreshed
//!   through the token endpoint once it expires
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::{Authentication, ClientSecret, OAuthClient};
//!
//! let oauth = OAuthClient::new("id", ClientSecret::new("secret")?, "https://app/cb");
//! let auth = Authentication::from_refresh_token("refresh-token", oauth).await?;
//! ```

pub mod oauth;

pub use oauth::{AccessToken, OAuthClient, OAuthError, OAuthGrant, OAuthSettings};

use std::sync::{Arc, PoisonError, RwLock};

use crate::config::{ApiToken, BearerToken};

/// How requests are authenticated.
#[derive(Clone, Debug)]
pub enum Authentication {
    /// HTTP Basic auth with an API token.
    ApiToken(ApiToken),
    /// A static bearer token. Never refreshed.
    Bearer(BearerToken),
    /// A refreshable OAuth2 access token.
    OAuth2(RefreshableToken),
}

impl Authentication {
    /// Authenticates with an API token (HTTP Basic).
    #[must_use]
    pub const fn api_token(token: ApiToken) -> Self {
        Self::ApiToken(token)
    }

    /// Authenticates with a static bearer token.
    #[must_use]
    pub const fn bearer(token: BearerToken) -> Self {
        Self::Bearer(token)
    }

    /// Authenticates with an OAuth2 access token, refreshing it through
    /// `client` whenever it has expired.
    #[must_use]
    pub fn oauth2(token: AccessToken, client: OAuthClient) -> Self {
        Self::OAuth2(RefreshableToken::new(token, client))
    }

    /// Builds an OAuth2 strategy from a bare refresh token by refreshing it
    /// immediately.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError`] if the token endpoint rejects the refresh token
    /// or cannot be reached.
    pub async fn from_refresh_token(
        refresh_token: &str,
        client: OAuthClient,
    ) -> Result<Self, OAuthError> {
        let token = client.token_from_refresh_token(refresh_token).await?;
        Ok(Self::oauth2(token, client))
    }

    /// Applies the credentials to an outgoing request.
    ///
    /// For [`Authentication::OAuth2`] this may first perform a token refresh.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError`] if a required refresh fails.
    pub async fn configure(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, OAuthError> {
        match self {
            Self::ApiToken(token) => Ok(builder.basic_auth(token.as_ref(), Some(""))),
            Self::Bearer(token) => Ok(builder.bearer_auth(token.as_ref())),
            Self::OAuth2(refreshable) => {
                let token = refreshable.current_token().await?;
                Ok(builder.bearer_auth(token.token()))
            }
        }
    }
}

/// An OAuth2 access token that refreshes itself when expired.
///
/// Clones share the same token store. Two concurrent requests that both see
/// an expired token may both refresh; the last refresh wins.
#[derive(Clone, Debug)]
pub struct RefreshableToken {
    client: OAuthClient,
    token: Arc<RwLock<AccessToken>>,
}

impl RefreshableToken {
    /// Wraps a token and the client used to refresh it.
    #[must_use]
    pub fn new(token: AccessToken, client: OAuthClient) -> Self {
        Self {
            client,
            token: Arc::new(RwLock::new(token)),
        }
    }

    /// Returns a snapshot of the current token without refreshing it.
    #[must_use]
    pub fn token(&self) -> AccessToken {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns a usable token, refreshing the stored one first if expired.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::MissingRefreshToken`] if the token expired and
    /// cannot be refreshed, or the refresh request's error.
    pub async fn current_token(&self) -> Result<AccessToken, OAuthError> {
        let token = self.token();
        if !token.expired() {
            return Ok(token);
        }

        let refresh_token = token
            .refresh_token()
            .ok_or(OAuthError::MissingRefreshToken)?;
        tracing::debug!("OAuth2 access token expired, refreshing");
        let fresh = self.client.token_from_refresh_token(refresh_token).await?;

        *self.token.write().unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        Ok(fresh)
    }
}
