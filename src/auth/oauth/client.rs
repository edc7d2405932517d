//! OAuth2 authorization URL generation and token requests.
//!
//! [`OAuthClient`] carries the credentials of a registered Asana application
//! and knows how to:
//!
//! 1. Build the URL a user visits to authorize the application
//! 2. Exchange the resulting authorization code for an [`AccessToken`]
//! 3. Exchange a refresh token for a fresh [`AccessToken`]
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::{ClientSecret, OAuthClient};
//!
//! let oauth = OAuthClient::new(
//!     "client-id",
//!     ClientSecret::new("client-secret")?,
//!     "https://myapp.example.com/callback",
//! );
//!
//! // Redirect the user to oauth.authorize_url(), then:
//! let token = oauth.token_from_auth_code(&code).await?;
//! ```

use serde::Serialize;

use super::access_token::{AccessToken, TokenResponse};
use super::error::OAuthError;
use crate::config::ClientSecret;

/// The site hosting the OAuth2 endpoints.
pub const DEFAULT_OAUTH_SITE: &str = "https://app.asana.com";

const AUTHORIZE_PATH: &str = "/-/oauth_authorize";
const TOKEN_PATH: &str = "/-/oauth_token";

const AUTHORIZATION_CODE_GRANT_TYPE: &str = "authorization_code";
const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";

/// Form body for token requests.
#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    client_id: &'a str,
    client_secret: &'a str,
    redirect_uri: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
}

/// Credentials of a registered Asana OAuth2 application.
#[derive(Clone, Debug)]
pub struct OAuthClient {
    client_id: String,
    client_secret: ClientSecret,
    redirect_uri: String,
    site: String,
    http: reqwest::Client,
}

impl OAuthClient {
    /// Redirect URI for applications that cannot receive HTTP callbacks.
    pub const OUT_OF_BAND_REDIRECT_URI: &'static str = "urn:ietf:wg:oauth:2.0:oob";

    /// Creates a client for the production OAuth2 endpoints.
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: ClientSecret,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            redirect_uri: redirect_uri.into(),
            site: DEFAULT_OAUTH_SITE.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Points the client at a different OAuth2 site (proxies, test servers).
    #[must_use]
    pub fn with_site(mut self, site: impl Into<String>) -> Self {
        self.site = site.into().trim_end_matches('/').to_string();
        self
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the redirect URI.
    #[must_use]
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Returns the URL a user must visit to authorize the application.
    ///
    /// # Example
    ///
    /// ```rust
    /// use asana_api::{ClientSecret, OAuthClient};
    ///
    /// let oauth = OAuthClient::new(
    ///     "123",
    ///     ClientSecret::new("secret").unwrap(),
    ///     OAuthClient::OUT_OF_BAND_REDIRECT_URI,
    /// );
    ///
    /// let url = oauth.authorize_url();
    /// assert!(url.starts_with("https://app.asana.com/-/oauth_authorize?"));
    /// assert!(url.contains("response_type=code"));
    /// ```
    #[must_use]
    pub fn authorize_url(&self) -> String {
        let params = [
            ("client_id", self.client_id.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("response_type", "code"),
        ];
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");

        format!("{}{AUTHORIZE_PATH}?{query}", self.site)
    }

    /// Exchanges an authorization code for an access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenRequestFailed`] if the token endpoint
    /// rejects the code, or [`OAuthError::Network`] if it cannot be reached.
    pub async fn token_from_auth_code(&self, code: &str) -> Result<AccessToken, OAuthError> {
        let request = TokenRequest {
            grant_type: AUTHORIZATION_CODE_GRANT_TYPE,
            client_id: &self.client_id,
            client_secret: self.client_secret.as_ref(),
            redirect_uri: &self.redirect_uri,
            code: Some(code),
            refresh_token: None,
        };
        self.request_token(&request, None).await
    }

    /// Exchanges a refresh token for a fresh access token.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::TokenRequestFailed`] if the token endpoint
    /// rejects the refresh token, or [`OAuthError::Network`] if it cannot be
    /// reached.
    pub async fn token_from_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<AccessToken, OAuthError> {
        let request = TokenRequest {
            grant_type: REFRESH_TOKEN_GRANT_TYPE,
            client_id: &self.client_id,
            client_secret: self.client_secret.as_ref(),
            redirect_uri: &self.redirect_uri,
            code: None,
            refresh_token: Some(refresh_token),
        };
        self.request_token(&request, Some(refresh_token)).await
    }

    async fn request_token(
        &self,
        request: &TokenRequest<'_>,
        previous_refresh: Option<&str>,
    ) -> Result<AccessToken, OAuthError> {
        let token_url = format!("{}{TOKEN_PATH}", self.site);
        tracing::debug!(grant_type = request.grant_type, "requesting OAuth2 token");

        let response = self.http.post(&token_url).form(request).send().await?;
        let status = response.status().as_u16();

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(OAuthError::TokenRequestFailed {
                status,
                message: error_body,
            });
        }

        let token_response: TokenResponse =
            response
                .json()
                .await
                .map_err(|e| OAuthError::TokenRequestFailed {
                    status,
                    message: format!("Failed to parse token response: {e}"),
                })?;

        Ok(AccessToken::from_response(token_response, previous_refresh))
    }
}
