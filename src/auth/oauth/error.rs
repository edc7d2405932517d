//! OAuth-specific error types for the Asana API SDK.
//!
//! # Example
//!
//! ```rust
//! use asana_api::auth::oauth::OAuthError;
//!
//! let error = OAuthError::TokenRequestFailed {
//!     status: 401,
//!     message: "invalid_client".to_string(),
//! };
//! assert!(error.to_string().contains("401"));
//! ```

use thiserror::Error;

/// Errors that can occur while obtaining or refreshing OAuth2 tokens.
///
/// # Thread Safety
///
/// `OAuthError` is `Send + Sync`, making it safe to use across async boundaries.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The token endpoint answered with a non-success status, or with a
    /// body that is not a token response.
    #[error("Token request failed with status {status}: {message}")]
    TokenRequestFailed {
        /// The HTTP status code returned.
        status: u16,
        /// The error message from the response.
        message: String,
    },

    /// The access token expired and carries no refresh token.
    #[error("Access token expired and no refresh token is available")]
    MissingRefreshToken,

    /// The token endpoint could not be reached.
    #[error("Network error during token request: {0}")]
    Network(#[from] reqwest::Error),
}

// Verify OAuthError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
};
