//! OAuth2 support for Asana applications.
//!
//! - [`OAuthClient`]: authorization URL and token endpoint calls
//! - [`AccessToken`]: an access token with optional refresh token and expiry
//! - [`OAuthError`]: failures while talking to the token endpoint
//! - [`OAuthSettings`]: loose OAuth2 keys validated into an [`OAuthGrant`]

mod access_token;
mod client;
mod error;
mod settings;

pub use access_token::AccessToken;
pub use client::{OAuthClient, DEFAULT_OAUTH_SITE};
pub use error::OAuthError;
pub use settings::{OAuthGrant, OAuthSettings};
