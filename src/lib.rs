//! # Asana API Rust SDK
//!
//! A Rust SDK for the Asana REST API, providing type-safe configuration,
//! authentication handling, an async HTTP transport and a dynamic
//! resource layer with lazy pagination and event streaming.
//!
//! ## Overview
//!
//! This SDK provides:
//! - Type-safe configuration via [`ClientConfig`] and [`ClientConfigBuilder`]
//! - Validated newtypes for credentials and the API base URL
//! - Personal access token, bearer and refreshable OAuth 2 authentication
//!   via [`Authentication`] and [`auth::oauth`]
//! - An async HTTP transport with timeout retries, status-mapped errors and
//!   `Asana-Change` deprecation warnings
//! - Lazily wrapped [`Resource`]s, lazily paginated [`Collection`]s and
//!   endless [`EventStream`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use asana_api::{ApiToken, Authentication, Client, ClientConfig};
//!
//! let config = ClientConfig::builder()
//!     .authentication(Authentication::api_token(ApiToken::new("0/a1b2c3").unwrap()))
//!     .log_asana_change_warnings(false)
//!     .build()
//!     .unwrap();
//!
//! let client = Client::new(&config);
//! assert_eq!(client.tasks().kind().name(), "Task");
//! ```
//!
//! ## Working With Resources
//!
//! ```rust,ignore
//! use asana_api::{Client, IoOptions};
//! use serde_json::json;
//!
//! let client = Client::from_env()?;
//! let options = IoOptions::new().fields(["name", "assignee.name"]);
//!
//! let task = client.tasks().find_by_id("1234", &options).await?;
//! println!("{}", task.field("name")?);
//!
//! let task = task.update(json!({"completed": true}), &IoOptions::new()).await?;
//!
//! let tasks = client.tasks().find_all(&[("project", "5678")], &options).await?;
//! let mut iter = tasks.iter();
//! while let Some(task) = iter.next().await? {
//!     println!("{task}");
//! }
//! ```
//!
//! ## OAuth 2
//!
//! ```rust,ignore
//! use asana_api::{Authentication, ClientSecret, OAuthClient};
//!
//! let oauth = OAuthClient::new(
//!     "client-id",
//!     ClientSecret::new("client-secret")?,
//!     OAuthClient::OUT_OF_BAND_REDIRECT_URI,
//! );
//! println!("Visit {}", oauth.authorize_url());
//!
//! let token = oauth.token_from_auth_code("code-from-user").await?;
//! let authentication = Authentication::oauth2(token, oauth);
//! ```
//!
//! ## Events
//!
//! ```rust,ignore
//! let mut events = client.events("1234");
//! loop {
//!     let event = events.next().await?;
//!     println!("{:?} {:?}", event.action(), event.resource().and_then(|r| r.gid()));
//! }
//! ```
//!
//! ## Design Principles
//!
//! - **No global mutable state**: the resource registry is a static,
//!   read-only table; configuration is passed explicitly
//! - **Fail-fast validation**: all newtypes validate on construction
//! - **Thread-safe**: all types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime
//! - **Immutable resources**: `refresh` and `update` return new instances

pub mod auth;
mod client;
pub mod clients;
pub mod config;
pub mod error;
pub mod rest;

pub use client::Client;

// Re-export configuration types at crate root for convenience
pub use config::{
    ApiToken, BaseUrl, BearerToken, ClientConfig, ClientConfigBuilder, ClientSecret, RequestHook,
};
pub use error::ConfigError;

// Re-export authentication types
pub use auth::{
    AccessToken, Authentication, OAuthClient, OAuthError, OAuthGrant, OAuthSettings,
    RefreshableToken,
};

// Re-export HTTP client types
pub use clients::{
    ApiError, AsanaChange, HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder,
    HttpResponse, InvalidHttpRequestError, IoOptions, OptionValue, Upload,
};

// Re-export resource types
pub use rest::{
    AttachmentUploading, Collection, Event, EventStream, EventSubscription, Field, Resource,
    ResourceError, ResourceKind, ResourceProxy,
};
