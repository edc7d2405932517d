//! The entry point of the SDK.
//!
//! [`Client`] owns the shared transport and hands out one
//! [`ResourceProxy`] per resource kind, event streams, and raw request
//! methods for endpoints without a resource model.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::clients::{HttpClient, HttpError, HttpResponse, IoOptions};
use crate::config::{ClientConfig, ClientConfigBuilder};
use crate::error::ConfigError;
use crate::rest::registry::{self, ResourceKind};
use crate::rest::{EventStream, ResourceProxy, DEFAULT_WAIT};

/// An Asana API client.
///
/// Cloning is cheap: clones share the transport.
///
/// # Example
///
/// ```rust,ignore
/// use asana_api::{ApiToken, Authentication, Client, ClientConfig, IoOptions};
/// use serde_json::json;
///
/// let config = ClientConfig::builder()
///     .authentication(Authentication::api_token(ApiToken::new("0/a1b2c3")?))
///     .build()?;
/// let client = Client::new(&config);
///
/// let me = client.users().find_by_id("me", &IoOptions::new()).await?;
/// let workspaces = client.workspaces().find_all(&[], &IoOptions::new()).await?;
/// let task = client
///     .tasks()
///     .create(json!({"workspace": "42", "name": "Hello"}), &IoOptions::new())
///     .await?;
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    http: Arc<HttpClient>,
}

impl Client {
    /// Creates a client from a configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Arc::new(HttpClient::new(config)),
        }
    }

    /// Creates a client from `ASANA_ACCESS_TOKEN` or `ASANA_API_TOKEN`, and
    /// optionally `ASANA_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if no credential is set or a value is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = ClientConfigBuilder::from_env()?.build()?;
        Ok(Self::new(&config))
    }

    /// The shared transport.
    #[must_use]
    pub const fn http_client(&self) -> &Arc<HttpClient> {
        &self.http
    }

    /// Performs a raw GET, for endpoints without a resource model.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        self.http.get(path, params, options).await
    }

    /// Performs a raw POST.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        path: &str,
        body: Value,
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        self.http.post(path, body, options).await
    }

    /// Performs a raw PUT.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(
        &self,
        path: &str,
        body: Value,
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        self.http.put(path, body, options).await
    }

    /// Performs a raw DELETE.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str, options: &IoOptions) -> Result<HttpResponse, HttpError> {
        self.http.delete(path, options).await
    }

    /// A proxy for the kind registered under a collection name
    /// (e.g., `"tasks"`). Unknown names yield the generic kind, which
    /// supports no operations.
    #[must_use]
    pub fn resources(&self, plural: &str) -> ResourceProxy {
        self.proxy(registry::lookup_many(plural))
    }

    /// Attachments.
    #[must_use]
    pub fn attachments(&self) -> ResourceProxy {
        self.proxy(&registry::ATTACHMENT)
    }

    /// Custom fields.
    #[must_use]
    pub fn custom_fields(&self) -> ResourceProxy {
        self.proxy(&registry::CUSTOM_FIELD)
    }

    /// Goals.
    #[must_use]
    pub fn goals(&self) -> ResourceProxy {
        self.proxy(&registry::GOAL)
    }

    /// Portfolios.
    #[must_use]
    pub fn portfolios(&self) -> ResourceProxy {
        self.proxy(&registry::PORTFOLIO)
    }

    /// Projects.
    #[must_use]
    pub fn projects(&self) -> ResourceProxy {
        self.proxy(&registry::PROJECT)
    }

    /// Sections.
    #[must_use]
    pub fn sections(&self) -> ResourceProxy {
        self.proxy(&registry::SECTION)
    }

    /// Stories (comments and activity).
    #[must_use]
    pub fn stories(&self) -> ResourceProxy {
        self.proxy(&registry::STORY)
    }

    /// Tags.
    #[must_use]
    pub fn tags(&self) -> ResourceProxy {
        self.proxy(&registry::TAG)
    }

    /// Tasks.
    #[must_use]
    pub fn tasks(&self) -> ResourceProxy {
        self.proxy(&registry::TASK)
    }

    /// Teams.
    #[must_use]
    pub fn teams(&self) -> ResourceProxy {
        self.proxy(&registry::TEAM)
    }

    /// Users.
    #[must_use]
    pub fn users(&self) -> ResourceProxy {
        self.proxy(&registry::USER)
    }

    /// Webhooks.
    #[must_use]
    pub fn webhooks(&self) -> ResourceProxy {
        self.proxy(&registry::WEBHOOK)
    }

    /// Workspaces.
    #[must_use]
    pub fn workspaces(&self) -> ResourceProxy {
        self.proxy(&registry::WORKSPACE)
    }

    /// Streams the events of any resource, polling at most once a second.
    #[must_use]
    pub fn events(&self, resource_id: &str) -> EventStream {
        self.events_with(resource_id, DEFAULT_WAIT, IoOptions::new())
    }

    /// Streams the events of any resource with an explicit poll interval
    /// and request options.
    #[must_use]
    pub fn events_with(&self, resource_id: &str, wait: Duration, options: IoOptions) -> EventStream {
        EventStream::new(Arc::clone(&self.http), resource_id, wait, options)
    }

    fn proxy(&self, kind: &'static ResourceKind) -> ResourceProxy {
        ResourceProxy::new(kind, Arc::clone(&self.http))
    }
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::config::ApiToken;

    fn client() -> Client {
        let config = ClientConfig::builder()
            .authentication(Authentication::api_token(ApiToken::new("token").unwrap()))
            .build()
            .unwrap();
        Client::new(&config)
    }

    #[test]
    fn test_accessors_bind_their_kind() {
        let client = client();
        assert_eq!(client.tasks().kind().name(), "Task");
        assert_eq!(client.custom_fields().kind().plural(), "custom_fields");
        assert_eq!(client.stories().kind().base_path(), "/stories");
    }

    #[test]
    fn test_resources_by_name() {
        let client = client();
        assert_eq!(client.resources("webhooks").kind().name(), "Webhook");
        assert_eq!(client.resources("widgets").kind().name(), "Resource");
    }

    #[test]
    fn test_clones_share_the_transport() {
        let client = client();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.http_client(), clone.http_client()));
        assert!(Arc::ptr_eq(
            client.tasks().client(),
            client.http_client()
        ));
    }
}
