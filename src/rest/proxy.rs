//! Kind-scoped query operations.
//!
//! A [`ResourceProxy`] binds a [`ResourceKind`] to the shared transport and
//! exposes the operations that address the kind as a whole: fetching by
//! id, listing, and creating. Operations the kind does not support fail
//! with [`ResourceError::Unsupported`] before any request is made.
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::{Client, IoOptions};
//! use serde_json::json;
//!
//! let tasks = client.tasks();
//! let task = tasks
//!     .create(json!({"workspace": "42", "name": "Write docs"}), &IoOptions::new())
//!     .await?;
//! let in_project = tasks
//!     .find_by_parent(&registry::PROJECT, "1234", &[], &IoOptions::new())
//!     .await?;
//! ```

use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpClient, IoOptions};
use crate::rest::registry::{ResourceKind, ResourceOperation};
use crate::rest::{Collection, Envelope, Resource, ResourceError};

/// Page size requested by list operations unless the caller passes `limit`.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Query operations for one resource kind.
#[derive(Clone, Debug)]
pub struct ResourceProxy {
    kind: &'static ResourceKind,
    client: Arc<HttpClient>,
}

impl ResourceProxy {
    /// Creates a proxy for `kind` over `client`.
    #[must_use]
    pub const fn new(kind: &'static ResourceKind, client: Arc<HttpClient>) -> Self {
        Self { kind, client }
    }

    /// The kind this proxy queries.
    #[must_use]
    pub const fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    /// The transport requests go through.
    #[must_use]
    pub const fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    /// Fetches one object, `GET /{plural}/{gid}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`], the request's error, or
    /// [`ResourceError::UnexpectedBody`].
    pub async fn find_by_id(&self, gid: &str, options: &IoOptions) -> Result<Resource, ResourceError> {
        self.kind.require(ResourceOperation::FindById)?;
        let response = self
            .client
            .get(&self.kind.instance_path(gid), &[], options)
            .await?;
        self.wrap_one(Envelope::from_response(response)?)
    }

    /// Lists objects, `GET /{plural}` with `params` as query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`], the request's error, or
    /// [`ResourceError::UnexpectedBody`].
    pub async fn find_all(
        &self,
        params: &[(&str, &str)],
        options: &IoOptions,
    ) -> Result<Collection, ResourceError> {
        self.kind.require(ResourceOperation::FindAll)?;
        self.list(&self.kind.base_path(), params, options).await
    }

    /// Lists the objects of this kind under a parent,
    /// `GET /{parent plural}/{parent gid}/{plural}`.
    ///
    /// # Errors
    ///
    /// Returns the request's error or [`ResourceError::UnexpectedBody`].
    pub async fn find_by_parent(
        &self,
        parent: &ResourceKind,
        parent_gid: &str,
        params: &[(&str, &str)],
        options: &IoOptions,
    ) -> Result<Collection, ResourceError> {
        let path = format!("{}/{}", parent.instance_path(parent_gid), self.kind.plural());
        self.list(&path, params, options).await
    }

    /// Creates an object, `POST /{plural}`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`], the request's error, or
    /// [`ResourceError::UnexpectedBody`].
    pub async fn create(&self, data: Value, options: &IoOptions) -> Result<Resource, ResourceError> {
        self.kind.require(ResourceOperation::Create)?;
        let response = self
            .client
            .post(&self.kind.base_path(), data, options)
            .await?;
        self.wrap_one(Envelope::from_response(response)?)
    }

    /// Creates an object under a parent,
    /// `POST /{parent plural}/{parent gid}/{plural}`.
    ///
    /// # Errors
    ///
    /// Returns the request's error or [`ResourceError::UnexpectedBody`].
    pub async fn create_in(
        &self,
        parent: &ResourceKind,
        parent_gid: &str,
        data: Value,
        options: &IoOptions,
    ) -> Result<Resource, ResourceError> {
        let path = format!("{}/{}", parent.instance_path(parent_gid), self.kind.plural());
        let response = self.client.post(&path, data, options).await?;
        self.wrap_one(Envelope::from_response(response)?)
    }

    async fn list(
        &self,
        path: &str,
        params: &[(&str, &str)],
        options: &IoOptions,
    ) -> Result<Collection, ResourceError> {
        let page_size = DEFAULT_PAGE_SIZE.to_string();
        let mut query = params.to_vec();
        if !query.iter().any(|(key, _)| *key == "limit") {
            query.push(("limit", &page_size));
        }
        let response = self.client.get(path, &query, options).await?;
        Collection::from_response(response, self.kind, Arc::clone(&self.client))
    }

    fn wrap_one(&self, envelope: Envelope) -> Result<Resource, ResourceError> {
        Resource::from_value(self.kind, envelope.into_data(), Arc::clone(&self.client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::config::{ApiToken, BaseUrl, ClientConfig};
    use crate::rest::registry;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn proxy(kind: &'static ResourceKind, server: &MockServer) -> ResourceProxy {
        let config = ClientConfig::builder()
            .authentication(Authentication::api_token(ApiToken::new("token").unwrap()))
            .base_url(BaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap();
        ResourceProxy::new(kind, Arc::new(HttpClient::new(&config)))
    }

    #[tokio::test]
    async fn test_find_all_sends_default_page_size() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .and(query_param("workspace", "9"))
            .and(query_param("limit", "20"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"gid": "1"}]})))
            .expect(1)
            .mount(&server)
            .await;

        let tags = proxy(&registry::TAG, &server)
            .find_all(&[("workspace", "9")], &IoOptions::new())
            .await
            .unwrap();
        assert_eq!(tags.elements().len(), 1);
    }

    #[tokio::test]
    async fn test_caller_limit_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tags"))
            .and(query_param("limit", "5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
            .expect(1)
            .mount(&server)
            .await;

        let tags = proxy(&registry::TAG, &server)
            .find_all(&[("limit", "5")], &IoOptions::new())
            .await
            .unwrap();
        assert!(tags.elements().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_parent_and_create_in_use_nested_paths() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/projects/7/tasks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"gid": "1"}, {"gid": "2"}]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/workspaces/3/tasks"))
            .and(body_json(json!({"data": {"name": "X"}})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"data": {"gid": "5", "name": "X"}})))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = proxy(&registry::TASK, &server);
        let listed = tasks
            .find_by_parent(&registry::PROJECT, "7", &[], &IoOptions::new())
            .await
            .unwrap();
        assert_eq!(listed.elements().len(), 2);

        let created = tasks
            .create_in(&registry::WORKSPACE, "3", json!({"name": "X"}), &IoOptions::new())
            .await
            .unwrap();
        assert_eq!(created.gid(), Some("5"));
        assert_eq!(created.kind().name(), "Task");
    }

    #[tokio::test]
    async fn test_unsupported_operation_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let error = proxy(&registry::USER, &server)
            .create(json!({"name": "X"}), &IoOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ResourceError::Unsupported {
                kind: "User",
                operation: "create"
            }
        ));
    }

    #[tokio::test]
    async fn test_body_without_data_is_unexpected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/tasks/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"gid": "1"})))
            .mount(&server)
            .await;

        let error = proxy(&registry::TASK, &server)
            .find_by_id("1", &IoOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(error, ResourceError::UnexpectedBody { .. }));
    }
}
