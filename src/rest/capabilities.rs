//! Capabilities only some resource kinds have.
//!
//! [`EventSubscription`] and [`AttachmentUploading`] are implemented for
//! [`Resource`] and check the resource's kind before doing anything: a
//! resource whose kind lacks the capability gets
//! [`ResourceError::Unsupported`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::clients::{IoOptions, Upload};
use crate::rest::registry;
use crate::rest::{Envelope, EventStream, Resource, ResourceError};

/// Streaming the events of a resource.
pub trait EventSubscription {
    /// Returns a stream of this resource's events, polling at most once per
    /// `wait`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if the kind has no events, or
    /// [`ResourceError::MissingId`] without a `gid`.
    fn events(&self, wait: Duration, options: IoOptions) -> Result<EventStream, ResourceError>;
}

/// Uploading files to a resource.
pub trait AttachmentUploading {
    /// Uploads `upload` as an attachment, `POST /{plural}/{gid}/attachments`,
    /// sending each top-level field of `data` alongside the file.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if the kind takes no
    /// attachments, [`ResourceError::MissingId`] without a `gid`, or the
    /// request's error.
    fn attach(
        &self,
        upload: Upload,
        data: Option<Value>,
        options: &IoOptions,
    ) -> impl Future<Output = Result<Resource, ResourceError>> + Send;
}

impl EventSubscription for Resource {
    fn events(&self, wait: Duration, options: IoOptions) -> Result<EventStream, ResourceError> {
        if !self.kind().has_events() {
            return Err(ResourceError::Unsupported {
                kind: self.kind().name(),
                operation: "events",
            });
        }
        let gid = self.require_gid("stream events of")?;
        Ok(EventStream::new(Arc::clone(self.client()), gid, wait, options))
    }
}

impl AttachmentUploading for Resource {
    async fn attach(
        &self,
        upload: Upload,
        data: Option<Value>,
        options: &IoOptions,
    ) -> Result<Resource, ResourceError> {
        if !self.kind().has_attachments() {
            return Err(ResourceError::Unsupported {
                kind: self.kind().name(),
                operation: "attach",
            });
        }
        let path = format!(
            "{}/{}",
            self.kind().instance_path(self.require_gid("attach to")?),
            registry::ATTACHMENT.plural()
        );
        tracing::debug!(path = %path, filename = %upload.filename, "Uploading attachment");

        let response = self.client().post_upload(&path, data, upload, options).await?;
        let attachment = match Envelope::from_response(response)?.into_data() {
            Value::Array(items) => items.into_iter().next().ok_or_else(|| ResourceError::UnexpectedBody {
                body: "[]".to_string(),
            })?,
            other => other,
        };
        Resource::from_value(&registry::ATTACHMENT, attachment, Arc::clone(self.client()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::clients::HttpClient;
    use crate::config::{ApiToken, BaseUrl, ClientConfig};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_regex, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> Arc<HttpClient> {
        let config = ClientConfig::builder()
            .authentication(Authentication::api_token(ApiToken::new("token").unwrap()))
            .base_url(BaseUrl::new(server.uri()).unwrap())
            .build()
            .unwrap();
        Arc::new(HttpClient::new(&config))
    }

    #[tokio::test]
    async fn test_attach_posts_multipart_to_task() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/tasks/1/attachments"))
            .and(header_regex("content-type", "^multipart/form-data"))
            .and(body_string_contains("filename=\"notes.txt\""))
            .and(body_string_contains("hello attachment"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {"gid": "99", "name": "notes.txt", "resource_type": "attachment"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let task = Resource::from_value(&registry::TASK, json!({"gid": "1"}), client(&server)).unwrap();
        let upload = Upload::new("notes.txt", "text/plain", b"hello attachment".to_vec());
        let attachment = task.attach(upload, None, &IoOptions::new()).await.unwrap();

        assert_eq!(attachment.kind().name(), "Attachment");
        assert_eq!(attachment.gid(), Some("99"));
    }

    #[tokio::test]
    async fn test_capabilities_are_refused_for_other_kinds() {
        let server = MockServer::start().await;
        let project =
            Resource::from_value(&registry::PROJECT, json!({"gid": "1"}), client(&server)).unwrap();

        let error = project
            .attach(Upload::new("a", "text/plain", vec![]), None, &IoOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            ResourceError::Unsupported {
                kind: "Project",
                operation: "attach"
            }
        ));

        let error = project.events(Duration::from_secs(1), IoOptions::new()).unwrap_err();
        assert!(matches!(error, ResourceError::Unsupported { operation: "events", .. }));
    }

    #[tokio::test]
    async fn test_events_stream_targets_resource_gid() {
        let server = MockServer::start().await;
        let task = Resource::from_value(&registry::TASK, json!({"gid": "7"}), client(&server)).unwrap();

        let stream = task.events(Duration::from_millis(10), IoOptions::new()).unwrap();
        assert_eq!(stream.resource_id(), "7");
    }
}
