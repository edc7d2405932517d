//! Streaming the events of a resource.
//!
//! Asana reports changes through `GET /events`, keyed by a `sync` cursor.
//! The first request carries no cursor and is answered with `412
//! Precondition Failed` plus a fresh cursor; every following request
//! returns the events since the previous cursor and a new one.
//!
//! [`EventStream`] hides that protocol behind an unbounded,
//! order-preserving sequence. Polls are spaced at least `wait` apart.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//!
//! let mut stream = client.events("1234");
//! loop {
//!     let event = stream.next().await?;
//!     if event.action() == Some("changed") {
//!         println!("{:?} changed", event.resource().and_then(|r| r.gid()));
//!     }
//! }
//! ```

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tokio::time::Instant;

use crate::clients::{HttpClient, HttpMethod, HttpRequest, IoOptions};
use crate::rest::registry;
use crate::rest::{Resource, ResourceError};

/// Minimum time between two polls unless the caller chooses otherwise.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(1);

/// One change event.
///
/// Derefs to the underlying [`Resource`] for fields without an accessor.
#[derive(Clone, Debug, PartialEq)]
pub struct Event {
    resource: Resource,
}

impl Event {
    /// Wraps an event object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedBody`] if `value` is not an object.
    pub fn from_value(value: Value, client: Arc<HttpClient>) -> Result<Self, ResourceError> {
        Resource::from_value(&registry::EVENT, value, client).map(|resource| Self { resource })
    }

    /// The user who caused the event.
    #[must_use]
    pub fn user(&self) -> Option<&Resource> {
        self.nested("user")
    }

    /// The object the event is about.
    #[must_use]
    pub fn resource(&self) -> Option<&Resource> {
        self.nested("resource")
    }

    /// The object the resource was added to or removed from, if any.
    #[must_use]
    pub fn parent(&self) -> Option<&Resource> {
        self.nested("parent")
    }

    /// The type of the resource (`type` field of older events).
    #[must_use]
    pub fn event_type(&self) -> Option<&str> {
        self.resource.get("type").and_then(|field| field.as_str())
    }

    /// What happened: `changed`, `added`, `removed`, `deleted` or `undeleted`.
    #[must_use]
    pub fn action(&self) -> Option<&str> {
        self.resource.get("action").and_then(|field| field.as_str())
    }

    /// When the event happened.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.resource
            .get("created_at")
            .and_then(|field| field.as_str())
            .and_then(|value| DateTime::parse_from_rfc3339(value).ok())
            .map(|time| time.with_timezone(&Utc))
    }

    /// Consumes the event, returning the underlying resource.
    #[must_use]
    pub fn into_resource(self) -> Resource {
        self.resource
    }

    fn nested(&self, name: &str) -> Option<&Resource> {
        self.resource.get(name).and_then(|field| field.as_resource())
    }
}

impl Deref for Event {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.resource
    }
}

/// An endless sequence of the events of one resource.
///
/// Each stream keeps its own buffer and cursor; streams do not share
/// state, so several can run on separate tasks over the same client.
#[derive(Debug)]
pub struct EventStream {
    client: Arc<HttpClient>,
    resource_id: String,
    wait: Duration,
    options: IoOptions,
    buffer: VecDeque<Event>,
    sync: Option<String>,
    last_poll: Option<Instant>,
}

impl EventStream {
    /// Creates a stream over the events of `resource_id`, polling at most
    /// once per `wait`.
    #[must_use]
    pub fn new(
        client: Arc<HttpClient>,
        resource_id: impl Into<String>,
        wait: Duration,
        options: IoOptions,
    ) -> Self {
        Self {
            client,
            resource_id: resource_id.into(),
            wait,
            options,
            buffer: VecDeque::new(),
            sync: None,
            last_poll: None,
        }
    }

    /// The id of the resource whose events are streamed.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// The current sync cursor, once the first poll has answered.
    #[must_use]
    pub fn sync_token(&self) -> Option<&str> {
        self.sync.as_deref()
    }

    /// The number of events fetched but not yet delivered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Runs one iteration: polls if the buffer is empty and the wait has
    /// elapsed, then delivers the oldest buffered event if there is one.
    ///
    /// # Errors
    ///
    /// Returns the poll's error. The stream stays usable; the next step polls
    /// again once the wait has elapsed. A batch containing a malformed event
    /// is dropped whole and the sync token is left unchanged, so the same
    /// batch is requested again.
    pub async fn step(&mut self) -> Result<Option<Event>, ResourceError> {
        if self.buffer.is_empty() && self.may_poll() {
            self.poll().await?;
        }
        Ok(self.buffer.pop_front())
    }

    /// Waits for the next event.
    ///
    /// Between polls that return nothing, the stream sleeps for the rest of
    /// the wait instead of spinning.
    ///
    /// # Errors
    ///
    /// Returns the first poll error.
    pub async fn next(&mut self) -> Result<Event, ResourceError> {
        loop {
            if let Some(event) = self.step().await? {
                return Ok(event);
            }
            if let Some(remaining) = self.until_next_poll() {
                tokio::time::sleep(remaining).await;
            }
        }
    }

    fn may_poll(&self) -> bool {
        self.last_poll
            .map_or(true, |last_poll| last_poll.elapsed() >= self.wait)
    }

    fn until_next_poll(&self) -> Option<Duration> {
        self.last_poll
            .and_then(|last_poll| self.wait.checked_sub(last_poll.elapsed()))
            .filter(|remaining| !remaining.is_zero())
    }

    async fn poll(&mut self) -> Result<(), ResourceError> {
        self.last_poll = Some(Instant::now());

        let mut builder = HttpRequest::builder(HttpMethod::Get, "/events")
            .query_param("resource", self.resource_id.as_str())
            .options(self.options.clone())
            .accept_precondition_failed(true);
        if let Some(sync) = &self.sync {
            builder = builder.query_param("sync", sync.as_str());
        }

        let response = self.client.request(builder.build()?).await?;
        tracing::debug!(
            resource = %self.resource_id,
            status = response.status,
            "Polled events"
        );

        // A batch is adopted whole or not at all, so the cursor never moves
        // past events that were not buffered.
        let events = response
            .body
            .get("data")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|event| Event::from_value(event, Arc::clone(&self.client)))
            .collect::<Result<Vec<_>, _>>()?;

        self.sync = response
            .body
            .get("sync")
            .and_then(Value::as_str)
            .map(String::from);
        self.buffer.extend(events);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::config::{ApiToken, ClientConfig};
    use serde_json::json;

    fn client() -> Arc<HttpClient> {
        let config = ClientConfig::builder()
            .authentication(Authentication::api_token(ApiToken::new("token").unwrap()))
            .build()
            .unwrap();
        Arc::new(HttpClient::new(&config))
    }

    #[test]
    fn test_event_accessors() {
        let event = Event::from_value(
            json!({
                "action": "changed",
                "type": "task",
                "created_at": "2024-03-01T12:30:00.000Z",
                "user": {"gid": "u1", "resource_type": "user"},
                "resource": {"gid": "t1", "resource_type": "task"},
                "parent": null,
            }),
            client(),
        )
        .unwrap();

        assert_eq!(event.action(), Some("changed"));
        assert_eq!(event.event_type(), Some("task"));
        assert_eq!(event.user().and_then(Resource::gid), Some("u1"));
        assert_eq!(event.resource().map(|r| r.kind().name()), Some("Task"));
        assert!(event.parent().is_none());
        assert_eq!(
            event.created_at().map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:30:00+00:00".to_string())
        );
        assert_eq!(event.kind().name(), "Event");
    }

    #[test]
    fn test_new_stream_is_empty() {
        let stream = EventStream::new(client(), "42", DEFAULT_WAIT, IoOptions::new());

        assert_eq!(stream.resource_id(), "42");
        assert_eq!(stream.sync_token(), None);
        assert_eq!(stream.buffered(), 0);
        assert!(stream.may_poll());
        assert!(stream.until_next_poll().is_none());
    }

    #[test]
    fn test_wait_window_after_poll() {
        let mut stream = EventStream::new(client(), "42", Duration::from_secs(60), IoOptions::new());
        stream.last_poll = Some(Instant::now());

        assert!(!stream.may_poll());
        assert!(stream.until_next_poll().is_some());
    }
}
