//! The `{"data": ..., ...}` envelope every Asana response is wrapped in.
//!
//! [`Envelope`] splits a response body into its `data` payload and the
//! remaining top-level members (such as `next_page` or `sync`). It
//! implements `Deref<Target = Value>` so the payload can be read directly.
//!
//! ```rust
//! use asana_api::rest::Envelope;
//! use serde_json::json;
//!
//! let envelope = Envelope::from_body(json!({
//!     "data": [{"gid": "1"}],
//!     "next_page": {"offset": "abc", "path": "/tasks?offset=abc"},
//! }))
//! .unwrap();
//!
//! assert_eq!(envelope[0]["gid"], "1");
//! assert_eq!(envelope.next_page_path(), Some("/tasks?offset=abc"));
//! ```

use std::ops::Deref;

use serde_json::{Map, Value};

use crate::clients::HttpResponse;
use crate::rest::ResourceError;

/// A response body split into its payload and extra members.
#[derive(Clone, Debug, PartialEq)]
pub struct Envelope {
    /// The `data` member.
    pub data: Value,
    /// Every other top-level member of the body.
    pub extra: Map<String, Value>,
}

impl Envelope {
    /// Splits a response body.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedBody`] if the body is not an object
    /// or has no `data` member.
    pub fn from_body(body: Value) -> Result<Self, ResourceError> {
        match body {
            Value::Object(mut extra) => match extra.remove("data") {
                Some(data) => Ok(Self { data, extra }),
                None => Err(ResourceError::UnexpectedBody {
                    body: Value::Object(extra).to_string(),
                }),
            },
            other => Err(ResourceError::UnexpectedBody {
                body: other.to_string(),
            }),
        }
    }

    /// Splits the body of an HTTP response.
    ///
    /// # Errors
    ///
    /// See [`Envelope::from_body`].
    pub fn from_response(response: HttpResponse) -> Result<Self, ResourceError> {
        Self::from_body(response.body)
    }

    /// The path of the next page (`next_page.path`), if there is one.
    #[must_use]
    pub fn next_page_path(&self) -> Option<&str> {
        self.extra
            .get("next_page")
            .and_then(|page| page.get("path"))
            .and_then(Value::as_str)
    }

    /// Consumes the envelope, returning the payload.
    #[must_use]
    pub fn into_data(self) -> Value {
        self.data
    }
}

impl Deref for Envelope {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_splits_data_from_extra() {
        let envelope = Envelope::from_body(json!({"data": {"gid": "1"}, "sync": "abc"})).unwrap();

        assert_eq!(envelope.data, json!({"gid": "1"}));
        assert_eq!(envelope.extra.get("sync"), Some(&json!("abc")));
        assert!(!envelope.extra.contains_key("data"));
    }

    #[test]
    fn test_missing_data_is_unexpected_body() {
        let error = Envelope::from_body(json!({"errors": []})).unwrap_err();
        assert_eq!(error.to_string(), "Unexpected response body: {\"errors\":[]}");
    }

    #[test]
    fn test_non_object_body_is_unexpected() {
        let error = Envelope::from_body(json!([1, 2])).unwrap_err();
        assert!(matches!(error, ResourceError::UnexpectedBody { .. }));
    }

    #[test]
    fn test_null_next_page_has_no_path() {
        let envelope = Envelope::from_body(json!({"data": [], "next_page": null})).unwrap();
        assert_eq!(envelope.next_page_path(), None);
    }
}
