//! Resource-specific error types for Asana resource operations.
//!
//! [`ResourceError`] wraps the transport's [`HttpError`] and adds the
//! failures that only make sense at the resource layer: reading a property
//! the object does not have, an envelope without `data`, and operations a
//! resource type does not support.
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::rest::ResourceError;
//!
//! match task.field("nonexistent") {
//!     Ok(field) => println!("{field}"),
//!     Err(ResourceError::UnknownProperty { kind, name }) => {
//!         println!("{kind} has no {name}");
//!     }
//!     Err(e) => println!("Other error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::clients::{ApiError, HttpError, InvalidHttpRequestError};

/// Error type for resource operations.
///
/// # Example
///
/// ```rust
/// use asana_api::rest::ResourceError;
///
/// let error = ResourceError::UnknownProperty {
///     kind: "Task",
///     name: "color".to_string(),
/// };
/// assert_eq!(error.to_string(), "Task has no property `color`");
///
/// let error = ResourceError::UnexpectedBody {
///     body: "{}".to_string(),
/// };
/// assert_eq!(error.to_string(), "Unexpected response body: {}");
/// ```
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The resource's data has no field with this name.
    #[error("{kind} has no property `{name}`")]
    UnknownProperty {
        /// The resource type name (e.g., "Task").
        kind: &'static str,
        /// The requested property.
        name: String,
    },

    /// The response body was not a `{"data": ...}` envelope of the expected shape.
    #[error("Unexpected response body: {body}")]
    UnexpectedBody {
        /// The body as received.
        body: String,
    },

    /// An instance operation was attempted on a resource without a `gid`.
    #[error("Cannot {operation} a {kind} without a gid")]
    MissingId {
        /// The resource type name.
        kind: &'static str,
        /// The operation being attempted (e.g., "refresh", "delete").
        operation: &'static str,
    },

    /// The resource type does not support the operation.
    #[error("{kind} does not support {operation}")]
    Unsupported {
        /// The resource type name.
        kind: &'static str,
        /// The operation being attempted.
        operation: &'static str,
    },

    /// An HTTP-level error occurred.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Returns the API error behind this failure, if any.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Http(error) => error.as_api_error(),
            _ => None,
        }
    }
}

impl From<ApiError> for ResourceError {
    fn from(error: ApiError) -> Self {
        Self::Http(HttpError::Api(error))
    }
}

impl From<InvalidHttpRequestError> for ResourceError {
    fn from(error: InvalidHttpRequestError) -> Self {
        Self::Http(HttpError::InvalidRequest(error))
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
