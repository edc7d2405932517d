//! HTTP-specific error types for the Asana API SDK.
//!
//! This module contains the API error taxonomy (one variant per documented
//! HTTP status), timeout exhaustion, and request validation failures.
//!
//! # Error Handling
//!
//! - [`ApiError`]: Non-2xx HTTP responses from the API, mapped by status
//! - [`InvalidHttpRequestError`]: A request failed validation before sending
//! - [`HttpError`]: Unified error type encompassing all HTTP-related errors
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::{ApiError, HttpError};
//!
//! match client.get("/users/me", &[], &IoOptions::new()).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Api(ApiError::RateLimitEnforced { retry_after_seconds, .. })) => {
//!         println!("Throttled, retry after {retry_after_seconds:?}s");
//!     }
//!     Err(HttpError::Timeout { attempts, .. }) => {
//!         println!("Gave up after {attempts} attempts");
//!     }
//!     Err(e) => println!("Error: {e}"),
//! }
//! ```

use thiserror::Error;

use crate::auth::OAuthError;
use crate::clients::http_response::HttpResponse;

#[allow(clippy::ref_option)]
fn retry_message(retry_after_seconds: &Option<u64>) -> String {
    retry_after_seconds.map_or_else(
        || "Retry your request later.".to_string(),
        |secs| format!("Retry your request after {secs} seconds."),
    )
}

#[allow(clippy::ref_option)]
fn phrase_message(phrase: &Option<String>) -> String {
    format!(
        "There has been an error on Asana's end. Use this unique phrase to identify the problem when contacting support: \"{}\"",
        phrase.as_deref().unwrap_or_default()
    )
}

/// An error response from the Asana API.
///
/// Every variant carries the raw [`HttpResponse`] for diagnostics.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400: the request was malformed or missing parameters.
    #[error("{}", .errors.join(", "))]
    InvalidRequest {
        /// The server-reported error messages.
        errors: Vec<String>,
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 401: credentials were missing or invalid.
    #[error("Valid credentials were not provided with the request, so the API could not associate a user with the request.")]
    NotAuthorized {
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 402: the endpoint requires a premium account.
    #[error("The endpoint that is being requested is only available to premium users.")]
    PremiumOnly {
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 403: the user may not access the object or perform the action.
    #[error("The authorization and request syntax was valid but the server is refusing to complete the request. This can happen if you try to read or write to objects or properties that the user does not have access to.")]
    Forbidden {
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 404: unknown route or object.
    #[error("Either the request method and path supplied do not specify a known action in the API, or the object specified by the request does not exist.")]
    NotFound {
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 412: a sync token is invalid or expired.
    ///
    /// Event streams recover from this status; anywhere else it is an error.
    #[error("The sync token is invalid or expired.")]
    PreconditionFailed {
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 429: the API is throttling this client.
    #[error("{}", retry_message(.retry_after_seconds))]
    RateLimitEnforced {
        /// Seconds to wait before retrying, from the `Retry-After` header.
        retry_after_seconds: Option<u64>,
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// 500: an error on Asana's side.
    #[error("{}", phrase_message(.phrase))]
    ServerError {
        /// Unique phrase identifying the failure for support.
        phrase: Option<String>,
        /// The raw response.
        response: Box<HttpResponse>,
    },

    /// Any other non-2xx status.
    #[error("An unknown API error occurred (status {status}).")]
    Other {
        /// The HTTP status code.
        status: u16,
        /// The raw response.
        response: Box<HttpResponse>,
    },
}

impl ApiError {
    /// Maps a non-2xx response to its error variant.
    #[must_use]
    pub fn from_response(response: HttpResponse) -> Self {
        let status = response.status;
        let response = Box::new(response);
        match status {
            400 => {
                let errors = response
                    .body
                    .get("errors")
                    .and_then(serde_json::Value::as_array)
                    .map(|errors| {
                        errors
                            .iter()
                            .filter_map(|e| e.get("message").and_then(serde_json::Value::as_str))
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default();
                Self::InvalidRequest { errors, response }
            }
            401 => Self::NotAuthorized { response },
            402 => Self::PremiumOnly { response },
            403 => Self::Forbidden { response },
            404 => Self::NotFound { response },
            412 => Self::PreconditionFailed { response },
            429 => Self::RateLimitEnforced {
                retry_after_seconds: response.retry_after(),
                response,
            },
            500 => {
                let phrase = response
                    .body
                    .get("errors")
                    .and_then(|errors| errors.get(0))
                    .and_then(|error| error.get("phrase"))
                    .and_then(serde_json::Value::as_str)
                    .map(String::from);
                Self::ServerError { phrase, response }
            }
            status => Self::Other { status, response },
        }
    }

    /// The raw response behind this error.
    #[must_use]
    pub fn response(&self) -> &HttpResponse {
        match self {
            Self::InvalidRequest { response, .. }
            | Self::NotAuthorized { response }
            | Self::PremiumOnly { response }
            | Self::Forbidden { response }
            | Self::NotFound { response }
            | Self::PreconditionFailed { response }
            | Self::RateLimitEnforced { response, .. }
            | Self::ServerError { response, .. }
            | Self::Other { response, .. } => response,
        }
    }

    /// The HTTP status code of the response.
    #[must_use]
    pub fn status(&self) -> u16 {
        self.response().status
    }
}

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use asana_api::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MissingBody {
///     method: "post".to_string(),
/// };
///
/// assert_eq!(error.to_string(), "Cannot use post without specifying data.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was made without a body or upload.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },

    /// A file upload was attached to a request that is not a POST.
    #[error("Cannot upload a file with {method}; uploads require post.")]
    UploadNotAllowed {
        /// The HTTP method that was used.
        method: String,
    },

    /// The body is not a JSON object, so it cannot be sent as multipart fields.
    #[error("Upload requests need an object body, got: {body}")]
    NonObjectUploadBody {
        /// The offending body.
        body: String,
    },
}

/// Unified error type for all HTTP-related errors.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The API answered with a non-2xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Every attempt timed out.
    #[error("Request timed out after {attempts} attempts")]
    Timeout {
        /// The number of attempts made.
        attempts: u32,
        /// The last timeout error.
        #[source]
        source: reqwest::Error,
    },

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Authentication could not be applied (token refresh failed).
    #[error(transparent)]
    Auth(#[from] OAuthError),
}

impl HttpError {
    /// Returns the API error, if this is one.
    #[must_use]
    pub const fn as_api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ApiError>();
    assert_send_sync::<HttpError>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn response(status: u16, body: serde_json::Value) -> HttpResponse {
        HttpResponse::new(status, HashMap::new(), body)
    }

    #[test]
    fn test_invalid_request_collects_messages() {
        let error = ApiError::from_response(response(
            400,
            json!({"errors": [{"message": "missing name"}, {"message": "bad workspace"}]}),
        ));

        match &error {
            ApiError::InvalidRequest { errors, .. } => {
                assert_eq!(errors, &vec!["missing name", "bad workspace"]);
            }
            other => panic!("unexpected variant {other:?}"),
        }
        assert_eq!(error.to_string(), "missing name, bad workspace");
        assert_eq!(error.status(), 400);
    }

    #[test]
    fn test_server_error_extracts_phrase() {
        let error = ApiError::from_response(response(
            500,
            json!({"errors": [{"message": "Server Error", "phrase": "6 sad squid snuggle softly"}]}),
        ));

        assert!(matches!(
            &error,
            ApiError::ServerError { phrase: Some(p), .. } if p == "6 sad squid snuggle softly"
        ));
        assert!(error.to_string().contains("6 sad squid snuggle softly"));
    }

    #[test]
    fn test_rate_limit_reads_retry_after_header() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["20".to_string()]);
        let error = ApiError::from_response(HttpResponse::new(429, headers, json!({})));

        assert!(matches!(
            error,
            ApiError::RateLimitEnforced {
                retry_after_seconds: Some(20),
                ..
            }
        ));
        assert_eq!(error.to_string(), "Retry your request after 20 seconds.");
    }

    #[test]
    fn test_unknown_status_maps_to_other() {
        let error = ApiError::from_response(response(418, json!({})));
        assert!(matches!(error, ApiError::Other { status: 418, .. }));
    }

    #[test]
    fn test_invalid_request_error_missing_body() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "put".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use put without specifying data.");
    }

    #[test]
    fn test_error_types_implement_std_error() {
        let api_error: &dyn std::error::Error = &ApiError::from_response(response(404, json!({})));
        let _ = api_error;

        let invalid_error: &dyn std::error::Error = &InvalidHttpRequestError::MissingBody {
            method: "post".to_string(),
        };
        let _ = invalid_error;
    }
}
