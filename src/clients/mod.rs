//! HTTP transport for Asana API communication.
//!
//! This module provides the foundational HTTP layer for making
//! authenticated requests to the Asana API. It handles request/response
//! processing, timeout retries, error mapping and `Asana-Change` header
//! parsing.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async HTTP client for API communication
//! - [`HttpRequest`]: A request to be sent to the API
//! - [`HttpResponse`]: A parsed response from the API
//! - [`HttpMethod`]: Supported HTTP methods (GET, POST, PUT, DELETE)
//! - [`IoOptions`]: `opt_*` request modifiers and per-call headers
//! - [`ApiError`]: Status-mapped API failures
//!
//! # Retry Behavior
//!
//! Only timeouts are retried: a timed out attempt is re-sent immediately, up
//! to [`MAX_TIMEOUT_RETRIES`] times. API errors (including 429 and 500) are
//! returned to the caller right away.

mod errors;
mod http_client;
mod http_request;
mod http_response;

pub use errors::{ApiError, HttpError, InvalidHttpRequestError};
pub use http_client::{HttpClient, MAX_TIMEOUT_RETRIES, SDK_VERSION};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder, IoOptions, OptionValue, Upload};
pub use http_response::{AsanaChange, HttpResponse};
