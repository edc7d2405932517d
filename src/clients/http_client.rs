//! HTTP client for Asana API communication.
//!
//! This module provides the [`HttpClient`] type for making authenticated
//! requests to the Asana API.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use serde_json::json;

use crate::auth::Authentication;
use crate::clients::errors::{ApiError, HttpError};
use crate::clients::http_request::{HttpMethod, HttpRequest, IoOptions, Upload};
use crate::clients::http_response::{AsanaChange, HttpResponse};
use crate::config::{BaseUrl, ClientConfig, RequestHook};

/// How many times a timed out request is retried before giving up.
pub const MAX_TIMEOUT_RETRIES: u32 = 5;

/// SDK version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

const RUST_VERSION: &str = env!("CARGO_PKG_RUST_VERSION");

/// HTTP client for making requests to the Asana API.
///
/// The client handles:
/// - Authentication of every request (including OAuth2 token refresh)
/// - Default headers including User-Agent and `X-Asana-Client-Lib`
/// - `data` envelope wrapping of request bodies and `opt_` I/O options
/// - Transparent retry of timed out requests
/// - Mapping of error statuses to [`ApiError`]
/// - `Asana-Change` deprecation warnings
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use asana_api::{ClientConfig, HttpClient, IoOptions};
///
/// let client = HttpClient::new(&config);
/// let me = client.get("/users/me", &[], &IoOptions::new()).await?;
/// println!("{}", me.body["data"]["name"]);
/// ```
pub struct HttpClient {
    client: reqwest::Client,
    authentication: Authentication,
    base_url: BaseUrl,
    default_headers: HashMap<String, String>,
    debug_mode: bool,
    log_asana_change_warnings: bool,
    timeout: Option<Duration>,
    configure_request: Option<RequestHook>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new HTTP client from a configuration.
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        let user_agent = config.user_agent().map_or_else(
            || format!("Asana Rust Library v{SDK_VERSION} | Rust {RUST_VERSION}"),
            String::from,
        );

        let mut default_headers = HashMap::new();
        default_headers.insert("user-agent".to_string(), user_agent);
        default_headers.insert("accept".to_string(), "application/json".to_string());
        default_headers.insert("x-asana-client-lib".to_string(), client_lib_header());
        merge_headers(&mut default_headers, config.default_headers());

        Self {
            client: config.http_client().cloned().unwrap_or_default(),
            authentication: config.authentication().clone(),
            base_url: config.base_url().clone(),
            default_headers,
            debug_mode: config.debug_mode(),
            log_asana_change_warnings: config.log_asana_change_warnings(),
            timeout: config.timeout(),
            configure_request: config.configure_request().cloned(),
        }
    }

    /// Returns the API base URL.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers for this client, keyed by lower-cased name.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the authentication strategy.
    #[must_use]
    pub const fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    /// Performs a GET request.
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
        let mut builder = HttpRequest::builder(HttpMethod::Get, path).options(options.clone());
        for (key, value) in params {
            builder = builder.query_param(*key, *value);
        }
        self.request(builder.build()?).await
    }

    /// Performs a POST request with `body` wrapped as `{"data": body}`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post(
        &self,
        path: &str,
        body: serde_json::Value,
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Post, path)
            .body(body)
            .options(options.clone())
            .build()?;
        self.request(request).await
    }

    /// Performs a multipart POST carrying `upload` as the `file` part and
    /// each top-level field of `body` as a text part.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn post_upload(
        &self,
        path: &str,
        body: Option<serde_json::Value>,
        upload: Upload,
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Post, path)
            .upload(upload)
            .options(options.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }
        self.request(builder.build()?).await
    }

    /// Performs a PUT request with `body` wrapped as `{"data": body}`.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
        options: &IoOptions,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(body)
            .options(options.clone())
            .build()?;
        self.request(request).await
    }

    /// Performs a DELETE request.
    ///
    /// # Errors
    ///
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str, options: &IoOptions) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Delete, path)
            .options(options.clone())
            .build()?;
        self.request(request).await
    }

    /// Sends an HTTP request to the Asana API.
    ///
    /// This method handles:
    /// - Request validation
    /// - URL, header and query construction
    /// - Authentication
    /// - Retry of timed out attempts (up to [`MAX_TIMEOUT_RETRIES`] retries)
    /// - Response parsing and error mapping
    /// - `Asana-Change` warning logging
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Authentication cannot be applied (`Auth`)
    /// - Every attempt timed out (`Timeout`)
    /// - Any other network error occurs (`Network`)
    /// - A non-2xx response is received (`Api`), except a 412 when
    ///   [`HttpRequest::accept_precondition_failed`] is set
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = self.base_url.join(&request.path);

        let headers = self.request_headers(&request);

        let mut query = request.query.clone();
        query.extend(request.options.to_query());

        let body = request.body.as_ref().map(|body| json!({ "data": body }));

        if self.debug_mode {
            let shown = body
                .as_ref()
                .map_or_else(|| format!("{query:?}"), ToString::to_string);
            tracing::info!(
                "{} {} ({})",
                request.http_method.to_string().to_uppercase(),
                url,
                shown
            );
        }

        let mut timeouts: u32 = 0;
        let response = loop {
            match self
                .send_once(&request, &url, &headers, &query, body.as_ref())
                .await
            {
                Ok(response) => break response,
                Err(HttpError::Network(error)) if error.is_timeout() => {
                    if timeouts >= MAX_TIMEOUT_RETRIES {
                        return Err(HttpError::Timeout {
                            attempts: timeouts + 1,
                            source: error,
                        });
                    }
                    timeouts += 1;
                    tracing::debug!(retry = timeouts, "request to {} timed out, retrying", url);
                }
                Err(error) => return Err(error),
            }
        };

        if self.log_asana_change_warnings {
            for change in unacknowledged_changes(&headers, &response) {
                tracing::warn!(
                    "This request is affected by the \"{}\" deprecation. Please visit this url for more info: {}",
                    change.name,
                    change.info.as_deref().unwrap_or_default()
                );
                tracing::warn!(
                    "Adding \"{}\" to your \"Asana-Enable\" or \"Asana-Disable\" header will opt in/out to this deprecation and suppress this warning.",
                    change.name
                );
            }
        }

        if response.is_ok() {
            return Ok(response);
        }
        if response.status == 412 && request.accept_precondition_failed {
            tracing::debug!("recovering sync token from 412 response to {}", url);
            return Ok(response);
        }

        Err(ApiError::from_response(response).into())
    }

    /// Performs a single attempt.
    /// Default headers overlaid with the request's own, keyed by lower-cased
    /// name so a per-call header replaces a default one regardless of case.
    fn request_headers(&self, request: &HttpRequest) -> HashMap<String, String> {
        let mut headers = self.default_headers.clone();
        merge_headers(&mut headers, request.options.headers());
        merge_headers(&mut headers, &request.extra_headers);
        headers
    }

    async fn send_once(
        &self,
        request: &HttpRequest,
        url: &str,
        headers: &HashMap<String, String>,
        query: &HashMap<String, String>,
        body: Option<&serde_json::Value>,
    ) -> Result<HttpResponse, HttpError> {
        let mut req_builder = match request.http_method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Delete => self.client.delete(url),
        };

        for (key, value) in headers {
            req_builder = req_builder.header(key, value);
        }

        if !query.is_empty() {
            req_builder = req_builder.query(query);
        }

        if let Some(upload) = &request.upload {
            req_builder = req_builder.multipart(Self::multipart_form(upload, request.body.as_ref())?);
        } else if let Some(body) = body {
            req_builder = req_builder.json(body);
        }

        if let Some(timeout) = self.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        req_builder = self.authentication.configure(req_builder).await?;

        if let Some(hook) = &self.configure_request {
            req_builder = hook(req_builder);
        }

        let res = req_builder.send().await?;

        let status = res.status().as_u16();
        let res_headers = Self::parse_response_headers(res.headers());
        let body_text = res.text().await?;

        let body = if body_text.is_empty() {
            json!({})
        } else {
            serde_json::from_str(&body_text).unwrap_or_else(|_| {
                // Keep non-JSON 5xx bodies (proxy error pages) for diagnostics
                if status >= 500 {
                    json!({ "raw_body": body_text })
                } else {
                    json!({})
                }
            })
        };

        Ok(HttpResponse::new(status, res_headers, body))
    }

    /// Builds the multipart form for an upload.
    fn multipart_form(
        upload: &Upload,
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::multipart::Form, HttpError> {
        let part = reqwest::multipart::Part::bytes(upload.content.clone())
            .file_name(upload.filename.clone())
            .mime_str(&upload.mime)?;

        let mut form = reqwest::multipart::Form::new().part("file", part);
        if let Some(serde_json::Value::Object(fields)) = body {
            for (key, value) in fields {
                let text = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(key.clone(), text);
            }
        }
        Ok(form)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("authentication", &self.authentication)
            .field("default_headers", &self.default_headers)
            .field("debug_mode", &self.debug_mode)
            .field("log_asana_change_warnings", &self.log_asana_change_warnings)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

/// The `X-Asana-Client-Lib` header value describing this library.
fn client_lib_header() -> String {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        os @ ("windows" | "linux" | "freebsd") => os,
        _ => "unknown",
    };
    format!("os={os}&language=rust&language_version={RUST_VERSION}&version={SDK_VERSION}")
}

/// Changes that affect the request and that the caller has not opted in or
/// out of through `Asana-Enable` / `Asana-Disable`.
fn merge_headers<'a>(
    headers: &mut HashMap<String, String>,
    overrides: impl IntoIterator<Item = (&'a String, &'a String)>,
) {
    for (key, value) in overrides {
        headers.insert(key.to_ascii_lowercase(), value.clone());
    }
}

pub(crate) fn unacknowledged_changes(
    request_headers: &HashMap<String, String>,
    response: &HttpResponse,
) -> Vec<AsanaChange> {
    let accounted_for: Vec<&str> = request_headers
        .iter()
        .filter(|(key, _)| {
            key.eq_ignore_ascii_case("asana-enable") || key.eq_ignore_ascii_case("asana-disable")
        })
        .flat_map(|(_, value)| value.split(','))
        .map(str::trim)
        .collect();

    response
        .asana_changes()
        .into_iter()
        .filter(|change| change.affected && !accounted_for.contains(&change.name.as_str()))
        .collect()
}
