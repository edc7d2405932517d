//! HTTP request types for the Asana API SDK.
//!
//! This module provides the [`HttpRequest`] type and its builder, plus
//! [`IoOptions`] (the `opt_*` request modifiers) and [`Upload`] (a file
//! attached as multipart).

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::clients::errors::InvalidHttpRequestError;

/// HTTP methods supported by the Asana API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for updating resources.
    Put,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// The value of a single I/O option.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OptionValue {
    /// A scalar value.
    Single(String),
    /// A list, sent comma-joined.
    List(Vec<String>),
}

impl OptionValue {
    fn to_param(&self) -> String {
        match self {
            Self::Single(value) => value.clone(),
            Self::List(values) => values.join(","),
        }
    }
}

/// Request I/O options: response shaping such as `fields` or `pretty`.
///
/// Each option is sent as an `opt_<name>` query parameter; list values are
/// comma-joined. Headers set here travel with the request and are used to
/// opt in or out of API changes (`Asana-Enable` / `Asana-Disable`).
///
/// # Example
///
/// ```rust
/// use asana_api::IoOptions;
///
/// let options = IoOptions::new().fields(["name", "assignee.name"]).pretty(true);
///
/// let query = options.to_query();
/// assert_eq!(query.get("opt_fields").map(String::as_str), Some("name,assignee.name"));
/// assert_eq!(query.get("opt_pretty").map(String::as_str), Some("true"));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IoOptions {
    values: BTreeMap<String, OptionValue>,
    headers: HashMap<String, String>,
}

impl IoOptions {
    /// Creates an empty set of options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a scalar option.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values
            .insert(name.into(), OptionValue::Single(value.into()));
        self
    }

    /// Sets a list option.
    #[must_use]
    pub fn set_list<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values.insert(
            name.into(),
            OptionValue::List(values.into_iter().map(Into::into).collect()),
        );
        self
    }

    /// Selects the fields returned for each object (`opt_fields`).
    #[must_use]
    pub fn fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_list("fields", fields)
    }

    /// Requests pretty-printed JSON (`opt_pretty`).
    #[must_use]
    pub fn pretty(self, pretty: bool) -> Self {
        self.set("pretty", pretty.to_string())
    }

    /// Adds a header to send with the request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Returns the headers to send with the request.
    #[must_use]
    pub const fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Returns the value of an option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Returns `true` if no options and no headers are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.headers.is_empty()
    }

    /// Renders the options as `opt_`-prefixed query parameters.
    #[must_use]
    pub fn to_query(&self) -> HashMap<String, String> {
        self.values
            .iter()
            .map(|(name, value)| (format!("opt_{name}"), value.to_param()))
            .collect()
    }
}

/// A file to upload as the `file` part of a multipart POST.
#[derive(Clone, PartialEq, Eq)]
pub struct Upload {
    /// The file name reported to the server.
    pub filename: String,
    /// The MIME type of the content.
    pub mime: String,
    /// The file content.
    pub content: Vec<u8>,
}

impl Upload {
    /// Creates an upload from in-memory content.
    #[must_use]
    pub fn new(filename: impl Into<String>, mime: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            content,
        }
    }

    /// Reads an upload from a file on disk, named after the file.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the file cannot be read.
    pub async fn from_path(
        path: impl AsRef<std::path::Path>,
        mime: impl Into<String>,
    ) -> std::io::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(filename, mime, content))
    }
}

impl fmt::Debug for Upload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Upload")
            .field("filename", &self.filename)
            .field("mime", &self.mime)
            .field("content_len", &self.content.len())
            .finish()
    }
}

/// An HTTP request to be sent to the Asana API.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
/// Bodies are given unwrapped; the transport sends them as `{"data": body}`.
///
/// # Example
///
/// ```rust
/// use asana_api::clients::{HttpMethod, HttpRequest};
/// use serde_json::json;
///
/// let get_request = HttpRequest::builder(HttpMethod::Get, "/tasks")
///     .query_param("project", "1234")
///     .build()
///     .unwrap();
///
/// let post_request = HttpRequest::builder(HttpMethod::Post, "/tasks")
///     .body(json!({"name": "Buy milk", "workspace": "42"}))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The path relative to the API base URL, e.g. `/users/me`.
    pub path: String,
    /// The request body, if any, before `data` wrapping.
    pub body: Option<serde_json::Value>,
    /// Query parameters to append to the URL.
    pub query: HashMap<String, String>,
    /// I/O options.
    pub options: IoOptions,
    /// Additional headers to include in the request.
    pub extra_headers: HashMap<String, String>,
    /// A file to send as multipart.
    pub upload: Option<Upload>,
    /// Treat a 412 response as a successful one.
    pub accept_precondition_failed: bool,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, path: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, path)
    }

    /// Validates the request, ensuring it meets all requirements.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - `http_method` is `Post` or `Put` but there is neither body nor upload
    /// - an upload is attached to a method other than `Post`
    /// - an upload carries a body that is not a JSON object
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if self.upload.is_some() {
            if self.http_method != HttpMethod::Post {
                return Err(InvalidHttpRequestError::UploadNotAllowed {
                    method: self.http_method.to_string(),
                });
            }
            if let Some(body) = self.body.as_ref().filter(|body| !body.is_object()) {
                return Err(InvalidHttpRequestError::NonObjectUploadBody {
                    body: body.to_string(),
                });
            }
            return Ok(());
        }

        if matches!(self.http_method, HttpMethod::Post | HttpMethod::Put) && self.body.is_none() {
            return Err(InvalidHttpRequestError::MissingBody {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                path: path.into(),
                body: None,
                query: HashMap::new(),
                options: IoOptions::default(),
                extra_headers: HashMap::new(),
                upload: None,
                accept_precondition_failed: false,
            },
        }
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: impl Into<serde_json::Value>) -> Self {
        self.request.body = Some(body.into());
        self
    }

    /// Sets all query parameters at once.
    #[must_use]
    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.request.query = query;
        self
    }

    /// Adds a single query parameter.
    #[must_use]
    pub fn query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.query.insert(key.into(), value.into());
        self
    }

    /// Sets the I/O options.
    #[must_use]
    pub fn options(mut self, options: IoOptions) -> Self {
        self.request.options = options;
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Attaches a file, turning the request into a multipart POST.
    #[must_use]
    pub fn upload(mut self, upload: Upload) -> Self {
        self.request.upload = Some(upload);
        self
    }

    /// Accepts a 412 response as success.
    ///
    /// Event polling needs this: an expired or missing sync token yields a
    /// 412 whose body still carries a fresh `sync` token.
    #[must_use]
    pub const fn accept_precondition_failed(mut self, accept: bool) -> Self {
        self.request.accept_precondition_failed = accept;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        self.request.verify()?;
        Ok(self.request)
    }
}
