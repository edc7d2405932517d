//! HTTP response types for the Asana API SDK.
//!
//! This module provides the [`HttpResponse`] type and the parsed form of the
//! `Asana-Change` deprecation header, [`AsanaChange`].

use std::collections::HashMap;

/// One record of the `Asana-Change` response header.
///
/// The header announces API changes that affect the request. Its value is a
/// comma-separated list of records, each a `;`-separated list of `key=value`
/// fields:
///
/// ```text
/// name=new_sections;info=https://asana.com/developers/...;affected=true
/// ```
///
/// # Example
///
/// ```rust
/// use asana_api::AsanaChange;
///
/// let changes = AsanaChange::parse_header(
///     "name=string_ids;info=https://asana.com/d;affected=true,name=other;info=x",
/// );
/// assert_eq!(changes.len(), 2);
/// assert!(changes[0].affected);
/// assert!(!changes[1].affected);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsanaChange {
    /// The change (feature flag) name.
    pub name: String,
    /// A URL with more information about the change.
    pub info: Option<String>,
    /// Whether this particular request is affected by the change.
    pub affected: bool,
}

impl AsanaChange {
    /// Parses an `Asana-Change` header value.
    ///
    /// Fields without `=` are skipped, as are records without a `name`.
    #[must_use]
    pub fn parse_header(header_value: &str) -> Vec<Self> {
        header_value
            .split(',')
            .filter_map(|record| {
                let mut name = None;
                let mut info = None;
                let mut affected = false;

                for field in record.split(';') {
                    let Some((key, value)) = field.split_once('=') else {
                        continue;
                    };
                    match key.trim() {
                        "name" => name = Some(value.trim().to_string()),
                        "info" => info = Some(value.trim().to_string()),
                        "affected" => affected = value.trim() == "true",
                        _ => {}
                    }
                }

                name.map(|name| Self {
                    name,
                    info,
                    affected,
                })
            })
            .collect()
    }
}

/// An HTTP response from the Asana API.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keyed by lower-cased name (headers may repeat).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed response body.
    pub body: serde_json::Value,
}

impl HttpResponse {
    /// Creates a new `HttpResponse`.
    ///
    /// Header names are expected to be lower-cased already; lookups through
    /// [`HttpResponse::header`] are case-insensitive.
    #[must_use]
    pub const fn new(
        status: u16,
        headers: HashMap<String, Vec<String>>,
        body: serde_json::Value,
    ) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns `true` if the response status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status <= 299
    }

    /// Returns the first value of a header, looked up case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Seconds to wait before retrying, from the `Retry-After` header.
    #[must_use]
    pub fn retry_after(&self) -> Option<u64> {
        self.header("retry-after")
            .and_then(|value| value.trim().parse().ok())
    }

    /// All records announced through `Asana-Change` headers.
    #[must_use]
    pub fn asana_changes(&self) -> Vec<AsanaChange> {
        self.headers
            .get("asana-change")
            .map(|values| {
                values
                    .iter()
                    .flat_map(|value| AsanaChange::parse_header(value))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for status in 200..=299 {
            let response = HttpResponse::new(status, HashMap::new(), json!({}));
            assert!(
                response.is_ok(),
                "Expected is_ok() to be true for status {status}"
            );
        }
    }

    #[test]
    fn test_is_ok_returns_false_for_4xx_and_5xx() {
        for status in [400, 404, 412, 429, 500] {
            let response = HttpResponse::new(status, HashMap::new(), json!({}));
            assert!(!response.is_ok());
        }
    }

    #[test]
    fn test_retry_after_parsing() {
        let mut headers = HashMap::new();
        headers.insert("retry-after".to_string(), vec!["20".to_string()]);

        let response = HttpResponse::new(429, headers, json!({}));
        assert_eq!(response.retry_after(), Some(20));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("x-request-id".to_string(), vec!["abc".to_string()]);

        let response = HttpResponse::new(200, headers, json!({}));
        assert_eq!(response.header("X-Request-Id"), Some("abc"));
    }

    #[test]
    fn test_asana_change_keeps_equals_signs_in_info_url() {
        let changes =
            AsanaChange::parse_header("name=new_goals;info=https://asana.com/x?a=b;affected=true");

        assert_eq!(
            changes,
            vec![AsanaChange {
                name: "new_goals".to_string(),
                info: Some("https://asana.com/x?a=b".to_string()),
                affected: true,
            }]
        );
    }

    #[test]
    fn test_asana_change_skips_malformed_fields() {
        let changes = AsanaChange::parse_header("name=flag; garbage ;affected=true,;;,info=only");

        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].name, "flag");
        assert!(changes[0].info.is_none());
        assert!(changes[0].affected);
    }

    #[test]
    fn test_asana_changes_across_repeated_headers() {
        let mut headers = HashMap::new();
        headers.insert(
            "asana-change".to_string(),
            vec![
                "name=a;affected=true".to_string(),
                "name=b;affected=false".to_string(),
            ],
        );

        let response = HttpResponse::new(200, headers, json!({}));
        let names: Vec<_> = response
            .asana_changes()
            .into_iter()
            .map(|change| change.name)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
