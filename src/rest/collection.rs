//! Paginated lists of resources.
//!
//! A [`Collection`] holds one page of resources. When the envelope it came
//! from names a `next_page`, the following page is fetched on demand and
//! memoized, so walking the same collection twice fetches each page once.
//!
//! # Example
//!
//! ```rust,ignore
//! let tasks = client
//!     .tasks()
//!     .find_all(&[("project", "1234")], &IoOptions::new())
//!     .await?;
//!
//! // Walks every page, fetching them lazily.
//! let mut iter = tasks.iter();
//! while let Some(task) = iter.next().await? {
//!     println!("{task}");
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::OnceCell;

use crate::clients::{HttpClient, HttpResponse, IoOptions};
use crate::rest::registry::ResourceKind;
use crate::rest::{Envelope, Resource, ResourceError};

/// One page of a list result, linked lazily to the next.
#[derive(Debug)]
pub struct Collection {
    elements: Vec<Resource>,
    kind: &'static ResourceKind,
    next_page_path: Option<String>,
    next_page: OnceCell<Option<Box<Collection>>>,
    client: Arc<HttpClient>,
}

impl Collection {
    /// Creates a page from its `data` array and the rest of its envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedBody`] if `data` is not an array of
    /// objects.
    pub fn new(
        data: Value,
        extra: Map<String, Value>,
        kind: &'static ResourceKind,
        client: Arc<HttpClient>,
    ) -> Result<Self, ResourceError> {
        let items = match data {
            Value::Array(items) => items,
            other => {
                return Err(ResourceError::UnexpectedBody {
                    body: other.to_string(),
                })
            }
        };
        let elements = items
            .into_iter()
            .map(|item| Resource::from_value(kind, item, Arc::clone(&client)))
            .collect::<Result<Vec<_>, _>>()?;

        let next_page_path = extra
            .get("next_page")
            .and_then(|page| page.get("path"))
            .and_then(Value::as_str)
            .map(String::from);

        Ok(Self {
            elements,
            kind,
            next_page_path,
            next_page: OnceCell::new(),
            client,
        })
    }

    /// Creates a page from a list response.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedBody`] if the body is not a list
    /// envelope.
    pub fn from_response(
        response: HttpResponse,
        kind: &'static ResourceKind,
        client: Arc<HttpClient>,
    ) -> Result<Self, ResourceError> {
        let envelope = Envelope::from_response(response)?;
        Self::new(envelope.data, envelope.extra, kind, client)
    }

    /// The resources on this page.
    #[must_use]
    pub fn elements(&self) -> &[Resource] {
        &self.elements
    }

    /// The kind every element is wrapped as.
    #[must_use]
    pub const fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    /// Whether the server announced a following page.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page_path.is_some()
    }

    /// The following page, fetched on first call and cached afterwards.
    ///
    /// A failed fetch is not cached; the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns the request's error or [`ResourceError::UnexpectedBody`].
    pub async fn next_page(&self) -> Result<Option<&Self>, ResourceError> {
        let page = self
            .next_page
            .get_or_try_init(|| async {
                let Some(path) = &self.next_page_path else {
                    return Ok(None);
                };
                tracing::debug!(path = %path, kind = self.kind.name(), "Fetching next page");
                let response = self.client.get(path, &[], &IoOptions::new()).await?;
                let page = Self::from_response(response, self.kind, Arc::clone(&self.client))?;
                Ok::<_, ResourceError>(Some(Box::new(page)))
            })
            .await?;
        Ok(page.as_deref())
    }

    /// Iterates every element of this and all following pages.
    ///
    /// Each call starts from the first element of this page again.
    #[must_use]
    #[allow(clippy::iter_not_returning_iterator)]
    pub const fn iter(&self) -> CollectionIter<'_> {
        CollectionIter {
            page: Some(self),
            index: 0,
        }
    }

    /// Counts the elements across all pages, fetching every page.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error.
    pub async fn size(&self) -> Result<usize, ResourceError> {
        let mut size = 0;
        let mut page = Some(self);
        while let Some(current) = page {
            size += current.elements.len();
            page = current.next_page().await?;
        }
        Ok(size)
    }

    /// Collects the elements across all pages, fetching every page.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch error.
    pub async fn to_vec(&self) -> Result<Vec<Resource>, ResourceError> {
        let mut resources = Vec::new();
        let mut iter = self.iter();
        while let Some(resource) = iter.next().await? {
            resources.push(resource.clone());
        }
        Ok(resources)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Collection<{}> [", self.kind.name())?;
        for (i, element) in self.elements.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        if self.has_next_page() {
            if !self.elements.is_empty() {
                f.write_str(", ")?;
            }
            f.write_str("...")?;
        }
        f.write_str("]")
    }
}

/// A cursor over every element of a [`Collection`] and its following pages.
#[derive(Debug)]
pub struct CollectionIter<'a> {
    page: Option<&'a Collection>,
    index: usize,
}

impl<'a> CollectionIter<'a> {
    /// Returns the next element, fetching the next page when this one is
    /// exhausted. `Ok(None)` marks the end of the last page.
    ///
    /// # Errors
    ///
    /// Returns the page fetch error; calling again retries the fetch.
    pub async fn next(&mut self) -> Result<Option<&'a Resource>, ResourceError> {
        loop {
            let Some(page) = self.page else {
                return Ok(None);
            };
            if let Some(resource) = page.elements.get(self.index) {
                self.index += 1;
                return Ok(Some(resource));
            }
            self.page = page.next_page().await?;
            self.index = 0;
        }
    }
}

// Verify Collection is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Collection>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authentication;
    use crate::config::{ApiToken, ClientConfig};
    use crate::rest::registry;
    use serde_json::json;

    fn client() -> Arc<HttpClient> {
        let config = ClientConfig::builder()
            .authentication(Authentication::api_token(ApiToken::new("token").unwrap()))
            .build()
            .unwrap();
        Arc::new(HttpClient::new(&config))
    }

    fn extra(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_elements_are_wrapped_as_kind() {
        let collection = Collection::new(
            json!([{"gid": "1"}, {"gid": "2"}]),
            Map::new(),
            &registry::TAG,
            client(),
        )
        .unwrap();

        assert_eq!(collection.elements().len(), 2);
        assert!(collection
            .elements()
            .iter()
            .all(|tag| tag.kind().name() == "Tag"));
        assert!(!collection.has_next_page());
    }

    #[test]
    fn test_display_marks_more_pages() {
        let collection = Collection::new(
            json!([{"gid": "1"}]),
            extra(json!({"next_page": {"path": "/tags?offset=a", "offset": "a"}})),
            &registry::TAG,
            client(),
        )
        .unwrap();

        assert_eq!(collection.to_string(), r#"Collection<Tag> [Tag { gid: "1" }, ...]"#);
    }

    #[test]
    fn test_display_last_page() {
        let collection = Collection::new(
            json!([{"gid": "1"}, {"gid": "2"}]),
            extra(json!({"next_page": null})),
            &registry::TAG,
            client(),
        )
        .unwrap();

        assert_eq!(
            collection.to_string(),
            r#"Collection<Tag> [Tag { gid: "1" }, Tag { gid: "2" }]"#
        );
    }

    #[test]
    fn test_non_array_data_is_rejected() {
        let error = Collection::new(json!({"gid": "1"}), Map::new(), &registry::TAG, client())
            .unwrap_err();
        assert!(matches!(error, ResourceError::UnexpectedBody { .. }));
    }

    #[tokio::test]
    async fn test_single_page_iteration_needs_no_requests() {
        let collection = Collection::new(
            json!([{"gid": "1"}, {"gid": "2"}]),
            Map::new(),
            &registry::TAG,
            client(),
        )
        .unwrap();

        let mut iter = collection.iter();
        assert_eq!(iter.next().await.unwrap().and_then(Resource::gid), Some("1"));
        assert_eq!(iter.next().await.unwrap().and_then(Resource::gid), Some("2"));
        assert!(iter.next().await.unwrap().is_none());
        assert_eq!(collection.size().await.unwrap(), 2);
        assert!(collection.next_page().await.unwrap().is_none());
    }
}
