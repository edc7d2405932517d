//! The dynamic resource view over a fetched JSON object.
//!
//! A [`Resource`] keeps the raw JSON object it was built from and wraps
//! fields lazily: the first read of a field turns its JSON value into a
//! [`Field`] and caches it, so later reads return the very same value.
//!
//! # Field Wrapping
//!
//! - JSON objects become [`Field::Nested`] resources, typed through the
//!   [registry](crate::rest::registry) by their `resource_type`
//! - JSON arrays become [`Field::List`], each element wrapped the same way
//! - Everything else is kept as a [`Field::Scalar`]
//!
//! # Example
//!
//! ```rust,ignore
//! let task = client.tasks().find_by_id("1234", &IoOptions::new()).await?;
//!
//! println!("{}", task.field("name")?);
//! if let Some(assignee) = task.get("assignee").and_then(Field::as_resource) {
//!     println!("assigned to {:?}", assignee.gid());
//! }
//!
//! let task = task.update(json!({"completed": true}), &IoOptions::new()).await?;
//! task.delete().await?;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};

use crate::clients::{HttpClient, IoOptions};
use crate::rest::registry::{self, ResourceKind, ResourceOperation};
use crate::rest::{Collection, Envelope, ResourceError, ResourceProxy};

/// A wrapped field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    /// A JSON scalar (string, number, bool or null).
    Scalar(Value),
    /// A nested object.
    Nested(Resource),
    /// An array, element by element.
    List(Vec<Field>),
}

impl Field {
    fn wrap(value: &Value, client: &Arc<HttpClient>) -> Self {
        match value {
            Value::Object(map) => {
                let kind = map
                    .get("resource_type")
                    .and_then(Value::as_str)
                    .map_or(&registry::GENERIC, registry::lookup);
                Self::Nested(Resource::new(kind, map.clone(), Arc::clone(client)))
            }
            Value::Array(items) => {
                Self::List(items.iter().map(|item| Self::wrap(item, client)).collect())
            }
            scalar => Self::Scalar(scalar.clone()),
        }
    }

    /// The scalar JSON value, if this is a scalar.
    #[must_use]
    pub const fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The string, if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.as_value().and_then(Value::as_str)
    }

    /// The boolean, if this is a boolean scalar.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        self.as_value().and_then(Value::as_bool)
    }

    /// The integer, if this is an integer scalar.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        self.as_value().and_then(Value::as_i64)
    }

    /// Whether this is a JSON `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Scalar(Value::Null))
    }

    /// The nested resource, if this is an object.
    #[must_use]
    pub const fn as_resource(&self) -> Option<&Resource> {
        match self {
            Self::Nested(resource) => Some(resource),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Self]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(value) => write!(f, "{value}"),
            Self::Nested(resource) => write!(f, "{resource}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// An Asana object: its kind, its raw JSON and a per-field cache.
///
/// Resources are immutable. [`Resource::refresh`] and [`Resource::update`]
/// return new instances; [`Resource::delete`] leaves this one untouched.
#[derive(Clone)]
pub struct Resource {
    kind: &'static ResourceKind,
    data: Map<String, Value>,
    fields: HashMap<String, OnceLock<Field>>,
    client: Arc<HttpClient>,
}

impl Resource {
    /// Creates a resource from a JSON object. No field is wrapped yet.
    #[must_use]
    pub fn new(kind: &'static ResourceKind, data: Map<String, Value>, client: Arc<HttpClient>) -> Self {
        let fields = data.keys().map(|name| (name.clone(), OnceLock::new())).collect();
        Self {
            kind,
            data,
            fields,
            client,
        }
    }

    /// Creates a resource from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnexpectedBody`] if the value is not an object.
    pub fn from_value(
        kind: &'static ResourceKind,
        value: Value,
        client: Arc<HttpClient>,
    ) -> Result<Self, ResourceError> {
        match value {
            Value::Object(data) => Ok(Self::new(kind, data, client)),
            other => Err(ResourceError::UnexpectedBody {
                body: other.to_string(),
            }),
        }
    }

    /// Reads a field, wrapping and caching it on first access.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnknownProperty`] if the object has no such
    /// field.
    pub fn field(&self, name: &str) -> Result<&Field, ResourceError> {
        let cell = self
            .fields
            .get(name)
            .ok_or_else(|| ResourceError::UnknownProperty {
                kind: self.kind.name(),
                name: name.to_string(),
            })?;
        Ok(cell.get_or_init(|| Field::wrap(self.data.get(name).unwrap_or(&Value::Null), &self.client)))
    }

    /// Reads a field if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Field> {
        self.field(name).ok()
    }

    /// The object's global id.
    #[must_use]
    pub fn gid(&self) -> Option<&str> {
        self.data.get("gid").and_then(Value::as_str)
    }

    /// The resource kind.
    #[must_use]
    pub const fn kind(&self) -> &'static ResourceKind {
        self.kind
    }

    /// The raw JSON object.
    #[must_use]
    pub const fn raw(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Consumes the resource, returning its raw JSON object.
    #[must_use]
    pub fn into_raw(self) -> Map<String, Value> {
        self.data
    }

    /// The transport this resource issues follow-up requests through.
    #[must_use]
    pub const fn client(&self) -> &Arc<HttpClient> {
        &self.client
    }

    pub(crate) fn require_gid(&self, operation: &'static str) -> Result<&str, ResourceError> {
        self.gid().ok_or(ResourceError::MissingId {
            kind: self.kind.name(),
            operation,
        })
    }

    /// Fetches the object again, returning a new instance.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] if the kind cannot be fetched
    /// by id, [`ResourceError::MissingId`] without a `gid`, or the request's
    /// error.
    pub async fn refresh(&self) -> Result<Self, ResourceError> {
        self.kind.require(ResourceOperation::FindById)?;
        let gid = self.require_gid("refresh")?;
        ResourceProxy::new(self.kind, Arc::clone(&self.client))
            .find_by_id(gid, &IoOptions::new())
            .await
    }

    /// PUTs `data` to the object's own path and returns the updated object.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a `gid`, or the request's
    /// error.
    pub async fn update(&self, data: Value, options: &IoOptions) -> Result<Self, ResourceError> {
        self.kind.require(ResourceOperation::Update)?;
        let path = self.kind.instance_path(self.require_gid("update")?);
        let response = self.client.put(&path, data, options).await?;
        let envelope = Envelope::from_response(response)?;
        Self::from_value(self.kind, envelope.into_data(), Arc::clone(&self.client))
    }

    /// Deletes the object. This instance stays usable but is stale.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a `gid`, or the request's
    /// error.
    pub async fn delete(&self) -> Result<bool, ResourceError> {
        self.kind.require(ResourceOperation::Delete)?;
        let path = self.kind.instance_path(self.require_gid("delete")?);
        self.client.delete(&path, &IoOptions::new()).await?;
        Ok(true)
    }

    /// Lists the objects under this one, `GET /{plural}/{gid}/{relation}`.
    ///
    /// Elements are typed by the kind registered for `relation`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingId`] without a `gid`, or the request's
    /// error.
    pub async fn related(
        &self,
        relation: &str,
        params: &[(&str, &str)],
        options: &IoOptions,
    ) -> Result<Collection, ResourceError> {
        let gid = self.require_gid("list related objects of")?;
        ResourceProxy::new(registry::lookup_many(relation), Arc::clone(&self.client))
            .find_by_parent(self.kind, gid, params, options)
            .await
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.kind, other.kind) && self.data == other.data
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("kind", &self.kind.name())
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.name())?;
        if self.data.is_empty() {
            return f.write_str(" {}");
        }
        f.write_str(" { ")?;
        for (i, name) in self.data.keys().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match self.field(name) {
                Ok(field) => write!(f, "{name}: {field}")?,
                Err(_) => write!(f, "{name}: null")?,
            }
        }
        f.write_str(" }")
    }
}

// Verify Resource is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Resource>();
    assert_send_sync::<Field>();
};
