//! Asana resources on top of the HTTP transport.
//!
//! This module provides:
//!
//! - **[`Resource`]**: a lazily wrapped, cached view over one JSON object,
//!   with `refresh`, `update` and `delete`
//! - **[`Collection`]**: one page of resources, linked lazily to the next
//! - **[`ResourceProxy`]**: kind-scoped queries (`find_by_id`, `find_all`,
//!   `create`, ...)
//! - **[`EventStream`]**: the endless event feed of one resource
//! - **[`registry`]**: the static table of resource kinds
//! - **[`EventSubscription`] / [`AttachmentUploading`]**: capabilities of
//!   some kinds
//!
//! # Example
//!
//! ```rust,ignore
//! use asana_api::rest::{AttachmentUploading, Field};
//! use asana_api::{IoOptions, Upload};
//!
//! let task = client.tasks().find_by_id("1234", &IoOptions::new()).await?;
//! println!("{}", task.field("name")?);
//!
//! let upload = Upload::from_path("report.pdf", "application/pdf").await?;
//! let attachment = task.attach(upload, None, &IoOptions::new()).await?;
//!
//! let projects = task.field("projects")?.as_list().unwrap_or_default();
//! for project in projects.iter().filter_map(Field::as_resource) {
//!     println!("in {project}");
//! }
//! ```

mod capabilities;
mod collection;
mod errors;
mod events;
mod proxy;
pub mod registry;
mod resource;
mod response;

pub use capabilities::{AttachmentUploading, EventSubscription};
pub use collection::{Collection, CollectionIter};
pub use errors::ResourceError;
pub use events::{Event, EventStream, DEFAULT_WAIT};
pub use proxy::{ResourceProxy, DEFAULT_PAGE_SIZE};
pub use registry::{ResourceKind, ResourceOperation};
pub use resource::{Field, Resource};
pub use response::Envelope;
