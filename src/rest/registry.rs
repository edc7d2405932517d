//! Static descriptors for the Asana resource kinds.
//!
//! Every object the API returns declares its type through `resource_type`.
//! The registry maps those names (and the plural path segments) to a
//! [`ResourceKind`], which names the kind, locates its collection and lists
//! the operations and capabilities it supports.
//!
//! # Example
//!
//! ```rust
//! use asana_api::rest::{registry, ResourceOperation};
//!
//! let task = registry::lookup("task");
//! assert_eq!(task.name(), "Task");
//! assert_eq!(task.base_path(), "/tasks");
//! assert!(task.supports(ResourceOperation::Update));
//! assert!(task.has_attachments());
//!
//! // Unknown names fall back to the generic kind.
//! assert_eq!(registry::lookup("spaceship").name(), "Resource");
//! assert_eq!(registry::lookup_many("projects").singular(), "project");
//! ```

use std::fmt;

use crate::rest::ResourceError;

/// Operations that can be performed on a resource kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceOperation {
    /// Fetch a single resource (GET /{plural}/{gid}).
    FindById,
    /// List resources (GET /{plural}).
    FindAll,
    /// Create a resource (POST /{plural}).
    Create,
    /// Update a resource (PUT /{plural}/{gid}).
    Update,
    /// Delete a resource (DELETE /{plural}/{gid}).
    Delete,
}

impl ResourceOperation {
    /// Returns the operation name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FindById => "find_by_id",
            Self::FindAll => "find_all",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for ResourceOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ALL: &[ResourceOperation] = &[
    ResourceOperation::FindById,
    ResourceOperation::FindAll,
    ResourceOperation::Create,
    ResourceOperation::Update,
    ResourceOperation::Delete,
];

const NO_LISTING: &[ResourceOperation] = &[
    ResourceOperation::FindById,
    ResourceOperation::Create,
    ResourceOperation::Update,
    ResourceOperation::Delete,
];

const NESTED: &[ResourceOperation] = &[
    ResourceOperation::FindById,
    ResourceOperation::Update,
    ResourceOperation::Delete,
];

/// A static description of one resource kind.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceKind {
    name: &'static str,
    singular: &'static str,
    plural: &'static str,
    operations: &'static [ResourceOperation],
    events: bool,
    attachments: bool,
}

impl ResourceKind {
    /// Creates a kind with no event or attachment capability.
    #[must_use]
    pub const fn new(
        name: &'static str,
        singular: &'static str,
        plural: &'static str,
        operations: &'static [ResourceOperation],
    ) -> Self {
        Self {
            name,
            singular,
            plural,
            operations,
            events: false,
            attachments: false,
        }
    }

    /// Marks the kind as able to stream its events.
    #[must_use]
    pub const fn with_events(mut self) -> Self {
        self.events = true;
        self
    }

    /// Marks the kind as able to receive attachments.
    #[must_use]
    pub const fn with_attachments(mut self) -> Self {
        self.attachments = true;
        self
    }

    /// The type name (e.g., "Task").
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The `resource_type` name (e.g., "task").
    #[must_use]
    pub const fn singular(&self) -> &'static str {
        self.singular
    }

    /// The collection path segment (e.g., "tasks").
    #[must_use]
    pub const fn plural(&self) -> &'static str {
        self.plural
    }

    /// The collection path, `/{plural}`.
    #[must_use]
    pub fn base_path(&self) -> String {
        format!("/{}", self.plural)
    }

    /// The path of one instance, `/{plural}/{gid}`.
    #[must_use]
    pub fn instance_path(&self, gid: &str) -> String {
        format!("/{}/{gid}", self.plural)
    }

    /// Whether the kind supports `operation`.
    #[must_use]
    pub fn supports(&self, operation: ResourceOperation) -> bool {
        self.operations.contains(&operation)
    }

    /// Whether instances can stream their events.
    #[must_use]
    pub const fn has_events(&self) -> bool {
        self.events
    }

    /// Whether instances accept attachments.
    #[must_use]
    pub const fn has_attachments(&self) -> bool {
        self.attachments
    }

    /// Fails with [`ResourceError::Unsupported`] unless the kind supports
    /// `operation`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Unsupported`] for unsupported operations.
    pub fn require(&self, operation: ResourceOperation) -> Result<(), ResourceError> {
        if self.supports(operation) {
            Ok(())
        } else {
            Err(ResourceError::Unsupported {
                kind: self.name,
                operation: operation.as_str(),
            })
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The kind used for objects with no (or an unknown) `resource_type`.
pub static GENERIC: ResourceKind = ResourceKind::new("Resource", "resource", "resources", &[]);

pub static ATTACHMENT: ResourceKind = ResourceKind::new(
    "Attachment",
    "attachment",
    "attachments",
    &[ResourceOperation::FindById, ResourceOperation::Delete],
);
pub static CUSTOM_FIELD: ResourceKind =
    ResourceKind::new("CustomField", "custom_field", "custom_fields", NO_LISTING);
pub static EVENT: ResourceKind = ResourceKind::new("Event", "event", "events", &[]);
pub static GOAL: ResourceKind = ResourceKind::new("Goal", "goal", "goals", ALL);
pub static PORTFOLIO: ResourceKind = ResourceKind::new("Portfolio", "portfolio", "portfolios", ALL);
pub static PROJECT: ResourceKind = ResourceKind::new("Project", "project", "projects", ALL);
pub static SECTION: ResourceKind = ResourceKind::new("Section", "section", "sections", NESTED);
pub static STORY: ResourceKind = ResourceKind::new("Story", "story", "stories", NESTED);
pub static TAG: ResourceKind = ResourceKind::new("Tag", "tag", "tags", ALL);
pub static TASK: ResourceKind = ResourceKind::new("Task", "task", "tasks", ALL)
    .with_events()
    .with_attachments();
pub static TEAM: ResourceKind = ResourceKind::new(
    "Team",
    "team",
    "teams",
    &[ResourceOperation::FindById, ResourceOperation::Create, ResourceOperation::Update],
);
pub static USER: ResourceKind = ResourceKind::new(
    "User",
    "user",
    "users",
    &[ResourceOperation::FindById, ResourceOperation::FindAll],
);
pub static WEBHOOK: ResourceKind = ResourceKind::new("Webhook", "webhook", "webhooks", ALL);
pub static WORKSPACE: ResourceKind = ResourceKind::new(
    "Workspace",
    "workspace",
    "workspaces",
    &[
        ResourceOperation::FindById,
        ResourceOperation::FindAll,
        ResourceOperation::Update,
    ],
);

/// Every registered kind.
pub static REGISTRY: &[&ResourceKind] = &[
    &ATTACHMENT,
    &CUSTOM_FIELD,
    &EVENT,
    &GOAL,
    &PORTFOLIO,
    &PROJECT,
    &SECTION,
    &STORY,
    &TAG,
    &TASK,
    &TEAM,
    &USER,
    &WEBHOOK,
    &WORKSPACE,
];

/// Finds a kind by its `resource_type` name, falling back to [`GENERIC`].
#[must_use]
pub fn lookup(singular: &str) -> &'static ResourceKind {
    REGISTRY
        .iter()
        .copied()
        .find(|kind| kind.singular == singular)
        .unwrap_or(&GENERIC)
}

/// Finds a kind by its collection path segment, falling back to [`GENERIC`].
#[must_use]
pub fn lookup_many(plural: &str) -> &'static ResourceKind {
    REGISTRY
        .iter()
        .copied()
        .find(|kind| kind.plural == plural)
        .unwrap_or(&GENERIC)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_by_singular_and_plural_agree() {
        for kind in REGISTRY {
            assert!(std::ptr::eq(lookup(kind.singular()), *kind));
            assert!(std::ptr::eq(lookup_many(kind.plural()), *kind));
        }
    }

    #[test]
    fn test_names_are_unique() {
        let singulars: HashSet<_> = REGISTRY.iter().map(|kind| kind.singular()).collect();
        let plurals: HashSet<_> = REGISTRY.iter().map(|kind| kind.plural()).collect();
        assert_eq!(singulars.len(), REGISTRY.len());
        assert_eq!(plurals.len(), REGISTRY.len());
    }

    #[test]
    fn test_unknown_names_fall_back_to_generic() {
        assert!(std::ptr::eq(lookup("nonsense"), &GENERIC));
        assert!(std::ptr::eq(lookup_many(""), &GENERIC));
    }

    #[test]
    fn test_only_tasks_carry_capabilities() {
        let with_events: Vec<_> = REGISTRY
            .iter()
            .filter(|kind| kind.has_events())
            .map(|kind| kind.name())
            .collect();
        let with_attachments: Vec<_> = REGISTRY
            .iter()
            .filter(|kind| kind.has_attachments())
            .map(|kind| kind.name())
            .collect();

        assert_eq!(with_events, vec!["Task"]);
        assert_eq!(with_attachments, vec!["Task"]);
    }

    #[test]
    fn test_require_reports_kind_and_operation() {
        let error = tokio_test::assert_err!(USER.require(ResourceOperation::Delete));
        assert_eq!(error.to_string(), "User does not support delete");
        tokio_test::assert_ok!(USER.require(ResourceOperation::FindAll));
    }

    #[test]
    fn test_paths() {
        assert_eq!(STORY.base_path(), "/stories");
        assert_eq!(STORY.instance_path("42"), "/stories/42");
    }
}
