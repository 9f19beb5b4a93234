use serde::{Deserialize, Serialize};

use crate::DomainResult;
use crate::error::DomainError;

pub const MAX_NAME_LENGTH: usize = 120;
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Project,
    Root,
    Message,
    Field,
    EnumValue,
}

impl EntityKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Root => "root",
            EntityKind::Message => "message",
            EntityKind::Field => "field",
            EntityKind::EnumValue => "enum-value",
        }
    }

    /// Plural REST resource segment, e.g. `/api/fields`.
    pub const fn resource(self) -> &'static str {
        match self {
            EntityKind::Project => "projects",
            EntityKind::Root => "roots",
            EntityKind::Message => "messages",
            EntityKind::Field => "fields",
            EntityKind::EnumValue => "enum-values",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized entity kind held in a [`crate::store::Store`].
///
/// Entities are immutable value snapshots: every update replaces the whole
/// object for an id, which keeps change detection a plain equality check.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// Human-readable label used in notifications and tree nodes.
    fn label(&self) -> &str;

    /// Client-side shape check run before a create/update is dispatched.
    fn validate(&self) -> DomainResult<()>;
}

pub(crate) fn validate_name(kind: EntityKind, name: &str) -> DomainResult<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{kind} name is required")));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(DomainError::Validation(format!(
            "{kind} name exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_description(kind: EntityKind, description: &str) -> DomainResult<()> {
    if description.len() > MAX_DESCRIPTION_LENGTH {
        return Err(DomainError::Validation(format!(
            "{kind} description exceeds {MAX_DESCRIPTION_LENGTH} characters"
        )));
    }
    Ok(())
}

pub(crate) fn validate_reference(kind: EntityKind, field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!(
            "{kind} {field} must reference an existing entity"
        )));
    }
    Ok(())
}
