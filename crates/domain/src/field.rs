use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::DomainResult;
use crate::entity::{Entity, EntityKind, validate_description, validate_name};
use crate::error::DomainError;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Decimal,
    Boolean,
    DateTime,
    Enum,
    Complex,
}

/// Where a field hangs in the hierarchy: directly under a message, or
/// nested under a `Complex`-typed parent field. A submitted field has
/// exactly one of the two; a freshly constructed draft may have neither.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldParent {
    Message(String),
    Field(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub default_value: Option<String>,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub parent_field_id: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified_date: Option<OffsetDateTime>,
}

impl Field {
    /// Resolves the parent reference, rejecting the malformed shapes a
    /// misbehaving peer session could push (both set, or neither).
    pub fn parent(&self) -> DomainResult<FieldParent> {
        match (&self.message_id, &self.parent_field_id) {
            (Some(message_id), None) => Ok(FieldParent::Message(message_id.clone())),
            (None, Some(parent_field_id)) => Ok(FieldParent::Field(parent_field_id.clone())),
            (Some(_), Some(_)) => Err(DomainError::Integrity(format!(
                "field {} has both message_id and parent_field_id set",
                self.id
            ))),
            (None, None) => Err(DomainError::Integrity(format!(
                "field {} has no parent reference",
                self.id
            ))),
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.parent().is_ok()
    }
}

impl Entity for Field {
    const KIND: EntityKind = EntityKind::Field;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> DomainResult<()> {
        validate_name(Self::KIND, &self.name)?;
        validate_description(Self::KIND, &self.description)?;
        self.parent().map(|_| ())
    }
}
