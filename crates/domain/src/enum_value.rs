use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::DomainResult;
use crate::entity::{Entity, EntityKind, validate_description, validate_name, validate_reference};

/// One member of an `Enum`-typed field. `value` is the numeric ordinal the
/// serialized document carries; `name` is the symbolic identity.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnumValue {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub value: i64,
    #[serde(default)]
    pub description: String,
    pub field_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified_date: Option<OffsetDateTime>,
}

impl Entity for EnumValue {
    const KIND: EntityKind = EntityKind::EnumValue;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> DomainResult<()> {
        validate_name(Self::KIND, &self.name)?;
        validate_description(Self::KIND, &self.description)?;
        validate_reference(Self::KIND, "field_id", &self.field_id)
    }
}
