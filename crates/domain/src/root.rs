use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::DomainResult;
use crate::entity::{Entity, EntityKind, validate_description, validate_name, validate_reference};

/// Top-level container inside a project; owns [`crate::message::Message`]s.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Root {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub project_id: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub created_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modified_date: Option<OffsetDateTime>,
}

impl Entity for Root {
    const KIND: EntityKind = EntityKind::Root;

    fn id(&self) -> &str {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }

    fn validate(&self) -> DomainResult<()> {
        validate_name(Self::KIND, &self.name)?;
        validate_description(Self::KIND, &self.description)?;
        validate_reference(Self::KIND, "project_id", &self.project_id)
    }
}
