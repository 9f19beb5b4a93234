use serde::{Deserialize, Serialize};

use crate::entity::EntityKind;
use crate::enum_value::EnumValue;
use crate::field::Field;
use crate::message::Message;
use crate::project::Project;
use crate::root::Root;
use crate::store::StoreSet;

/// Everything the push channel can say, closed and matched exhaustively.
///
/// There is no `Created` variant: a creation made by another session
/// arrives as `Updated` for an id not yet present and lands on the same
/// upsert append path. Deletes carry only the id.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "payload")]
pub enum PushEvent {
    ProjectUpdated(Project),
    ProjectDeleted(String),
    RootUpdated(Root),
    RootDeleted(String),
    MessageUpdated(Message),
    MessageDeleted(String),
    FieldUpdated(Field),
    FieldDeleted(String),
    EnumValueUpdated(EnumValue),
    EnumValueDeleted(String),
}

impl PushEvent {
    pub fn kind(&self) -> EntityKind {
        match self {
            PushEvent::ProjectUpdated(_) | PushEvent::ProjectDeleted(_) => EntityKind::Project,
            PushEvent::RootUpdated(_) | PushEvent::RootDeleted(_) => EntityKind::Root,
            PushEvent::MessageUpdated(_) | PushEvent::MessageDeleted(_) => EntityKind::Message,
            PushEvent::FieldUpdated(_) | PushEvent::FieldDeleted(_) => EntityKind::Field,
            PushEvent::EnumValueUpdated(_) | PushEvent::EnumValueDeleted(_) => {
                EntityKind::EnumValue
            }
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            PushEvent::ProjectUpdated(entity) => &entity.id,
            PushEvent::RootUpdated(entity) => &entity.id,
            PushEvent::MessageUpdated(entity) => &entity.id,
            PushEvent::FieldUpdated(entity) => &entity.id,
            PushEvent::EnumValueUpdated(entity) => &entity.id,
            PushEvent::ProjectDeleted(id)
            | PushEvent::RootDeleted(id)
            | PushEvent::MessageDeleted(id)
            | PushEvent::FieldDeleted(id)
            | PushEvent::EnumValueDeleted(id) => id,
        }
    }
}

/// Merge entry point for the realtime path. Updated maps to upsert and
/// Deleted to remove on the matching store — the identical operations the
/// dispatcher applies for locally confirmed commands, so a change becomes
/// visible the same way no matter which session made it.
pub async fn apply(stores: &StoreSet, event: PushEvent) {
    match event {
        PushEvent::ProjectUpdated(entity) => stores.projects.upsert(entity).await,
        PushEvent::ProjectDeleted(id) => stores.projects.remove(&id).await,
        PushEvent::RootUpdated(entity) => stores.roots.upsert(entity).await,
        PushEvent::RootDeleted(id) => stores.roots.remove(&id).await,
        PushEvent::MessageUpdated(entity) => stores.messages.upsert(entity).await,
        PushEvent::MessageDeleted(id) => stores.messages.remove(&id).await,
        PushEvent::FieldUpdated(entity) => stores.fields.upsert(entity).await,
        PushEvent::FieldDeleted(id) => stores.fields.remove(&id).await,
        PushEvent::EnumValueUpdated(entity) => stores.enum_values.upsert(entity).await,
        PushEvent::EnumValueDeleted(id) => stores.enum_values.remove(&id).await,
    }
}
