use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::entity::Entity;
use crate::enum_value::EnumValue;
use crate::field::Field;
use crate::message::Message;
use crate::project::Project;
use crate::root::Root;

/// Normalized in-memory collection for one entity kind, keyed by id.
///
/// This is the authoritative client-side state for its kind. Both the
/// command dispatcher (local edits confirmed by the server) and the
/// realtime bridge (edits made by other sessions) mutate it through the
/// same `upsert`/`remove` entry points, which is what makes the two
/// delivery paths converge. The operations are pure collection
/// transforms; they never fail.
#[derive(Clone)]
pub struct Store<E: Entity> {
    entries: Arc<RwLock<HashMap<String, E>>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<E: Entity> Store<E> {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            revision: Arc::new(revision),
        }
    }

    /// Replaces the whole collection, e.g. after a bulk load or a search.
    /// Duplicate ids in `items` collapse to the last occurrence.
    pub async fn replace_all(&self, items: Vec<E>) {
        {
            let mut entries = self.entries.write().await;
            entries.clear();
            for item in items {
                entries.insert(item.id().to_string(), item);
            }
        }
        self.bump();
    }

    /// Insert-or-replace by id. Replacing swaps the whole entity object;
    /// entries are immutable value snapshots, never patched in place.
    pub async fn upsert(&self, item: E) {
        {
            let mut entries = self.entries.write().await;
            entries.insert(item.id().to_string(), item);
        }
        self.bump();
    }

    /// Removes the entry if present. Removing an absent id is a no-op,
    /// so duplicate delete events are harmless.
    pub async fn remove(&self, id: &str) {
        let removed = {
            let mut entries = self.entries.write().await;
            entries.remove(id).is_some()
        };
        if removed {
            self.bump();
        }
    }

    pub async fn by_id(&self, id: &str) -> Option<E> {
        self.entries.read().await.get(id).cloned()
    }

    /// Filters the live collection by a foreign key. `key` extracts the
    /// parent reference from an entry; entries where it is `None` never
    /// match.
    pub async fn by_parent(&self, key: fn(&E) -> Option<&str>, value: &str) -> Vec<E> {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| key(entry) == Some(value))
            .cloned()
            .collect()
    }

    pub async fn all(&self) -> Vec<E> {
        self.entries.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Change feed: the value is a revision counter bumped on every
    /// mutation. Dropping the receiver is the unsubscribe; nothing else
    /// to release.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

impl<E: Entity> Default for Store<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// The five stores of the editor, created once at application start and
/// handed by clone (cheap, shared) to the dispatcher and the bridge.
#[derive(Clone, Default)]
pub struct StoreSet {
    pub projects: Store<Project>,
    pub roots: Store<Root>,
    pub messages: Store<Message>,
    pub fields: Store<Field>,
    pub enum_values: Store<EnumValue>,
}

impl StoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time copy of every collection, sorted by id so that equal
    /// store contents always produce the identical snapshot. The derived
    /// view builder works from these, never from the live stores.
    pub async fn snapshot(&self) -> Snapshot {
        let mut projects = self.projects.all().await;
        let mut roots = self.roots.all().await;
        let mut messages = self.messages.all().await;
        let mut fields = self.fields.all().await;
        let mut enum_values = self.enum_values.all().await;
        projects.sort_by(|a, b| a.id.cmp(&b.id));
        roots.sort_by(|a, b| a.id.cmp(&b.id));
        messages.sort_by(|a, b| a.id.cmp(&b.id));
        fields.sort_by(|a, b| a.id.cmp(&b.id));
        enum_values.sort_by(|a, b| a.id.cmp(&b.id));
        Snapshot {
            projects,
            roots,
            messages,
            fields,
            enum_values,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    pub projects: Vec<Project>,
    pub roots: Vec<Root>,
    pub messages: Vec<Message>,
    pub fields: Vec<Field>,
    pub enum_values: Vec<EnumValue>,
}
