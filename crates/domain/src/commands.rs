use std::collections::HashMap;
use std::sync::Arc;

use metrics::counter;
use tokio::sync::{RwLock, broadcast};

use crate::DomainResult;
use crate::entity::{Entity, EntityKind};
use crate::error::DomainError;
use crate::ports::confirm::ConfirmGate;
use crate::ports::gateway::EntityGateway;
use crate::store::Store;
use crate::util::{draft_id, now_ms};

const DEFAULT_NOTIFICATION_CAPACITY: usize = 64;
const COMMANDS_DISPATCHED_TOTAL: &str = "skema_commands_dispatched_total";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Error,
}

/// User-visible acknowledgement of a command outcome. Every failed
/// command produces exactly one of these; gateway failures are never
/// silently swallowed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
}

/// Fan-out channel for notifications. UI surfaces subscribe; a slow or
/// absent subscriber never blocks a command.
#[derive(Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    pub fn success(&self, summary: impl Into<String>, detail: impl Into<String>) {
        let _ = self.tx.send(Notification {
            severity: Severity::Success,
            summary: summary.into(),
            detail: detail.into(),
        });
    }

    pub fn error(&self, summary: impl Into<String>, detail: impl Into<String>) {
        let _ = self.tx.send(Notification {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
        });
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_CAPACITY)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandIntent {
    Load,
    Create,
    Update,
    Delete,
    Search,
    Export,
}

impl CommandIntent {
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandIntent::Load => "load",
            CommandIntent::Create => "create",
            CommandIntent::Update => "update",
            CommandIntent::Delete => "delete",
            CommandIntent::Search => "search",
            CommandIntent::Export => "export",
        }
    }
}

/// One in-flight command. Creates are keyed by a client-local draft id so
/// unsaved work is observable without ever entering a store; the draft id
/// is discarded the moment the server-assigned entity arrives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCommand {
    pub command_id: String,
    pub kind: EntityKind,
    pub intent: CommandIntent,
    pub started_at_ms: i64,
}

/// Observable registry of commands between dispatch and completion.
/// A command is Pending exactly while its entry exists; completion in
/// either direction removes it (terminal in one dispatch, no retry).
#[derive(Clone, Default)]
pub struct PendingRegistry {
    inner: Arc<RwLock<HashMap<String, PendingCommand>>>,
}

impl PendingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn begin(&self, kind: EntityKind, intent: CommandIntent) -> String {
        let command_id = draft_id();
        let command = PendingCommand {
            command_id: command_id.clone(),
            kind,
            intent,
            started_at_ms: now_ms(),
        };
        self.inner.write().await.insert(command_id.clone(), command);
        counter!(
            COMMANDS_DISPATCHED_TOTAL,
            "kind" => kind.as_str(),
            "intent" => intent.as_str()
        )
        .increment(1);
        command_id
    }

    pub async fn finish(&self, command_id: &str) {
        self.inner.write().await.remove(command_id);
    }

    pub async fn snapshot(&self) -> Vec<PendingCommand> {
        let mut pending: Vec<PendingCommand> = self.inner.read().await.values().cloned().collect();
        pending.sort_by(|a, b| a.command_id.cmp(&b.command_id));
        pending
    }

    pub async fn is_idle(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Command dispatcher for one entity kind: translates a user intent into
/// exactly one gateway call and routes the outcome into the store.
///
/// Confirm-then-apply: the store is mutated only after the server
/// confirms, so a failure needs no rollback — the collection is left
/// exactly as it was and the error is surfaced once via the notifier.
#[derive(Clone)]
pub struct EntityCommands<E: Entity> {
    gateway: Arc<dyn EntityGateway<E>>,
    store: Store<E>,
    notifier: Notifier,
    pending: PendingRegistry,
    confirm: Arc<dyn ConfirmGate>,
}

impl<E: Entity> EntityCommands<E> {
    pub fn new(
        gateway: Arc<dyn EntityGateway<E>>,
        store: Store<E>,
        notifier: Notifier,
        pending: PendingRegistry,
        confirm: Arc<dyn ConfirmGate>,
    ) -> Self {
        Self {
            gateway,
            store,
            notifier,
            pending,
            confirm,
        }
    }

    pub fn store(&self) -> &Store<E> {
        &self.store
    }

    /// Bulk load; the collection becomes exactly the server's list.
    pub async fn load_all(&self) -> DomainResult<usize> {
        let command_id = self.pending.begin(E::KIND, CommandIntent::Load).await;
        let result = self.gateway.list().await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(items) => {
                let count = items.len();
                self.store.replace_all(items).await;
                Ok(count)
            }
            Err(err) => Err(self.fail(CommandIntent::Load, None, err)),
        }
    }

    /// Scoped load for a detail view. Results are merged by upsert rather
    /// than replacing the collection, so entities outside the scope stay.
    pub async fn load_by_parent(
        &self,
        parent_kind: EntityKind,
        parent_id: &str,
    ) -> DomainResult<Vec<E>> {
        let command_id = self.pending.begin(E::KIND, CommandIntent::Load).await;
        let result = self.gateway.list_by_parent(parent_kind, parent_id).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(items) => {
                for item in &items {
                    self.store.upsert(item.clone()).await;
                }
                Ok(items)
            }
            Err(err) => Err(self.fail(CommandIntent::Load, None, err)),
        }
    }

    /// Re-fetches one entity, e.g. when a detail view opens after a
    /// reconnect and the store may be stale.
    pub async fn refresh(&self, id: &str) -> DomainResult<E> {
        let command_id = self.pending.begin(E::KIND, CommandIntent::Load).await;
        let result = self.gateway.get(id).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(entity) => {
                self.store.upsert(entity.clone()).await;
                Ok(entity)
            }
            Err(err) => Err(self.fail(CommandIntent::Load, Some(id), err)),
        }
    }

    /// Submits a draft. The draft never enters the store; only the
    /// server-assigned entity from the response does, on the append path
    /// (the assigned id cannot already exist locally).
    pub async fn create(&self, draft: E) -> DomainResult<E> {
        if let Err(err) = draft.validate() {
            return Err(self.fail(CommandIntent::Create, Some(draft.label()), err));
        }
        let command_id = self.pending.begin(E::KIND, CommandIntent::Create).await;
        let result = self.gateway.create(&draft).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(created) => {
                self.store.upsert(created.clone()).await;
                self.notifier.success(
                    format!("{} created", E::KIND),
                    format!("{} '{}' was created", E::KIND, created.label()),
                );
                Ok(created)
            }
            Err(err) => Err(self.fail(CommandIntent::Create, Some(draft.label()), err)),
        }
    }

    pub async fn update(&self, entity: E) -> DomainResult<()> {
        if let Err(err) = entity.validate() {
            return Err(self.fail(CommandIntent::Update, Some(entity.label()), err));
        }
        let command_id = self.pending.begin(E::KIND, CommandIntent::Update).await;
        let result = self.gateway.update(&entity).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(()) => {
                let detail = format!("{} '{}' was updated", E::KIND, entity.label());
                self.store.upsert(entity).await;
                self.notifier.success(format!("{} updated", E::KIND), detail);
                Ok(())
            }
            Err(err) => Err(self.fail(CommandIntent::Update, Some(entity.label()), err)),
        }
    }

    /// Asks the confirmation gate first; a declined prompt dispatches
    /// nothing. Dependents are never cascade-deleted locally — the server
    /// emits delete events for them or they stay until a reload.
    pub async fn delete(&self, id: &str) -> DomainResult<DeleteOutcome> {
        let label = self
            .store
            .by_id(id)
            .await
            .map(|entity| entity.label().to_string())
            .unwrap_or_else(|| id.to_string());
        let prompt = format!("Delete {} '{label}'?", E::KIND);
        if !self.confirm.confirm(&prompt).await {
            return Ok(DeleteOutcome::Declined);
        }
        let command_id = self.pending.begin(E::KIND, CommandIntent::Delete).await;
        let result = self.gateway.delete(id).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(()) => {
                self.store.remove(id).await;
                self.notifier.success(
                    format!("{} deleted", E::KIND),
                    format!("{} '{label}' was deleted", E::KIND),
                );
                Ok(DeleteOutcome::Deleted)
            }
            Err(err) => Err(self.fail(CommandIntent::Delete, Some(&label), err)),
        }
    }

    /// Destructive to the unfiltered view by design: the collection
    /// becomes the result set. `load_all` restores it.
    pub async fn search(&self, term: &str) -> DomainResult<usize> {
        let command_id = self.pending.begin(E::KIND, CommandIntent::Search).await;
        let result = self.gateway.search(term).await;
        self.pending.finish(&command_id).await;
        match result {
            Ok(items) => {
                let count = items.len();
                self.store.replace_all(items).await;
                Ok(count)
            }
            Err(err) => Err(self.fail(CommandIntent::Search, Some(term), err)),
        }
    }

    fn fail(&self, intent: CommandIntent, subject: Option<&str>, err: DomainError) -> DomainError {
        let summary = match subject {
            Some(subject) => format!("failed to {} {} '{subject}'", intent.as_str(), E::KIND),
            None => format!("failed to {} {}s", intent.as_str(), E::KIND),
        };
        tracing::warn!(kind = %E::KIND, intent = intent.as_str(), error = %err, "command failed");
        self.notifier.error(summary, err.to_string());
        err
    }
}
