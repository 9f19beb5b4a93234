use crate::DomainResult;
use crate::entity::{Entity, EntityKind};
use crate::ports::BoxFuture;

/// REST boundary for one entity kind, one method per operation.
///
/// Implementations are thin request/response pairs: they surface
/// transport failures, non-2xx statuses and deserialization failures
/// uniformly as `DomainError` and never interpret or retry — retry
/// policy belongs to the dispatcher, which chooses not to.
pub trait EntityGateway<E: Entity>: Send + Sync {
    fn list(&self) -> BoxFuture<'_, DomainResult<Vec<E>>>;

    fn get(&self, id: &str) -> BoxFuture<'_, DomainResult<E>>;

    /// Scoped list, e.g. all fields of one message.
    fn list_by_parent(
        &self,
        parent_kind: EntityKind,
        parent_id: &str,
    ) -> BoxFuture<'_, DomainResult<Vec<E>>>;

    /// The submitted id is ignored server-side; the response carries the
    /// entity under its server-assigned id.
    fn create(&self, entity: &E) -> BoxFuture<'_, DomainResult<E>>;

    /// `PUT` returns no content; the submitted entity is the canonical
    /// value on success.
    fn update(&self, entity: &E) -> BoxFuture<'_, DomainResult<()>>;

    fn delete(&self, id: &str) -> BoxFuture<'_, DomainResult<()>>;

    fn search(&self, term: &str) -> BoxFuture<'_, DomainResult<Vec<E>>>;
}

/// Textual export of a hierarchical document slice.
pub trait ExportGateway: Send + Sync {
    fn export_message(&self, id: &str) -> BoxFuture<'_, DomainResult<String>>;

    fn export_field(&self, id: &str) -> BoxFuture<'_, DomainResult<String>>;

    fn export_root(&self, id: &str) -> BoxFuture<'_, DomainResult<String>>;

    /// Every root of a project in one document.
    fn export_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<String>>;
}
