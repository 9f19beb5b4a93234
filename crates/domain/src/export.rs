use std::sync::Arc;

use tokio::sync::RwLock;

use crate::DomainResult;
use crate::commands::{Notifier, PendingRegistry};
use crate::entity::EntityKind;
use crate::error::DomainError;
use crate::ports::gateway::ExportGateway;
use crate::util::now_ms;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExportScope {
    Message(String),
    Field(String),
    Root(String),
    /// Every root of the project, one document.
    Project(String),
}

impl ExportScope {
    pub fn kind(&self) -> EntityKind {
        match self {
            ExportScope::Message(_) => EntityKind::Message,
            ExportScope::Field(_) => EntityKind::Field,
            ExportScope::Root(_) => EntityKind::Root,
            ExportScope::Project(_) => EntityKind::Project,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            ExportScope::Message(id)
            | ExportScope::Field(id)
            | ExportScope::Root(id)
            | ExportScope::Project(id) => id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    pub scope: ExportScope,
    pub text: String,
    pub requested_at_ms: i64,
}

/// Export intents. The result is a document, not an entity: it lands in a
/// single "last export" slot and is never merged into a store.
#[derive(Clone)]
pub struct ExportService {
    gateway: Arc<dyn ExportGateway>,
    notifier: Notifier,
    pending: PendingRegistry,
    last: Arc<RwLock<Option<ExportDocument>>>,
}

impl ExportService {
    pub fn new(gateway: Arc<dyn ExportGateway>, notifier: Notifier, pending: PendingRegistry) -> Self {
        Self {
            gateway,
            notifier,
            pending,
            last: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn export(&self, scope: ExportScope) -> DomainResult<ExportDocument> {
        let command_id = self
            .pending
            .begin(scope.kind(), crate::commands::CommandIntent::Export)
            .await;
        let result = match &scope {
            ExportScope::Message(id) => self.gateway.export_message(id).await,
            ExportScope::Field(id) => self.gateway.export_field(id).await,
            ExportScope::Root(id) => self.gateway.export_root(id).await,
            ExportScope::Project(id) => self.gateway.export_project(id).await,
        };
        self.pending.finish(&command_id).await;
        match result {
            Ok(text) => {
                let document = ExportDocument {
                    scope,
                    text,
                    requested_at_ms: now_ms(),
                };
                *self.last.write().await = Some(document.clone());
                self.notifier.success(
                    "export ready",
                    format!("{} {} exported", document.scope.kind(), document.scope.entity_id()),
                );
                Ok(document)
            }
            Err(err) => Err(self.fail(&scope, err)),
        }
    }

    pub async fn last_export(&self) -> Option<ExportDocument> {
        self.last.read().await.clone()
    }

    fn fail(&self, scope: &ExportScope, err: DomainError) -> DomainError {
        tracing::warn!(kind = %scope.kind(), id = scope.entity_id(), error = %err, "export failed");
        self.notifier.error(
            format!("failed to export {} '{}'", scope.kind(), scope.entity_id()),
            err.to_string(),
        );
        err
    }
}
