use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use skema_domain::DomainResult;
use skema_domain::commands::{Notifier, PendingRegistry, Severity};
use skema_domain::error::DomainError;
use skema_domain::export::{ExportScope, ExportService};
use skema_domain::ports::BoxFuture;
use skema_domain::ports::gateway::ExportGateway;

#[derive(Default)]
struct StubExportGateway {
    fail: AtomicBool,
}

impl StubExportGateway {
    fn render(&self, scope: &str, id: &str) -> DomainResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::Upstream {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(format!("// {scope} {id}\n"))
    }
}

impl ExportGateway for StubExportGateway {
    fn export_message(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let id = id.to_string();
        Box::pin(async move { self.render("message", &id) })
    }

    fn export_field(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let id = id.to_string();
        Box::pin(async move { self.render("field", &id) })
    }

    fn export_root(&self, id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let id = id.to_string();
        Box::pin(async move { self.render("root", &id) })
    }

    fn export_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<String>> {
        let project_id = project_id.to_string();
        Box::pin(async move { self.render("project", &project_id) })
    }
}

fn service() -> (ExportService, Arc<StubExportGateway>, Notifier) {
    let gateway = Arc::new(StubExportGateway::default());
    let notifier = Notifier::new(16);
    let exports = ExportService::new(gateway.clone(), notifier.clone(), PendingRegistry::new());
    (exports, gateway, notifier)
}

#[tokio::test]
async fn a_newer_export_replaces_the_last_one() {
    let (exports, _, _) = service();
    assert!(exports.last_export().await.is_none());

    let first = exports
        .export(ExportScope::Message("m-1".to_string()))
        .await
        .unwrap();
    assert_eq!(first.text, "// message m-1\n");
    assert_eq!(exports.last_export().await.unwrap(), first);

    // Single slot: only the most recent document is retained.
    let second = exports
        .export(ExportScope::Project("p-1".to_string()))
        .await
        .unwrap();
    assert_eq!(exports.last_export().await.unwrap(), second);
    assert_eq!(
        exports.last_export().await.unwrap().scope,
        ExportScope::Project("p-1".to_string())
    );
}

#[tokio::test]
async fn failed_export_keeps_the_previous_document() {
    let (exports, gateway, notifier) = service();
    let mut notifications = notifier.subscribe();

    let kept = exports
        .export(ExportScope::Root("r-1".to_string()))
        .await
        .unwrap();
    assert_eq!(notifications.try_recv().unwrap().severity, Severity::Success);

    gateway.fail.store(true, Ordering::SeqCst);
    let err = exports
        .export(ExportScope::Field("f-1".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Upstream { .. }));
    assert_eq!(exports.last_export().await.unwrap(), kept);

    let notification = notifications.try_recv().unwrap();
    assert_eq!(notification.severity, Severity::Error);
    assert!(notification.summary.contains("export"));
}
