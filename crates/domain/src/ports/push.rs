use std::sync::Arc;

use tokio::sync::mpsc;

use crate::DomainResult;
use crate::events::PushEvent;
use crate::ports::BoxFuture;

/// Server-side fan-out control for one live connection. Joining a project
/// scope asks the hub to deliver events for that project's subtree;
/// subscriptions do not survive the connection they were made on.
pub trait ScopeControl: Send + Sync {
    fn join_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<()>>;

    fn leave_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<()>>;
}

/// One established push-channel connection. The session is over when the
/// event receiver yields `None`; events that occur while no session is
/// live are never queued or replayed.
pub struct PushSession {
    pub events: mpsc::UnboundedReceiver<PushEvent>,
    pub control: Arc<dyn ScopeControl>,
}

/// Transport behind the realtime bridge. The wire protocol is the
/// adapter's concern; the bridge only needs connect-and-receive.
pub trait PushTransport: Send + Sync {
    fn connect(&self) -> BoxFuture<'_, DomainResult<PushSession>>;
}
