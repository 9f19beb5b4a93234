use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use skema_domain::DomainResult;
use skema_domain::events;
use skema_domain::ports::push::{PushTransport, ScopeControl};
use skema_domain::store::StoreSet;
use tokio::sync::{Mutex, RwLock, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;

const BRIDGE_EVENTS_TOTAL: &str = "skema_bridge_events_total";
const BRIDGE_CONNECT_ATTEMPTS_TOTAL: &str = "skema_bridge_connect_attempts_total";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Maintains the one live push-channel connection for the session and
/// feeds every inbound event through `events::apply` — the same store
/// mutations the command dispatcher performs, so remote edits become
/// visible exactly the way local ones do.
///
/// Reconnection is a flat interval, retried indefinitely: this is a
/// long-lived editing session expected to come back silently. Events
/// that fire while the channel is down are not replayed; the client
/// catches up only through explicit loads.
#[derive(Clone)]
pub struct RealtimeBridge {
    transport: Arc<dyn PushTransport>,
    stores: StoreSet,
    reconnect_interval: Duration,
    state_tx: Arc<watch::Sender<ConnectionState>>,
    scopes: Arc<RwLock<HashSet<String>>>,
    control: Arc<RwLock<Option<Arc<dyn ScopeControl>>>>,
    leave_tx: mpsc::UnboundedSender<String>,
    leave_rx: Arc<Mutex<Option<mpsc::UnboundedReceiver<String>>>>,
}

impl RealtimeBridge {
    pub fn new(
        transport: Arc<dyn PushTransport>,
        stores: StoreSet,
        reconnect_interval: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        let (leave_tx, leave_rx) = mpsc::unbounded_channel();
        Self {
            transport,
            stores,
            reconnect_interval,
            state_tx: Arc::new(state_tx),
            scopes: Arc::new(RwLock::new(HashSet::new())),
            control: Arc::new(RwLock::new(None)),
            leave_tx,
            leave_rx: Arc::new(Mutex::new(Some(leave_rx))),
        }
    }

    /// Observable connection state for a passive offline indicator.
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    /// Registers interest in a project's subtree. The desired membership
    /// survives reconnects (the hub forgets it with the connection, so it
    /// is re-joined on every connect); the returned guard leaves the
    /// scope when dropped, tying the release to the consuming view's
    /// lifetime.
    pub async fn join_scope(&self, project_id: &str) -> DomainResult<ScopeGuard> {
        self.scopes.write().await.insert(project_id.to_string());
        let control = self.control.read().await.clone();
        if let Some(control) = control {
            if let Err(err) = control.join_project(project_id).await {
                self.scopes.write().await.remove(project_id);
                return Err(err);
            }
        }
        Ok(ScopeGuard {
            project_id: project_id.to_string(),
            leave_tx: self.leave_tx.clone(),
        })
    }

    /// Spawns the connection loop. The handle is held for shutdown; the
    /// loop itself never ends on its own.
    pub fn start(&self) -> JoinHandle<()> {
        let bridge = self.clone();
        tokio::spawn(async move { bridge.run().await })
    }

    async fn run(&self) {
        let Some(mut leave_rx) = self.leave_rx.lock().await.take() else {
            tracing::warn!("realtime bridge already started, ignoring second start");
            return;
        };

        loop {
            // Scope releases that happened while offline still shrink the
            // desired membership before the next connect.
            while let Ok(project_id) = leave_rx.try_recv() {
                self.scopes.write().await.remove(&project_id);
            }

            self.state_tx.send_replace(ConnectionState::Connecting);
            counter!(BRIDGE_CONNECT_ATTEMPTS_TOTAL).increment(1);
            let session = match self.transport.connect().await {
                Ok(session) => session,
                Err(err) => {
                    tracing::warn!(error = %err, "push channel connect failed, retrying");
                    sleep(self.reconnect_interval).await;
                    continue;
                }
            };

            let control = session.control;
            let mut events_rx = session.events;
            *self.control.write().await = Some(control.clone());
            self.state_tx.send_replace(ConnectionState::Connected);
            tracing::info!("push channel connected");

            let desired: Vec<String> = self.scopes.read().await.iter().cloned().collect();
            for project_id in desired {
                if let Err(err) = control.join_project(&project_id).await {
                    tracing::warn!(project_id = %project_id, error = %err, "failed to rejoin project scope");
                }
            }

            loop {
                tokio::select! {
                    inbound = events_rx.recv() => match inbound {
                        Some(event) => {
                            counter!(BRIDGE_EVENTS_TOTAL, "kind" => event.kind().as_str()).increment(1);
                            tracing::debug!(kind = %event.kind(), id = event.entity_id(), "applying push event");
                            events::apply(&self.stores, event).await;
                        }
                        None => break,
                    },
                    left = leave_rx.recv() => {
                        if let Some(project_id) = left {
                            self.scopes.write().await.remove(&project_id);
                            if let Err(err) = control.leave_project(&project_id).await {
                                tracing::warn!(project_id = %project_id, error = %err, "failed to leave project scope");
                            }
                        }
                    }
                }
            }

            *self.control.write().await = None;
            self.state_tx.send_replace(ConnectionState::Disconnected);
            tracing::warn!("push channel disconnected, reconnecting");
            sleep(self.reconnect_interval).await;
        }
    }
}

/// Held by a view for as long as it displays a project's subtree.
/// Dropping it leaves the scope; there is no way to join without taking
/// on the matching release.
pub struct ScopeGuard {
    project_id: String,
    leave_tx: mpsc::UnboundedSender<String>,
}

impl ScopeGuard {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        let _ = self.leave_tx.send(self.project_id.clone());
    }
}
