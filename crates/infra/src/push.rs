use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use skema_domain::DomainResult;
use skema_domain::error::DomainError;
use skema_domain::events::PushEvent;
use skema_domain::ports::BoxFuture;
use skema_domain::ports::push::{PushSession, PushTransport, ScopeControl};
use tokio::sync::{RwLock, mpsc};

/// In-process push-channel adapter.
///
/// Plays the hub's role over tokio channels: one live session at a time,
/// events delivered only while a session exists (an emit with no session
/// is dropped, matching the channel's no-queueing contract), and
/// project-scope membership that dies with the connection. Tests and
/// headless embeddings drive it directly; a wire transport implements
/// the same `PushTransport` port.
#[derive(Clone, Default)]
pub struct ChannelPushTransport {
    inner: Arc<TransportInner>,
}

#[derive(Default)]
struct TransportInner {
    session: RwLock<Option<mpsc::UnboundedSender<PushEvent>>>,
    joined: RwLock<HashSet<String>>,
    fail_connects: AtomicU32,
    connects: AtomicU64,
}

impl ChannelPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers an event to the live session, if any. Returns whether it
    /// was delivered; an event emitted while disconnected is gone.
    pub async fn emit(&self, event: PushEvent) -> bool {
        let session = self.inner.session.read().await;
        match session.as_ref() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Severs the live session, as a network drop would. The session's
    /// event receiver yields `None` and scope membership is lost.
    pub async fn drop_connection(&self) {
        self.inner.session.write().await.take();
        self.inner.joined.write().await.clear();
    }

    /// Makes the next `n` connect attempts fail, to exercise the
    /// bridge's retry loop.
    pub fn fail_next_connects(&self, n: u32) {
        self.inner.fail_connects.store(n, Ordering::SeqCst);
    }

    pub async fn is_connected(&self) -> bool {
        self.inner
            .session
            .read()
            .await
            .as_ref()
            .is_some_and(|tx| !tx.is_closed())
    }

    pub async fn joined_scopes(&self) -> Vec<String> {
        let mut scopes: Vec<String> = self.inner.joined.read().await.iter().cloned().collect();
        scopes.sort();
        scopes
    }

    pub fn connect_count(&self) -> u64 {
        self.inner.connects.load(Ordering::SeqCst)
    }
}

impl PushTransport for ChannelPushTransport {
    fn connect(&self) -> BoxFuture<'_, DomainResult<PushSession>> {
        Box::pin(async move {
            let remaining = self.inner.fail_connects.load(Ordering::SeqCst);
            if remaining > 0 {
                self.inner
                    .fail_connects
                    .store(remaining - 1, Ordering::SeqCst);
                return Err(DomainError::ChannelUnavailable(
                    "hub connection refused".to_string(),
                ));
            }
            let (tx, rx) = mpsc::unbounded_channel();
            *self.inner.session.write().await = Some(tx);
            self.inner.joined.write().await.clear();
            self.inner.connects.fetch_add(1, Ordering::SeqCst);
            Ok(PushSession {
                events: rx,
                control: Arc::new(ChannelScopeControl {
                    inner: self.inner.clone(),
                }),
            })
        })
    }
}

struct ChannelScopeControl {
    inner: Arc<TransportInner>,
}

impl ScopeControl for ChannelScopeControl {
    fn join_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let project_id = project_id.to_string();
        Box::pin(async move {
            self.inner.joined.write().await.insert(project_id);
            Ok(())
        })
    }

    fn leave_project(&self, project_id: &str) -> BoxFuture<'_, DomainResult<()>> {
        let project_id = project_id.to_string();
        Box::pin(async move {
            self.inner.joined.write().await.remove(&project_id);
            Ok(())
        })
    }
}
