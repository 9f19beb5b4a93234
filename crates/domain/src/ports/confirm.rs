use crate::ports::BoxFuture;

/// Synchronous-from-the-user's-view yes/no gate asked before a delete is
/// dispatched. The UI surface implements this with a dialog; tests and
/// headless embeddings use [`StaticConfirm`].
pub trait ConfirmGate: Send + Sync {
    fn confirm(&self, prompt: &str) -> BoxFuture<'_, bool>;
}

/// Always answers the same way.
pub struct StaticConfirm(pub bool);

impl ConfirmGate for StaticConfirm {
    fn confirm(&self, _prompt: &str) -> BoxFuture<'_, bool> {
        let answer = self.0;
        Box::pin(async move { answer })
    }
}
