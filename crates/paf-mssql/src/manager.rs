use super::*;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A session shared by every publish invocation.
///
/// A TDS session runs one request at a time, so holders take turns: each
/// invocation locks it for the length of its transaction.
pub type Shared<S> = Arc<Mutex<S>>;

/// Owner of the single process-lifetime database session.
///
/// The first [`ensure`](ConnectionManager::ensure) opens the session while
/// holding the slot lock, so concurrent first callers wait for that one
/// open instead of racing their own. A failed open leaves the slot empty
/// and is returned to the caller; nothing retries on its own. A session
/// that broke mid-request is dropped with
/// [`invalidate`](ConnectionManager::invalidate) so the next caller opens
/// a fresh one.
pub struct ConnectionManager<C: Connector> {
    connector: C,
    slot: Mutex<Option<Shared<C::Session>>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector,
            slot: Mutex::new(None),
        }
    }
    /// Returns the shared session, opening it on first use.
    pub async fn ensure(&self, endpoint: &Endpoint) -> Result<Shared<C::Session>, MssqlError> {
        let mut slot = self.slot.lock().await;
        if let Some(ref session) = *slot {
            return Ok(session.clone());
        }
        let session = self.connector.connect(endpoint).await?;
        let session = Arc::new(Mutex::new(session));
        *slot = Some(session.clone());
        log::info!("connection established ({})", endpoint);
        Ok(session)
    }
    /// Forgets `session` if it is still the shared one. Returns whether it
    /// was; a handle from an earlier, already replaced open is ignored.
    pub async fn invalidate(&self, session: &Shared<C::Session>) -> bool {
        let mut slot = self.slot.lock().await;
        let current = slot
            .as_ref()
            .is_some_and(|shared| Arc::ptr_eq(shared, session));
        if current {
            *slot = None;
            log::warn!("connection discarded after a broken request");
        }
        current
    }
    pub async fn initialized(&self) -> bool {
        self.slot.lock().await.is_some()
    }
    pub fn connector(&self) -> &C {
        &self.connector
    }
}
