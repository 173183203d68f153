//! Live menu sessions
//!
//! One slot per browsing session, keyed by UUID. The session itself sits
//! behind an async mutex so a checkout can hold it across the gateway call;
//! the map is only locked long enough to look a slot up.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::MutexGuard;
use uuid::Uuid;

use super::{MenuError, MenuSession};

#[derive(Debug)]
pub struct SessionSlot {
    session: tokio::sync::Mutex<MenuSession>,
    last_touched: Mutex<Instant>,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            session: tokio::sync::Mutex::new(MenuSession::new()),
            last_touched: Mutex::new(Instant::now()),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, MenuSession> {
        self.touch();
        self.session.lock().await
    }

    fn touch(&self) {
        *self.last_touched.lock() = Instant::now();
    }

    fn idle_for(&self) -> Duration {
        self.last_touched.lock().elapsed()
    }
}

#[derive(Debug)]
pub struct MenuSessions {
    slots: DashMap<Uuid, Arc<SessionSlot>>,
    idle_timeout: Duration,
}

impl MenuSessions {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            slots: DashMap::new(),
            idle_timeout,
        }
    }

    /// Register a new session in the `Loading` state
    pub fn create(&self) -> (Uuid, Arc<SessionSlot>) {
        let id = Uuid::new_v4();
        let slot = Arc::new(SessionSlot::new());
        self.slots.insert(id, slot.clone());
        (id, slot)
    }

    pub fn get(&self, id: &str) -> Result<Arc<SessionSlot>, MenuError> {
        let uuid = Uuid::parse_str(id).map_err(|_| MenuError::SessionNotFound(id.to_string()))?;
        self.slots
            .get(&uuid)
            .map(|slot| slot.value().clone())
            .ok_or_else(|| MenuError::SessionNotFound(id.to_string()))
    }

    pub fn remove(&self, id: &Uuid) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Drop sessions idle for at least the configured timeout
    pub fn sweep_idle(&self) -> usize {
        let before = self.slots.len();
        self.slots
            .retain(|_, slot| slot.idle_for() < self.idle_timeout);
        let removed = before.saturating_sub(self.slots.len());
        if removed > 0 {
            tracing::debug!(removed, remaining = self.slots.len(), "Swept idle menu sessions");
        }
        removed
    }
}
