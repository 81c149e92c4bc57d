use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use nevado_shared::ResumeState;

use crate::{CoreError, CoreResult};

/// Name of the durable entry holding the pre-redirect return path
pub const RESUME_STATE_KEY: &str = "nevado_payment_resume";

/// Durable string key-value storage that outlives a full page navigation
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// Single-slot channel carrying [`ResumeState`] from the page that leaves for payment to
/// the page the payment provider redirects back to.
///
/// Depositing overwrites whatever an abandoned earlier attempt left behind. Taking reads
/// and clears the slot in one step.
#[derive(Clone)]
pub struct ResumeSlot {
    store: Arc<dyn KeyValueStore>,
}

impl ResumeSlot {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn deposit(&self, state: &ResumeState) -> CoreResult<()> {
        let value = serde_json::to_string(state).map_err(|e| CoreError::Storage(e.to_string()))?;
        self.store.set(RESUME_STATE_KEY, &value)?;
        tracing::debug!("Resume state saved: {}", state.return_path);
        Ok(())
    }

    /// Read without clearing
    pub fn peek(&self) -> CoreResult<Option<ResumeState>> {
        let Some(raw) = self.store.get(RESUME_STATE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!("Discarding unreadable resume state: {}", e);
                Ok(None)
            }
        }
    }

    pub fn take(&self) -> CoreResult<Option<ResumeState>> {
        let state = self.peek()?;
        self.store.remove(RESUME_STATE_KEY)?;
        Ok(state)
    }
}
