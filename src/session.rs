//! In-memory session slots for the "stored" preference.
//!
//! Each browser carries a random session id cookie; the language chosen during
//! that session is kept here. State is process-local and lost on restart.
//! The store is bounded: once full, the least recently used session is evicted.

use crate::i18n::LanguageCode;
use crate::preference::{CollaboratorError, PreferenceStore};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Length of a session id in hex characters (16 random bytes).
const SESSION_ID_LEN: usize = 32;

#[derive(Debug)]
struct Slot {
    code: LanguageCode,
    touched: u64,
}

/// Session slots plus a recency index (tick → session id).
#[derive(Debug, Default)]
struct Slots {
    by_id: HashMap<String, Slot>,
    recency: BTreeMap<u64, String>,
    clock: u64,
}

impl Slots {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn touch(&mut self, session_id: &str) {
        let now = self.tick();
        if let Some(slot) = self.by_id.get_mut(session_id) {
            self.recency.remove(&slot.touched);
            slot.touched = now;
            self.recency.insert(now, session_id.to_string());
        }
    }

    fn evict_oldest(&mut self) -> Option<String> {
        let (_, session_id) = self.recency.pop_first()?;
        self.by_id.remove(&session_id);
        Some(session_id)
    }
}

/// Shared map of session id → language, bounded with LRU eviction.
#[derive(Debug)]
pub struct SessionStore {
    slots: Mutex<Slots>,
    capacity: usize,
}

impl SessionStore {
    /// Create a store that holds at most `capacity` sessions.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Mutex::new(Slots::default()),
            capacity,
        }
    }

    /// Generate a fresh random session id.
    pub fn new_session_id() -> Result<String, CollaboratorError> {
        let mut bytes = [0u8; SESSION_ID_LEN / 2];
        getrandom::getrandom(&mut bytes).map_err(|e| CollaboratorError::Failed {
            store: "session",
            reason: e.to_string(),
        })?;
        Ok(hex::encode(bytes))
    }

    /// Check that a client-supplied id looks like one we issued.
    pub fn is_valid_id(id: &str) -> bool {
        id.len() == SESSION_ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Look up a session's language. A hit counts as use for eviction order.
    pub fn get(&self, session_id: &str) -> Result<Option<LanguageCode>, CollaboratorError> {
        let mut slots = self
            .slots
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("session store"))?;

        let code = slots.by_id.get(session_id).map(|slot| slot.code);
        if code.is_some() {
            slots.touch(session_id);
        }
        Ok(code)
    }

    /// Store a language for a session, evicting the least recently used
    /// session when full. Returns `false` only for a zero-capacity store.
    pub fn set(&self, session_id: &str, code: LanguageCode) -> Result<bool, CollaboratorError> {
        if self.capacity == 0 {
            return Ok(false);
        }

        let mut slots = self
            .slots
            .lock()
            .map_err(|_| CollaboratorError::Unavailable("session store"))?;

        if let Some(slot) = slots.by_id.get_mut(session_id) {
            slot.code = code;
            slots.touch(session_id);
            return Ok(true);
        }

        while slots.by_id.len() >= self.capacity {
            match slots.evict_oldest() {
                Some(_) => debug!("Session store full, evicted least recently used session"),
                None => break,
            }
        }

        let now = slots.tick();
        slots.by_id.insert(session_id.to_string(), Slot { code, touched: now });
        slots.recency.insert(now, session_id.to_string());
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().map(|s| s.by_id.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `PreferenceStore` view of one session.
#[derive(Debug, Clone)]
pub struct SessionPreferences {
    store: Arc<SessionStore>,
    session_id: String,
}

impl SessionPreferences {
    pub fn new(store: Arc<SessionStore>, session_id: impl Into<String>) -> Self {
        Self {
            store,
            session_id: session_id.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

impl PreferenceStore for SessionPreferences {
    fn name(&self) -> &'static str {
        "session"
    }

    fn read(&self) -> Result<Option<String>, CollaboratorError> {
        Ok(self
            .store
            .get(&self.session_id)?
            .map(|code| code.to_string()))
    }

    fn write(&mut self, code: LanguageCode) -> Result<bool, CollaboratorError> {
        let stored = self.store.set(&self.session_id, code)?;
        if stored {
            debug!("Stored language '{}' in session", code);
        }
        Ok(stored)
    }
}
