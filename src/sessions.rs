//! Per-user session store
//!
//! One session per conversing user, keyed by the channel-assigned session
//! key. The outer map lock is held only long enough to fetch or insert an
//! entry; the per-session async mutex serializes all dialogue mutations for
//! one user so concurrent messages cannot interleave state transitions,
//! while unrelated sessions proceed in parallel.

use crate::dialogue::{FieldMap, FlowState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mutable conversational state for one user.
#[derive(Debug, Default)]
pub struct Session {
    pub state: FlowState,
    pub fields: FieldMap,
}

impl Session {
    /// Drop any in-progress flow. Used on flow start and after completion;
    /// an abandoned flow is simply never read again.
    pub fn reset(&mut self) {
        self.state = FlowState::Idle;
        self.fields.clear();
    }
}

/// Session store: created on first contact, reset on flow start, left idle
/// after completion. No global singleton; the bot owns one instance.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Arc<tokio::sync::Mutex<Session>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for a key, creating an idle one on first contact.
    pub fn get_or_create(&self, session_key: &str) -> Arc<tokio::sync::Mutex<Session>> {
        let mut map = self.inner.lock().expect("session map poisoned");
        map.entry(session_key.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(Session::default())))
            .clone()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("session map poisoned").len()
    }
}
