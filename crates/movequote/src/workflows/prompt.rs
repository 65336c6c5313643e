//! Exit-intent promo prompt gating.
//!
//! The prompt opens at most once per session and stays hidden until the
//! `dismissed_until` timestamp passes after a visitor closes it or signs up.

use chrono::{DateTime, Duration, Utc};
use std::sync::Mutex;

pub const DEFAULT_DISMISS_DAYS: i64 = 7;

/// Per-visitor state backing the prompt decision.
pub trait PromptStore: Send + Sync {
    fn dismissed_until(&self) -> Option<DateTime<Utc>>;
    fn set_dismissed_until(&self, until: DateTime<Utc>);
    fn seen_this_session(&self) -> bool;
    fn mark_seen_this_session(&self);
}

#[derive(Debug, Default)]
pub struct InMemoryPromptStore {
    state: Mutex<PromptState>,
}

#[derive(Debug, Default, Clone, Copy)]
struct PromptState {
    dismissed_until: Option<DateTime<Utc>>,
    seen_this_session: bool,
}

impl InMemoryPromptStore {
    /// Starts a new browsing session; the dismissal timestamp survives.
    pub fn new_session(&self) {
        self.state
            .lock()
            .expect("prompt mutex poisoned")
            .seen_this_session = false;
    }
}

impl PromptStore for InMemoryPromptStore {
    fn dismissed_until(&self) -> Option<DateTime<Utc>> {
        self.state.lock().expect("prompt mutex poisoned").dismissed_until
    }

    fn set_dismissed_until(&self, until: DateTime<Utc>) {
        self.state
            .lock()
            .expect("prompt mutex poisoned")
            .dismissed_until = Some(until);
    }

    fn seen_this_session(&self) -> bool {
        self.state
            .lock()
            .expect("prompt mutex poisoned")
            .seen_this_session
    }

    fn mark_seen_this_session(&self) {
        self.state
            .lock()
            .expect("prompt mutex poisoned")
            .seen_this_session = true;
    }
}

#[derive(Debug)]
pub struct PromptGate<S> {
    store: S,
    dismiss_for: Duration,
}

impl<S: PromptStore> PromptGate<S> {
    pub fn new(store: S) -> Self {
        Self::with_dismiss_days(store, DEFAULT_DISMISS_DAYS)
    }

    pub fn with_dismiss_days(store: S, days: i64) -> Self {
        Self {
            store,
            dismiss_for: Duration::days(days),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn should_open(&self, now: DateTime<Utc>) -> bool {
        if self.store.seen_this_session() {
            return false;
        }
        match self.store.dismissed_until() {
            Some(until) => now >= until,
            None => true,
        }
    }

    pub fn mark_seen(&self) {
        self.store.mark_seen_this_session();
    }

    /// Hides the prompt until `now` plus the configured dismissal window.
    pub fn dismiss(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let until = now + self.dismiss_for;
        self.store.set_dismissed_until(until);
        until
    }
}
