//! Per-session conversation context
//!
//! Sliding window of the 10 most recent entries per session key, oldest
//! evicted first. Keyed per session rather than held as one shared
//! process-wide list, so concurrent widgets cannot interleave.

use std::collections::HashMap;
use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::locale::Locale;

/// Maximum entries retained per session
pub const CONTEXT_WINDOW: usize = 10;

/// One remembered exchange entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    /// "user" or "assistant"
    pub role: &'static str,
    pub content: String,
    pub locale: Locale,
}

impl ContextEntry {
    /// A user entry
    #[must_use]
    pub fn user(content: impl Into<String>, locale: Locale) -> Self {
        Self {
            role: "user",
            content: content.into(),
            locale,
        }
    }

    /// An assistant entry
    #[must_use]
    pub fn assistant(content: impl Into<String>, locale: Locale) -> Self {
        Self {
            role: "assistant",
            content: content.into(),
            locale,
        }
    }
}

/// Session-keyed sliding-window context store
#[derive(Debug, Default)]
pub struct ContextStore {
    sessions: HashMap<String, VecDeque<ContextEntry>>,
    window: usize,
}

impl ContextStore {
    /// Create a store with the standard window
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(CONTEXT_WINDOW)
    }

    /// Create a store with a custom window (tests)
    #[must_use]
    pub fn with_window(window: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            window,
        }
    }

    /// Append an entry to a session, evicting the oldest past the window
    pub fn push(&mut self, session: &str, entry: ContextEntry) {
        let window = self.window;
        let entries = self
            .sessions
            .entry(session.to_string())
            .or_default();
        entries.push_back(entry);
        while entries.len() > window {
            entries.pop_front();
        }
    }

    /// Entries for a session, oldest first
    #[must_use]
    pub fn entries(&self, session: &str) -> Vec<ContextEntry> {
        self.sessions
            .get(session)
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop one session's context
    pub fn clear(&mut self, session: &str) {
        self.sessions.remove(session);
    }

    /// Number of sessions with held context
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
