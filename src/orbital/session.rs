//! Per-session view state: which space is active, which collections are
//! expanded, and the transient highlight left by a search selection.
//!
//! None of this is persisted. Time is always supplied by the caller, which
//! keeps highlight expiry deterministic under test.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

/// Default lifetime of a highlight.
pub const DEFAULT_HIGHLIGHT_MS: u64 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub target_id: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct Session {
    active_space_id: String,
    expanded: HashMap<String, bool>,
    highlight: Option<Highlight>,
    highlight_for: Duration,
}

impl Session {
    pub fn new(active_space_id: impl Into<String>) -> Self {
        Self {
            active_space_id: active_space_id.into(),
            expanded: HashMap::new(),
            highlight: None,
            highlight_for: Duration::milliseconds(DEFAULT_HIGHLIGHT_MS as i64),
        }
    }

    pub fn with_highlight_ms(mut self, ms: u64) -> Self {
        self.highlight_for = Duration::milliseconds(i64::try_from(ms).unwrap_or(i64::MAX));
        self
    }

    pub fn active_space_id(&self) -> &str {
        &self.active_space_id
    }

    pub fn set_active_space(&mut self, id: impl Into<String>) {
        self.active_space_id = id.into();
    }

    /// Start over on `active_space_id`, dropping all view state.
    pub fn reset(&mut self, active_space_id: impl Into<String>) {
        self.active_space_id = active_space_id.into();
        self.expanded.clear();
        self.highlight = None;
    }

    /// Collections are expanded until told otherwise.
    pub fn is_expanded(&self, collection_id: &str) -> bool {
        self.expanded.get(collection_id).copied().unwrap_or(true)
    }

    pub fn set_expanded(&mut self, collection_id: &str, expanded: bool) {
        self.expanded.insert(collection_id.to_string(), expanded);
    }

    /// Flip a collection and return its new state.
    pub fn toggle_expanded(&mut self, collection_id: &str) -> bool {
        let next = !self.is_expanded(collection_id);
        self.set_expanded(collection_id, next);
        next
    }

    /// Drop view state for a collection that no longer exists.
    pub fn forget(&mut self, collection_id: &str) {
        self.expanded.remove(collection_id);
        if self
            .highlight
            .as_ref()
            .is_some_and(|h| h.target_id == collection_id)
        {
            self.highlight = None;
        }
    }

    /// Highlight `target_id` starting at `now`, replacing any earlier highlight.
    pub fn highlight(&mut self, target_id: impl Into<String>, now: DateTime<Utc>) -> &Highlight {
        self.highlight.insert(Highlight {
            target_id: target_id.into(),
            expires_at: now
                .checked_add_signed(self.highlight_for)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        })
    }

    /// The current highlight, if it has not expired at `now`.
    pub fn highlighted(&self, now: DateTime<Utc>) -> Option<&Highlight> {
        self.highlight.as_ref().filter(|h| now < h.expires_at)
    }

    pub fn clear_expired(&mut self, now: DateTime<Utc>) {
        if self.highlighted(now).is_none() {
            self.highlight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn collections_start_expanded() {
        let mut session = Session::new("space-home");
        assert!(session.is_expanded("col-1"));
        assert!(!session.toggle_expanded("col-1"));
        assert!(session.toggle_expanded("col-1"));
        session.set_expanded("col-1", false);
        session.forget("col-1");
        assert!(session.is_expanded("col-1"));
    }

    #[test]
    fn highlight_expires_after_delay() {
        let mut session = Session::new("space-home");
        session.highlight("link-1", at(0));
        assert_eq!(session.highlighted(at(2999)).unwrap().target_id, "link-1");
        assert!(session.highlighted(at(3000)).is_none());

        session.clear_expired(at(3000));
        assert!(session.highlighted(at(0)).is_none());
    }

    #[test]
    fn new_highlight_replaces_and_restarts() {
        let mut session = Session::new("space-home").with_highlight_ms(1000);
        session.highlight("link-1", at(0));
        session.highlight("link-2", at(800));

        let current = session.highlighted(at(1500)).unwrap();
        assert_eq!(current.target_id, "link-2");
        assert_eq!(current.expires_at, at(1800));
    }

    #[test]
    fn forgetting_highlighted_collection_clears_highlight() {
        let mut session = Session::new("space-home");
        session.highlight("col-1", at(0));
        session.forget("col-1");
        assert!(session.highlighted(at(1)).is_none());
    }
}
