//! Caller-held change tokens for two-tier polling.
//!
//! A poll first compares the collection ctag; only when it moved are the
//! per-resource etags fetched and diffed, and only the changed resources are
//! fetched with a multiget. Nothing here is persisted by the crate.

use std::collections::HashMap;

use crate::caldav::types::CtagInfo;
use crate::ical::CalendarEvent;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncState {
    pub ctag: Option<String>,
    /// Resource name (`{uid}` of `{uid}.ics`) → etag.
    pub etags: HashMap<String, String>,
}

/// Resources to re-fetch and resources gone from the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EtagDiff {
    pub changed: Vec<String>,
    pub removed: Vec<String>,
}

impl EtagDiff {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && self.removed.is_empty()
    }
}

impl SyncState {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` only when both tokens are known and equal. A server that sends
    /// no ctag always counts as changed.
    pub fn ctag_unchanged(&self, current: &CtagInfo) -> bool {
        matches!((&self.ctag, &current.ctag), (Some(stored), Some(now)) if stored == now)
    }

    /// Compare stored etags with a fresh `get_event_etags` map. Both lists
    /// are sorted so results are stable across runs.
    pub fn diff(&self, server: &HashMap<String, String>) -> EtagDiff {
        let mut changed: Vec<String> = server
            .iter()
            .filter(|(uid, etag)| self.etags.get(*uid) != Some(*etag))
            .map(|(uid, _)| uid.clone())
            .collect();
        let mut removed: Vec<String> = self
            .etags
            .keys()
            .filter(|uid| !server.contains_key(*uid))
            .cloned()
            .collect();
        changed.sort();
        removed.sort();
        EtagDiff { changed, removed }
    }

    /// Remember the etags of freshly fetched events, keyed by resource name.
    pub fn record_events(&mut self, events: &[CalendarEvent]) {
        for event in events {
            let (Some(href), Some(etag)) = (&event.href, &event.etag) else {
                continue;
            };
            let key = crate::caldav::response::uid_from_href(href)
                .map(str::to_string)
                .unwrap_or_else(|| event.ical_uid.clone());
            self.etags.insert(key, etag.clone());
        }
    }

    /// Replace the stored state after a complete enumeration.
    pub fn apply(&mut self, ctag: Option<String>, etags: HashMap<String, String>) {
        self.ctag = ctag;
        self.etags = etags;
    }

    /// Drop resources reported as removed by [`SyncState::diff`].
    pub fn forget<I, S>(&mut self, uids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for uid in uids {
            self.etags.remove(uid.as_ref());
        }
    }
}
