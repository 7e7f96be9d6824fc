use chrono::NaiveDateTime;
use serde::Serialize;

use crate::ical::{CalendarEvent, NewAttendee, SkipReason};

/// Collection-level change token plus the calendar's display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CtagInfo {
    pub ctag: Option<String>,
    pub display_name: Option<String>,
}

/// Summary of a calendar collection under the user's calendar home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarInfo {
    /// Last path segment of `href`, usable as `calendar_id`.
    pub id: String,
    pub href: String,
    pub name: String,
    pub ctag: Option<String>,
    pub description: Option<String>,
}

/// What `create_event` stored on the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEvent {
    /// UID without the `@domain` suffix.
    pub uid: String,
    /// UID as written into the document; also the resource name.
    pub ical_uid: String,
    pub url: String,
    pub ics: String,
    /// `ETag` header of the PUT response, quote-stripped, if the server sent one.
    pub etag: Option<String>,
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub attendees: Vec<NewAttendee>,
}

/// A multistatus `<response>` that yielded no event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedResource {
    pub href: String,
    pub reason: SkipReason,
}

/// Events of a calendar-query or multiget, with the resources that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub events: Vec<CalendarEvent>,
    pub skipped: Vec<SkippedResource>,
}

impl SyncOutcome {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
