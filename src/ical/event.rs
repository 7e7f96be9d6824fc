use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

/// `STATUS` of a VEVENT.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

impl EventStatus {
    /// Unknown or missing values fall back to `CONFIRMED`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TENTATIVE" => EventStatus::Tentative,
            "CANCELLED" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Confirmed => "CONFIRMED",
            EventStatus::Tentative => "TENTATIVE",
            EventStatus::Cancelled => "CANCELLED",
        }
    }
}

/// Attendee `PARTSTAT`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum PartStat {
    Accepted,
    Declined,
    Tentative,
    #[default]
    NeedsAction,
}

impl PartStat {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACCEPTED" => PartStat::Accepted,
            "DECLINED" => PartStat::Declined,
            "TENTATIVE" => PartStat::Tentative,
            _ => PartStat::NeedsAction,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PartStat::Accepted => "ACCEPTED",
            PartStat::Declined => "DECLINED",
            PartStat::Tentative => "TENTATIVE",
            PartStat::NeedsAction => "NEEDS-ACTION",
        }
    }
}

/// Attendee `ROLE`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Role {
    #[default]
    ReqParticipant,
    OptParticipant,
    Chair,
    NonParticipant,
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPT-PARTICIPANT" => Role::OptParticipant,
            "CHAIR" => Role::Chair,
            "NON-PARTICIPANT" => Role::NonParticipant,
            _ => Role::ReqParticipant,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::ReqParticipant => "REQ-PARTICIPANT",
            Role::OptParticipant => "OPT-PARTICIPANT",
            Role::Chair => "CHAIR",
            Role::NonParticipant => "NON-PARTICIPANT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    /// Lower-cased address without the `mailto:` scheme.
    pub email: String,
    pub name: Option<String>,
    pub status: PartStat,
    pub role: Role,
    pub rsvp: bool,
}

/// A VEVENT as read from the server.
///
/// Built once by the parser and never mutated afterwards; a changed event is
/// represented by parsing the re-fetched resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    /// UID with any `@domain` suffix removed.
    pub uid: String,
    /// UID exactly as it appears in the iCalendar data.
    pub ical_uid: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub all_day: bool,
    /// `TZID` of DTSTART, passed through uninterpreted.
    pub timezone: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_name: Option<String>,
    pub attendees: Vec<Attendee>,
    pub status: EventStatus,
    pub sequence: u32,
    pub recurrence_rule: Option<String>,
    pub recurrence_id: Option<String>,
    pub last_modified: Option<DateTime<Utc>>,
    pub created: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
    pub show_as_busy: bool,
    pub href: Option<String>,
    pub etag: Option<String>,
}

/// Invitee on an event creation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttendee {
    pub email: String,
    pub name: Option<String>,
}

impl NewAttendee {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
        }
    }

    pub fn named(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: Some(name.into()),
        }
    }
}

/// Event creation request consumed by [`crate::ical::serialize_event`].
///
/// `start`/`end` are wall-clock times in [`NewEvent::timezone`]; they are
/// written under that `TZID` without conversion. For all-day events only the
/// date part is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
    pub attendees: Vec<NewAttendee>,
    /// Minutes before the start, one VALARM each.
    pub reminders: Vec<u32>,
    /// IANA zone name. `None` uses the client's configured default.
    pub timezone: Option<String>,
    /// `SEQUENCE` to write; bump it when rewriting an existing event.
    pub sequence: u32,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: None,
            location: None,
            start,
            end: None,
            all_day: false,
            attendees: Vec::new(),
            reminders: vec![15],
            timezone: None,
            sequence: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    pub fn with_attendee(mut self, attendee: NewAttendee) -> Self {
        self.attendees.push(attendee);
        self
    }

    pub fn with_reminders(mut self, minutes: impl IntoIterator<Item = u32>) -> Self {
        self.reminders = minutes.into_iter().collect();
        self
    }

    pub fn with_timezone(mut self, tzid: impl Into<String>) -> Self {
        self.timezone = Some(tzid.into());
        self
    }

    pub fn with_sequence(mut self, sequence: u32) -> Self {
        self.sequence = sequence;
        self
    }

    /// Explicit end, or one day (all-day) / one hour (timed) after the start.
    /// A start too close to the end of the calendar range ends at the start.
    pub fn resolved_end(&self) -> NaiveDateTime {
        self.end.unwrap_or_else(|| {
            let length = if self.all_day {
                chrono::Duration::days(1)
            } else {
                chrono::Duration::hours(1)
            };
            self.start.checked_add_signed(length).unwrap_or(self.start)
        })
    }
}
