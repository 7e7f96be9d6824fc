//! [`NewEvent`] → VCALENDAR document ready for a CalDAV `PUT`.

use chrono::{DateTime, Utc};

use crate::ical::datetime::{format_date, format_local, format_utc};
use crate::ical::event::NewEvent;
use crate::ical::text::{escape_text, fold_line};

/// Everything the serializer needs besides the request itself.
#[derive(Debug, Clone)]
pub struct SerializeOptions<'a> {
    /// Full UID, domain suffix included.
    pub uid: &'a str,
    pub dtstamp: DateTime<Utc>,
    pub product_id: &'a str,
    /// Used when the request names no timezone.
    pub default_timezone: &'a str,
    pub organizer: Option<Organizer<'a>>,
}

#[derive(Debug, Clone, Copy)]
pub struct Organizer<'a> {
    pub email: &'a str,
    pub name: Option<&'a str>,
}

/// Render `event` as an RFC 5545 document with CRLF line endings.
///
/// Timed events are written as wall-clock values under `TZID`; no UTC
/// conversion takes place. `METHOD:REQUEST` is used as soon as there is an
/// attendee, so clients treat the resource as an invitation.
pub fn serialize_event(event: &NewEvent, options: &SerializeOptions<'_>) -> String {
    let end = event.resolved_end();
    let tzid = event
        .timezone
        .as_deref()
        .unwrap_or(options.default_timezone);

    let (dtstart, dtend) = if event.all_day {
        let start_day = event.start.date();
        // DTEND is exclusive, so an all-day event always spans at least one date
        let next_day = start_day
            .checked_add_days(chrono::Days::new(1))
            .unwrap_or(start_day);
        let end_day = end.date().max(next_day);
        (
            format!("DTSTART;VALUE=DATE:{}", format_date(&start_day)),
            format!("DTEND;VALUE=DATE:{}", format_date(&end_day)),
        )
    } else {
        (
            format!("DTSTART;TZID={tzid}:{}", format_local(&event.start)),
            format!("DTEND;TZID={tzid}:{}", format_local(&end)),
        )
    };

    let method = if event.attendees.is_empty() {
        "PUBLISH"
    } else {
        "REQUEST"
    };

    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", options.product_id),
        "CALSCALE:GREGORIAN".to_string(),
        format!("METHOD:{method}"),
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", options.uid),
        format!("DTSTAMP:{}", format_utc(&options.dtstamp)),
        dtstart,
        dtend,
        format!("SUMMARY:{}", escape_text(&event.title)),
    ];

    if let Some(description) = event.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(format!("DESCRIPTION:{}", escape_text(description)));
    }
    if let Some(location) = event.location.as_deref().filter(|l| !l.is_empty()) {
        lines.push(format!("LOCATION:{}", escape_text(location)));
    }

    for attendee in &event.attendees {
        let cn = attendee
            .name
            .as_deref()
            .filter(|n| !n.is_empty())
            .map(|n| format!(";CN={}", param_text(n)))
            .unwrap_or_default();
        lines.push(format!(
            "ATTENDEE;CUTYPE=INDIVIDUAL;ROLE=REQ-PARTICIPANT;PARTSTAT=NEEDS-ACTION;RSVP=TRUE{cn}:mailto:{}",
            attendee.email.trim()
        ));
    }

    if let Some(organizer) = &options.organizer {
        let cn = organizer
            .name
            .filter(|n| !n.is_empty())
            .map(|n| format!(";CN={}", param_text(n)))
            .unwrap_or_default();
        lines.push(format!("ORGANIZER{cn}:mailto:{}", organizer.email));
    }

    lines.push("STATUS:CONFIRMED".to_string());
    lines.push(format!("SEQUENCE:{}", event.sequence));

    for minutes in &event.reminders {
        lines.extend([
            "BEGIN:VALARM".to_string(),
            "ACTION:DISPLAY".to_string(),
            "DESCRIPTION:Reminder".to_string(),
            format!("TRIGGER:-PT{minutes}M"),
            "END:VALARM".to_string(),
        ]);
    }

    lines.push("END:VEVENT".to_string());
    lines.push("END:VCALENDAR".to_string());

    let mut ics = String::with_capacity(lines.iter().map(|l| l.len() + 2).sum());
    for line in &lines {
        ics.push_str(&fold_line(line));
        ics.push_str("\r\n");
    }
    ics
}

/// Text-escape a parameter value, quoting it when it holds a delimiter.
/// Double quotes cannot be represented in a parameter and are dropped.
fn param_text(raw: &str) -> String {
    let escaped = escape_text(&raw.replace('"', ""));
    if escaped.contains([':', ';', ',']) {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}
