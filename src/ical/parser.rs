//! VEVENT → [`CalendarEvent`].
//!
//! Extraction is lenient: every optional property falls back to its default on
//! its own, so one malformed line never costs the whole event. Only a missing
//! VEVENT, a missing UID, or a cancelled status yield no event.

use chrono::NaiveTime;

use crate::ical::datetime::{IcalTime, parse_duration_hm, parse_instant};
use crate::ical::event::{Attendee, CalendarEvent, EventStatus, PartStat, Role};
use crate::ical::text::{ContentLine, content_lines, split_unescaped, unescape_text};

/// Why a resource produced no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The server answered `404`/`410` for the resource, as in a multiget of
    /// an event deleted in the meantime.
    NotFound,
    /// The multistatus response carried no `calendar-data`.
    NoCalendarData,
    /// No `BEGIN:VEVENT … END:VEVENT` block.
    NoEvent,
    /// The VEVENT has `STATUS:CANCELLED`.
    Cancelled,
    /// The VEVENT has no (or an empty) UID.
    MissingUid,
}

impl SkipReason {
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::NotFound => "not found",
            SkipReason::NoCalendarData => "no calendar-data",
            SkipReason::NoEvent => "no VEVENT",
            SkipReason::Cancelled => "cancelled",
            SkipReason::MissingUid => "missing UID",
        }
    }
}

/// Parse the first VEVENT of an iCalendar document.
pub fn parse_event(ics: &str) -> Option<CalendarEvent> {
    parse_event_checked(ics).ok()
}

/// Like [`parse_event`], reporting why nothing was produced.
pub fn parse_event_checked(ics: &str) -> Result<CalendarEvent, SkipReason> {
    let lines = content_lines(ics);
    let block = vevent_blocks(&lines)
        .into_iter()
        .next()
        .ok_or(SkipReason::NoEvent)?;
    parse_block(block)
}

/// Parse every VEVENT in a document: a recurring master and its overrides
/// share one resource. Blocks that would be skipped are left out.
pub fn parse_events(ics: &str) -> Vec<CalendarEvent> {
    let lines = content_lines(ics);
    vevent_blocks(&lines)
        .into_iter()
        .filter_map(|block| parse_block(block).ok())
        .collect()
}

/// Property lines of each complete VEVENT, without its BEGIN/END lines.
fn vevent_blocks(lines: &[ContentLine]) -> Vec<&[ContentLine]> {
    let mut blocks = Vec::new();
    let mut idx = 0;
    while idx < lines.len() {
        if !is_begin(&lines[idx], "VEVENT") {
            idx += 1;
            continue;
        }

        let start = idx + 1;
        let mut depth = 0usize;
        let mut end = None;
        for (offset, line) in lines[start..].iter().enumerate() {
            if line.is("BEGIN") {
                depth += 1;
            } else if line.is("END") {
                if depth == 0 {
                    if line.value.trim().eq_ignore_ascii_case("VEVENT") {
                        end = Some(start + offset);
                    }
                    break;
                }
                depth -= 1;
            }
        }

        match end {
            Some(end) => {
                blocks.push(&lines[start..end]);
                idx = end + 1;
            }
            None => break,
        }
    }
    blocks
}

fn is_begin(line: &ContentLine, component: &str) -> bool {
    line.is("BEGIN") && line.value.trim().eq_ignore_ascii_case(component)
}

/// Lines that belong to the VEVENT itself, not to a nested VALARM or similar.
fn own_properties(block: &[ContentLine]) -> Vec<&ContentLine> {
    let mut depth = 0usize;
    let mut own = Vec::with_capacity(block.len());
    for line in block {
        if line.is("BEGIN") {
            depth += 1;
        } else if line.is("END") {
            depth = depth.saturating_sub(1);
        } else if depth == 0 {
            own.push(line);
        }
    }
    own
}

fn parse_block(block: &[ContentLine]) -> Result<CalendarEvent, SkipReason> {
    if block
        .iter()
        .any(|l| l.is("STATUS") && l.value.trim().eq_ignore_ascii_case("CANCELLED"))
    {
        return Err(SkipReason::Cancelled);
    }

    let props = own_properties(block);
    let find = |name: &str| props.iter().copied().find(|l| l.is(name));

    let ical_uid = find("UID")
        .map(|l| l.value.trim().to_string())
        .filter(|uid| !uid.is_empty())
        .ok_or(SkipReason::MissingUid)?;
    let uid = display_uid(&ical_uid);

    let text = |name: &str| {
        find(name)
            .map(|l| unescape_text(&l.value))
            .filter(|v| !v.trim().is_empty())
    };
    let raw = |name: &str| {
        find(name)
            .map(|l| l.value.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let dtstart = find("DTSTART");
    let start = dtstart.and_then(ical_time);
    let all_day = dtstart.is_some_and(|l| has_date_value(l) || l.value.trim().len() == 8);
    let start_date = start.map(|t| t.start_instant());

    let end_date = match find("DTEND").and_then(ical_time) {
        Some(end) => {
            let instant = end.end_instant();
            match (end, start) {
                // zero-length or inverted all-day range: cover the start day
                (IcalTime::Date(_), Some(IcalTime::Date(day))) if instant < start_instant(day) => {
                    Some(end_of_day(day))
                }
                _ => Some(instant),
            }
        }
        None => match (start, find("DURATION").and_then(|l| parse_duration_hm(&l.value))) {
            (Some(s), Some(duration)) => s.start_instant().checked_add_signed(duration),
            (Some(IcalTime::Date(day)), None) => Some(end_of_day(day)),
            _ => None,
        },
    };

    let (organizer_email, organizer_name) = match find("ORGANIZER") {
        Some(line) => (
            mail_address(&line.value),
            line.param("CN").and_then(clean_name),
        ),
        None => (None, None),
    };

    let attendees = props
        .iter()
        .filter(|l| l.is("ATTENDEE"))
        .filter_map(|l| parse_attendee(l))
        .collect();

    let categories = props
        .iter()
        .filter(|l| l.is("CATEGORIES"))
        .flat_map(|l| split_unescaped(&l.value, ','))
        .map(|c| unescape_text(&c).trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    Ok(CalendarEvent {
        uid,
        ical_uid,
        title: find("SUMMARY")
            .map(|l| unescape_text(&l.value))
            .unwrap_or_default(),
        description: text("DESCRIPTION"),
        location: text("LOCATION"),
        start_date,
        end_date,
        all_day,
        timezone: dtstart.and_then(|l| l.param("TZID")).map(str::to_string),
        organizer_email,
        organizer_name,
        attendees,
        status: find("STATUS")
            .map(|l| EventStatus::parse(&l.value))
            .unwrap_or_default(),
        sequence: find("SEQUENCE")
            .and_then(|l| l.value.trim().parse::<u32>().ok())
            .unwrap_or(0),
        recurrence_rule: raw("RRULE"),
        recurrence_id: raw("RECURRENCE-ID"),
        last_modified: find("LAST-MODIFIED").and_then(|l| parse_instant(&l.value)),
        created: find("CREATED").and_then(|l| parse_instant(&l.value)),
        categories,
        show_as_busy: find("TRANSP")
            .is_none_or(|l| !l.value.trim().eq_ignore_ascii_case("TRANSPARENT")),
        href: None,
        etag: None,
    })
}

/// `abc-123@example.com` → `abc-123`.
fn display_uid(ical_uid: &str) -> String {
    match ical_uid.split_once('@') {
        Some((local, _)) if !local.is_empty() => local.to_string(),
        _ => ical_uid.to_string(),
    }
}

fn has_date_value(line: &ContentLine) -> bool {
    line.param("VALUE")
        .is_some_and(|v| v.eq_ignore_ascii_case("DATE"))
}

fn ical_time(line: &ContentLine) -> Option<IcalTime> {
    IcalTime::parse(&line.value, has_date_value(line))
}

fn start_instant(day: chrono::NaiveDate) -> chrono::DateTime<chrono::Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59 of `day`.
fn end_of_day(day: chrono::NaiveDate) -> chrono::DateTime<chrono::Utc> {
    let last_second = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    day.and_time(last_second).and_utc()
}

/// Lower-cased address of a `mailto:` URI; `None` for other schemes.
fn mail_address(value: &str) -> Option<String> {
    let value = value.trim();
    let scheme = value.get(..7)?;
    if !scheme.eq_ignore_ascii_case("mailto:") {
        return None;
    }
    let address = value[7..].trim();
    (!address.is_empty()).then(|| address.to_lowercase())
}

fn clean_name(raw: &str) -> Option<String> {
    let name = unescape_text(raw.trim().trim_matches('"'));
    (!name.trim().is_empty()).then(|| name.trim().to_string())
}

fn parse_attendee(line: &ContentLine) -> Option<Attendee> {
    let email = mail_address(&line.value)?;
    Some(Attendee {
        email,
        name: line.param("CN").and_then(clean_name),
        status: line.param("PARTSTAT").map(PartStat::parse).unwrap_or_default(),
        role: line.param("ROLE").map(Role::parse).unwrap_or_default(),
        rsvp: line
            .param("RSVP")
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("TRUE")),
    })
}
