//! iCalendar DATE / DATE-TIME / DURATION values.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

const DATE_FORMAT: &str = "%Y%m%d";
const LOCAL_FORMAT: &str = "%Y%m%dT%H%M%S";
const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// `YYYYMMDDTHHMMSSZ`, as used for DTSTAMP and CalDAV time-range filters.
pub fn format_utc(instant: &DateTime<Utc>) -> String {
    instant.format(UTC_FORMAT).to_string()
}

/// `YYYYMMDD` for `VALUE=DATE` properties.
pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// `YYYYMMDDTHHMMSS` wall-clock time, meant to follow a `TZID` parameter.
pub fn format_local(wall_clock: &NaiveDateTime) -> String {
    wall_clock.format(LOCAL_FORMAT).to_string()
}

/// A DTSTART/DTEND style value in one of its three RFC 5545 forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcalTime {
    /// `VALUE=DATE`, an all-day boundary.
    Date(NaiveDate),
    /// Trailing `Z`.
    Utc(DateTime<Utc>),
    /// Floating, or qualified by a `TZID` the caller carries separately.
    Local(NaiveDateTime),
}

impl IcalTime {
    /// Parse a raw value. `date_only` is set when the property had `VALUE=DATE`.
    ///
    /// Any 8-character value is a date regardless of the parameter.
    pub fn parse(raw: &str, date_only: bool) -> Option<Self> {
        let raw = raw.trim();
        if date_only || raw.len() == 8 {
            let date_part = raw.get(..8)?;
            return NaiveDate::parse_from_str(date_part, DATE_FORMAT)
                .ok()
                .map(IcalTime::Date);
        }
        if let Some(utc) = raw.strip_suffix(['Z', 'z']) {
            return NaiveDateTime::parse_from_str(utc, LOCAL_FORMAT)
                .ok()
                .map(|naive| IcalTime::Utc(naive.and_utc()));
        }
        NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT)
            .ok()
            .map(IcalTime::Local)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, IcalTime::Date(_))
    }

    /// Instant for a range start. Dates map to midnight, local times are
    /// labelled UTC unchanged.
    pub fn start_instant(&self) -> DateTime<Utc> {
        match self {
            IcalTime::Date(date) => date.and_time(NaiveTime::MIN).and_utc(),
            IcalTime::Utc(instant) => *instant,
            IcalTime::Local(naive) => Utc.from_utc_datetime(naive),
        }
    }

    /// Instant for an exclusive range end. A date maps to one second before
    /// its midnight, i.e. 23:59:59 of the last day the event covers.
    pub fn end_instant(&self) -> DateTime<Utc> {
        match self {
            IcalTime::Date(_) => {
                let midnight = self.start_instant();
                midnight
                    .checked_sub_signed(Duration::seconds(1))
                    .unwrap_or(midnight)
            }
            other => other.start_instant(),
        }
    }
}

/// Parse a UTC or floating DATE-TIME (`LAST-MODIFIED`, `CREATED`) to an instant.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    match IcalTime::parse(raw, false)? {
        IcalTime::Date(_) => None,
        other => Some(other.start_instant()),
    }
}

/// Hours and minutes of a DURATION's time part (`PT1H30M` → 90 minutes).
///
/// Day, week and second components are ignored; returns `None` when neither
/// an hour nor a minute component is present, or when the amount does not fit
/// a [`Duration`].
pub fn parse_duration_hm(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };
    let time = body.split_once(['T', 't'])?.1;

    let mut minutes: i64 = 0;
    let mut seen = false;
    let mut digits = String::new();
    for ch in time.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
            continue;
        }
        let amount = if digits.is_empty() {
            0
        } else {
            digits.parse::<i64>().ok()?
        };
        digits.clear();
        match ch.to_ascii_uppercase() {
            'H' => {
                minutes = minutes.checked_add(amount.checked_mul(60)?)?;
                seen = true;
            }
            'M' => {
                minutes = minutes.checked_add(amount)?;
                seen = true;
            }
            _ => {}
        }
    }

    if !seen {
        return None;
    }
    Duration::try_minutes(if negative { -minutes } else { minutes })
}
