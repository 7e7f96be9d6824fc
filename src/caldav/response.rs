//! Multistatus resources → crate records.

use std::collections::HashMap;

use crate::caldav::types::{CalendarInfo, CtagInfo, SkippedResource, SyncOutcome};
use crate::error::Result;
use crate::ical::{SkipReason, parse_event_checked};
use crate::webdav::{DavResource, parse_multistatus_bytes, parse_multistatus_bytes_visit};

/// Drop every double quote from an etag: `"abc"` → `abc`.
pub fn strip_etag_quotes(raw: &str) -> String {
    raw.trim().replace('"', "")
}

/// Resource name of an `.ics` href without the extension:
/// `/dav/calendars/user/me/Default/abc%40x.ics` → `abc%40x`.
///
/// The segment is returned as sent, still percent-encoded.
pub fn uid_from_href(href: &str) -> Option<&str> {
    let path = href.split(['?', '#']).next().unwrap_or(href);
    let segment = path.rsplit('/').next()?;
    segment.strip_suffix(".ics").filter(|uid| !uid.is_empty())
}

/// Last non-empty path segment of a collection href.
pub fn collection_id(href: &str) -> String {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Parse the calendar data of a `calendar-query`/`calendar-multiget` reply.
///
/// Resources the server reports missing, resources without calendar data and
/// resources without a usable VEVENT are left out of `events` and listed in
/// `skipped`; they never fail the whole call.
pub fn events_from_multistatus(body: &[u8]) -> Result<SyncOutcome> {
    let mut outcome = SyncOutcome::default();
    parse_multistatus_bytes_visit(body, |resource| {
        collect_event(&mut outcome, resource);
        Ok(())
    })?;
    Ok(outcome)
}

fn collect_event(outcome: &mut SyncOutcome, resource: DavResource) {
    let parsed = match resource.calendar_data.as_deref() {
        _ if resource.is_not_found() => Err(SkipReason::NotFound),
        Some(ics) if !ics.trim().is_empty() => parse_event_checked(ics),
        _ => Err(SkipReason::NoCalendarData),
    };

    match parsed {
        Ok(mut event) => {
            event.etag = resource.etag.as_deref().map(strip_etag_quotes);
            event.href = Some(resource.href);
            outcome.events.push(event);
        }
        Err(reason) => {
            tracing::debug!(href = %resource.href, reason = reason.as_str(), "skipping resource");
            outcome.skipped.push(SkippedResource {
                href: resource.href,
                reason,
            });
        }
    }
}

/// `displayname` and `getctag` of a Depth 0 PROPFIND on the collection.
pub fn ctag_from_multistatus(body: &[u8]) -> Result<CtagInfo> {
    let mut info = CtagInfo::default();
    for resource in parse_multistatus_bytes(body)? {
        if info.ctag.is_none() {
            info.ctag = resource.ctag;
        }
        if info.display_name.is_none() {
            info.display_name = resource.displayname;
        }
    }
    Ok(info)
}

/// `resource name → etag` for every `.ics` member of a Depth 1 PROPFIND.
pub fn etags_from_multistatus(body: &[u8]) -> Result<HashMap<String, String>> {
    let mut etags = HashMap::new();
    parse_multistatus_bytes_visit(body, |resource| {
        if let (Some(uid), Some(etag)) = (uid_from_href(&resource.href), &resource.etag) {
            etags.insert(uid.to_string(), strip_etag_quotes(etag));
        }
        Ok(())
    })?;
    Ok(etags)
}

/// Calendar collections of a Depth 1 PROPFIND on the calendar home, by href.
pub fn calendars_from_multistatus(body: &[u8]) -> Result<Vec<CalendarInfo>> {
    let mut calendars: Vec<CalendarInfo> = parse_multistatus_bytes(body)?
        .into_iter()
        .filter(|resource| resource.is_calendar)
        .map(|resource| {
            let id = collection_id(&resource.href);
            CalendarInfo {
                name: resource.displayname.unwrap_or_else(|| id.clone()),
                id,
                href: resource.href,
                ctag: resource.ctag,
                description: resource.calendar_description,
            }
        })
        .collect();
    calendars.sort_by(|a, b| a.href.cmp(&b.href));
    Ok(calendars)
}
