//! REPORT bodies for range and explicit-resource fetches.

use chrono::{DateTime, Utc};

use crate::ical::format_utc;
use crate::webdav::escape_xml;
use crate::webdav::xml::{NS_CALDAV, NS_DAV};

/// `calendar-query` for `component` overlapping `[start, end)`, returning
/// etags and full calendar data.
pub fn build_calendar_query_body(
    component: &str,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> String {
    let mut filter = format!(
        "<C:filter><C:comp-filter name=\"VCALENDAR\"><C:comp-filter name=\"{}\">",
        escape_xml(component)
    );
    if start.is_some() || end.is_some() {
        filter.push_str("<C:time-range");
        if let Some(s) = start {
            filter.push_str(&format!(" start=\"{}\"", format_utc(&s)));
        }
        if let Some(e) = end {
            filter.push_str(&format!(" end=\"{}\"", format_utc(&e)));
        }
        filter.push_str("/>");
    }
    filter.push_str("</C:comp-filter></C:comp-filter></C:filter>");

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?><C:calendar-query xmlns:D="{NS_DAV}" xmlns:C="{NS_CALDAV}"><D:prop><D:getetag/><C:calendar-data/></D:prop>{filter}</C:calendar-query>"#
    )
}

/// `calendar-multiget` listing each href once. `None` when nothing is left to ask for.
pub fn build_calendar_multiget_body<I, S>(hrefs: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut href_xml = String::new();
    let mut seen = std::collections::HashSet::new();
    for href in hrefs {
        let href = href.as_ref();
        if href.is_empty() || !seen.insert(href.to_string()) {
            continue;
        }
        href_xml.push_str("<D:href>");
        href_xml.push_str(&escape_xml(href));
        href_xml.push_str("</D:href>");
    }
    if seen.is_empty() {
        return None;
    }

    Some(format!(
        r#"<?xml version="1.0" encoding="utf-8"?><C:calendar-multiget xmlns:D="{NS_DAV}" xmlns:C="{NS_CALDAV}"><D:prop><D:getetag/><C:calendar-data/></D:prop>{href_xml}</C:calendar-multiget>"#
    ))
}
