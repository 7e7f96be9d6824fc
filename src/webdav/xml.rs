//! Request bodies for the PROPFIND queries the sync engine issues.

pub const NS_DAV: &str = "DAV:";
pub const NS_CALDAV: &str = "urn:ietf:params:xml:ns:caldav";
pub const NS_CALENDARSERVER: &str = "http://calendarserver.org/ns/";

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Depth 0 on the collection: display name and the collection change token.
pub fn build_ctag_propfind_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="{NS_DAV}" xmlns:CS="{NS_CALENDARSERVER}">
  <D:prop>
    <D:displayname/>
    <CS:getctag/>
  </D:prop>
</D:propfind>"#
    )
}

/// Depth 1 on the collection: one etag per member resource.
pub fn build_etag_propfind_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="{NS_DAV}">
  <D:prop>
    <D:getetag/>
    <D:getlastmodified/>
  </D:prop>
</D:propfind>"#
    )
}

/// Depth 1 on the calendar home: enough to tell calendars apart from other collections.
pub fn build_calendar_list_propfind_body() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<D:propfind xmlns:D="{NS_DAV}" xmlns:C="{NS_CALDAV}" xmlns:CS="{NS_CALENDARSERVER}">
  <D:prop>
    <D:displayname/>
    <D:resourcetype/>
    <C:calendar-description/>
    <CS:getctag/>
  </D:prop>
</D:propfind>"#
    )
}
