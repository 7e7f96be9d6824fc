use fast_dav_sync::SkipReason;
use fast_dav_sync::caldav::response::{
    calendars_from_multistatus, collection_id, ctag_from_multistatus, etags_from_multistatus,
    events_from_multistatus, strip_etag_quotes, uid_from_href,
};

#[test]
fn etag_quotes_are_removed() {
    assert_eq!(strip_etag_quotes("\"abc\""), "abc");
    assert_eq!(strip_etag_quotes("  \"abc\" "), "abc");
    assert_eq!(strip_etag_quotes("plain"), "plain");
    assert_eq!(strip_etag_quotes("W/\"weak\""), "W/weak");
}

#[test]
fn uid_comes_from_the_last_ics_segment() {
    assert_eq!(uid_from_href("/dav/cal/Default/abc.ics"), Some("abc"));
    assert_eq!(
        uid_from_href("https://h.example/cal/x%40y.ics?foo=1"),
        Some("x%40y")
    );
    assert_eq!(uid_from_href("/dav/cal/Default/"), None);
    assert_eq!(uid_from_href("/dav/cal/Default/notes.txt"), None);
    assert_eq!(uid_from_href("/dav/cal/.ics"), None);
}

#[test]
fn collection_id_ignores_trailing_slash() {
    assert_eq!(collection_id("/dav/calendars/user/me/Work/"), "Work");
    assert_eq!(collection_id("/dav/calendars/user/me/Work"), "Work");
}

#[test]
fn entity_encoded_calendar_data_is_parsed() {
    let xml = "<d:multistatus xmlns:d=\"DAV:\" xmlns:c=\"urn:ietf:params:xml:ns:caldav\">\
<d:response><d:href>/cal/q.ics</d:href><d:propstat><d:prop>\
<d:getetag>&quot;q-1&quot;</d:getetag>\
<c:calendar-data>BEGIN:VCALENDAR&#13;\nBEGIN:VEVENT&#13;\nUID:q&#13;\nSUMMARY:R&amp;D &lt;sync&gt;&#13;\nEND:VEVENT&#13;\nEND:VCALENDAR&#13;\n</c:calendar-data>\
</d:prop></d:propstat></d:response></d:multistatus>";

    let outcome = events_from_multistatus(xml.as_bytes()).expect("parses");
    assert!(outcome.skipped.is_empty());
    assert_eq!(outcome.events.len(), 1);

    let event = &outcome.events[0];
    assert_eq!(event.title, "R&D <sync>");
    assert_eq!(event.etag.as_deref(), Some("q-1"));
    assert_eq!(event.href.as_deref(), Some("/cal/q.ics"));
}

#[test]
fn unusable_resources_are_reported_not_failed() {
    let xml = r#"<d:multistatus xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
<d:response><d:href>/cal/empty.ics</d:href><d:propstat><d:prop><c:calendar-data>   </c:calendar-data></d:prop></d:propstat></d:response>
<d:response><d:href>/cal/todo.ics</d:href><d:propstat><d:prop><c:calendar-data>BEGIN:VCALENDAR
BEGIN:VTODO
UID:t
END:VTODO
END:VCALENDAR
</c:calendar-data></d:prop></d:propstat></d:response>
<d:response><d:href>/cal/nouid.ics</d:href><d:propstat><d:prop><c:calendar-data>BEGIN:VCALENDAR
BEGIN:VEVENT
SUMMARY:no uid
END:VEVENT
END:VCALENDAR
</c:calendar-data></d:prop></d:propstat></d:response>
<d:response><d:href>/cal/missing.ics</d:href><d:status>HTTP/1.1 404 Not Found</d:status></d:response>
</d:multistatus>"#;

    let outcome = events_from_multistatus(xml.as_bytes()).expect("parses");
    assert!(outcome.events.is_empty());
    assert_eq!(outcome.skipped_count(), 4);

    let reasons: Vec<SkipReason> = outcome.skipped.iter().map(|s| s.reason).collect();
    assert_eq!(
        reasons,
        vec![
            SkipReason::NoCalendarData,
            SkipReason::NoEvent,
            SkipReason::MissingUid,
            SkipReason::NotFound
        ]
    );
}

#[test]
fn ctag_and_display_name_are_extracted() {
    let xml = r#"<D:multistatus xmlns:D="DAV:" xmlns:CS="http://calendarserver.org/ns/">
<D:response><D:href>/cal/</D:href><D:propstat><D:prop>
<D:displayname>Home</D:displayname><CS:getctag>"c-9"</CS:getctag>
</D:prop></D:propstat></D:response></D:multistatus>"#;

    let info = ctag_from_multistatus(xml.as_bytes()).expect("parses");
    assert_eq!(info.ctag.as_deref(), Some("\"c-9\""));
    assert_eq!(info.display_name.as_deref(), Some("Home"));
}

#[test]
fn missing_ctag_is_none() {
    let xml = r#"<D:multistatus xmlns:D="DAV:"><D:response><D:href>/cal/</D:href></D:response></D:multistatus>"#;
    let info = ctag_from_multistatus(xml.as_bytes()).expect("parses");
    assert_eq!(info.ctag, None);
    assert_eq!(info.display_name, None);
}

#[test]
fn etag_map_skips_members_without_etag() {
    let xml = r#"<D:multistatus xmlns:D="DAV:">
<D:response><D:href>/cal/a.ics</D:href><D:propstat><D:prop><D:getetag>"1"</D:getetag></D:prop></D:propstat></D:response>
<D:response><D:href>/cal/b.ics</D:href><D:propstat><D:prop/></D:propstat></D:response>
</D:multistatus>"#;

    let etags = etags_from_multistatus(xml.as_bytes()).expect("parses");
    assert_eq!(etags.len(), 1);
    assert_eq!(etags["a"], "1");
}

#[test]
fn calendars_without_calendar_resourcetype_are_ignored() {
    let xml = r#"<D:multistatus xmlns:D="DAV:">
<D:response><D:href>/home/inbox/</D:href><D:propstat><D:prop><D:resourcetype><D:collection/></D:resourcetype></D:prop></D:propstat></D:response>
</D:multistatus>"#;
    assert!(calendars_from_multistatus(xml.as_bytes()).expect("parses").is_empty());
}

#[test]
fn stray_ampersand_does_not_lose_the_calendar() {
    let xml = "<d:multistatus xmlns:d=\"DAV:\" xmlns:c=\"urn:ietf:params:xml:ns:caldav\">\
<d:response><d:href>/cal/good.ics</d:href><d:propstat><d:prop>\
<c:calendar-data>BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:good\nSUMMARY:Lunch\nEND:VEVENT\nEND:VCALENDAR\n</c:calendar-data>\
</d:prop></d:propstat></d:response>\
<d:response><d:href>/cal/cartoon.ics</d:href><d:propstat><d:prop>\
<c:calendar-data>BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:cartoon\nSUMMARY:Tom & Jerry\nEND:VEVENT\nEND:VCALENDAR\n</c:calendar-data>\
</d:prop></d:propstat></d:response></d:multistatus>";

    let outcome = events_from_multistatus(xml.as_bytes()).expect("parses");
    let titles: Vec<&str> = outcome.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Lunch", "Tom & Jerry"]);
}

#[test]
fn damaged_tail_keeps_the_events_before_it() {
    let xml = "<d:multistatus xmlns:d=\"DAV:\" xmlns:c=\"urn:ietf:params:xml:ns:caldav\">\
<d:response><d:href>/cal/good.ics</d:href><d:propstat><d:prop>\
<c:calendar-data>BEGIN:VCALENDAR\nBEGIN:VEVENT\nUID:good\nSUMMARY:Lunch\nEND:VEVENT\nEND:VCALENDAR\n</c:calendar-data>\
</d:prop></d:propstat></d:response>\
<d:response><d:href>/cal/broken.ics</d:href><d:propstat><d:prop>\
<c:calendar-data>BEGIN:VCALENDAR</d:href></d:response></d:multistatus>";

    let outcome = events_from_multistatus(xml.as_bytes()).expect("keeps what was read");
    assert_eq!(outcome.events.len(), 1);
    assert_eq!(outcome.events[0].uid, "good");
    assert!(outcome.skipped.is_empty());
}
