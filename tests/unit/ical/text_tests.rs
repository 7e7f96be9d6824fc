use fast_dav_sync::ical::text::{
    content_lines, escape_text, fold_line, parse_content_line, split_unescaped, unescape_text,
    unfold_lines,
};

#[test]
fn unfold_joins_space_and_tab_continuations() {
    let input = "DESCRIPTION:first part\r\n  second part\r\n\tthird\r\nSUMMARY:x\r\n";
    let lines = unfold_lines(input);
    assert_eq!(
        lines,
        vec![
            "DESCRIPTION:first part second partthird".to_string(),
            "SUMMARY:x".to_string()
        ]
    );
}

#[test]
fn unfold_accepts_bare_lf_and_skips_blank_lines() {
    let input = "BEGIN:VEVENT\n\nUID:1\n ab\nEND:VEVENT";
    assert_eq!(unfold_lines(input), vec!["BEGIN:VEVENT", "UID:1ab", "END:VEVENT"]);
}

#[test]
fn fold_leaves_short_lines_alone() {
    let line = "SUMMARY:short";
    assert_eq!(fold_line(line), line);
}

#[test]
fn fold_limits_physical_lines_to_75_octets() {
    let line = format!("DESCRIPTION:{}", "x".repeat(200));
    let folded = fold_line(&line);

    for physical in folded.split("\r\n") {
        assert!(physical.len() <= 75, "line too long: {}", physical.len());
    }
    assert_eq!(unfold_lines(&folded), vec![line]);
}

#[test]
fn fold_never_splits_a_multibyte_character() {
    let line = format!("SUMMARY:{}", "é".repeat(60));
    let folded = fold_line(&line);

    for physical in folded.split("\r\n") {
        assert!(physical.len() <= 75);
    }
    assert_eq!(unfold_lines(&folded), vec![line]);
}

#[test]
fn escape_handles_all_special_characters() {
    assert_eq!(escape_text("a\\b;c,d\ne"), "a\\\\b\\;c\\,d\\ne");
    assert_eq!(escape_text("plain"), "plain");
}

#[test]
fn escape_folds_carriage_returns_into_newlines() {
    assert_eq!(escape_text("a\r\nb"), "a\\nb");
    assert_eq!(escape_text("a\rb"), "a\\nb");
    assert_eq!(escape_text("a\r\r\nb"), "a\\n\\nb");
}

#[test]
fn unescape_reverses_escape() {
    let samples = [
        "Meeting; room 4, floor 2",
        "line one\nline two",
        "back\\slash",
        "",
        "ünïcödé, ok",
    ];
    for sample in samples {
        assert_eq!(unescape_text(&escape_text(sample)), sample);
    }
}

#[test]
fn unescape_accepts_uppercase_newline_and_keeps_unknown_escapes() {
    assert_eq!(unescape_text("a\\Nb"), "a\nb");
    assert_eq!(unescape_text("a\\xb"), "a\\xb");
    assert_eq!(unescape_text("trailing\\"), "trailing\\");
}

#[test]
fn split_ignores_escaped_separators() {
    assert_eq!(
        split_unescaped("Work,Team\\, Core,Travel", ','),
        vec!["Work", "Team\\, Core", "Travel"]
    );
}

#[test]
fn content_line_with_parameters() {
    let line = parse_content_line("DTSTART;TZID=Europe/Rome;VALUE=DATE-TIME:20240101T100000")
        .expect("line tokenizes");
    assert_eq!(line.name, "DTSTART");
    assert_eq!(line.param("tzid"), Some("Europe/Rome"));
    assert_eq!(line.param("VALUE"), Some("DATE-TIME"));
    assert_eq!(line.value, "20240101T100000");
}

#[test]
fn content_line_quoted_parameter_may_contain_delimiters() {
    let line = parse_content_line(r#"ATTENDEE;CN="Doe; John: Sr.";ROLE=CHAIR:mailto:john@example.com"#)
        .expect("line tokenizes");
    assert_eq!(line.param("CN"), Some("Doe; John: Sr."));
    assert_eq!(line.param("ROLE"), Some("CHAIR"));
    assert_eq!(line.value, "mailto:john@example.com");
}

#[test]
fn content_line_value_keeps_colons() {
    let line = parse_content_line("DESCRIPTION:see https://example.com:8443/x").expect("tokenizes");
    assert_eq!(line.value, "see https://example.com:8443/x");
}

#[test]
fn content_line_without_value_separator_is_rejected() {
    assert!(parse_content_line("garbage").is_none());
    assert!(parse_content_line(r#"X;P="unterminated:value"#).is_none());
}

#[test]
fn content_lines_drops_untokenizable_lines() {
    let lines = content_lines("BEGIN:VEVENT\r\nnot a property\r\nEND:VEVENT\r\n");
    let names: Vec<&str> = lines.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["BEGIN", "END"]);
}
