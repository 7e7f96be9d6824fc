//! Event-driven walker over `207 Multi-Status` bodies.
//!
//! Elements are matched on their local name so the walker does not care which
//! prefix (`D:`, `d:`, none) a server binds to `DAV:` or the CalDAV namespace.
//!
//! A body that turns malformed after at least one complete `<response>` yields
//! the responses before the damage; a body broken before that is an error.

use std::io::{BufRead, Cursor};

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementName {
    Multistatus,
    Response,
    Propstat,
    Prop,
    Href,
    Status,
    Displayname,
    Getetag,
    Getctag,
    Resourcetype,
    Calendar,
    CalendarData,
    CalendarDescription,
    Other,
}

pub fn element_from_bytes(raw: &[u8]) -> ElementName {
    let local = match raw.iter().position(|b| *b == b':') {
        Some(idx) => &raw[idx + 1..],
        None => raw,
    };

    if local.eq_ignore_ascii_case(b"multistatus") {
        ElementName::Multistatus
    } else if local.eq_ignore_ascii_case(b"response") {
        ElementName::Response
    } else if local.eq_ignore_ascii_case(b"propstat") {
        ElementName::Propstat
    } else if local.eq_ignore_ascii_case(b"prop") {
        ElementName::Prop
    } else if local.eq_ignore_ascii_case(b"href") {
        ElementName::Href
    } else if local.eq_ignore_ascii_case(b"status") {
        ElementName::Status
    } else if local.eq_ignore_ascii_case(b"displayname") {
        ElementName::Displayname
    } else if local.eq_ignore_ascii_case(b"getetag") {
        ElementName::Getetag
    } else if local.eq_ignore_ascii_case(b"getctag") {
        ElementName::Getctag
    } else if local.eq_ignore_ascii_case(b"resourcetype") {
        ElementName::Resourcetype
    } else if local.eq_ignore_ascii_case(b"calendar") {
        ElementName::Calendar
    } else if local.eq_ignore_ascii_case(b"calendar-data") {
        ElementName::CalendarData
    } else if local.eq_ignore_ascii_case(b"calendar-description") {
        ElementName::CalendarDescription
    } else {
        ElementName::Other
    }
}

/// One `<response>` element of a multistatus body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DavResource {
    pub href: String,
    /// Response-level `<status>`, as sent for missing resources in a multiget.
    pub status: Option<String>,
    pub displayname: Option<String>,
    /// Raw `getetag` value, quotes included.
    pub etag: Option<String>,
    pub ctag: Option<String>,
    pub is_calendar: bool,
    /// Entity-decoded iCalendar payload, whitespace preserved.
    pub calendar_data: Option<String>,
    pub calendar_description: Option<String>,
}

impl DavResource {
    pub fn is_not_found(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.contains(" 404") || s.contains(" 410"))
    }
}

pub(crate) trait ResourceConsumer {
    fn consume(&mut self, resource: DavResource) -> Result<()>;
}

impl ResourceConsumer for Vec<DavResource> {
    fn consume(&mut self, resource: DavResource) -> Result<()> {
        self.push(resource);
        Ok(())
    }
}

struct Visitor<F>(F);

impl<F> ResourceConsumer for Visitor<F>
where
    F: FnMut(DavResource) -> Result<()>,
{
    fn consume(&mut self, resource: DavResource) -> Result<()> {
        (self.0)(resource)
    }
}

pub(crate) struct MultistatusParser<C> {
    stack: Vec<ElementName>,
    text: String,
    current: DavResource,
    emitted: usize,
    sink: C,
}

impl<C: ResourceConsumer> MultistatusParser<C> {
    pub fn new(sink: C) -> Self {
        Self {
            stack: Vec::with_capacity(16),
            text: String::new(),
            current: DavResource::default(),
            emitted: 0,
            sink,
        }
    }

    fn path_ends_with(&self, needle: &[ElementName]) -> bool {
        self.stack.len() >= needle.len() && self.stack[self.stack.len() - needle.len()..] == *needle
    }

    fn on_start(&mut self, event: &BytesStart<'_>) {
        let element = element_from_bytes(event.name().as_ref());
        self.stack.push(element);
        self.text.clear();

        match element {
            ElementName::Response => self.current = DavResource::default(),
            ElementName::Calendar
                if self.path_ends_with(&[ElementName::Resourcetype, ElementName::Calendar]) =>
            {
                self.current.is_calendar = true;
            }
            _ => {}
        }
    }

    fn on_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn on_end(&mut self) -> Result<()> {
        let text = std::mem::take(&mut self.text);
        self.assign(text);

        if let Some(ElementName::Response) = self.stack.pop() {
            let finished = std::mem::take(&mut self.current);
            self.sink.consume(finished)?;
            self.emitted += 1;
        }
        Ok(())
    }

    fn assign(&mut self, text: String) {
        use ElementName::*;

        // calendar-data is multi-line iCalendar; keep it byte for byte.
        if self.path_ends_with(&[Prop, CalendarData]) {
            if !text.is_empty() {
                self.current.calendar_data = Some(text);
            }
            return;
        }

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let value = Some(trimmed.to_string());

        if self.path_ends_with(&[Response, Href]) {
            self.current.href = trimmed.to_string();
        } else if self.path_ends_with(&[Response, Status]) {
            self.current.status = value;
        } else if self.path_ends_with(&[Prop, Displayname]) {
            self.current.displayname = value;
        } else if self.path_ends_with(&[Prop, Getetag]) {
            self.current.etag = value;
        } else if self.path_ends_with(&[Prop, Getctag]) {
            self.current.ctag = value;
        } else if self.path_ends_with(&[Prop, CalendarDescription]) {
            self.current.calendar_description = value;
        }
    }

    fn finish(self) -> C {
        self.sink
    }
}

fn parse_multistatus_with<R, C>(reader: R, sink: C) -> Result<C>
where
    R: BufRead,
    C: ResourceConsumer,
{
    let mut xml = Reader::from_reader(reader);
    let config = xml.config_mut();
    config.trim_text(false);
    // a bare `&` inside calendar-data is kept as text
    config.allow_dangling_amp = true;

    let mut buf = Vec::with_capacity(8 * 1024);
    let mut parser = MultistatusParser::new(sink);

    loop {
        let event = match xml.read_event_into(&mut buf) {
            Ok(event) => event,
            // responses read before the damage are still handed out
            Err(err) if parser.emitted > 0 => {
                tracing::warn!(
                    error = %err,
                    position = xml.buffer_position(),
                    parsed = parser.emitted,
                    "multistatus body is malformed, keeping the responses read so far"
                );
                break;
            }
            Err(err) => return Err(err.into()),
        };
        match event {
            Event::Start(e) => parser.on_start(&e),
            Event::Empty(e) => {
                parser.on_start(&e);
                parser.on_end()?;
            }
            Event::Text(e) => parser.on_text(&decode_text(&e)),
            Event::CData(e) => parser.on_text(&String::from_utf8_lossy(&e)),
            Event::GeneralRef(e) => parser.on_text(&resolve_reference(&e)),
            Event::End(_) => parser.on_end()?,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(parser.finish())
}

/// Parse an aggregated multistatus body into its `<response>` elements.
pub fn parse_multistatus_bytes(body: &[u8]) -> Result<Vec<DavResource>> {
    parse_multistatus_with(Cursor::new(body), Vec::new())
}

/// Walk a multistatus body, handing each `<response>` to `on_resource` as soon
/// as its closing tag is read.
pub fn parse_multistatus_bytes_visit<F>(body: &[u8], on_resource: F) -> Result<()>
where
    F: FnMut(DavResource) -> Result<()>,
{
    parse_multistatus_with(Cursor::new(body), Visitor(on_resource))?;
    Ok(())
}

fn decode_text(raw: &[u8]) -> String {
    let text = String::from_utf8_lossy(raw);
    match unescape(&text) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => text.into_owned(),
    }
}

/// Expand `&name;` / `&#NN;` / `&#xHH;` references. Unknown names are kept verbatim.
fn resolve_reference(raw: &[u8]) -> String {
    let name = String::from_utf8_lossy(raw);
    if let Some(number) = name.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => number.parse().ok(),
        };
        if let Some(ch) = code.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(value) = resolve_predefined_entity(&name) {
        return value.to_string();
    }
    format!("&{name};")
}
