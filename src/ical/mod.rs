//! iCalendar (RFC 5545) codec for VEVENTs.
//!
//! The parser accepts whatever other clients stored on the server; the
//! serializer writes the single event shape this crate creates.

pub mod datetime;
pub mod event;
pub mod parser;
pub mod serializer;
pub mod text;
pub mod uid;

pub use datetime::{IcalTime, format_date, format_local, format_utc};
pub use event::{Attendee, CalendarEvent, EventStatus, NewAttendee, NewEvent, PartStat, Role};
pub use parser::{SkipReason, parse_event, parse_event_checked, parse_events};
pub use serializer::{Organizer, SerializeOptions, serialize_event};
pub use text::{escape_text, fold_line, unescape_text, unfold_lines};
pub use uid::{RandomUid, SequentialUid, UidGenerator};
