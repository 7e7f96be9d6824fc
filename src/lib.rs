//! CalDAV sync engine with an iCalendar event codec.
//!
//! This library keeps a local view of one CalDAV calendar in step with the
//! server using the cheapest requests the protocol offers, built on hyper 1.x,
//! rustls and tokio.
//!
//! # Features
//!
//! - Two-tier change detection: collection `getctag`, then per-resource etags
//! - Range sync with `calendar-query` and delta fetch with `calendar-multiget`
//! - Event creation, update and idempotent deletion
//! - Lenient RFC 5545 parser: one broken event never fails a sync
//! - Automatic response decompression (br/zstd/gzip)
//! - Injectable [`Transport`], UID generator and clock for tests
//!
//! # Examples
//!
//! ## Polling for changes
//!
//! ```no_run
//! use fast_dav_sync::{CalDavClient, CalDavConfig, SyncState};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = CalDavClient::new(CalDavConfig::from_env()?)?;
//!     let mut state = SyncState::new();
//!
//!     // Tier 1: nothing to do while the collection ctag stands still.
//!     let ctag = client.get_calendar_ctag().await?;
//!     if state.ctag_unchanged(&ctag) {
//!         return Ok(());
//!     }
//!
//!     // Tier 2: compare etags and fetch only what moved.
//!     let etags = client.get_event_etags().await?;
//!     let diff = state.diff(&etags);
//!     let changed = client.get_events_by_uid(&diff.changed).await?;
//!     for event in &changed {
//!         println!("{} {:?}", event.title, event.start_date);
//!     }
//!     for uid in &diff.removed {
//!         println!("gone: {uid}");
//!     }
//!
//!     state.apply(ctag.ctag, etags);
//!     Ok(())
//! }
//! ```
//!
//! ## Full sync
//!
//! ```no_run
//! use fast_dav_sync::{CalDavClient, CalDavConfig};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = CalDavClient::new(CalDavConfig::new("me@example.com", "app-password"))?;
//!
//!     // Defaults to three months back and twelve months ahead.
//!     let outcome = client.full_sync_with_report(None, None).await?;
//!     println!(
//!         "{} events, {} resources skipped",
//!         outcome.events.len(),
//!         outcome.skipped_count()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Creating and deleting events
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use fast_dav_sync::{CalDavClient, CalDavConfig, NewAttendee, NewEvent};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = CalDavClient::new(CalDavConfig::new("me@example.com", "app-password"))?;
//!
//!     let start = NaiveDate::from_ymd_opt(2024, 6, 3)
//!         .and_then(|d| d.and_hms_opt(9, 30, 0))
//!         .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
//!     let created = client
//!         .create_event(
//!             &NewEvent::new("Weekly review", start)
//!                 .with_description("Agenda in the doc")
//!                 .with_attendee(NewAttendee::named("bo@example.com", "Bo"))
//!                 .with_reminders([10, 60]),
//!         )
//!         .await?;
//!
//!     client.delete_event(&created.url).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Parsing without a server
//!
//! ```
//! use fast_dav_sync::ical::parse_event;
//!
//! let ics = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:42@example.com\r\n\
//!            SUMMARY:Lunch\r\nDTSTART:20240101T120000Z\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
//! let event = parse_event(ics).expect("event");
//! assert_eq!(event.uid, "42");
//! assert_eq!(event.title, "Lunch");
//! ```

pub mod caldav;
pub mod common;
pub mod config;
pub mod error;
pub mod ical;
pub mod webdav;

pub use caldav::{
    CalDavClient, CalendarInfo, Clock, CreatedEvent, CtagInfo, EtagDiff, FixedClock,
    SkippedResource, SyncOutcome, SyncState, SystemClock,
};
pub use common::compression::ContentEncoding;
pub use config::CalDavConfig;
pub use error::{DavError, Result, WriteOperation};
pub use ical::{
    Attendee, CalendarEvent, EventStatus, NewAttendee, NewEvent, PartStat, RandomUid, Role,
    SequentialUid, SkipReason, UidGenerator,
};
pub use webdav::{DavMethod, DavRequest, DavResponse, Depth, HyperTransport, Transport};
