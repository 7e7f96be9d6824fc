pub mod client;
pub mod clock;
pub mod report;
pub mod response;
pub mod sync;
pub mod types;

pub use client::CalDavClient;
pub use clock::{Clock, FixedClock, SystemClock};
pub use report::{build_calendar_multiget_body, build_calendar_query_body};
pub use response::{events_from_multistatus, strip_etag_quotes, uid_from_href};
pub use sync::{EtagDiff, SyncState};
pub use types::{CalendarInfo, CreatedEvent, CtagInfo, SkippedResource, SyncOutcome};
