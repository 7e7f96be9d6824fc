use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Months, Utc};
use hyper::StatusCode;
use percent_encoding::percent_decode_str;

use crate::caldav::clock::{Clock, SystemClock};
use crate::caldav::report::{build_calendar_multiget_body, build_calendar_query_body};
use crate::caldav::response::{
    calendars_from_multistatus, ctag_from_multistatus, etags_from_multistatus,
    events_from_multistatus, strip_etag_quotes, uid_from_href,
};
use crate::caldav::types::{CalendarInfo, CreatedEvent, CtagInfo, SyncOutcome};
use crate::config::CalDavConfig;
use crate::error::{DavError, Result, WriteOperation};
use crate::ical::{
    CalendarEvent, NewEvent, Organizer, RandomUid, SerializeOptions, UidGenerator, serialize_event,
};
use crate::webdav::xml::{
    build_calendar_list_propfind_body, build_ctag_propfind_body, build_etag_propfind_body,
};
use crate::webdav::{DavRequest, DavResponse, Depth, HyperTransport, Transport};

/// CalDAV sync engine for one calendar collection.
///
/// Every method issues at most one request and awaits it; there is no
/// internal retry, caching or background work. Callers keep their own
/// [`crate::caldav::SyncState`] between polls.
///
/// Cloning is cheap when the transport is (the default [`HyperTransport`]
/// shares its connection pool).
#[derive(Clone)]
pub struct CalDavClient<T = HyperTransport> {
    transport: T,
    config: Arc<CalDavConfig>,
    calendar_url: String,
    uids: Arc<dyn UidGenerator>,
    clock: Arc<dyn Clock>,
}

impl CalDavClient<HyperTransport> {
    /// Build a client on the default hyper transport.
    ///
    /// # Example
    /// ```no_run
    /// use fast_dav_sync::{CalDavClient, CalDavConfig};
    ///
    /// # async fn example() -> anyhow::Result<()> {
    /// let client = CalDavClient::new(CalDavConfig::new("me@example.com", "app-password"))?;
    /// let info = client.get_calendar_ctag().await?;
    /// println!("ctag = {:?}", info.ctag);
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: CalDavConfig) -> Result<Self> {
        config.validate()?;
        let transport = HyperTransport::from_config(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> CalDavClient<T> {
    /// Build a client on any [`Transport`], e.g. a recording fake in tests.
    pub fn with_transport(config: CalDavConfig, transport: T) -> Self {
        let calendar_url = config.calendar_url();
        Self {
            transport,
            config: Arc::new(config),
            calendar_url,
            uids: Arc::new(RandomUid),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the UUID v4 generator used for new events.
    pub fn with_uid_generator(mut self, uids: impl UidGenerator + 'static) -> Self {
        self.uids = Arc::new(uids);
        self
    }

    /// Replace the wall clock used for DTSTAMP and the default sync window.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &CalDavConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// URL of the synchronized collection, ending in `/`.
    pub fn calendar_url(&self) -> &str {
        &self.calendar_url
    }

    pub fn calendar_home_url(&self) -> String {
        self.config.calendar_home_url()
    }

    /// `{calendar_url}{uid}.ics`
    pub fn event_url(&self, uid: &str) -> String {
        format!("{}{}.ics", self.calendar_url, uid)
    }

    /// Full URLs and absolute paths pass through; a bare resource name or UID
    /// is placed in the calendar collection.
    fn resolve_event_url(&self, url_or_uid: &str) -> String {
        let target = url_or_uid.trim();
        if target.starts_with("http://") || target.starts_with("https://") || target.starts_with('/')
        {
            target.to_string()
        } else if target.ends_with(".ics") {
            format!("{}{}", self.calendar_url, target)
        } else {
            self.event_url(target)
        }
    }

    // ----------- Change detection -----------

    /// Fetch the collection ctag with a Depth 0 PROPFIND.
    ///
    /// An unchanged ctag means no event in the calendar changed since it was
    /// last recorded.
    pub async fn get_calendar_ctag(&self) -> Result<CtagInfo> {
        let request =
            DavRequest::propfind(&self.calendar_url, Depth::Zero, build_ctag_propfind_body());
        let resp = self.transport.send(request).await?;
        let resp = ensure_success(resp, |status, body| DavError::Protocol {
            context: "PROPFIND getctag",
            status,
            body,
        })?;
        ctag_from_multistatus(&resp.body)
    }

    /// Resource name → etag for every `.ics` member of the calendar.
    ///
    /// Keys are the href's last segment without `.ics`, exactly as the server
    /// sent it; pass them back unchanged to [`CalDavClient::get_events_by_uid`].
    pub async fn get_event_etags(&self) -> Result<HashMap<String, String>> {
        let request =
            DavRequest::propfind(&self.calendar_url, Depth::One, build_etag_propfind_body());
        let resp = self.transport.send(request).await?;
        let resp = ensure_success(resp, |status, body| DavError::Protocol {
            context: "PROPFIND getetag",
            status,
            body,
        })?;
        etags_from_multistatus(&resp.body)
    }

    // ----------- Sync -----------

    /// Every VEVENT overlapping `[start, end)`.
    ///
    /// Missing bounds default to three months back and twelve months ahead.
    pub async fn full_sync(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<Vec<CalendarEvent>> {
        Ok(self.full_sync_with_report(start, end).await?.events)
    }

    /// [`CalDavClient::full_sync`], also reporting resources that yielded no event.
    pub async fn full_sync_with_report(
        &self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Result<SyncOutcome> {
        let now = self.clock.now();
        let start = start.unwrap_or_else(|| now.checked_sub_months(Months::new(3)).unwrap_or(now));
        let end = end.unwrap_or_else(|| now.checked_add_months(Months::new(12)).unwrap_or(now));

        let body = build_calendar_query_body("VEVENT", Some(start), Some(end));
        let resp = self
            .transport
            .send(DavRequest::report(&self.calendar_url, Depth::One, body))
            .await?;
        let resp = ensure_success(resp, |status, body| DavError::Sync { status, body })?;

        let outcome = events_from_multistatus(&resp.body)?;
        tracing::info!(
            events = outcome.events.len(),
            skipped = outcome.skipped.len(),
            %start,
            %end,
            "full sync"
        );
        Ok(outcome)
    }

    /// Fetch specific events by resource name with one `calendar-multiget`.
    ///
    /// An empty list returns immediately without touching the network.
    /// Resources the server no longer has are simply absent from the result.
    pub async fn get_events_by_uid<I, S>(&self, uids: I) -> Result<Vec<CalendarEvent>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self.get_events_by_uid_with_report(uids).await?.events)
    }

    /// [`CalDavClient::get_events_by_uid`], also reporting skipped resources.
    pub async fn get_events_by_uid_with_report<I, S>(&self, uids: I) -> Result<SyncOutcome>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let hrefs: Vec<String> = uids
            .into_iter()
            .map(|uid| uid.as_ref().trim().to_string())
            .filter(|uid| !uid.is_empty())
            .map(|uid| self.event_url(&uid))
            .collect();
        let Some(body) = build_calendar_multiget_body(&hrefs) else {
            return Ok(SyncOutcome::default());
        };

        let resp = self
            .transport
            .send(DavRequest::report(&self.calendar_url, Depth::One, body))
            .await?;
        let resp = ensure_success(resp, |status, body| DavError::Sync { status, body })?;

        let outcome = events_from_multistatus(&resp.body)?;
        tracing::info!(
            requested = hrefs.len(),
            events = outcome.events.len(),
            skipped = outcome.skipped.len(),
            "multiget"
        );
        Ok(outcome)
    }

    // ----------- Writes -----------

    /// Serialize `event` under a freshly generated UID and PUT it.
    ///
    /// # Example
    /// ```no_run
    /// use chrono::NaiveDate;
    /// use fast_dav_sync::{CalDavClient, CalDavConfig, NewAttendee, NewEvent};
    ///
    /// # async fn example(client: CalDavClient) -> anyhow::Result<()> {
    /// let start = NaiveDate::from_ymd_opt(2024, 3, 15)
    ///     .and_then(|d| d.and_hms_opt(10, 0, 0))
    ///     .ok_or_else(|| anyhow::anyhow!("bad date"))?;
    /// let created = client
    ///     .create_event(
    ///         &NewEvent::new("Planning", start)
    ///             .with_location("Room 4")
    ///             .with_attendee(NewAttendee::named("ana@example.com", "Ana")),
    ///     )
    ///     .await?;
    /// println!("stored at {}", created.url);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_event(&self, event: &NewEvent) -> Result<CreatedEvent> {
        let generated = self.uids.generate();
        let ical_uid = match self.config.uid_domain.as_deref().filter(|d| !d.is_empty()) {
            Some(domain) => format!("{generated}@{domain}"),
            None => generated,
        };
        let url = self.event_url(&ical_uid);
        let ics = self.render(event, &ical_uid);

        let resp = self
            .transport
            .send(DavRequest::put_calendar(&url, ics.clone()))
            .await?;
        if !matches!(
            resp.status,
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
        ) {
            return Err(write_failed(WriteOperation::Create, &url, resp));
        }

        tracing::info!(uid = %ical_uid, %url, "created event");
        Ok(self.created(event, ical_uid, url, ics, &resp))
    }

    /// Rewrite the event stored at `href` (URL, path or resource name).
    ///
    /// The UID is taken from the resource name so the server sees a
    /// replacement of the same event. With `etag` the PUT is conditional and a
    /// concurrent change surfaces as [`DavError::Conflict`]; without it the
    /// last writer wins.
    pub async fn update_event(
        &self,
        href: &str,
        etag: Option<&str>,
        event: &NewEvent,
    ) -> Result<CreatedEvent> {
        let url = self.resolve_event_url(href);
        let ical_uid = uid_from_href(&url)
            .map(|name| percent_decode_str(name).decode_utf8_lossy().into_owned())
            .ok_or_else(|| DavError::InvalidResource(url.clone()))?;
        let ics = self.render(event, &ical_uid);

        let mut request = DavRequest::put_calendar(&url, ics.clone());
        if let Some(etag) = etag {
            request = request.if_match(quote_etag(etag));
        }
        let resp = self.transport.send(request).await?;
        match resp.status {
            StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT => {}
            StatusCode::PRECONDITION_FAILED if etag.is_some() => {
                tracing::warn!(%url, "update rejected, event changed on the server");
                return Err(DavError::Conflict { url });
            }
            _ => return Err(write_failed(WriteOperation::Update, &url, resp)),
        }

        tracing::info!(uid = %ical_uid, %url, "updated event");
        Ok(self.created(event, ical_uid, url, ics, &resp))
    }

    /// DELETE an event by URL or bare UID. A resource that is already gone
    /// counts as deleted.
    pub async fn delete_event(&self, url_or_uid: &str) -> Result<()> {
        let url = self.resolve_event_url(url_or_uid);
        let resp = self.transport.send(DavRequest::delete(&url)).await?;
        self.finish_delete(url, resp)
    }

    /// [`CalDavClient::delete_event`] guarded by `If-Match`.
    pub async fn delete_event_if_match(&self, url_or_uid: &str, etag: &str) -> Result<()> {
        let url = self.resolve_event_url(url_or_uid);
        let request = DavRequest::delete(&url).if_match(quote_etag(etag));
        let resp = self.transport.send(request).await?;
        if resp.status == StatusCode::PRECONDITION_FAILED {
            tracing::warn!(%url, "delete rejected, event changed on the server");
            return Err(DavError::Conflict { url });
        }
        self.finish_delete(url, resp)
    }

    fn finish_delete(&self, url: String, resp: DavResponse) -> Result<()> {
        if resp.ok() || resp.status == StatusCode::NOT_FOUND {
            tracing::info!(%url, status = resp.status.as_u16(), "deleted event");
            return Ok(());
        }
        Err(write_failed(WriteOperation::Delete, &url, resp))
    }

    // ----------- Discovery -----------

    /// Calendar collections under the user's calendar home, sorted by href.
    pub async fn get_calendars(&self) -> Result<Vec<CalendarInfo>> {
        let request = DavRequest::propfind(
            self.calendar_home_url(),
            Depth::One,
            build_calendar_list_propfind_body(),
        );
        let resp = self.transport.send(request).await?;
        let resp = ensure_success(resp, |status, body| DavError::Status {
            context: "PROPFIND calendar list",
            status,
            body,
        })?;
        calendars_from_multistatus(&resp.body)
    }

    // ----------- Helpers -----------

    fn render(&self, event: &NewEvent, ical_uid: &str) -> String {
        let config = &*self.config;
        // the account name doubles as organizer address on providers like Fastmail
        let organizer = config.username.contains('@').then(|| Organizer {
            email: config.username.as_str(),
            name: config.organizer_name.as_deref(),
        });
        serialize_event(
            event,
            &SerializeOptions {
                uid: ical_uid,
                dtstamp: self.clock.now(),
                product_id: &config.product_id,
                default_timezone: &config.default_timezone,
                organizer,
            },
        )
    }

    fn created(
        &self,
        event: &NewEvent,
        ical_uid: String,
        url: String,
        ics: String,
        resp: &DavResponse,
    ) -> CreatedEvent {
        let uid = match ical_uid.split_once('@') {
            Some((local, _)) if !local.is_empty() => local.to_string(),
            _ => ical_uid.clone(),
        };
        CreatedEvent {
            uid,
            ical_uid,
            url,
            ics,
            etag: resp.etag().map(|e| strip_etag_quotes(&e)),
            title: event.title.clone(),
            start: event.start,
            end: event.resolved_end(),
            all_day: event.all_day,
            attendees: event.attendees.clone(),
        }
    }
}

fn ensure_success<F>(resp: DavResponse, on_error: F) -> Result<DavResponse>
where
    F: FnOnce(StatusCode, String) -> DavError,
{
    if resp.ok() {
        Ok(resp)
    } else {
        Err(on_error(resp.status, resp.text()))
    }
}

fn write_failed(operation: WriteOperation, url: &str, resp: DavResponse) -> DavError {
    tracing::warn!(
        operation = operation.as_str(),
        url,
        status = resp.status.as_u16(),
        "write failed"
    );
    DavError::Write {
        operation,
        status: resp.status,
        body: resp.text(),
    }
}

fn quote_etag(etag: &str) -> String {
    let etag = etag.trim();
    if etag.starts_with('"') || etag.starts_with("W/") {
        etag.to_string()
    } else {
        format!("\"{etag}\"")
    }
}
