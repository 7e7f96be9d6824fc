use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};
use fast_dav_sync::{
    CalDavClient, CalDavConfig, DavRequest, DavResponse, FixedClock, Result, SequentialUid,
    Transport,
};
use hyper::StatusCode;

/// Replays canned responses in order and records every request it receives.
#[derive(Clone, Default)]
pub struct FakeTransport {
    responses: Arc<Mutex<VecDeque<DavResponse>>>,
    requests: Arc<Mutex<Vec<DavRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) -> &Self {
        let status = StatusCode::from_u16(status).expect("valid status");
        self.responses
            .lock()
            .unwrap()
            .push_back(DavResponse::new(status, body.to_string()));
        self
    }

    pub fn respond_with(&self, response: DavResponse) -> &Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<DavRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn single_request(&self) -> DavRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one request");
        requests.into_iter().next().unwrap()
    }
}

impl Transport for FakeTransport {
    async fn send(&self, request: DavRequest) -> Result<DavResponse> {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("a canned response for every request");
        Ok(response)
    }
}

pub fn test_config() -> CalDavConfig {
    let mut config = CalDavConfig::new("me@example.com", "secret");
    config.server_url = "https://dav.example.com".to_string();
    config.uid_domain = Some("example.com".to_string());
    config.organizer_name = Some("Me".to_string());
    config
}

pub fn test_client(transport: FakeTransport) -> CalDavClient<FakeTransport> {
    CalDavClient::with_transport(test_config(), transport)
        .with_uid_generator(SequentialUid::new(["fixed-uid"]))
        .with_clock(FixedClock(Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()))
}

pub const CALENDAR_URL: &str = "https://dav.example.com/dav/calendars/user/me%40example.com/Default/";
