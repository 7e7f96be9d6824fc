//! Client configuration.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::error::{DavError, Result};

/// Characters left untouched by `encodeURIComponent`-style encoding.
const USERNAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// CalDAV account and calendar settings.
///
/// Deserializable so it can be embedded in an application's own config file;
/// [`CalDavConfig::from_env`] covers the common environment-variable setup.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CalDavConfig {
    /// Scheme and host of the CalDAV server, without the `/dav/...` path.
    #[serde(default = "default_server_url")]
    pub server_url: String,
    pub username: String,
    /// App password or API token used as the Basic auth password.
    pub token: String,
    /// Collection name under the user's calendar home.
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// IANA zone written as `TZID` on timed events that don't name one.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    /// Appended as `@domain` to generated event UIDs.
    #[serde(default)]
    pub uid_domain: Option<String>,
    /// `CN` of the `ORGANIZER` line on created events.
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default = "default_product_id")]
    pub product_id: String,
    /// Per-request timeout. `None` leaves timing out to the network stack.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_server_url() -> String {
    "https://caldav.fastmail.com".to_string()
}

fn default_calendar_id() -> String {
    "Default".to_string()
}

fn default_timezone() -> String {
    "Europe/Rome".to_string()
}

fn default_product_id() -> String {
    "-//fast-dav-sync//EN".to_string()
}

impl Default for CalDavConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            username: String::new(),
            token: String::new(),
            calendar_id: default_calendar_id(),
            default_timezone: default_timezone(),
            uid_domain: None,
            organizer_name: None,
            product_id: default_product_id(),
            timeout_secs: None,
        }
    }
}

impl CalDavConfig {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            token: token.into(),
            ..Self::default()
        }
    }

    /// Build a config from `CALDAV_*` environment variables.
    ///
    /// `CALDAV_USERNAME` and `CALDAV_TOKEN` are required; `CALDAV_SERVER_URL`,
    /// `CALDAV_CALENDAR_ID` and `CALDAV_TIMEZONE` override the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CalDavConfig::from_env`] with an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let username = non_empty("CALDAV_USERNAME")
            .ok_or_else(|| DavError::Config("CALDAV_USERNAME is not set".to_string()))?;
        let token = non_empty("CALDAV_TOKEN")
            .ok_or_else(|| DavError::Config("CALDAV_TOKEN is not set".to_string()))?;

        let mut config = Self::new(username, token);
        if let Some(url) = non_empty("CALDAV_SERVER_URL") {
            config.server_url = url;
        }
        if let Some(id) = non_empty("CALDAV_CALENDAR_ID") {
            config.calendar_id = id;
        }
        if let Some(tz) = non_empty("CALDAV_TIMEZONE") {
            config.default_timezone = tz;
        }
        Ok(config)
    }

    /// `{server}/dav/calendars/user/{username}/`, username percent-encoded.
    pub fn calendar_home_url(&self) -> String {
        format!(
            "{}/dav/calendars/user/{}/",
            self.server_url.trim_end_matches('/'),
            utf8_percent_encode(&self.username, USERNAME_ENCODE_SET)
        )
    }

    /// URL of the configured calendar collection, always ending in `/`.
    pub fn calendar_url(&self) -> String {
        format!(
            "{}{}/",
            self.calendar_home_url(),
            self.calendar_id.trim_matches('/')
        )
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.username.is_empty() {
            return Err(DavError::Config("username must not be empty".to_string()));
        }
        if !(self.server_url.starts_with("http://") || self.server_url.starts_with("https://")) {
            return Err(DavError::Config(format!(
                "server_url must be an http(s) URL, got {:?}",
                self.server_url
            )));
        }
        Ok(())
    }
}
