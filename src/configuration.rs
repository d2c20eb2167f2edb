//! Session configuration.
//!
//! There is no process-global configuration: a [`Configuration`] value is built
//! (or deserialized) by the caller and passed in at session construction time.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a query session.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// The backend endpoint queries are posted to.
    pub endpoint: Url,

    /// Static credential pair for the endpoint, if it requires one.
    #[serde(default)]
    pub credentials: Option<Credentials>,

    /// Transport timeout for one query round trip.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    /// Where the schema declaration text was loaded from, if it came from disk.
    #[serde(default)]
    pub schema_source: Option<PathBuf>,
}

#[buildstructor::buildstructor]
impl Configuration {
    /// Returns a builder for a [`Configuration`].
    ///
    /// `endpoint` is required; `credentials`, `timeout` (default 30s) and
    /// `schema_source` are optional.
    #[builder(visibility = "pub")]
    fn new(
        endpoint: Url,
        credentials: Option<Credentials>,
        timeout: Option<Duration>,
        schema_source: Option<PathBuf>,
    ) -> Self {
        Self {
            endpoint,
            credentials,
            timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
            schema_source,
        }
    }
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

/// A static basic-auth credential pair.
#[derive(Clone, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
