use crate::http::requests::Request;
use std::borrow::Cow;
use std::time::Duration;

/// Short GET used for latency samples and connectivity polls.
pub(crate) struct Probe<'a> {
    pub url: &'a str,
    pub timeout: Duration,
}

impl Request for Probe<'_> {
    fn url(&self) -> Cow<'_, str> {
        self.url.into()
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.timeout)
    }
}
