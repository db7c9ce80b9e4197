pub mod download;
pub mod probe;
pub mod upload;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Method;
use std::borrow::Cow;
use std::time::Duration;

pub(crate) const UA: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub trait Request {
    const METHOD: Method = Method::GET;

    fn url(&self) -> Cow<'_, str>;

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(UA));

        headers
    }

    fn body(&self) -> Option<Bytes> {
        None
    }

    /// Overrides the client-wide timeout for this request.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}
