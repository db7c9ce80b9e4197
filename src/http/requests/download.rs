use crate::http::requests::{Request, UA};
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL, USER_AGENT};
use std::borrow::Cow;

pub(crate) struct Download<'a> {
    pub url: &'a str,
}

impl Request for Download<'_> {
    fn url(&self) -> Cow<'_, str> {
        self.url.into()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(UA));

        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));

        headers
    }
}
