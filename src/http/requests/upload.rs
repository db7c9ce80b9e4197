use crate::http::requests::{Request, UA};
use bytes::Bytes;
use reqwest::header::{
    HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, USER_AGENT,
};
use reqwest::Method;
use std::borrow::Cow;

/// Build the upload payload: `bytes` long, values cycling through 0..=255.
///
/// Built once per run and shared by every upload worker.
pub fn payload(bytes: usize) -> Bytes {
    (0..bytes).map(|i| (i % 256) as u8).collect::<Vec<u8>>().into()
}

pub(crate) struct Upload<'a> {
    pub url: &'a str,
    pub data: Bytes,
}

impl Request for Upload<'_> {
    const METHOD: Method = Method::POST;

    fn url(&self) -> Cow<'_, str> {
        self.url.into()
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        headers.insert(USER_AGENT, HeaderValue::from_static(UA));

        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );

        headers.insert(CONTENT_LENGTH, self.data.len().into());

        headers
    }

    fn body(&self) -> Option<Bytes> {
        Some(self.data.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_cycles_byte_values() {
        let data = payload(600);
        assert_eq!(data.len(), 600);
        assert_eq!(data[0], 0);
        assert_eq!(data[255], 255);
        assert_eq!(data[256], 0);
        assert_eq!(data[599], (599 % 256) as u8);
    }

    #[test]
    fn test_upload_headers() {
        let request =
            Upload { url: "https://example.com/post", data: payload(1024) };
        let headers = request.headers();

        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "1024");
        assert_eq!(
            headers.get(CONTENT_TYPE).unwrap(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_upload_body_shares_buffer() {
        let data = payload(64);
        let request =
            Upload { url: "https://example.com/post", data: data.clone() };
        let body = request.body().unwrap();

        assert_eq!(body.as_ptr(), data.as_ptr());
    }
}
