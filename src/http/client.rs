use crate::errors::TransportError;
use crate::http::requests::{
    download::Download, probe::Probe, upload::Upload, Request,
};
use crate::http::Transport;
use bytes::Bytes;
use log::trace;
use reqwest::{Client as ReqwestClient, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// reqwest-backed [`Transport`].
///
/// One client is shared by every worker so connections are pooled.
#[derive(Debug, Clone)]
pub struct Client {
    client: ReqwestClient,
}

impl Client {
    /// Build a client whose requests time out after `request_timeout`,
    /// body included, unless the request sets its own timeout.
    pub fn new(request_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = ReqwestClient::builder().timeout(request_timeout).build()?;

        Ok(Client { client })
    }

    async fn send<R: Request>(
        &self,
        request: &R,
    ) -> Result<Response, TransportError> {
        let url = request.url();

        let mut builder =
            self.client.request(R::METHOD, url.as_ref()).headers(request.headers());

        if let Some(body) = request.body() {
            builder = builder.body(body);
        }

        if let Some(timeout) = request.timeout() {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?.error_for_status()?;

        trace!("{} {} -> {}", R::METHOD, url, response.status());

        Ok(response)
    }
}

/// Read the body chunk by chunk, adding every chunk to `progress`, until the
/// body ends or at least `limit` bytes were read.
async fn drain(
    mut response: Response,
    limit: Option<u64>,
    progress: &AtomicU64,
) -> Result<u64, TransportError> {
    let mut read = 0u64;

    while let Some(chunk) = response.chunk().await? {
        let len = chunk.len() as u64;
        read += len;
        progress.fetch_add(len, Ordering::Relaxed);

        if limit.is_some_and(|limit| read >= limit) {
            break;
        }
    }

    Ok(read)
}

impl Transport for Client {
    async fn download(
        &self,
        url: &str,
        progress: &AtomicU64,
    ) -> Result<(), TransportError> {
        let response = self.send(&Download { url }).await?;

        drain(response, None, progress).await?;

        Ok(())
    }

    async fn upload(
        &self,
        url: &str,
        payload: Bytes,
        progress: &AtomicU64,
    ) -> Result<(), TransportError> {
        let sent = payload.len() as u64;

        // Only the status matters; the echoed body is dropped unread.
        let _response = self.send(&Upload { url, data: payload }).await?;

        progress.fetch_add(sent, Ordering::Relaxed);

        Ok(())
    }

    async fn fetch_prefix(
        &self,
        url: &str,
        timeout: Duration,
        limit: usize,
    ) -> Result<u64, TransportError> {
        let response = self.send(&Probe { url, timeout }).await?;

        if limit == 0 {
            return Ok(0);
        }

        let read = AtomicU64::new(0);
        drain(response, Some(limit as u64), &read).await
    }
}
