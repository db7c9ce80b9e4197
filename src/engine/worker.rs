use crate::errors::SpeedTestError;
use crate::http::Transport;
use bytes::Bytes;
use log::debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// What a worker repeats until its deadline.
#[derive(Debug, Clone)]
pub enum Transfer {
    /// GET the url and throw the body away.
    Download { url: String },
    /// POST the shared payload to the url.
    Upload { url: String, payload: Bytes },
}

impl Transfer {
    pub fn name(&self) -> &'static str {
        match self {
            Transfer::Download { .. } => "download",
            Transfer::Upload { .. } => "upload",
        }
    }
}

/// Repeat `transfer` until `deadline`, adding the bytes of every request to
/// `total`.
///
/// Failed requests are retried straight away while time remains. A request
/// that is still running when the deadline passes is allowed to finish, but
/// no request runs longer than `request_timeout`, so the worker returns by
/// `deadline + request_timeout` at the latest.
///
/// Returns the number of bytes this worker moved.
pub async fn run<T: Transport>(
    transport: Arc<T>,
    transfer: Transfer,
    deadline: Instant,
    request_timeout: Duration,
    total: Arc<AtomicU64>,
) -> u64 {
    let progress = AtomicU64::new(0);
    let mut moved = 0u64;
    let mut requests = 0u32;
    let mut failures = 0u32;

    while Instant::now() < deadline {
        requests += 1;

        let request = async {
            match &transfer {
                Transfer::Download { url } => {
                    transport.download(url, &progress).await
                }
                Transfer::Upload { url, payload } => {
                    transport.upload(url, payload.clone(), &progress).await
                }
            }
        };
        let result = timeout(request_timeout, request).await;

        // Partial reads of a failed request still count.
        let bytes = progress.swap(0, Ordering::Relaxed);
        total.fetch_add(bytes, Ordering::Relaxed);
        moved += bytes;

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                failures += 1;
                debug!(
                    "{} request failed: {}",
                    transfer.name(),
                    SpeedTestError::transfer(e)
                );
            }
            Err(_) => {
                failures += 1;
                debug!(
                    "{} request timed out after {:?}",
                    transfer.name(),
                    request_timeout
                );
            }
        }
    }

    debug!(
        "{} worker done: {} bytes, {} requests, {} failed",
        transfer.name(),
        moved,
        requests,
        failures
    );

    moved
}
