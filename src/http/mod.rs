//! HTTP access for the measurements.
//!
//! Everything that touches the network goes through [`Transport`]. The
//! production implementation is [`client::Client`]; tests drive the engine
//! with scripted transports instead.

pub mod client;
pub mod requests;

use crate::errors::TransportError;
use bytes::Bytes;
use std::future::Future;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

pub trait Transport: Send + Sync + 'static {
    /// GET `url` and discard the body.
    ///
    /// Bytes are added to `progress` as they arrive, so a request that fails
    /// half way still accounts for what it read.
    fn download(
        &self,
        url: &str,
        progress: &AtomicU64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// POST `payload` to `url`. On success the payload length is added to
    /// `progress`.
    fn upload(
        &self,
        url: &str,
        payload: Bytes,
        progress: &AtomicU64,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// GET `url` with its own `timeout` and read at most `limit` bytes of the
    /// body. Returns the number of bytes read.
    fn fetch_prefix(
        &self,
        url: &str,
        timeout: Duration,
        limit: usize,
    ) -> impl Future<Output = Result<u64, TransportError>> + Send;
}
