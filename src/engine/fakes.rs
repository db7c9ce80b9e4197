//! Scripted transports for engine tests.
//!
//! Every fake call sleeps before answering so that tests running on a
//! paused tokio clock see deterministic timings.

use crate::errors::TransportError;
use crate::http::Transport;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;

/// How download or upload calls behave.
#[derive(Debug, Clone)]
pub(crate) struct Behavior {
    delay: Duration,
    bytes: u64,
    step: u64,
    fail: bool,
}

impl Behavior {
    /// Succeed after `delay`, moving `bytes` bytes per download.
    pub fn ok(delay: Duration, bytes: u64) -> Self {
        Self { delay, bytes, step: 0, fail: false }
    }

    /// Fail after `delay`.
    pub fn failing(delay: Duration) -> Self {
        Self { delay, bytes: 0, step: 0, fail: true }
    }

    /// Bytes read as soon as the call starts, even when it later fails or
    /// stalls.
    pub fn with_bytes(mut self, bytes: u64) -> Self {
        self.bytes = bytes;
        self
    }

    /// Each call moves `step` bytes more than the previous one.
    pub fn with_step(mut self, step: u64) -> Self {
        self.step = step;
        self
    }
}

/// How one probed host answers.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Host {
    /// Answers after the given delay.
    Up(Duration),
    /// Refuses straight away.
    Down,
    /// Fails once the given delay has passed.
    DownAfter(Duration),
    /// Fails the first `n` calls, then answers immediately.
    UpAfter(u32),
}

fn refused() -> TransportError {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::ConnectionRefused,
        "connection refused",
    ))
}

pub(crate) struct FakeTransport {
    download: Behavior,
    upload: Behavior,
    hosts: HashMap<String, Host>,
    /// Everything fails until this many probe calls have happened.
    broken_for_probe_calls: u32,
    download_calls: AtomicU32,
    upload_calls: AtomicU32,
    probe_calls: AtomicU32,
    host_calls: Mutex<HashMap<String, u32>>,
    downloaded: AtomicU64,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            download: Behavior::ok(Duration::from_millis(100), 0),
            upload: Behavior::ok(Duration::from_millis(100), 0),
            hosts: HashMap::new(),
            broken_for_probe_calls: 0,
            download_calls: AtomicU32::new(0),
            upload_calls: AtomicU32::new(0),
            probe_calls: AtomicU32::new(0),
            host_calls: Mutex::new(HashMap::new()),
            downloaded: AtomicU64::new(0),
        }
    }

    pub fn with_download(mut self, behavior: Behavior) -> Self {
        self.download = behavior;
        self
    }

    pub fn with_upload(mut self, behavior: Behavior) -> Self {
        self.upload = behavior;
        self
    }

    pub fn with_host(mut self, url: &str, host: Host) -> Self {
        self.hosts.insert(url.to_string(), host);
        self
    }

    pub fn broken_for_probe_calls(mut self, calls: u32) -> Self {
        self.broken_for_probe_calls = calls;
        self
    }

    pub fn download_calls(&self) -> u32 {
        self.download_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> u32 {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn probe_calls(&self) -> u32 {
        self.probe_calls.load(Ordering::SeqCst)
    }

    /// Total bytes handed out by download calls.
    pub fn downloaded(&self) -> u64 {
        self.downloaded.load(Ordering::SeqCst)
    }

    fn broken(&self) -> bool {
        self.probe_calls() <= self.broken_for_probe_calls
            && self.broken_for_probe_calls > 0
    }
}

impl Transport for FakeTransport {
    async fn download(
        &self,
        _url: &str,
        progress: &AtomicU64,
    ) -> Result<(), TransportError> {
        let call = self.download_calls.fetch_add(1, Ordering::SeqCst) as u64;

        if self.broken() {
            sleep(self.download.delay).await;
            return Err(refused());
        }

        let bytes = self.download.bytes + self.download.step * call;
        progress.fetch_add(bytes, Ordering::Relaxed);
        self.downloaded.fetch_add(bytes, Ordering::SeqCst);

        sleep(self.download.delay).await;

        if self.download.fail {
            return Err(refused());
        }

        Ok(())
    }

    async fn upload(
        &self,
        _url: &str,
        payload: Bytes,
        progress: &AtomicU64,
    ) -> Result<(), TransportError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        sleep(self.upload.delay).await;

        if self.upload.fail || self.broken() {
            return Err(refused());
        }

        progress.fetch_add(payload.len() as u64, Ordering::Relaxed);

        Ok(())
    }

    async fn fetch_prefix(
        &self,
        url: &str,
        _timeout: Duration,
        limit: usize,
    ) -> Result<u64, TransportError> {
        self.probe_calls.fetch_add(1, Ordering::SeqCst);

        let seen = {
            let mut calls = self.host_calls.lock().unwrap();
            let count = calls.entry(url.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        if self.broken() {
            return Err(refused());
        }

        match self.hosts.get(url).copied() {
            Some(Host::Up(delay)) => {
                sleep(delay).await;
                Ok(limit as u64)
            }
            Some(Host::UpAfter(failures)) if seen > failures => Ok(limit as u64),
            Some(Host::DownAfter(delay)) => {
                sleep(delay).await;
                Err(refused())
            }
            _ => Err(refused()),
        }
    }
}
