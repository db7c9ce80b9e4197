use crate::retry::RetryConfig;
use std::time::Duration;

/// Large static file fetched by the download workers.
pub const DOWNLOAD_URL: &str = "https://hil-speed.hetzner.com/100MB.bin";

/// Echo endpoint that accepts arbitrary POST bodies.
pub const UPLOAD_URL: &str = "https://httpbin.org/post";

/// Hosts probed for idle latency.
pub const LATENCY_HOSTS: [&str; 3] = [
    "https://www.google.com",
    "https://www.cloudflare.com",
    "https://www.microsoft.com",
];

/// Host polled before anything else runs.
pub const CONNECTIVITY_URL: &str = "https://www.google.com";

/// Configuration for a speed test run.
///
/// All endpoints and timing constants live here so that tests can swap in
/// short windows and fake hosts.
#[derive(Debug, Clone)]
pub struct SpeedTestConfig {
    /// Number of concurrent workers per measurement window.
    /// Default: 4
    pub connections: usize,

    /// Length of one measurement window.
    /// Default: 10s
    pub duration: Duration,

    pub download_url: String,

    pub upload_url: String,

    /// Size of the shared upload payload.
    /// Default: 10 MiB
    pub upload_payload_bytes: usize,

    /// Timeout for a single transfer request, body included.
    /// Default: 30s
    pub request_timeout: Duration,

    pub latency_hosts: Vec<String>,

    /// Timeout for one latency probe.
    /// Default: 5s
    pub latency_timeout: Duration,

    /// Body prefix read to confirm a live connection.
    /// Default: 1024 bytes
    pub latency_read_bytes: usize,

    pub connectivity_url: String,

    /// Pause between two connectivity polls.
    /// Default: 1s
    pub connectivity_poll_interval: Duration,

    /// Timeout for one connectivity poll.
    /// Default: 3s
    pub connectivity_probe_timeout: Duration,

    /// Total time allowed for the network to come up.
    /// Default: 30s
    pub connectivity_timeout: Duration,

    /// Retry policy for the composite run.
    /// Default: 3 attempts, 2s apart
    pub retry: RetryConfig,
}

impl Default for SpeedTestConfig {
    fn default() -> Self {
        Self {
            connections: 4,
            duration: Duration::from_secs(10),
            download_url: DOWNLOAD_URL.to_string(),
            upload_url: UPLOAD_URL.to_string(),
            upload_payload_bytes: 10 << 20,
            request_timeout: Duration::from_secs(30),
            latency_hosts: LATENCY_HOSTS.iter().map(|h| h.to_string()).collect(),
            latency_timeout: Duration::from_secs(5),
            latency_read_bytes: 1024,
            connectivity_url: CONNECTIVITY_URL.to_string(),
            connectivity_poll_interval: Duration::from_secs(1),
            connectivity_probe_timeout: Duration::from_secs(3),
            connectivity_timeout: Duration::from_secs(30),
            retry: RetryConfig::default(),
        }
    }
}

impl SpeedTestConfig {
    /// Label shown next to the results: the host serving the download file.
    pub fn server_label(&self) -> String {
        url::Url::parse(&self.download_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.download_url.clone())
    }
}
