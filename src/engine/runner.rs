use crate::config::SpeedTestConfig;
use crate::engine::latency::LatencyProbe;
use crate::engine::throughput::{ThroughputMeasurer, WindowReport};
use crate::engine::worker::Transfer;
use crate::errors::SpeedTestError;
use crate::http::requests::upload::payload;
use crate::http::Transport;
use crate::results::{SpeedTestResult, FAILED_MEASUREMENT_VALUE};
use crate::retry::{retry_async, RetryError};
use bytes::Bytes;
use log::{debug, info, warn};
use std::sync::Arc;

/// Composes latency, download and upload into one [`SpeedTestResult`].
pub struct SpeedTestRunner<T> {
    config: SpeedTestConfig,
    latency: LatencyProbe<T>,
    throughput: ThroughputMeasurer<T>,
    payload: Bytes,
}

impl<T: Transport> SpeedTestRunner<T> {
    pub fn new(transport: Arc<T>, config: SpeedTestConfig) -> Self {
        let latency = LatencyProbe::new(
            transport.clone(),
            config.latency_hosts.clone(),
            config.latency_timeout,
            config.latency_read_bytes,
        );
        let throughput = ThroughputMeasurer::new(
            transport,
            config.connections,
            config.duration,
            config.request_timeout,
        );
        let payload = payload(config.upload_payload_bytes);

        Self { config, latency, throughput, payload }
    }

    /// Run the composite test, retrying it as a whole while every
    /// measurement fails.
    pub async fn run(&self) -> Result<SpeedTestResult, RetryError<SpeedTestError>> {
        retry_async(&self.config.retry, "speed test", || self.run_once()).await
    }

    /// Run latency, download and upload once, in that order.
    ///
    /// A failing sub-test is recorded as [`FAILED_MEASUREMENT_VALUE`]. The
    /// run only fails when all three come back empty.
    pub async fn run_once(&self) -> Result<SpeedTestResult, SpeedTestError> {
        let mut failures = Vec::new();

        let latency_ms = settle("latency", self.latency.run().await, &mut failures);

        let download = Transfer::Download { url: self.config.download_url.clone() };
        let download_mbps = settle(
            "download",
            self.throughput.measure(download).await.map(speed),
            &mut failures,
        );

        let upload = Transfer::Upload {
            url: self.config.upload_url.clone(),
            payload: self.payload.clone(),
        };
        let upload_mbps = settle(
            "upload",
            self.throughput.measure(upload).await.map(speed),
            &mut failures,
        );

        let result = SpeedTestResult::new(
            download_mbps,
            upload_mbps,
            latency_ms,
            self.config.server_label(),
        );

        if result.is_empty() {
            let reason = if failures.is_empty() {
                "every measurement was zero".to_string()
            } else {
                failures.join("; ")
            };
            return Err(SpeedTestError::composite(reason));
        }

        info!(
            "Speed test complete: download={:.2} Mbps, upload={:.2} Mbps, latency={:.2} ms",
            result.download_mbps, result.upload_mbps, result.latency_ms
        );

        Ok(result)
    }
}

fn speed(report: WindowReport) -> f64 {
    debug!(
        "{} bytes in {:?}, per worker: {:?}",
        report.total_bytes, report.elapsed, report.worker_bytes
    );
    report.speed_mbps
}

/// Unwrap a sub-test result, recording a failure as the zero value.
fn settle(
    test: &str,
    outcome: Result<f64, SpeedTestError>,
    failures: &mut Vec<String>,
) -> f64 {
    match outcome {
        Ok(value) => value,
        Err(e) => {
            warn!("{} test failed: {}", test, e);
            failures.push(format!("{}: {}", test, e.message));
            FAILED_MEASUREMENT_VALUE
        }
    }
}
