//! The result record of a speed test run and its human-readable form.

use crate::errors::SpeedTestError;
use serde::Serialize;

/// Value recorded for a sub-test that failed.
///
/// A failed measurement and a genuinely measured zero look the same in a
/// [`SpeedTestResult`].
pub const FAILED_MEASUREMENT_VALUE: f64 = 0.0;

/// Title of the notification carrying the results.
pub const REPORT_TITLE: &str = "Speed Test Results";

/// Results of one composite run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedTestResult {
    pub download_mbps: f64,
    pub upload_mbps: f64,
    pub latency_ms: f64,
    /// Host that served the download test.
    pub server_label: String,
}

impl SpeedTestResult {
    pub fn new(
        download_mbps: f64,
        upload_mbps: f64,
        latency_ms: f64,
        server_label: String,
    ) -> Self {
        Self { download_mbps, upload_mbps, latency_ms, server_label }
    }

    /// True when no sub-test produced a value.
    pub fn is_empty(&self) -> bool {
        [self.download_mbps, self.upload_mbps, self.latency_ms]
            .iter()
            .all(|&value| value == FAILED_MEASUREMENT_VALUE)
    }

    /// Render the notification body, one line per measurement.
    pub fn to_message(&self) -> String {
        let lines = [
            measurement_line("⬇️ Download Speed", "Download", self.download_mbps, "Mbps"),
            measurement_line("⬆️ Upload Speed", "Upload", self.upload_mbps, "Mbps"),
            measurement_line("📶 Latency", "Latency", self.latency_ms, "ms"),
            format!("🌐 Server: {}", self.server_label),
        ];

        lines.join("\n")
    }
}

fn measurement_line(label: &str, test: &str, value: f64, unit: &str) -> String {
    if value == FAILED_MEASUREMENT_VALUE {
        format!("❌ {} test failed", test)
    } else {
        format!("{}: {:.2} {}", label, value, unit)
    }
}

/// Render the notification body for a run that produced no result.
pub fn failure_message(error: &SpeedTestError) -> String {
    let mut message = format!("❌ Speed test failed: {}", error.message);

    if let Some(ref suggestion) = error.suggestion {
        message.push_str(&format!("\n{}", suggestion));
    }

    message
}
