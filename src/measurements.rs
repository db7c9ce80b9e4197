use std::time::Duration;

/// Shortest window that still yields a meaningful speed.
pub const MIN_WINDOW: Duration = Duration::from_secs(1);

/// Convert a byte count over an elapsed time into megabits per second.
///
/// Returns 0.0 for a zero-length window.
pub fn calculate_speed_mbps(bytes: u64, elapsed: Duration) -> f64 {
    let seconds = elapsed.as_secs_f64();
    if seconds <= 0.0 {
        return 0.0;
    }

    (bytes as f64 * 8.0) / 1_000_000.0 / seconds
}

/// Arithmetic mean, or `None` for an empty slice.
pub fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }

    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}
