use crate::engine::worker::{self, Transfer};
use crate::errors::SpeedTestError;
use crate::http::Transport;
use crate::measurements::{calculate_speed_mbps, MIN_WINDOW};
use futures::future::join_all;
use log::{info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Outcome of one measurement window.
#[derive(Debug, Clone)]
pub struct WindowReport {
    /// Bytes moved by all workers together.
    pub total_bytes: u64,
    /// Bytes moved by each worker, in launch order.
    pub worker_bytes: Vec<u64>,
    /// From just before the workers were launched to the last join.
    pub elapsed: Duration,
    pub speed_mbps: f64,
}

/// Runs a fixed number of workers against one shared deadline.
pub struct ThroughputMeasurer<T> {
    transport: Arc<T>,
    connections: usize,
    duration: Duration,
    request_timeout: Duration,
}

impl<T: Transport> ThroughputMeasurer<T> {
    pub fn new(
        transport: Arc<T>,
        connections: usize,
        duration: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self { transport, connections, duration, request_timeout }
    }

    /// Run one window of `transfer` and turn the byte count into Mbps.
    ///
    /// Fails with "insufficient data" when nothing was transferred or the
    /// window lasted under a second.
    pub async fn measure(
        &self,
        transfer: Transfer,
    ) -> Result<WindowReport, SpeedTestError> {
        info!(
            "Running {} test: {} connections for {:?}",
            transfer.name(),
            self.connections,
            self.duration
        );

        let total = Arc::new(AtomicU64::new(0));
        let start = Instant::now();
        let deadline = start + self.duration;

        let handles: Vec<_> = (0..self.connections)
            .map(|_| {
                tokio::spawn(worker::run(
                    self.transport.clone(),
                    transfer.clone(),
                    deadline,
                    self.request_timeout,
                    total.clone(),
                ))
            })
            .collect();

        let worker_bytes: Vec<u64> = join_all(handles)
            .await
            .into_iter()
            .map(|joined| {
                joined.unwrap_or_else(|e| {
                    warn!("{} worker did not finish: {}", transfer.name(), e);
                    0
                })
            })
            .collect();

        let elapsed = start.elapsed();
        let total_bytes = total.load(Ordering::Relaxed);

        if elapsed < MIN_WINDOW || total_bytes == 0 {
            return Err(SpeedTestError::measurement(format!(
                "insufficient data: {} bytes in {:.2}s",
                total_bytes,
                elapsed.as_secs_f64()
            )));
        }

        let speed_mbps = calculate_speed_mbps(total_bytes, elapsed);

        info!(
            "{} speed: {:.2} Mbps ({} bytes in {:.2}s)",
            transfer.name(),
            speed_mbps,
            total_bytes,
            elapsed.as_secs_f64()
        );

        Ok(WindowReport { total_bytes, worker_bytes, elapsed, speed_mbps })
    }
}
