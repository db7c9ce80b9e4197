use crate::errors::SpeedTestError;
use crate::http::Transport;
use crate::measurements::mean;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};

/// Idle latency from a short GET to each of a few well-known hosts.
pub struct LatencyProbe<T> {
    transport: Arc<T>,
    hosts: Vec<String>,
    timeout: Duration,
    read_bytes: usize,
}

impl<T: Transport> LatencyProbe<T> {
    pub fn new(
        transport: Arc<T>,
        hosts: Vec<String>,
        timeout: Duration,
        read_bytes: usize,
    ) -> Self {
        Self { transport, hosts, timeout, read_bytes }
    }

    /// Time one request per host and average the hosts that answered.
    ///
    /// Each sample runs from the call to the moment the first
    /// `read_bytes` bytes of the body arrived. Hosts that fail or exceed
    /// the timeout are left out of the average; there is no retry.
    pub async fn run(&self) -> Result<f64, SpeedTestError> {
        info!("Measuring latency against {} hosts", self.hosts.len());

        let mut samples = Vec::with_capacity(self.hosts.len());

        for host in &self.hosts {
            let start = Instant::now();
            let probe = self.transport.fetch_prefix(
                host,
                self.timeout,
                self.read_bytes,
            );

            match timeout(self.timeout, probe).await {
                Ok(Ok(read)) => {
                    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                    debug!("{}: {:.2} ms ({} bytes)", host, latency_ms, read);
                    samples.push(latency_ms);
                }
                Ok(Err(e)) => warn!("Latency probe to {} failed: {}", host, e),
                Err(_) => warn!(
                    "Latency probe to {} timed out after {:?}",
                    host, self.timeout
                ),
            }
        }

        let latency_ms = mean(&samples).ok_or_else(|| {
            SpeedTestError::probe(format!(
                "no reachable targets ({} tried)",
                self.hosts.len()
            ))
        })?;

        info!(
            "Latency: {:.2} ms over {} of {} hosts",
            latency_ms,
            samples.len(),
            self.hosts.len()
        );

        Ok(latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fakes::{FakeTransport, Host};
    use crate::errors::ErrorKind;

    const HOSTS: [&str; 3] = ["https://one", "https://two", "https://three"];

    fn probe(transport: FakeTransport) -> LatencyProbe<FakeTransport> {
        LatencyProbe::new(
            Arc::new(transport),
            HOSTS.iter().map(|h| h.to_string()).collect(),
            Duration::from_secs(5),
            1024,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_average_of_all_hosts() {
        let transport = FakeTransport::new()
            .with_host(HOSTS[0], Host::Up(Duration::from_millis(10)))
            .with_host(HOSTS[1], Host::Up(Duration::from_millis(20)))
            .with_host(HOSTS[2], Host::Up(Duration::from_millis(60)));

        let latency = probe(transport).run().await.unwrap();

        assert!((latency - 30.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_host_left_out_of_average() {
        let transport = FakeTransport::new()
            .with_host(HOSTS[0], Host::Up(Duration::from_millis(10)))
            .with_host(HOSTS[1], Host::Down)
            .with_host(HOSTS[2], Host::Up(Duration::from_millis(30)));

        let latency = probe(transport).run().await.unwrap();

        assert!((latency - 20.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_reachable_host() {
        let transport = FakeTransport::new()
            .with_host(HOSTS[2], Host::Up(Duration::from_millis(42)));

        let latency = probe(transport).run().await.unwrap();

        assert!((latency - 42.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_host_counts_as_failure() {
        let transport = FakeTransport::new()
            .with_host(HOSTS[0], Host::Up(Duration::from_secs(6)))
            .with_host(HOSTS[1], Host::Up(Duration::from_millis(15)));

        let latency = probe(transport).run().await.unwrap();

        assert!((latency - 15.0).abs() < 1e-6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_reachable_targets() {
        let error = probe(FakeTransport::new()).run().await.unwrap_err();

        assert_eq!(error.kind, ErrorKind::Probe);
        assert!(error.message.contains("no reachable targets"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_request_per_host() {
        let transport = Arc::new(
            FakeTransport::new().with_host(HOSTS[0], Host::UpAfter(1)),
        );
        let probe = LatencyProbe::new(
            transport.clone(),
            HOSTS.iter().map(|h| h.to_string()).collect(),
            Duration::from_secs(5),
            1024,
        );

        // The first host would answer a second call, but there is none.
        assert!(probe.run().await.is_err());
        assert_eq!(transport.probe_calls(), 3);
    }
}
