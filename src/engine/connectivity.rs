use crate::http::Transport;
use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout, Instant, MissedTickBehavior};

/// Terminal state of the connectivity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Reachable,
    TimedOut,
}

/// Holds the run back until a well-known host answers.
pub struct ConnectivityGate<T> {
    transport: Arc<T>,
    url: String,
    poll_interval: Duration,
    probe_timeout: Duration,
    timeout: Duration,
}

impl<T: Transport> ConnectivityGate<T> {
    pub fn new(
        transport: Arc<T>,
        url: String,
        poll_interval: Duration,
        probe_timeout: Duration,
        timeout: Duration,
    ) -> Self {
        Self { transport, url, poll_interval, probe_timeout, timeout }
    }

    /// Poll the host once per interval until it answers or the overall
    /// timeout passes.
    pub async fn wait(&self) -> GateOutcome {
        let start = Instant::now();

        match timeout(self.timeout, self.poll()).await {
            Ok(polls) => {
                info!(
                    "{} reachable after {} poll(s), {:.1}s",
                    self.url,
                    polls,
                    start.elapsed().as_secs_f64()
                );
                GateOutcome::Reachable
            }
            Err(_) => {
                warn!("{} unreachable for {:?}, giving up", self.url, self.timeout);
                GateOutcome::TimedOut
            }
        }
    }

    /// Start one probe per tick and return the number of probes started by
    /// the time one of them succeeds.
    ///
    /// A probe that takes longer than the interval does not hold back the
    /// next tick, so several probes can be in flight at once.
    async fn poll(&self) -> u32 {
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut in_flight = FuturesUnordered::new();
        let mut polls = 0;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    polls += 1;
                    in_flight.push(self.probe(polls));
                }
                Some(reachable) = in_flight.next(), if !in_flight.is_empty() => {
                    if reachable {
                        return polls;
                    }
                }
            }
        }
    }

    async fn probe(&self, poll: u32) -> bool {
        let request =
            self.transport.fetch_prefix(&self.url, self.probe_timeout, 0);

        match timeout(self.probe_timeout, request).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                debug!("Connectivity poll {} failed: {}", poll, e);
                false
            }
            Err(_) => {
                debug!(
                    "Connectivity poll {} timed out after {:?}",
                    poll, self.probe_timeout
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::fakes::{FakeTransport, Host};

    const URL: &str = "https://gate";

    fn gate(transport: Arc<FakeTransport>) -> ConnectivityGate<FakeTransport> {
        ConnectivityGate::new(
            transport,
            URL.to_string(),
            Duration::from_secs(1),
            Duration::from_secs(3),
            Duration::from_secs(30),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_reachable_on_first_poll() {
        let transport =
            Arc::new(FakeTransport::new().with_host(URL, Host::UpAfter(0)));
        let start = Instant::now();

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::Reachable);
        assert_eq!(transport.probe_calls(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reachable_as_soon_as_host_answers() {
        let transport =
            Arc::new(FakeTransport::new().with_host(URL, Host::UpAfter(4)));
        let start = Instant::now();

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::Reachable);
        assert_eq!(transport.probe_calls(), 5);
        assert_eq!(start.elapsed(), Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_times_out_after_thirty_seconds() {
        let transport =
            Arc::new(FakeTransport::new().with_host(URL, Host::Down));
        let start = Instant::now();

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::TimedOut);
        assert_eq!(start.elapsed(), Duration::from_secs(30));
        assert!(transport.probe_calls() >= 30);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_failures_keep_one_poll_per_second() {
        let transport = Arc::new(
            FakeTransport::new()
                .with_host(URL, Host::DownAfter(Duration::from_secs(3))),
        );

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::TimedOut);
        assert!((30..=31).contains(&transport.probe_calls()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_poll_is_cut_at_probe_timeout() {
        let transport = Arc::new(
            FakeTransport::new()
                .with_host(URL, Host::Up(Duration::from_secs(60))),
        );

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::TimedOut);
        assert!((30..=31).contains(&transport.probe_calls()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_answer_within_probe_timeout_is_reachable() {
        let transport = Arc::new(
            FakeTransport::new()
                .with_host(URL, Host::Up(Duration::from_millis(2_500))),
        );
        let start = Instant::now();

        assert_eq!(gate(transport.clone()).wait().await, GateOutcome::Reachable);
        // Polls went out at 0s, 1s and 2s; the first answers at 2.5s.
        assert_eq!(start.elapsed(), Duration::from_millis(2_500));
        assert_eq!(transport.probe_calls(), 3);
    }
}
