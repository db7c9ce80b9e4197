extern crate clap;

mod config;
mod engine;
mod errors;
mod http;
mod measurements;
mod notify;
mod results;
mod retry;

use crate::config::SpeedTestConfig;
use crate::engine::connectivity::{ConnectivityGate, GateOutcome};
use crate::engine::runner::SpeedTestRunner;
use crate::errors::SpeedTestError;
use crate::http::client::Client;
use crate::notify::{select_notifier, Delivery, Reporter};
use crate::results::{failure_message, SpeedTestResult, REPORT_TITLE};
use clap::Parser;
use log::{error, info, warn};
use std::sync::Arc;

/// Measure download speed, upload speed and latency, then show the result
/// as a desktop notification.
#[derive(Parser)]
#[command(author, version = env!("SPEEDNOTIFY_VERSION"), about, long_about = None)]
struct Cli {}

fn main() {
    let _: Cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn"),
    )
    .init();

    let reporter = Reporter::new(select_notifier());
    let message = measure(SpeedTestConfig::default());

    // Delivery blocks on a child process and runs outside the runtime.
    if reporter.deliver(REPORT_TITLE, &message) == Delivery::Fallback {
        info!("Message appended to {}", reporter.log_path().display());
    }
}

/// Run the whole test and render the message to deliver, either the
/// results or the reason there are none.
#[tokio::main]
async fn measure(config: SpeedTestConfig) -> String {
    match speed_test(config).await {
        Ok(result) => {
            match serde_json::to_string(&result) {
                Ok(json) => info!("Result: {}", json),
                Err(e) => warn!("Could not serialize result: {}", e),
            }
            result.to_message()
        }
        Err(e) => {
            error!("{}", e);
            failure_message(&e)
        }
    }
}

async fn speed_test(
    config: SpeedTestConfig,
) -> Result<SpeedTestResult, SpeedTestError> {
    let client = Client::new(config.request_timeout).map_err(|e| {
        SpeedTestError::connectivity(format!("could not set up HTTP client: {}", e))
    })?;
    let client = Arc::new(client);

    let gate = ConnectivityGate::new(
        client.clone(),
        config.connectivity_url.clone(),
        config.connectivity_poll_interval,
        config.connectivity_probe_timeout,
        config.connectivity_timeout,
    );

    if gate.wait().await == GateOutcome::TimedOut {
        return Err(SpeedTestError::connectivity(format!(
            "{} did not answer within {}s",
            config.connectivity_url,
            config.connectivity_timeout.as_secs()
        )));
    }

    let runner = SpeedTestRunner::new(client, config);

    runner.run().await.map_err(|e| {
        warn!("{}", e);
        e.last_error
    })
}
