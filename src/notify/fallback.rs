use crate::errors::SpeedTestError;
use crate::notify::{ConsoleNotifier, Notifier};
use chrono::Utc;
use log::{info, warn};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File that collects messages whose notification could not be shown.
pub const FALLBACK_LOG: &str = "speedtest_error.log";

/// How a message ended up being delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Notified,
    Fallback,
}

/// Sends the message through the selected notifier, falling back to the
/// log file and the console when that fails.
pub struct Reporter {
    notifier: Box<dyn Notifier>,
    console: ConsoleNotifier,
    log_path: PathBuf,
}

impl Reporter {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            console: ConsoleNotifier,
            log_path: PathBuf::from(FALLBACK_LOG),
        }
    }

    pub fn with_log_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_path = path.into();
        self
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn deliver(&self, title: &str, message: &str) -> Delivery {
        let error = match self.notifier.report(title, message) {
            Ok(()) => {
                info!("Results delivered through {} notifier", self.notifier.name());
                return Delivery::Notified;
            }
            Err(e) => e,
        };

        warn!("{} notification failed: {}", self.notifier.name(), error);

        if let Err(e) = self.append_log(&error, message) {
            warn!("Could not write {}: {}", self.log_path.display(), e);
        }

        if let Err(e) = self.console.report(title, message) {
            warn!("Console output failed: {}", e);
        }

        Delivery::Fallback
    }

    fn append_log(
        &self,
        error: &SpeedTestError,
        message: &str,
    ) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;

        writeln!(
            file,
            "[{}] Error showing notification: {}",
            Utc::now().to_rfc3339(),
            error.message
        )?;
        writeln!(file, "{}", message)?;

        Ok(())
    }
}
