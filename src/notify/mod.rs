//! Delivery of the final message.
//!
//! A [`Notifier`] is picked once at startup by [`select_notifier`]. When it
//! fails, [`Reporter`] writes the message to a log file and the console
//! instead.

pub mod command;
pub mod console;
pub mod fallback;
pub mod toast;

use crate::errors::SpeedTestError;
use log::debug;
use std::process::Command;

pub use command::CommandNotifier;
pub use console::ConsoleNotifier;
pub use fallback::{Delivery, Reporter};
pub use toast::ToastNotifier;

/// Application id shown by the desktop notification system.
pub const APP_ID: &str = "SpeedTest";

pub trait Notifier {
    fn name(&self) -> &'static str;

    fn report(&self, title: &str, message: &str) -> Result<(), SpeedTestError>;
}

/// Choose the notifier for the platform this binary runs on.
pub fn select_notifier() -> Box<dyn Notifier> {
    if cfg!(target_os = "windows") {
        Box::new(ToastNotifier::new())
    } else if let Some(notifier) = CommandNotifier::for_current_os() {
        Box::new(notifier)
    } else {
        Box::new(ConsoleNotifier)
    }
}

/// Run an external notification program and wait for it.
///
/// Title and message are passed as environment variables rather than
/// interpolated into script text.
pub(crate) fn run_notification_command(
    mut command: Command,
    title: &str,
    message: &str,
) -> Result<(), SpeedTestError> {
    command
        .env("SPEED_NOTIFY_TITLE", title)
        .env("SPEED_NOTIFY_MESSAGE", message);

    let program = command.get_program().to_string_lossy().into_owned();
    debug!("Running {}", program);

    let output = command.output().map_err(|e| {
        SpeedTestError::notification(format!("could not run {}: {}", program, e))
            .with_source(Box::new(e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(SpeedTestError::notification(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
