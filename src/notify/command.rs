use crate::errors::SpeedTestError;
use crate::notify::{run_notification_command, Notifier, APP_ID};
use std::process::Command;

const OSASCRIPT: &str = "display notification \
    (system attribute \"SPEED_NOTIFY_MESSAGE\") \
    with title (system attribute \"SPEED_NOTIFY_TITLE\")";

/// Which command-line tool shows the notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// libnotify's `notify-send` (Linux and BSD desktops).
    NotifySend,
    /// AppleScript through `osascript` (macOS).
    Osascript,
}

/// Shows the notification through a command-line tool.
#[derive(Debug, Clone)]
pub struct CommandNotifier {
    tool: Tool,
}

impl CommandNotifier {
    pub fn new(tool: Tool) -> Self {
        Self { tool }
    }

    pub fn for_current_os() -> Option<Self> {
        if cfg!(target_os = "macos") {
            Some(Self::new(Tool::Osascript))
        } else if cfg!(any(
            target_os = "linux",
            target_os = "freebsd",
            target_os = "openbsd",
            target_os = "netbsd",
            target_os = "dragonfly"
        )) {
            Some(Self::new(Tool::NotifySend))
        } else {
            None
        }
    }

    fn command(&self, title: &str, message: &str) -> Command {
        match self.tool {
            Tool::NotifySend => {
                let mut command = Command::new("notify-send");
                command.arg(format!("--app-name={}", APP_ID)).arg(title).arg(message);
                command
            }
            Tool::Osascript => {
                let mut command = Command::new("osascript");
                command.arg("-e").arg(OSASCRIPT);
                command
            }
        }
    }
}

impl Notifier for CommandNotifier {
    fn name(&self) -> &'static str {
        "command"
    }

    fn report(&self, title: &str, message: &str) -> Result<(), SpeedTestError> {
        run_notification_command(self.command(title, message), title, message)
    }
}
