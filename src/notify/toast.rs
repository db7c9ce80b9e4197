use crate::errors::SpeedTestError;
use crate::notify::{run_notification_command, Notifier, APP_ID};
use std::process::Command;

/// Builds a two-line toast through the WinRT notification API. The title
/// and message are read from the environment by the script itself.
fn toast_script(app_id: &str) -> String {
    format!(
        r#"$ErrorActionPreference = 'Stop'
[Windows.UI.Notifications.ToastNotificationManager, Windows.UI.Notifications, ContentType = WindowsRuntime] > $null
$template = [Windows.UI.Notifications.ToastNotificationManager]::GetTemplateContent([Windows.UI.Notifications.ToastTemplateType]::ToastText02)
$texts = $template.GetElementsByTagName('text')
$texts.Item(0).AppendChild($template.CreateTextNode($env:SPEED_NOTIFY_TITLE)) > $null
$texts.Item(1).AppendChild($template.CreateTextNode($env:SPEED_NOTIFY_MESSAGE)) > $null
$toast = [Windows.UI.Notifications.ToastNotification]::new($template)
[Windows.UI.Notifications.ToastNotificationManager]::CreateToastNotifier('{}').Show($toast)"#,
        app_id
    )
}

/// Native Windows toast notification, shown through PowerShell.
#[derive(Debug, Clone)]
pub struct ToastNotifier {
    app_id: String,
}

impl ToastNotifier {
    pub fn new() -> Self {
        Self { app_id: APP_ID.to_string() }
    }

    fn command(&self) -> Command {
        let mut command = Command::new("powershell");
        command
            .args(["-NoProfile", "-NonInteractive", "-WindowStyle", "Hidden"])
            .arg("-Command")
            .arg(toast_script(&self.app_id));
        command
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ToastNotifier {
    fn name(&self) -> &'static str {
        "toast"
    }

    fn report(&self, title: &str, message: &str) -> Result<(), SpeedTestError> {
        run_notification_command(self.command(), title, message)
    }
}
