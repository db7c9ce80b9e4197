use crate::errors::SpeedTestError;
use crate::notify::Notifier;
use colored::Colorize;

/// Prints the report to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn render(&self, title: &str, message: &str) -> String {
        let mut output = format!("{}\n", title.bold().white());

        for line in message.lines() {
            output.push_str(&format!("  {}\n", line.bright_cyan()));
        }

        output
    }
}

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn report(&self, title: &str, message: &str) -> Result<(), SpeedTestError> {
        print!("{}", self.render(title, message));
        Ok(())
    }
}
