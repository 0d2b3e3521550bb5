use crate::prelude::eprintln;
use colored::Colorize;

/// Toast surface the orchestrator reports results to.
pub trait Notifier {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Prints notifications to stderr.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn success(&self, message: &str) {
        eprintln!("{} {}", "✔".green().bold(), message);
    }

    fn error(&self, message: &str) {
        eprintln!("{} {}", "✘".red().bold(), message.red());
    }
}

#[cfg(test)]
pub mod recording {
    use super::Notifier;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Toast {
        Success(String),
        Error(String),
    }

    /// Keeps every notification for later assertions.
    #[derive(Debug, Default)]
    pub struct RecordingNotifier {
        toasts: Mutex<Vec<Toast>>,
    }

    impl RecordingNotifier {
        pub fn toasts(&self) -> Vec<Toast> {
            self.toasts.lock().unwrap().clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.toasts
                .lock()
                .unwrap()
                .push(Toast::Success(message.to_string()));
        }

        fn error(&self, message: &str) {
            self.toasts
                .lock()
                .unwrap()
                .push(Toast::Error(message.to_string()));
        }
    }
}
