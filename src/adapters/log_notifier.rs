use tracing::warn;

use crate::ports::Notifier;

/// Notifier that reports notices through the log. Used when no UI is
/// attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn server_not_responding(&self) {
        warn!("Server not responding");
    }
}
