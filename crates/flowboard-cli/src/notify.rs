//! Notices rendered through the log.

use log::{info, warn};

use flowboard::persist::{Notice, NoticeLevel, Notifier};

/// Logs each notice and remembers the last error.
#[derive(Debug, Default)]
pub struct LogNotifier {
    last_error: Option<Notice>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent error notice, if any.
    pub fn last_error(&self) -> Option<&Notice> {
        self.last_error.as_ref()
    }
}

impl Notifier for LogNotifier {
    fn notify(&mut self, notice: Notice) {
        match notice.level() {
            NoticeLevel::Success | NoticeLevel::Info => {
                info!(level:% = notice.level(); "{}", notice.message());
            }
            NoticeLevel::Error => {
                warn!("{}", notice.message());
                self.last_error = Some(notice);
            }
        }
    }
}
