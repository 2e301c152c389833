use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tracing::debug;

/// How long a notification stays up unless dismissed first.
pub const NOTICE_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub message: String,
}

#[derive(Debug, Default)]
struct Drawer {
    notices: Vec<Notice>,
    next_id: u64,
}

/// Transient, dismissible error notifications.
///
/// Each notice clears itself after [`NOTICE_LIFETIME`]. The timers are never
/// cancelled, so several errors in quick succession stack up.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    drawer: Arc<Mutex<Drawer>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// Must be called from within a tokio runtime.
    pub fn show(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let id = {
            let mut drawer = self.drawer();
            let id = drawer.next_id;
            drawer.next_id += 1;
            drawer.notices.push(Notice {
                id,
                message: message.clone(),
            });
            id
        };
        debug!(id, text = %message, "showing notification");

        let notifications = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(NOTICE_LIFETIME).await;
            notifications.dismiss(id);
        });

        id
    }

    /// Dismissing an expired notice is a no-op.
    pub fn dismiss(&self, id: u64) {
        self.drawer().notices.retain(|n| n.id != id);
    }

    pub fn visible(&self) -> Vec<Notice> {
        self.drawer().notices.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.drawer().notices.is_empty()
    }

    fn drawer(&self) -> MutexGuard<'_, Drawer> {
        self.drawer.lock().unwrap_or_else(|e| e.into_inner())
    }
}
