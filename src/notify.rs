use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::config::NotificationConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    LoginFailed,
    CarDeleted,
}

impl NoticeKind {
    pub fn message(self) -> &'static str {
        match self {
            NoticeKind::LoginFailed => "Login failed: Check your username and password",
            NoticeKind::CarDeleted => "Car deleted",
        }
    }
}

/// A transient, non-blocking notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: NoticeKind,
    pub raised_at: Instant,
    pub expires_at: Instant,
}

impl Toast {
    pub fn message(&self) -> &'static str {
        self.kind.message()
    }

    pub fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Toasts currently on screen. At most one per kind; raising a kind again
/// restarts its timer. Clones share the same list.
#[derive(Debug, Clone)]
pub struct Notifications {
    durations: NotificationConfig,
    active: Arc<Mutex<Vec<Toast>>>,
}

impl Notifications {
    pub fn new(durations: NotificationConfig) -> Self {
        Self {
            durations,
            active: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn duration(&self, kind: NoticeKind) -> Duration {
        match kind {
            NoticeKind::LoginFailed => self.durations.login_failed(),
            NoticeKind::CarDeleted => self.durations.car_deleted(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Toast>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn raise(&self, kind: NoticeKind) -> Toast {
        self.raise_at(kind, Instant::now())
    }

    pub fn raise_at(&self, kind: NoticeKind, now: Instant) -> Toast {
        let toast = Toast {
            kind,
            raised_at: now,
            expires_at: now + self.duration(kind),
        };
        let mut active = self.lock();
        active.retain(|t| t.kind != kind);
        active.push(toast.clone());
        tracing::debug!("Notification raised: {}", kind.message());
        toast
    }

    /// Close a toast before it expires. Returns whether one was showing.
    pub fn dismiss(&self, kind: NoticeKind) -> bool {
        let mut active = self.lock();
        let before = active.len();
        active.retain(|t| t.kind != kind);
        active.len() != before
    }

    pub fn dismiss_all(&self) {
        self.lock().clear();
    }

    pub fn visible(&self) -> Vec<Toast> {
        self.visible_at(Instant::now())
    }

    /// Live toasts at `now`; expired ones are dropped
    pub fn visible_at(&self, now: Instant) -> Vec<Toast> {
        let mut active = self.lock();
        active.retain(|t| t.is_live(now));
        active.clone()
    }

    pub fn is_visible_at(&self, kind: NoticeKind, now: Instant) -> bool {
        self.visible_at(now).iter().any(|t| t.kind == kind)
    }
}
