//! Transient toast notifications

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl ToastKind {
    pub fn duration(&self) -> Duration {
        match self {
            ToastKind::Success => Duration::from_millis(3_000),
            ToastKind::Error => Duration::from_millis(5_000),
            ToastKind::Info => Duration::from_millis(4_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
    shown_at: Instant,
    duration: Duration,
}

impl Toast {
    fn is_visible(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) < self.duration
    }
}

#[derive(Default)]
struct ToastState {
    next_id: u64,
    toasts: Vec<Toast>,
}

/// Queue of toasts, newest last; expiry follows tokio time
#[derive(Default)]
pub struct Toaster {
    state: Mutex<ToastState>,
}

impl Toaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: ToastKind, message: impl Into<String>) -> u64 {
        let message = message.into();
        let now = Instant::now();
        let mut state = self.lock();
        state.toasts.retain(|t| t.is_visible(now));
        state.next_id += 1;
        let id = state.next_id;
        tracing::debug!("Toast {:?}: {}", kind, message);
        state.toasts.push(Toast {
            id,
            kind,
            message,
            shown_at: now,
            duration: kind.duration(),
        });
        id
    }

    pub fn success(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> u64 {
        self.push(ToastKind::Info, message)
    }

    pub fn dismiss(&self, id: u64) {
        self.lock().toasts.retain(|t| t.id != id);
    }

    /// Visible toasts; expired ones are dropped on the way
    pub fn active(&self) -> Vec<Toast> {
        let now = Instant::now();
        let mut state = self.lock();
        state.toasts.retain(|t| t.is_visible(now));
        state.toasts.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ToastState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn toasts_expire_by_kind() {
        let toaster = Toaster::new();
        toaster.success("Claim approved successfully!");
        toaster.error("Failed to update claim status");
        assert_eq!(toaster.active().len(), 2);

        tokio::time::advance(Duration::from_millis(3_000)).await;
        let active = toaster.active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].kind, ToastKind::Error);

        tokio::time::advance(Duration::from_millis(2_000)).await;
        assert!(toaster.active().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dismiss_removes_one() {
        let toaster = Toaster::new();
        let first = toaster.info("one");
        toaster.info("two");
        toaster.dismiss(first);
        assert_eq!(toaster.active()[0].message, "two");
    }

    #[tokio::test(start_paused = true)]
    async fn pushing_drops_expired_toasts() {
        let toaster = Toaster::new();
        for _ in 0..50 {
            toaster.success("Saved");
            tokio::time::advance(Duration::from_secs(10)).await;
        }
        toaster.info("latest");
        assert_eq!(toaster.lock().toasts.len(), 1);
    }
}
