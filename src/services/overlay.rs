//! Top-level overlay host and confirmation dialogs
//!
//! Overlays live in a single host slot above all page content. Any open overlay
//! holds a [`ScrollLock`]; the lock is released when the overlay closes or is
//! dropped, so a sequence of dialogs can never leave the page locked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

/// Page-level "body overflow hidden" flag
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    locked: Arc<AtomicBool>,
}

impl PageScroll {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::SeqCst)
    }

    pub fn lock(&self) -> ScrollLock {
        self.locked.store(true, Ordering::SeqCst);
        ScrollLock {
            locked: Arc::clone(&self.locked),
        }
    }
}

/// Unlocks page scrolling when dropped. Not reference counted.
#[derive(Debug)]
pub struct ScrollLock {
    locked: Arc<AtomicBool>,
}

impl Drop for ScrollLock {
    fn drop(&mut self) {
        self.locked.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Confirm dialog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTone {
    Danger,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Open,
    Confirmed,
    Cancelled,
}

/// Two-button confirmation for destructive actions.
///
/// Overlay clicks inside the debounce window after opening are ignored so the
/// click that opened the dialog cannot also dismiss it.
#[derive(Debug, Clone)]
pub struct ConfirmDialog {
    pub title: String,
    pub message: String,
    pub confirm_label: String,
    pub cancel_label: String,
    pub tone: DialogTone,
    opened_at: Instant,
    debounce: Duration,
    outcome: DialogOutcome,
}

impl ConfirmDialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>, debounce: Duration) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Yes, continue".to_string(),
            cancel_label: "Cancel".to_string(),
            tone: DialogTone::Neutral,
            opened_at: Instant::now(),
            debounce,
            outcome: DialogOutcome::Open,
        }
    }

    /// Item deletion prompt
    pub fn delete(item_title: &str, debounce: Duration) -> Self {
        Self::new(
            "Confirm Delete",
            format!(
                "Are you sure you want to delete \"{}\"? This action cannot be undone.",
                item_title
            ),
            debounce,
        )
        .labels("Delete", "Cancel")
        .tone(DialogTone::Danger)
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn tone(mut self, tone: DialogTone) -> Self {
        self.tone = tone;
        self
    }

    pub fn outcome(&self) -> DialogOutcome {
        self.outcome
    }

    pub fn is_open(&self) -> bool {
        self.outcome == DialogOutcome::Open
    }

    pub fn overlay_interactive(&self) -> bool {
        self.opened_at.elapsed() >= self.debounce
    }

    fn settle(&mut self, outcome: DialogOutcome, busy: bool) -> bool {
        if !self.is_open() || busy {
            return false;
        }
        self.outcome = outcome;
        true
    }

    /// Returns whether the confirmation was accepted
    pub fn confirm(&mut self, busy: bool) -> bool {
        self.settle(DialogOutcome::Confirmed, busy)
    }

    pub fn cancel(&mut self, busy: bool) -> bool {
        self.settle(DialogOutcome::Cancelled, busy)
    }

    /// Click on the dimmed backdrop; dismisses only after the debounce window
    pub fn click_overlay(&mut self, busy: bool) -> bool {
        if !self.overlay_interactive() {
            tracing::debug!("Overlay click ignored (debounce)");
            return false;
        }
        self.cancel(busy)
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// What is currently rendered above the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayKind {
    Confirm { title: String },
    ClaimForm { item_id: i64 },
    ItemDetail { item_id: i64 },
}

#[derive(Debug)]
struct OpenOverlay {
    id: u64,
    kind: OverlayKind,
    _scroll: ScrollLock,
}

/// Single top-level overlay slot
#[derive(Debug, Default)]
pub struct OverlayHost {
    scroll: PageScroll,
    current: Option<OpenOverlay>,
    next_id: u64,
}

impl OverlayHost {
    pub fn new(scroll: PageScroll) -> Self {
        Self {
            scroll,
            current: None,
            next_id: 0,
        }
    }

    /// Show `kind`, replacing whatever was open
    pub fn open(&mut self, kind: OverlayKind) -> u64 {
        // Release the previous lock before taking the new one
        drop(self.current.take());
        self.next_id += 1;
        let id = self.next_id;
        tracing::debug!("Overlay {} opened: {:?}", id, kind);
        self.current = Some(OpenOverlay {
            id,
            kind,
            _scroll: self.scroll.lock(),
        });
        id
    }

    /// Close overlay `id`; stale ids are ignored
    pub fn close(&mut self, id: u64) -> bool {
        match &self.current {
            Some(open) if open.id == id => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn close_all(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&OverlayKind> {
        self.current.as_ref().map(|o| &o.kind)
    }

    pub fn is_scroll_locked(&self) -> bool {
        self.scroll.is_locked()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_and_closing_overlays_always_unlocks() {
        let scroll = PageScroll::new();
        let mut host = OverlayHost::new(scroll.clone());

        let first = host.open(OverlayKind::ItemDetail { item_id: 1 });
        let second = host.open(OverlayKind::ClaimForm { item_id: 1 });
        assert!(scroll.is_locked());
        assert!(!host.close(first));
        assert!(scroll.is_locked());

        assert!(host.close(second));
        assert!(!scroll.is_locked());
        assert_eq!(host.current(), None);
    }

    #[test]
    fn dropping_the_host_unlocks() {
        let scroll = PageScroll::new();
        {
            let mut host = OverlayHost::new(scroll.clone());
            host.open(OverlayKind::Confirm {
                title: "Confirm Delete".into(),
            });
            assert!(scroll.is_locked());
        }
        assert!(!scroll.is_locked());
    }

    #[tokio::test(start_paused = true)]
    async fn overlay_clicks_are_debounced() {
        let mut dialog = ConfirmDialog::new("Approve Claim", "Sure?", Duration::from_millis(200));
        assert!(!dialog.click_overlay(false));
        assert!(dialog.is_open());

        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(dialog.click_overlay(false));
        assert_eq!(dialog.outcome(), DialogOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn confirm_and_cancel_are_exclusive_and_blocked_while_busy() {
        let mut dialog = ConfirmDialog::delete("Blue umbrella", Duration::from_millis(200));
        assert_eq!(dialog.confirm_label, "Delete");
        assert!(!dialog.confirm(true));
        assert!(!dialog.cancel(true));

        assert!(dialog.confirm(false));
        assert!(!dialog.cancel(false));
        assert_eq!(dialog.outcome(), DialogOutcome::Confirmed);
    }
}
