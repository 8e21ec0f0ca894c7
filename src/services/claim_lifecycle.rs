//! Staff-side claim status transitions
//!
//! Every transition goes through two steps: `request_transition` opens a
//! confirmation dialog for a target status, and `confirm_transition` sends the
//! update. At most one request is in flight per claim, and the displayed
//! status only changes after the server accepts the update.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::{
    api::claims::ClaimsApi,
    config::TimingConfig,
    error::{AppError, AppResult},
    models::{Claim, ClaimStatus, ClaimUpdate},
};

use super::{overlay::ConfirmDialog, timeline::Timeline, toast::Toaster};

pub const UPDATE_FAILED: &str = "Failed to update claim status";

/// Which controls a claim card should enable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimControls {
    pub next_actions: Vec<ClaimStatus>,
    pub enabled: bool,
    pub notes_editable: bool,
    pub is_finalized: bool,
}

impl ClaimControls {
    pub fn can(&self, target: ClaimStatus) -> bool {
        self.enabled && self.next_actions.contains(&target)
    }

    pub fn can_approve(&self) -> bool {
        self.can(ClaimStatus::Approved)
    }

    pub fn can_reject(&self) -> bool {
        self.can(ClaimStatus::Rejected)
    }

    pub fn can_mark_picked_up(&self) -> bool {
        self.can(ClaimStatus::PickedUp)
    }

    pub fn action_labels(&self) -> Vec<&'static str> {
        self.next_actions.iter().map(|s| s.action_label()).collect()
    }
}

#[derive(Debug)]
struct LifecycleState {
    claim: Claim,
    notes: String,
    pending: Option<(ClaimStatus, ConfirmDialog)>,
    processing: bool,
    error: Option<String>,
}

pub struct ClaimLifecycle {
    claims: ClaimsApi,
    toaster: Arc<Toaster>,
    timing: TimingConfig,
    state: Mutex<LifecycleState>,
}

impl ClaimLifecycle {
    pub fn new(claim: Claim, claims: ClaimsApi, toaster: Arc<Toaster>, timing: TimingConfig) -> Self {
        let notes = claim.staff_notes.clone().unwrap_or_default();
        Self {
            claims,
            toaster,
            timing,
            state: Mutex::new(LifecycleState {
                claim,
                notes,
                pending: None,
                processing: false,
                error: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LifecycleState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn claim(&self) -> Claim {
        self.lock().claim.clone()
    }

    pub fn status(&self) -> ClaimStatus {
        self.lock().claim.status
    }

    /// Terminal claims expose no mutation at all
    pub fn is_finalized(&self) -> bool {
        self.status().is_final()
    }

    pub fn is_processing(&self) -> bool {
        self.lock().processing
    }

    pub fn pending(&self) -> Option<ClaimStatus> {
        self.lock().pending.as_ref().map(|(target, _)| *target)
    }

    pub fn dialog(&self) -> Option<ConfirmDialog> {
        self.lock().pending.as_ref().map(|(_, dialog)| dialog.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn notes(&self) -> String {
        self.lock().notes.clone()
    }

    pub fn controls(&self) -> ClaimControls {
        let state = self.lock();
        let status = state.claim.status;
        let idle = !state.processing && state.pending.is_none();
        ClaimControls {
            next_actions: status.allowed_transitions().to_vec(),
            enabled: idle && !status.is_final(),
            notes_editable: !state.processing && !status.is_final(),
            is_finalized: status.is_final(),
        }
    }

    /// Edit staff notes; refused once finalized or while a request runs
    pub fn set_notes(&self, notes: impl Into<String>) -> bool {
        let mut state = self.lock();
        if state.processing || state.claim.status.is_final() {
            return false;
        }
        state.notes = notes.into();
        true
    }

    /// Swap in a fresher copy of the claim, e.g. after the parent list refetched
    pub fn replace_claim(&self, claim: Claim) {
        let mut state = self.lock();
        if claim.claim_id != state.claim.claim_id {
            tracing::warn!(
                "Ignoring claim {} for lifecycle of claim {}",
                claim.claim_id,
                state.claim.claim_id
            );
            return;
        }
        if !state.processing {
            state.notes = claim.staff_notes.clone().unwrap_or_default();
        }
        state.claim = claim;
    }

    /// Ask for confirmation before moving to `target`.
    ///
    /// Returns `false` without touching any state when the transition is not
    /// allowed, a request is in flight, or a confirmation is already open.
    pub fn request_transition(&self, target: ClaimStatus) -> bool {
        let mut state = self.lock();
        let claim_id = state.claim.claim_id;
        if state.processing {
            tracing::warn!("Claim {}: already processing, ignoring {}", claim_id, target.as_str());
            return false;
        }
        if state.pending.is_some() {
            tracing::warn!("Claim {}: confirmation already open, ignoring {}", claim_id, target.as_str());
            return false;
        }
        if !state.claim.status.can_transition_to(target) {
            tracing::warn!(
                "Claim {}: {} -> {} is not allowed",
                claim_id,
                state.claim.status.as_str(),
                target.as_str()
            );
            return false;
        }

        let dialog = ConfirmDialog::new(
            target.confirm_title(),
            target.confirm_message(),
            self.timing.overlay_debounce(),
        );
        state.pending = Some((target, dialog));
        tracing::debug!("Claim {}: confirm {}?", claim_id, target.as_str());
        true
    }

    /// Close the confirmation without any network call
    pub fn cancel_transition(&self) -> bool {
        let mut state = self.lock();
        if state.processing {
            return false;
        }
        match state.pending.take() {
            Some((_, mut dialog)) => dialog.cancel(false),
            None => false,
        }
    }

    /// Backdrop click on the confirmation; ignored during the debounce window
    pub fn click_overlay(&self) -> bool {
        let mut state = self.lock();
        let busy = state.processing;
        let dismissed = match state.pending.as_mut() {
            Some((_, dialog)) => dialog.click_overlay(busy),
            None => false,
        };
        if dismissed {
            state.pending = None;
        }
        dismissed
    }

    /// Send the pending transition.
    ///
    /// On success a toast is shown, `refresh` runs after the refresh delay, and
    /// the new status is applied. On failure the status is left as it was and
    /// the server's message (or a fallback) is surfaced. Either way the dialog
    /// closes and controls are re-enabled shortly after.
    pub async fn confirm_transition<F, Fut>(&self, refresh: F) -> AppResult<ClaimStatus>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        let (claim_id, target, notes) = {
            let mut state = self.lock();
            let busy = state.processing;
            let target = match state.pending.as_mut() {
                Some((target, dialog)) if dialog.is_open() => {
                    if !dialog.confirm(busy) {
                        return Err(AppError::BusinessRule(
                            "A status change is already in progress".to_string(),
                        ));
                    }
                    *target
                }
                _ => {
                    return Err(AppError::BusinessRule(
                        "No status change is awaiting confirmation".to_string(),
                    ))
                }
            };
            state.processing = true;
            state.error = None;
            (state.claim.claim_id, target, state.notes.trim().to_string())
        };

        let _in_flight = InFlight { lifecycle: self };

        tracing::info!("Claim {}: updating status to {}", claim_id, target.as_str());
        let update = ClaimUpdate {
            status: target,
            staff_notes: (!notes.is_empty()).then_some(notes),
        };
        let result = self.claims.update_status(claim_id, &update).await;

        let timeline = match &result {
            Ok(_) => Timeline::new()
                .immediately(Step::Notify)
                .after(self.timing.refresh_delay(), Step::Refresh)
                .after(self.timing.processing_release(), Step::Release),
            Err(_) => Timeline::new()
                .immediately(Step::Notify)
                .after(self.timing.processing_release(), Step::Release),
        };

        let mut refresh = Some(refresh);
        let mut playback = timeline.start();
        while let Some(step) = playback.next().await {
            match (step, &result) {
                (Step::Notify, Ok(_)) => {
                    self.toaster.success(target.success_message());
                }
                (Step::Notify, Err(e)) => {
                    let message = e.user_message(UPDATE_FAILED);
                    tracing::error!("Claim {}: update failed: {}", claim_id, e);
                    self.toaster.error(message.clone());
                    let mut state = self.lock();
                    state.error = Some(message);
                    state.pending = None;
                }
                (Step::Refresh, Ok(response)) => {
                    if let Some(refresh) = refresh.take() {
                        refresh().await;
                    }
                    let mut state = self.lock();
                    state.claim.status = response.new_status.unwrap_or(target);
                    if let Some(notes) = &update.staff_notes {
                        state.claim.staff_notes = Some(notes.clone());
                    }
                    state.pending = None;
                    tracing::info!("Claim {}: now {}", claim_id, state.claim.status.as_str());
                }
                (Step::Refresh, Err(_)) => {}
                // Controls come back when `_in_flight` drops
                (Step::Release, _) => {}
            }
        }

        result.map(|_| self.status())
    }
}

/// Timed steps after the update request settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Notify,
    Refresh,
    Release,
}

/// Clears the pending dialog and the processing flag however
/// `confirm_transition` ends, including when its future is dropped.
struct InFlight<'a> {
    lifecycle: &'a ClaimLifecycle,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.lifecycle.lock();
        state.pending = None;
        state.processing = false;
    }
}
