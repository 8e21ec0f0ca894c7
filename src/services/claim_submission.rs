//! Student claim form shown over an item

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use validator::Validate;

use crate::{
    api::{auth::AuthApi, claims::ClaimsApi},
    error::{AppError, AppResult},
    models::{Claim, Item, NewClaim, User},
};

use super::{
    overlay::{PageScroll, ScrollLock},
    timeline::Timeline,
    toast::Toaster,
};

pub const SUBMIT_FAILED: &str = "Failed to submit claim. Please try again.";
pub const SUBMIT_SUCCEEDED: &str = "Claim submitted successfully! 🎉";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Editing,
    Submitting,
    Succeeded,
    Closed,
}

struct SubmissionState {
    verification_text: String,
    phone: String,
    claimant: Option<User>,
    phase: SubmissionPhase,
    error: Option<String>,
    created: Option<Claim>,
    scroll: Option<ScrollLock>,
}

pub struct ClaimSubmission {
    item_id: i64,
    item_title: String,
    claims: ClaimsApi,
    toaster: Arc<Toaster>,
    close_delay: Duration,
    state: Mutex<SubmissionState>,
}

impl ClaimSubmission {
    /// Open the form for `item`; page scrolling stays locked until it closes
    pub fn open(
        item: &Item,
        claims: ClaimsApi,
        toaster: Arc<Toaster>,
        scroll: &PageScroll,
        close_delay: Duration,
    ) -> Self {
        Self {
            item_id: item.item_id,
            item_title: item.title(),
            claims,
            toaster,
            close_delay,
            state: Mutex::new(SubmissionState {
                verification_text: String::new(),
                phone: String::new(),
                claimant: None,
                phase: SubmissionPhase::Editing,
                error: None,
                created: None,
                scroll: Some(scroll.lock()),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn item_title(&self) -> &str {
        &self.item_title
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.lock().phase
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn verification_text(&self) -> String {
        self.lock().verification_text.clone()
    }

    pub fn claimant(&self) -> Option<User> {
        self.lock().claimant.clone()
    }

    pub fn created(&self) -> Option<Claim> {
        self.lock().created.clone()
    }

    /// Prefill the claimant block from the current session
    pub async fn load_claimant(&self, auth: &AuthApi) {
        match auth.me().await {
            Ok(user) => self.lock().claimant = Some(user),
            Err(e) => {
                tracing::error!("Error fetching user info: {}", e);
                self.lock().error = Some("Failed to load user information".to_string());
            }
        }
    }

    pub fn set_verification_text(&self, text: impl Into<String>) {
        let mut state = self.lock();
        state.verification_text = text.into();
        state.error = None;
    }

    pub fn set_phone(&self, phone: impl Into<String>) {
        let mut state = self.lock();
        state.phone = phone.into();
        state.error = None;
    }

    fn fail(&self, message: String) {
        self.toaster.error(message.clone());
        let mut state = self.lock();
        state.error = Some(message);
        state.phase = SubmissionPhase::Editing;
    }

    /// Validate locally, post the claim, then close after the success delay.
    ///
    /// Validation failures never reach the network. Entered text is kept on
    /// every failure. `on_success` runs once, when the form closes.
    pub async fn submit<F>(&self, on_success: F) -> AppResult<()>
    where
        F: FnOnce(),
    {
        let claim = {
            let state = self.lock();
            if state.phase != SubmissionPhase::Editing {
                return Err(AppError::BusinessRule(
                    "Claim is already being submitted".to_string(),
                ));
            }
            let phone = state.phone.trim();
            NewClaim {
                item_id: self.item_id,
                verification_text: state.verification_text.trim().to_string(),
                phone: (!phone.is_empty()).then(|| phone.to_string()),
            }
        };

        if let Err(errors) = claim.validate() {
            let error = AppError::from(errors);
            self.fail(error.user_message(SUBMIT_FAILED));
            return Err(error);
        }

        self.lock().phase = SubmissionPhase::Submitting;
        let response = match self.claims.create(&claim).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error submitting claim for item {}: {}", self.item_id, e);
                self.fail(e.user_message(SUBMIT_FAILED));
                return Err(e);
            }
        };

        {
            let mut state = self.lock();
            state.phase = SubmissionPhase::Succeeded;
            state.created = response.claim;
        }
        self.toaster.success(SUBMIT_SUCCEEDED);

        let mut on_success = Some(on_success);
        Timeline::new()
            .after(self.close_delay, ())
            .play(|_| {
                if let Some(callback) = on_success.take() {
                    callback();
                }
                self.close();
            })
            .await;
        Ok(())
    }

    /// Dismiss the form; refused while a submission is in flight
    pub fn close(&self) -> bool {
        let mut state = self.lock();
        if state.phase == SubmissionPhase::Submitting {
            return false;
        }
        state.phase = SubmissionPhase::Closed;
        state.scroll = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::{ApiClient, ApiResponse, MockTransport};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn item() -> Item {
        serde_json::from_value(json!({"item_id": 11, "category": "electronics", "name": "AirPods case"})).unwrap()
    }

    fn form(transport: MockTransport, scroll: &PageScroll) -> (Arc<ClaimSubmission>, Arc<Toaster>) {
        let toaster = Arc::new(Toaster::new());
        let submission = ClaimSubmission::open(
            &item(),
            ClaimsApi::new(ApiClient::new(Arc::new(transport))),
            toaster.clone(),
            scroll,
            Duration::from_millis(1_500),
        );
        (Arc::new(submission), toaster)
    }

    #[tokio::test]
    async fn nine_characters_fail_locally() {
        let scroll = PageScroll::new();
        let mut transport = MockTransport::new();
        transport.expect_send().times(0);
        let (submission, toaster) = form(transport, &scroll);

        submission.set_verification_text("123456789");
        let err = submission.submit(|| {}).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            submission.error().as_deref(),
            Some("Verification details must be at least 10 characters")
        );
        assert_eq!(submission.verification_text(), "123456789");
        assert_eq!(submission.phase(), SubmissionPhase::Editing);
        assert_eq!(toaster.active().len(), 1);
        assert!(scroll.is_locked());
    }

    #[tokio::test]
    async fn blank_text_asks_for_details() {
        let scroll = PageScroll::new();
        let (submission, _) = form(MockTransport::new(), &scroll);
        submission.set_verification_text("   ");
        submission.submit(|| {}).await.unwrap_err();
        assert_eq!(
            submission.error().as_deref(),
            Some("Please provide verification details")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn success_closes_after_delay() {
        let scroll = PageScroll::new();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.path == "/api/claims"
                    && req.body
                        == Some(json!({"item_id": 11, "verification_text": "White case, scratched lid"}))
            })
            .times(1)
            .returning(|_| {
                Ok(ApiResponse::json(
                    201,
                    json!({"message": "Claim submitted successfully", "claim": {"claim_id": 99, "item_id": 11, "status": "pending"}}),
                ))
            });
        let (submission, toaster) = form(transport, &scroll);
        submission.set_verification_text("  White case, scratched lid ");
        submission.set_phone("  ");

        let notified = Arc::new(AtomicBool::new(false));
        let task = tokio::spawn({
            let submission = Arc::clone(&submission);
            let notified = Arc::clone(&notified);
            async move {
                submission
                    .submit(move || notified.store(true, Ordering::SeqCst))
                    .await
            }
        });

        tokio::time::sleep(Duration::from_millis(1_499)).await;
        assert_eq!(submission.phase(), SubmissionPhase::Succeeded);
        assert_eq!(toaster.active()[0].message, SUBMIT_SUCCEEDED);
        assert!(!notified.load(Ordering::SeqCst));
        assert!(scroll.is_locked());

        task.await.unwrap().unwrap();
        assert_eq!(submission.phase(), SubmissionPhase::Closed);
        assert!(notified.load(Ordering::SeqCst));
        assert!(!scroll.is_locked());
        assert_eq!(submission.created().map(|c| c.claim_id), Some(99));
    }

    #[tokio::test]
    async fn server_error_keeps_input() {
        let scroll = PageScroll::new();
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .returning(|_| Ok(ApiResponse::json(404, json!({"error": "Item no longer available"}))));
        let (submission, _) = form(transport, &scroll);
        submission.set_verification_text("Silver ring with engraving");

        submission.submit(|| {}).await.unwrap_err();
        assert_eq!(submission.error().as_deref(), Some("Item no longer available"));
        assert_eq!(submission.verification_text(), "Silver ring with engraving");
        assert_eq!(submission.phase(), SubmissionPhase::Editing);
    }
}
