//! Read-through cache for session verification
//!
//! Successful verifications are reused for `ttl`; failures are remembered as an
//! invalid session for the shorter `failure_ttl` so that a burst of callers
//! does not hammer the backend while signed out.

use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::{config::SessionConfig, error::AppResult, models::SessionStatus};

struct CachedSession {
    status: SessionStatus,
    stored_at: Instant,
    ttl: Duration,
}

impl CachedSession {
    fn is_fresh(&self) -> bool {
        self.stored_at.elapsed() < self.ttl
    }
}

pub struct SessionCache {
    ttl: Duration,
    failure_ttl: Duration,
    entry: Mutex<Option<CachedSession>>,
}

impl SessionCache {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            ttl: config.ttl(),
            failure_ttl: config.failure_ttl(),
            entry: Mutex::new(None),
        }
    }

    /// Return the cached status if fresh, otherwise run `fetch` and store its outcome.
    ///
    /// The lock is held across `fetch`, so concurrent callers share one request.
    /// A failed fetch is returned as the error it was, and later callers inside
    /// the failure window get an invalid status without a network call.
    pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> AppResult<SessionStatus>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<SessionStatus>>,
    {
        let mut entry = self.entry.lock().await;

        if let Some(cached) = entry.as_ref().filter(|c| c.is_fresh()) {
            tracing::debug!("Session cache hit (valid={})", cached.status.valid);
            return Ok(cached.status.clone());
        }

        match fetch().await {
            Ok(status) => {
                let ttl = if status.valid { self.ttl } else { self.failure_ttl };
                *entry = Some(CachedSession {
                    status: status.clone(),
                    stored_at: Instant::now(),
                    ttl,
                });
                Ok(status)
            }
            Err(e) => {
                tracing::debug!("Session verification failed, caching invalid: {}", e);
                *entry = Some(CachedSession {
                    status: SessionStatus::invalid(),
                    stored_at: Instant::now(),
                    ttl: self.failure_ttl,
                });
                Err(e)
            }
        }
    }

    /// Drop the cached entry; the next call always reaches the backend
    pub async fn invalidate(&self) {
        *self.entry.lock().await = None;
        tracing::debug!("Session cache invalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{Role, User};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn valid() -> SessionStatus {
        SessionStatus {
            valid: true,
            user: Some(User {
                user_id: Some(1),
                name: "Jane Doe".into(),
                email: "jdoe@uwaterloo.ca".into(),
                role: Role::Student,
                profile_picture: None,
            }),
        }
    }

    async fn verify(
        cache: &SessionCache,
        calls: &AtomicUsize,
        outcome: AppResult<SessionStatus>,
    ) -> AppResult<SessionStatus> {
        cache
            .get_or_fetch(move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                outcome
            })
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_reused_within_ttl() {
        let cache = SessionCache::new(&SessionConfig::default());
        let calls = AtomicUsize::new(0);

        assert!(verify(&cache, &calls, Ok(valid())).await.unwrap().valid);
        tokio::time::advance(Duration::from_millis(4_999)).await;
        assert!(verify(&cache, &calls, Ok(valid())).await.unwrap().valid);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(1)).await;
        verify(&cache, &calls, Ok(valid())).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_rethrown_then_cached_briefly() {
        let cache = SessionCache::new(&SessionConfig::default());
        let calls = AtomicUsize::new(0);

        let err = verify(&cache, &calls, Err(AppError::Authentication("expired".into())))
            .await
            .unwrap_err();
        assert!(err.is_unauthenticated());

        tokio::time::advance(Duration::from_millis(1_500)).await;
        let status = verify(&cache, &calls, Ok(valid())).await.unwrap();
        assert!(!status.valid);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::advance(Duration::from_millis(500)).await;
        assert!(verify(&cache, &calls, Ok(valid())).await.unwrap().valid);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_failure_gets_the_full_ttl() {
        let cache = SessionCache::new(&SessionConfig::default());
        let calls = AtomicUsize::new(0);

        let _ = verify(&cache, &calls, Err(AppError::Network("down".into()))).await;
        tokio::time::advance(Duration::from_millis(2_000)).await;
        verify(&cache, &calls, Ok(valid())).await.unwrap();
        tokio::time::advance(Duration::from_millis(4_000)).await;
        verify(&cache, &calls, Ok(valid())).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_a_fetch() {
        let cache = SessionCache::new(&SessionConfig::default());
        let calls = AtomicUsize::new(0);

        verify(&cache, &calls, Ok(valid())).await.unwrap();
        cache.invalidate().await;
        verify(&cache, &calls, Ok(valid())).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
