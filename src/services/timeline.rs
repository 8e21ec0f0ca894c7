//! Timed UI sequences played on tokio time
//!
//! A [`Timeline`] is a list of `(delay, step)` pairs. Playing it sleeps for each
//! delay and then hands the step to a callback, so paused-clock tests can
//! fast-forward through "toast, wait, refresh" style flows.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<S> {
    steps: Vec<(Duration, S)>,
}

impl<S> Default for Timeline<S> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<S> Timeline<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Step applied as soon as the timeline starts
    pub fn immediately(self, step: S) -> Self {
        self.after(Duration::ZERO, step)
    }

    /// Step applied `delay` after the previous one
    pub fn after(mut self, delay: Duration, step: S) -> Self {
        self.steps.push((delay, step));
        self
    }

    /// Start playing; each [`Playback::next`] waits out one delay
    pub fn start(self) -> Playback<S> {
        Playback {
            steps: self.steps.into_iter(),
        }
    }

    pub async fn play<F>(self, mut apply: F)
    where
        F: FnMut(S),
    {
        let mut playback = self.start();
        while let Some(step) = playback.next().await {
            apply(step);
        }
    }
}

/// A timeline being played, for steps that need to await something themselves
pub struct Playback<S> {
    steps: std::vec::IntoIter<(Duration, S)>,
}

impl<S> Playback<S> {
    pub async fn next(&mut self) -> Option<S> {
        let (delay, step) = self.steps.next()?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Some(step)
    }
}
