use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Wall clock for one run. Frozen once the run completes so the displayed
/// time stops advancing.
#[derive(Debug, Clone)]
pub struct RunClock {
    started: Instant,
    frozen: Option<Duration>,
}

impl Default for RunClock {
    fn default() -> Self {
        Self::start()
    }
}

impl RunClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            frozen: None,
        }
    }

    pub fn restart(&mut self) {
        *self = Self::start();
    }

    pub fn started_at(&self) -> Instant {
        self.started
    }

    pub fn elapsed(&self) -> Duration {
        self.frozen.unwrap_or_else(|| self.started.elapsed())
    }

    /// Stops the clock at the current instant. Later calls keep the first value.
    pub fn freeze(&mut self) -> Duration {
        *self.frozen.get_or_insert_with(|| self.started.elapsed())
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.is_some()
    }
}

/// How a pause ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Elapsed,
    Revoked,
}

/// Hands out pauses that can be revoked individually or all at once.
///
/// Every handle is tied to a child of the scheduler's root token, so
/// [`PauseScheduler::revoke_all`] releases pauses that are still pending as
/// well as any scheduled afterwards.
#[derive(Debug, Clone, Default)]
pub struct PauseScheduler {
    root: CancellationToken,
}

impl PauseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a scheduler whose pauses are revoked together with `token`.
    pub fn with_token(token: CancellationToken) -> Self {
        Self { root: token }
    }

    pub fn schedule(&self, delay: Duration) -> PauseHandle {
        PauseHandle {
            delay,
            token: self.root.child_token(),
        }
    }

    pub fn revoke_all(&self) {
        self.root.cancel();
    }

    pub fn is_revoked(&self) -> bool {
        self.root.is_cancelled()
    }

    /// Token that revokes this scheduler's pauses when cancelled.
    pub fn revoker(&self) -> CancellationToken {
        self.root.clone()
    }
}

#[derive(Debug)]
pub struct PauseHandle {
    delay: Duration,
    token: CancellationToken,
}

impl PauseHandle {
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Resolves when the delay elapses, or immediately once revoked.
    pub async fn wait(&self) -> PauseOutcome {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => PauseOutcome::Revoked,
            _ = tokio::time::sleep(self.delay) => PauseOutcome::Elapsed,
        }
    }
}
