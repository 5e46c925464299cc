/// One-shot deferred navigation
///
/// The sequencer arms at most once, counts simulated time forward, and calls
/// its [`Navigator`] exactly once when the delay runs out. Cancelling (or
/// dropping the sequencer) before then invalidates the arming token for good.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

/// External side effect performed when the redirect commits
pub trait Navigator {
    fn navigate(&mut self, destination: &str);
}

/// Shared cancellation flag created at arming time
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum RedirectPhase {
    Idle,
    Armed { elapsed_ms: f64, token: CancelToken },
    Committed,
    Cancelled,
}

impl RedirectPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RedirectPhase::Idle => "idle",
            RedirectPhase::Armed { .. } => "armed",
            RedirectPhase::Committed => "committed",
            RedirectPhase::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug)]
pub struct RedirectSequencer {
    delay_ms: u64,
    destination: String,
    phase: RedirectPhase,
}

impl RedirectSequencer {
    pub fn new(delay_ms: u64, destination: impl Into<String>) -> Self {
        Self {
            delay_ms,
            destination: destination.into(),
            phase: RedirectPhase::Idle,
        }
    }

    pub fn phase(&self) -> &RedirectPhase {
        &self.phase
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Fraction of the delay already waited, 1 once committed
    pub fn progress(&self) -> f32 {
        match &self.phase {
            RedirectPhase::Idle | RedirectPhase::Cancelled => 0.0,
            RedirectPhase::Armed { elapsed_ms, .. } => {
                if self.delay_ms == 0 {
                    1.0
                } else {
                    (*elapsed_ms / self.delay_ms as f64).min(1.0) as f32
                }
            }
            RedirectPhase::Committed => 1.0,
        }
    }

    /// Idle -> Armed. Returns the new token, or `None` if this sequencer has
    /// already left Idle.
    pub fn arm(&mut self) -> Option<CancelToken> {
        if !matches!(self.phase, RedirectPhase::Idle) {
            debug!(phase = self.phase.label(), "redirect already armed, ignoring");
            return None;
        }
        let token = CancelToken::new();
        info!(delay_ms = self.delay_ms, destination = %self.destination, "redirect armed");
        self.phase = RedirectPhase::Armed {
            elapsed_ms: 0.0,
            token: token.clone(),
        };
        Some(token)
    }

    /// Count `dt` seconds toward the deadline; commits through `navigator`
    /// when it passes. Returns true on the tick that commits.
    pub fn advance<N: Navigator + ?Sized>(&mut self, dt: f32, navigator: &mut N) -> bool {
        let RedirectPhase::Armed { elapsed_ms, token } = &mut self.phase else {
            return false;
        };

        if token.is_cancelled() {
            debug!("redirect token cancelled externally");
            self.phase = RedirectPhase::Cancelled;
            return false;
        }

        *elapsed_ms += f64::from(dt.max(0.0)) * 1000.0;
        if *elapsed_ms < self.delay_ms as f64 {
            return false;
        }

        self.phase = RedirectPhase::Committed;
        info!(destination = %self.destination, "redirect committed");
        navigator.navigate(&self.destination);
        true
    }

    /// Tear down: a pending redirect never fires afterward.
    pub fn cancel(&mut self) {
        if let RedirectPhase::Armed { token, .. } = &self.phase {
            token.cancel();
            info!("pending redirect cancelled");
            self.phase = RedirectPhase::Cancelled;
        }
    }
}

impl Drop for RedirectSequencer {
    fn drop(&mut self) {
        self.cancel();
    }
}
