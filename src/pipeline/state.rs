//! Coarse progress reporting for a conversion job.
//!
//! A job moves through exactly two phases:
//!
//! ```text
//! Started ──ok──▶ Finished
//!         ──err / panic / early return──▶ Failed
//! ```
//!
//! [`ProgressGuard`] enforces the second edge: once started, dropping the
//! guard without calling [`ProgressGuard::finish`] reports `Failed`, so the
//! indicator is cleared on every exit path.

// ---------------------------------------------------------------------------
// ProgressPhase
// ---------------------------------------------------------------------------

/// Phases reported to a [`ProgressIndicator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressPhase {
    /// Work has begun; show a busy indicator.
    Started,

    /// Output was produced and delivered; hide the indicator.
    Finished,

    /// The job ended without output; hide the indicator.
    Failed,
}

impl ProgressPhase {
    /// Returns `true` for the phases that end a job.
    ///
    /// ```
    /// use audio_to_hex::pipeline::ProgressPhase;
    ///
    /// assert!(!ProgressPhase::Started.is_terminal());
    /// assert!(ProgressPhase::Finished.is_terminal());
    /// assert!(ProgressPhase::Failed.is_terminal());
    /// ```
    pub fn is_terminal(self) -> bool {
        !matches!(self, ProgressPhase::Started)
    }

    /// A short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ProgressPhase::Started => "Converting",
            ProgressPhase::Finished => "Done",
            ProgressPhase::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressIndicator
// ---------------------------------------------------------------------------

/// Receives phase changes of a conversion job.
///
/// Implementations must be cheap and must not block; they are called from
/// async context.
pub trait ProgressIndicator: Send + Sync {
    fn report(&self, phase: ProgressPhase);
}

// Compile-time assertion: Box<dyn ProgressIndicator> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ProgressIndicator>) {}
};

/// Writes each phase to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressIndicator for LogProgress {
    fn report(&self, phase: ProgressPhase) {
        match phase {
            ProgressPhase::Failed => log::warn!("progress: {}", phase.label()),
            _ => log::info!("progress: {}", phase.label()),
        }
    }
}

// ---------------------------------------------------------------------------
// ProgressGuard
// ---------------------------------------------------------------------------

/// Reports `Started` on creation and `Failed` on drop unless
/// [`finish`](Self::finish) was called first.
pub struct ProgressGuard<'a> {
    progress: &'a dyn ProgressIndicator,
    done: bool,
}

impl<'a> ProgressGuard<'a> {
    pub fn start(progress: &'a dyn ProgressIndicator) -> Self {
        progress.report(ProgressPhase::Started);
        Self {
            progress,
            done: false,
        }
    }

    /// Report `Finished` and disarm the guard.
    pub fn finish(mut self) {
        self.done = true;
        self.progress.report(ProgressPhase::Finished);
    }
}

impl Drop for ProgressGuard<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.progress.report(ProgressPhase::Failed);
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingProgress  (test-only)
// ---------------------------------------------------------------------------

/// Keeps every reported phase in order.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingProgress {
    phases: std::sync::Mutex<Vec<ProgressPhase>>,
}

#[cfg(test)]
impl RecordingProgress {
    pub fn phases(&self) -> Vec<ProgressPhase> {
        self.phases.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl ProgressIndicator for RecordingProgress {
    fn report(&self, phase: ProgressPhase) {
        self.phases.lock().unwrap().push(phase);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
