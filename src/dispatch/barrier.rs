//! Completion barrier with a quiescence window.

use tokio::time::{Duration, Instant};

/// Tracks outstanding calls and resolves once none remain and no release
/// happened within the quiescence window.
#[derive(Debug, Clone)]
pub struct CompletionBarrier {
    quiescence: Duration,
    outstanding: usize,
    last_release: Option<Instant>,
}

impl CompletionBarrier {
    pub fn new(quiescence: Duration) -> Self {
        Self {
            quiescence,
            outstanding: 0,
            last_release: None,
        }
    }

    pub fn admit(&mut self) {
        self.outstanding += 1;
    }

    /// Records a finished call. Releasing with nothing outstanding is ignored.
    pub fn release(&mut self) {
        if self.outstanding > 0 {
            self.outstanding -= 1;
            self.last_release = Some(Instant::now());
        }
    }

    /// Waits out the rest of the quiescence window.
    ///
    /// Callers drain every outstanding call first; this only adds the
    /// settle time after the last release.
    pub async fn wait(&self) {
        if let Some(last) = self.last_release {
            tokio::time::sleep_until(last + self.quiescence).await;
        }
    }
}
