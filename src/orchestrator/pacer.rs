//! Delay seam for the capture loop
//!
//! All pacing in the capture loop (settle delays, retry backoffs, the
//! end-of-cycle cadence sleep) goes through the `Pacer` trait so the retry
//! state machine is testable without real time delays.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real pacer backed by the tokio timer
pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Test pacer: returns immediately and records every requested duration
pub struct InstantPacer {
    slept: Mutex<Vec<Duration>>,
}

impl InstantPacer {
    pub fn new() -> Self {
        Self {
            slept: Mutex::new(Vec::new()),
        }
    }

    /// Durations requested so far, in order
    pub fn recorded(&self) -> Vec<Duration> {
        self.slept.lock().expect("pacer lock poisoned").clone()
    }
}

impl Default for InstantPacer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Pacer for InstantPacer {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().expect("pacer lock poisoned").push(duration);
    }
}

// Lets a shared pacer be handed to the orchestrator while the test keeps a
// handle for inspecting recorded delays.
#[async_trait]
impl<P: Pacer> Pacer for std::sync::Arc<P> {
    async fn sleep(&self, duration: Duration) {
        self.as_ref().sleep(duration).await;
    }
}
