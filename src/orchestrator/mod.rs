//! Orchestrator - Per-Frame Capture Cycles and Cadence Scheduling
//!
//! ## Responsibilities
//!
//! - Per-frame retry state machine: Attempt -> Evaluate ->
//!   {Accept | RejectConsistency | Error}, up to the retry limit
//! - Frame persistence and feedback updates on acceptance
//! - Cadence scheduling: frame starts are spaced by the configured interval,
//!   compensated for cycle processing time
//! - Cooperative shutdown, observed at cycle boundaries only

pub mod pacer;

pub use pacer::{InstantPacer, Pacer, TokioPacer};

use crate::brightness::mean_brightness;
use crate::camera_link::CameraDevice;
use crate::exposure::ExposureController;
use crate::frame_store::{FrameRecord, FrameStore};
use crate::session::CaptureSession;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Settle delay after an LED change, before the sensor is sampled
const SETTLE_DELAY: Duration = Duration::from_millis(200);

/// Backoff after a failed capture request
const CAPTURE_BACKOFF: Duration = Duration::from_secs(1);

/// Backoff after a consistency rejection
const CONSISTENCY_BACKOFF: Duration = Duration::from_millis(500);

/// Outcome of a single capture attempt within a cycle
enum AttemptOutcome {
    Accepted { jpeg: Vec<u8>, brightness: f64 },
    RejectedConsistency,
    Failed,
}

/// Terminal state of one frame cycle
#[derive(Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Frame persisted, history and LED updated
    Completed,
    /// Retries exhausted; the sequence number is consumed, nothing written
    Skipped,
}

/// Result of a whole run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub captured: u32,
    pub skipped: u32,
    /// Last successfully persisted frame number; pass `last + 1` as the next
    /// run's start frame to resume
    pub last_completed: Option<u32>,
    /// True when the run stopped early on an interruption signal
    pub interrupted: bool,
}

/// Sleep needed before the next cycle start: the cadence minus the time the
/// cycle already consumed, never negative.
pub fn cadence_sleep(cadence: Duration, elapsed: Duration) -> Duration {
    cadence.saturating_sub(elapsed)
}

/// Capture cycle orchestrator
pub struct CaptureOrchestrator<D: CameraDevice, P: Pacer> {
    device: D,
    store: FrameStore,
    controller: ExposureController,
    pacer: P,
    shutdown: Arc<AtomicBool>,
}

impl<D: CameraDevice, P: Pacer> CaptureOrchestrator<D, P> {
    pub fn new(
        device: D,
        store: FrameStore,
        controller: ExposureController,
        pacer: P,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            device,
            store,
            controller,
            pacer,
            shutdown,
        }
    }

    /// Run the capture loop until the configured frame count is reached or
    /// an interruption is observed at a cycle boundary.
    pub async fn run(&self, session: &mut CaptureSession) -> RunSummary {
        let total = session.config.frames;
        let cadence = session.config.cadence;
        let mut summary = RunSummary::default();

        tracing::info!(
            frames = total,
            start_frame = session.next_frame,
            cadence_secs = cadence.as_secs(),
            "Starting timelapse"
        );

        while session.frames_remaining() > 0 {
            if self.shutdown.load(Ordering::Relaxed) {
                summary.interrupted = true;
                tracing::info!(
                    last_completed = ?summary.last_completed,
                    "Interrupted; stopping at cycle boundary"
                );
                break;
            }

            let cycle_start = Instant::now();
            let frame = session.take_frame_number();
            let progress = frame - session.config.start_frame + 1;
            tracing::info!(frame = frame, progress = progress, total = total, "--- Frame cycle ---");

            match self.run_cycle(frame, session).await {
                CycleOutcome::Completed => {
                    summary.captured += 1;
                    summary.last_completed = Some(frame);
                }
                CycleOutcome::Skipped => {
                    summary.skipped += 1;
                    tracing::error!(frame = frame, "Retries exhausted, frame skipped");
                }
            }

            if session.frames_remaining() > 0 && !self.shutdown.load(Ordering::Relaxed) {
                let wait = cadence_sleep(cadence, cycle_start.elapsed());
                if !wait.is_zero() {
                    tracing::info!(wait_secs = wait.as_secs(), "Next capture scheduled");
                }
                self.pacer.sleep(wait).await;
            }
        }

        tracing::info!(
            captured = summary.captured,
            skipped = summary.skipped,
            last_completed = ?summary.last_completed,
            "Timelapse run finished"
        );
        summary
    }

    /// One frame cycle: bounded retries, then persistence and feedback
    /// updates on acceptance. History and LED state change only when the
    /// cycle resolves to `Completed`.
    async fn run_cycle(&self, frame: u32, session: &mut CaptureSession) -> CycleOutcome {
        let max_retries = session.config.tuning.max_retries;

        for attempt in 1..=max_retries {
            match self.attempt(frame, attempt, session).await {
                AttemptOutcome::Accepted { jpeg, brightness } => {
                    let record = FrameRecord {
                        frame,
                        timestamp: Utc::now(),
                        brightness,
                        led_intensity: session.led_level,
                        running_avg: session.history.running_average(),
                    };

                    if let Err(e) = self.store.persist(&record, &jpeg).await {
                        tracing::error!(frame = frame, error = %e, "Persist failed");
                        return CycleOutcome::Skipped;
                    }

                    tracing::info!(
                        frame = frame,
                        brightness = brightness,
                        led = session.led_level,
                        "Frame saved"
                    );

                    session.history.push(brightness);
                    let next = self.controller.next_led_level(session.led_level, brightness);
                    if next != session.led_level {
                        tracing::info!(from = session.led_level, to = next, "LED adjusted");
                        session.led_level = next;
                    }

                    return CycleOutcome::Completed;
                }
                AttemptOutcome::RejectedConsistency => {
                    self.pacer.sleep(CONSISTENCY_BACKOFF).await;
                }
                AttemptOutcome::Failed => {
                    self.pacer.sleep(CAPTURE_BACKOFF).await;
                }
            }
        }

        CycleOutcome::Skipped
    }

    /// One capture attempt: set LED, settle, capture, evaluate
    async fn attempt(&self, frame: u32, attempt: u32, session: &CaptureSession) -> AttemptOutcome {
        self.device.set_led(session.led_level).await;
        self.pacer.sleep(SETTLE_DELAY).await;

        let captured = self.device.capture().await;

        // Limit heat and stray light between frames: the LED goes dark as
        // soon as the capture request resolves, success or failure.
        if !session.config.led_always_on {
            self.device.set_led(0).await;
        }

        match captured {
            Err(e) => {
                tracing::warn!(frame = frame, attempt = attempt, error = %e, "Capture attempt failed");
                AttemptOutcome::Failed
            }
            Ok(image) => {
                let brightness = mean_brightness(&image.image);
                if self.controller.is_consistent(brightness, &session.history) {
                    AttemptOutcome::Accepted {
                        jpeg: image.bytes,
                        brightness,
                    }
                } else {
                    let avg = session.history.running_average().unwrap_or(0.0);
                    tracing::warn!(
                        frame = frame,
                        attempt = attempt,
                        brightness = brightness,
                        running_avg = avg,
                        "Inconsistent brightness, retrying"
                    );
                    AttemptOutcome::RejectedConsistency
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_sleep_compensates_elapsed() {
        assert_eq!(
            cadence_sleep(Duration::from_secs(20), Duration::from_secs(5)),
            Duration::from_secs(15)
        );
    }

    #[test]
    fn test_cadence_sleep_never_negative() {
        // Cycle took longer than the cadence: start the next one immediately
        assert_eq!(
            cadence_sleep(Duration::from_secs(20), Duration::from_secs(23)),
            Duration::ZERO
        );
        assert_eq!(
            cadence_sleep(Duration::from_secs(20), Duration::from_secs(20)),
            Duration::ZERO
        );
    }
}
