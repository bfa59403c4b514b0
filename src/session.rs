//! Capture session state
//!
//! Holds the configuration and mutable state for one timelapse run. The
//! session is created once per run and threaded through the orchestrator and
//! exposure controller; only their defined transitions mutate it.

use crate::brightness::BrightnessHistory;
use crate::exposure::Tuning;
use std::path::PathBuf;
use std::time::Duration;

/// Static configuration for a run
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Total number of frames to capture this run
    pub frames: u32,
    /// Starting frame number (non-zero when resuming an interrupted run)
    pub start_frame: u32,
    /// Wall-clock spacing between frame starts
    pub cadence: Duration,
    /// Output directory for images and metadata
    pub output_dir: PathBuf,
    /// Base filename, frame number appended as 5 digits
    pub basename: String,
    /// Initial LED intensity (0-255)
    pub led_initial: u8,
    /// Keep the LED on between captures instead of switching it off
    pub led_always_on: bool,
    /// Write a JSON metadata record alongside each image
    pub save_metadata: bool,
    /// Feedback loop tuning
    pub tuning: Tuning,
}

/// Mutable state for one timelapse run
#[derive(Debug)]
pub struct CaptureSession {
    pub config: SessionConfig,
    /// Current LED intensity, adjusted between frames
    pub led_level: u8,
    /// Accepted-sample history backing the running average
    pub history: BrightnessHistory,
    /// Next frame number to capture (monotonic cursor)
    pub next_frame: u32,
    /// One past the last frame number of this run
    pub end_frame: u32,
}

impl CaptureSession {
    pub fn new(config: SessionConfig) -> Self {
        let next_frame = config.start_frame;
        let end_frame = config.start_frame + config.frames;
        let led_level = config.led_initial;
        Self {
            config,
            led_level,
            history: BrightnessHistory::new(),
            next_frame,
            end_frame,
        }
    }

    /// Frames still to capture, including the one in flight
    pub fn frames_remaining(&self) -> u32 {
        self.end_frame.saturating_sub(self.next_frame)
    }

    /// Consume and return the next sequence number. Numbers are assigned
    /// exactly once per cycle, completed or skipped, and never reused.
    pub fn take_frame_number(&mut self) -> u32 {
        let number = self.next_frame;
        self.next_frame += 1;
        number
    }
}
