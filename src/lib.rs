//! lapsecam - Adaptive Timelapse Capture
//!
//! Drives an ESP32-CAM class network camera to produce a long-running,
//! evenly-spaced image sequence under variable ambient lighting. An adjustable
//! LED illumination source is tuned between frames by a closed feedback loop
//! so exposure stays consistent across frames separated by minutes or hours.
//!
//! ## Components
//!
//! 1. CameraLink - HTTP adapter for the device's status/control/capture endpoints
//! 2. Brightness - luminance evaluation + bounded history window
//! 3. Exposure - consistency check and proportional LED adjustment
//! 4. Orchestrator - per-frame retry state machine and cadence scheduler
//! 5. FrameStore - durable image + metadata persistence
//!
//! ## Design Principles
//!
//! - Single sequential control flow: one capture cycle at a time, paced by
//!   explicit sleeps
//! - Errors are contained per frame: a failing cycle skips its sequence
//!   number and the run continues
//! - All device I/O goes through one reusable HTTP client

pub mod brightness;
pub mod camera_link;
pub mod cli;
pub mod error;
pub mod exposure;
pub mod frame_store;
pub mod orchestrator;
pub mod session;

pub use error::{Error, Result};
pub use session::CaptureSession;
