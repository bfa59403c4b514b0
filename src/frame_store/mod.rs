//! FrameStore - Durable Frame Persistence
//!
//! ## Responsibilities
//!
//! - Write the accepted image under `{basename}_{nnnnn}.jpg`
//! - Write a sibling JSON metadata record under `{basename}_{nnnnn}.json`
//!
//! The two writes are not atomic; the metadata record is written after the
//! image, so a crash window leaves an image without metadata. A recovery scan
//! should treat metadata absence as "frame incomplete". Overwriting an
//! existing number is allowed (it indicates a resume with an overlapping
//! start offset) but not expected in normal operation.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Metadata record persisted alongside each accepted image
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    /// Sequence number
    pub frame: u32,
    /// Capture timestamp
    pub timestamp: DateTime<Utc>,
    /// Measured brightness of the accepted image
    pub brightness: f64,
    /// LED intensity the frame was captured with
    pub led_intensity: u8,
    /// Running average at capture time (before this sample joined the window)
    pub running_avg: Option<f64>,
}

/// Frame persistence under a deterministic naming convention
pub struct FrameStore {
    output_dir: PathBuf,
    basename: String,
    save_metadata: bool,
}

impl FrameStore {
    pub fn new(output_dir: impl Into<PathBuf>, basename: impl Into<String>, save_metadata: bool) -> Self {
        Self {
            output_dir: output_dir.into(),
            basename: basename.into(),
            save_metadata,
        }
    }

    /// Persist an accepted frame: image first, metadata second.
    ///
    /// Returns the image path.
    pub async fn persist(&self, record: &FrameRecord, jpeg: &[u8]) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).await?;

        let image_path = self.image_path(record.frame);
        fs::write(&image_path, jpeg).await?;

        if self.save_metadata {
            let meta_path = self.meta_path(record.frame);
            let json = serde_json::to_vec_pretty(record)?;
            fs::write(&meta_path, json).await?;
        }

        tracing::debug!(
            frame = record.frame,
            path = %image_path.display(),
            size = jpeg.len(),
            "Frame persisted"
        );

        Ok(image_path)
    }

    /// Image path for a sequence number
    pub fn image_path(&self, frame: u32) -> PathBuf {
        self.output_dir.join(format!("{}_{:05}.jpg", self.basename, frame))
    }

    /// Metadata path for a sequence number
    pub fn meta_path(&self, frame: u32) -> PathBuf {
        self.output_dir.join(format!("{}_{:05}.json", self.basename, frame))
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
