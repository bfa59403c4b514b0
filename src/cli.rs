//! Command-line interface
//!
//! Mirrors the camera device's full configuration surface; resolution,
//! quality, and image-adjustment options are passed through verbatim to the
//! device's control endpoint.

use crate::camera_link::settings::{framesize_for, resolution_names, CameraSettings};
use crate::error::{Error, Result};
use crate::exposure::Tuning;
use crate::session::SessionConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "lapsecam")]
#[command(about = "Timelapse capture with adaptive LED exposure control", long_about = None)]
pub struct Cli {
    // Connection
    /// Camera IP address or hostname
    #[arg(long, short = 'H')]
    pub host: String,

    /// Camera port
    #[arg(long, default_value_t = 80)]
    pub port: u16,

    // Capture
    /// Total number of frames to capture
    #[arg(long, short = 'n', default_value_t = 100)]
    pub frames: u32,

    /// Starting frame number (for resuming an interrupted run)
    #[arg(long, short = 's', default_value_t = 0)]
    pub start_frame: u32,

    /// Interval between frame starts, in seconds
    #[arg(long, short = 'i', default_value_t = 300)]
    pub interval: u64,

    /// Output directory
    #[arg(long, short = 'o', default_value = "./timelapse")]
    pub output: PathBuf,

    /// Base filename (frame number appended as 5 digits)
    #[arg(long, short = 'b', default_value = "frame")]
    pub basename: String,

    /// Do not write JSON metadata alongside images
    #[arg(long)]
    pub no_metadata: bool,

    // Camera settings
    /// Resolution preset (e.g. VGA, HD, FHD, UXGA)
    #[arg(long, short = 'r', default_value = "FHD")]
    pub resolution: String,

    /// JPEG quality (4-63, lower is better)
    #[arg(long, default_value_t = 10)]
    pub quality: i32,

    // Image adjustments
    /// Brightness (-3 to 3)
    #[arg(long, default_value_t = 0)]
    pub brightness: i32,

    /// Contrast (-3 to 3)
    #[arg(long, default_value_t = 0)]
    pub contrast: i32,

    /// Saturation (-4 to 4)
    #[arg(long, default_value_t = 0)]
    pub saturation: i32,

    /// Sharpness (-3 to 3)
    #[arg(long, default_value_t = 2)]
    pub sharpness: i32,

    /// De-noise (0=auto, 1-8)
    #[arg(long, default_value_t = 0)]
    pub denoise: i32,

    /// Special effect (0=none, 1=negative, 2=grayscale, ...)
    #[arg(long, default_value_t = 0)]
    pub special_effect: i32,

    // Exposure
    /// Auto exposure level (-5 to 5)
    #[arg(long, default_value_t = 0)]
    pub ae_level: i32,

    /// Gain ceiling (0-511)
    #[arg(long, default_value_t = 0)]
    pub gainceiling: i32,

    /// Disable auto exposure control
    #[arg(long)]
    pub no_aec: bool,

    /// Manual exposure value (0-1536)
    #[arg(long, default_value_t = 320)]
    pub aec_value: i32,

    /// Enable night mode
    #[arg(long)]
    pub aec2: bool,

    /// Enable auto gain control
    #[arg(long)]
    pub agc: bool,

    /// Manual gain (0-64)
    #[arg(long, default_value_t = 5)]
    pub agc_gain: i32,

    // White balance
    /// Disable auto white balance
    #[arg(long)]
    pub no_awb: bool,

    /// Disable advanced AWB
    #[arg(long)]
    pub no_dcw: bool,

    /// Enable manual AWB gain
    #[arg(long)]
    pub awb_gain: bool,

    /// WB mode (0=auto, 1=sunny, 2=cloudy, 3=office, 4=home)
    #[arg(long, default_value_t = 0)]
    pub wb_mode: i32,

    // Corrections
    /// Enable gamma correction
    #[arg(long)]
    pub gma: bool,

    /// Disable lens correction
    #[arg(long)]
    pub no_lenc: bool,

    /// Enable black pixel correction
    #[arg(long)]
    pub bpc: bool,

    /// Disable white pixel correction
    #[arg(long)]
    pub no_wpc: bool,

    // Orientation
    /// Horizontal mirror
    #[arg(long)]
    pub hmirror: bool,

    /// Vertical flip
    #[arg(long)]
    pub vflip: bool,

    /// Show color bar (for testing)
    #[arg(long)]
    pub colorbar: bool,

    // LED / adaptive exposure
    /// Initial LED intensity (0-255)
    #[arg(long, default_value_t = 50)]
    pub led_initial: u8,

    /// Keep LED on between captures
    #[arg(long)]
    pub led_always_on: bool,

    /// Lowest LED intensity the feedback loop may set
    #[arg(long, default_value_t = 0)]
    pub led_min: u8,

    /// Highest LED intensity the feedback loop may set
    #[arg(long, default_value_t = 255)]
    pub led_max: u8,

    /// Target image brightness (0-255)
    #[arg(long, default_value_t = 128)]
    pub target_brightness: u8,

    /// Acceptable brightness deviation from target
    #[arg(long, default_value_t = 30)]
    pub brightness_tolerance: u32,

    /// Max deviation from running average before retry
    #[arg(long, default_value_t = 40)]
    pub consistency_tolerance: u32,

    /// Max capture attempts per frame
    #[arg(long, default_value_t = 3)]
    pub max_retries: u32,

    // Debug
    /// Verbose output
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Test mode: configure and capture a single frame, then exit
    #[arg(long)]
    pub test: bool,
}

impl Cli {
    /// Device settings built from the passthrough options
    pub fn camera_settings(&self) -> Result<CameraSettings> {
        let framesize = framesize_for(&self.resolution).ok_or_else(|| {
            Error::Config(format!(
                "unknown resolution preset '{}' (expected one of: {})",
                self.resolution,
                resolution_names().join(", ")
            ))
        })?;

        Ok(CameraSettings {
            framesize,
            quality: self.quality,
            brightness: self.brightness,
            contrast: self.contrast,
            saturation: self.saturation,
            sharpness: self.sharpness,
            denoise: self.denoise,
            ae_level: self.ae_level,
            gainceiling: self.gainceiling,
            special_effect: self.special_effect,
            awb: !self.no_awb,
            dcw: !self.no_dcw,
            awb_gain: self.awb_gain,
            wb_mode: self.wb_mode,
            aec: !self.no_aec,
            aec_value: self.aec_value,
            aec2: self.aec2,
            agc: self.agc,
            agc_gain: self.agc_gain,
            raw_gma: self.gma,
            lenc: !self.no_lenc,
            hmirror: self.hmirror,
            vflip: self.vflip,
            bpc: self.bpc,
            wpc: !self.no_wpc,
            colorbar: self.colorbar,
        })
    }

    /// Session configuration for the capture run
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            frames: if self.test { 1 } else { self.frames },
            start_frame: self.start_frame,
            cadence: Duration::from_secs(self.interval),
            output_dir: self.output.clone(),
            basename: self.basename.clone(),
            led_initial: self.led_initial,
            led_always_on: self.led_always_on,
            save_metadata: !self.no_metadata,
            tuning: Tuning {
                target_brightness: f64::from(self.target_brightness),
                brightness_tolerance: f64::from(self.brightness_tolerance),
                consistency_tolerance: f64::from(self.consistency_tolerance),
                max_retries: self.max_retries,
                led_min: self.led_min,
                led_max: self.led_max,
            },
        }
    }
}
