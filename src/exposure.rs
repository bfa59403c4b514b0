//! Exposure - Adaptive Feedback Controller
//!
//! ## Responsibilities
//!
//! - Consistency check: reject transient captures (partial occlusion, flash
//!   artifacts) that deviate too far from the running average
//! - Proportional LED adjustment toward the target brightness, computed only
//!   for accepted samples and applied to the next cycle
//!
//! The adjustment is intentionally coarse and slow-reacting: single-step
//! corrections are clamped so the loop cannot oscillate across a multi-minute
//! cadence.

use crate::brightness::BrightnessHistory;

/// Divisor for the proportional step
const STEP_DIVISOR: f64 = 8.0;

/// Largest single-step LED correction, in levels
const MAX_STEP: i32 = 20;

/// Default LED level bounds
pub const LED_MIN: u8 = 0;
pub const LED_MAX: u8 = 255;

/// Tuning parameters for the feedback loop
#[derive(Debug, Clone, Copy)]
pub struct Tuning {
    /// Target image brightness (0-255)
    pub target_brightness: f64,
    /// Acceptable deviation from target before the LED is adjusted
    pub brightness_tolerance: f64,
    /// Max deviation from the running average before a sample is rejected
    pub consistency_tolerance: f64,
    /// Capture attempts per frame before it is skipped
    pub max_retries: u32,
    /// Lower LED level bound for adjustments
    pub led_min: u8,
    /// Upper LED level bound for adjustments
    pub led_max: u8,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_brightness: 128.0,
            brightness_tolerance: 30.0,
            consistency_tolerance: 40.0,
            max_retries: 3,
            led_min: LED_MIN,
            led_max: LED_MAX,
        }
    }
}

/// Exposure feedback controller
#[derive(Debug, Clone, Copy)]
pub struct ExposureController {
    tuning: Tuning,
}

impl ExposureController {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    /// Whether a sample is consistent with the recent history.
    ///
    /// An empty history has no opinion and accepts anything. The boundary is
    /// inclusive: a deviation exactly equal to the tolerance is accepted.
    pub fn is_consistent(&self, brightness: f64, history: &BrightnessHistory) -> bool {
        match history.running_average() {
            None => true,
            Some(avg) => (brightness - avg).abs() <= self.tuning.consistency_tolerance,
        }
    }

    /// Proportional LED step for an accepted sample.
    ///
    /// Zero inside the brightness tolerance (inclusive); otherwise
    /// `deviation / 8` truncated toward zero and clamped to +/-20.
    pub fn led_adjustment(&self, brightness: f64) -> i32 {
        let deviation = self.tuning.target_brightness - brightness;
        if deviation.abs() <= self.tuning.brightness_tolerance {
            return 0;
        }
        let step = (deviation / STEP_DIVISOR).trunc() as i32;
        step.clamp(-MAX_STEP, MAX_STEP)
    }

    /// LED level for the next cycle, clamped to the configured bounds
    pub fn next_led_level(&self, current: u8, brightness: f64) -> u8 {
        let adjusted = i32::from(current) + self.led_adjustment(brightness);
        adjusted.clamp(i32::from(self.tuning.led_min), i32::from(self.tuning.led_max)) as u8
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ExposureController {
        ExposureController::new(Tuning::default())
    }

    fn history_with(samples: &[f64]) -> BrightnessHistory {
        let mut history = BrightnessHistory::new();
        for &s in samples {
            history.push(s);
        }
        history
    }

    #[test]
    fn test_empty_history_always_consistent() {
        let history = BrightnessHistory::new();
        assert!(controller().is_consistent(150.0, &history));
        assert!(controller().is_consistent(0.0, &history));
    }

    #[test]
    fn test_consistency_boundary_is_inclusive() {
        // avg = 120, tolerance = 40
        let history = history_with(&[120.0]);
        let ctl = controller();
        assert!(ctl.is_consistent(160.0, &history));
        assert!(ctl.is_consistent(80.0, &history));
        assert!(!ctl.is_consistent(161.0, &history));
        assert!(!ctl.is_consistent(79.0, &history));
    }

    #[test]
    fn test_outlier_rejected_against_average() {
        // avg = 120, sample 170 deviates by 50 > 40
        let history = history_with(&[120.0]);
        assert!(!controller().is_consistent(170.0, &history));
    }

    #[test]
    fn test_no_adjustment_inside_tolerance() {
        let ctl = controller();
        assert_eq!(ctl.led_adjustment(128.0), 0);
        // Boundary inclusive: deviation exactly 30 means no change
        assert_eq!(ctl.led_adjustment(98.0), 0);
        assert_eq!(ctl.led_adjustment(158.0), 0);
    }

    #[test]
    fn test_proportional_step() {
        // target 128, sample 80: deviation 48 -> step 6
        assert_eq!(controller().led_adjustment(80.0), 6);
        // sample 170: deviation -42 -> step -5 (truncated toward zero)
        assert_eq!(controller().led_adjustment(170.0), -5);
    }

    #[test]
    fn test_step_is_clamped() {
        // deviation 128 -> 16, under clamp
        assert_eq!(controller().led_adjustment(0.0), 16);
        let bright = ExposureController::new(Tuning {
            target_brightness: 255.0,
            ..Tuning::default()
        });
        // deviation 255 -> 31, clamped to 20
        assert_eq!(bright.led_adjustment(0.0), 20);
        let dark = ExposureController::new(Tuning {
            target_brightness: 0.0,
            ..Tuning::default()
        });
        assert_eq!(dark.led_adjustment(255.0), -20);
    }

    #[test]
    fn test_next_level_clamped_to_range() {
        let ctl = controller();
        // 80 -> +6
        assert_eq!(ctl.next_led_level(50, 80.0), 56);
        assert_eq!(ctl.next_led_level(253, 80.0), 255);
        // 170 -> -5
        assert_eq!(ctl.next_led_level(3, 170.0), 0);
        assert_eq!(ctl.next_led_level(0, 170.0), 0);
    }

    #[test]
    fn test_custom_led_bounds_respected() {
        let ctl = ExposureController::new(Tuning {
            led_min: 10,
            led_max: 100,
            ..Tuning::default()
        });
        // 80 -> +6, but capped at the configured ceiling
        assert_eq!(ctl.next_led_level(98, 80.0), 100);
        // 170 -> -5, held at the configured floor
        assert_eq!(ctl.next_led_level(12, 170.0), 10);
    }
}
