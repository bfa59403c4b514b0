//! Brightness - Luminance Evaluation and History Window
//!
//! ## Responsibilities
//!
//! - Reduce a captured image to a single scalar brightness metric
//! - Keep a bounded sliding window of recently accepted brightness samples
//! - Provide the running average consulted by the exposure controller

use image::DynamicImage;
use std::collections::VecDeque;

/// Number of accepted samples retained for the running average
pub const HISTORY_CAPACITY: usize = 10;

/// Mean pixel value of the single-channel luminance representation, in
/// [0, 255]. Deterministic for identical input.
pub fn mean_brightness(image: &DynamicImage) -> f64 {
    let gray = image.to_luma8();
    let pixels = gray.as_raw();
    if pixels.is_empty() {
        return 0.0;
    }
    let sum: u64 = pixels.iter().map(|&p| u64::from(p)).sum();
    sum as f64 / pixels.len() as f64
}

/// Bounded FIFO of the most recent accepted brightness samples.
///
/// Values are inserted only for accepted frames, never for rejected or
/// failed attempts, so the average reflects the sequence actually persisted.
#[derive(Debug, Clone)]
pub struct BrightnessHistory {
    window: VecDeque<f64>,
    capacity: usize,
}

impl BrightnessHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an accepted sample, evicting the oldest when the window is full
    pub fn push(&mut self, brightness: f64) {
        if self.window.len() == self.capacity {
            self.window.pop_front();
        }
        self.window.push_back(brightness);
    }

    /// Arithmetic mean of the current window, `None` when empty
    pub fn running_average(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}

impl Default for BrightnessHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    fn uniform_image(value: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([value])))
    }

    #[test]
    fn test_mean_brightness_uniform() {
        assert_eq!(mean_brightness(&uniform_image(0)), 0.0);
        assert_eq!(mean_brightness(&uniform_image(128)), 128.0);
        assert_eq!(mean_brightness(&uniform_image(255)), 255.0);
    }

    #[test]
    fn test_mean_brightness_mixed() {
        let mut img = GrayImage::from_pixel(2, 1, Luma([0]));
        img.put_pixel(1, 0, Luma([200]));
        let mean = mean_brightness(&DynamicImage::ImageLuma8(img));
        assert!((mean - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_history_has_no_average() {
        let history = BrightnessHistory::new();
        assert!(history.running_average().is_none());
        assert!(history.is_empty());
    }

    #[test]
    fn test_first_sample_becomes_window() {
        let mut history = BrightnessHistory::new();
        history.push(150.0);
        assert_eq!(history.len(), 1);
        assert_eq!(history.running_average(), Some(150.0));
    }

    #[test]
    fn test_window_is_bounded_and_evicts_oldest() {
        let mut history = BrightnessHistory::new();
        for i in 0..15 {
            history.push(i as f64);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        // Window now holds 5..=14; mean = 9.5
        assert_eq!(history.running_average(), Some(9.5));
    }

    #[test]
    fn test_running_average_recomputed_per_acceptance() {
        let mut history = BrightnessHistory::new();
        history.push(100.0);
        history.push(120.0);
        assert_eq!(history.running_average(), Some(110.0));
        history.push(140.0);
        assert_eq!(history.running_average(), Some(120.0));
    }
}
