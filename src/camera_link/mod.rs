//! CameraLink - HTTP Adapter for the Camera Device
//!
//! ## Responsibilities
//!
//! - Health probe against the device status endpoint
//! - Best-effort key/value configuration (one `/control` request per setting)
//! - LED intensity control
//! - Single-frame capture with bounded timeout and JPEG decode

pub mod settings;

use crate::error::{Error, Result};
use async_trait::async_trait;
use image::DynamicImage;
use std::time::Duration;

/// Delay between successive control settings so the device is not overwhelmed
const SETTING_DELAY: Duration = Duration::from_millis(50);

/// Device control variable for LED intensity
const LED_CONTROL_VAR: &str = "led_intensity";

/// A decoded capture: raw JPEG bytes for persistence plus the decoded image
/// for brightness evaluation
pub struct CapturedImage {
    pub bytes: Vec<u8>,
    pub image: DynamicImage,
}

/// Outcome of applying a single configuration setting
pub struct SettingOutcome {
    pub key: String,
    pub value: String,
    pub result: Result<()>,
}

/// Device operations the capture loop depends on. Split out as a trait so
/// the orchestrator can run against a scripted device in tests.
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Set LED intensity, best-effort: failures are logged, not raised
    async fn set_led(&self, level: u8);

    /// Capture a single frame
    async fn capture(&self) -> Result<CapturedImage>;
}

/// HTTP camera link
pub struct CameraLink {
    client: reqwest::Client,
    base_url: String,
}

impl CameraLink {
    /// Create a camera link with the default 15s request timeout
    pub fn new(host: &str, port: u16) -> Self {
        Self::with_timeout(host, port, Duration::from_secs(15))
    }

    pub fn with_timeout(host: &str, port: u16, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: format!("http://{}:{}", host, port),
        }
    }

    /// Probe the device status endpoint. Used once before a run starts; a
    /// failed probe aborts the session.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/status", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::error!(error = %e, "Status probe failed");
                false
            }
        }
    }

    /// Apply one control setting
    async fn set_control(&self, key: &str, value: &str) -> Result<()> {
        let url = self.control_url(key, value);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Control(format!("{}: {}", key, e)))?;

        if !resp.status().is_success() {
            return Err(Error::Control(format!(
                "{}: device returned {}",
                key,
                resp.status()
            )));
        }

        tracing::debug!(key = %key, value = %value, "Setting applied");
        Ok(())
    }

    /// Apply each setting independently; a failure on one key does not abort
    /// the remaining keys. Returns a per-key outcome list so the caller can
    /// decide how to treat failures.
    pub async fn configure(&self, settings: &[(String, String)]) -> Vec<SettingOutcome> {
        let mut outcomes = Vec::with_capacity(settings.len());

        for (key, value) in settings {
            let result = self.set_control(key, value).await;
            if let Err(ref e) = result {
                tracing::warn!(key = %key, value = %value, error = %e, "Setting rejected");
            }
            outcomes.push(SettingOutcome {
                key: key.clone(),
                value: value.clone(),
                result,
            });

            tokio::time::sleep(SETTING_DELAY).await;
        }

        outcomes
    }

    fn control_url(&self, key: &str, value: &str) -> String {
        format!("{}/control?var={}&val={}", self.base_url, key, value)
    }

    fn capture_url(&self) -> String {
        // Cache-busting query param, matching the device firmware convention
        let cb = chrono::Utc::now().timestamp_millis();
        format!("{}/capture?_cb={}", self.base_url, cb)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CameraDevice for CameraLink {
    async fn set_led(&self, level: u8) {
        if let Err(e) = self.set_control(LED_CONTROL_VAR, &level.to_string()).await {
            tracing::warn!(level = level, error = %e, "LED set failed");
        }
    }

    async fn capture(&self) -> Result<CapturedImage> {
        let url = self.capture_url();
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::Capture(format!("request error: {}", e)))?;

        if !resp.status().is_success() {
            return Err(Error::Capture(format!(
                "device returned {}",
                resp.status()
            )));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::Capture(format!("body read error: {}", e)))?
            .to_vec();

        let image = image::load_from_memory(&bytes)
            .map_err(|e| Error::Capture(format!("image decode error: {}", e)))?;

        Ok(CapturedImage { bytes, image })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let link = CameraLink::new("172.30.13.113", 80);
        assert_eq!(link.base_url(), "http://172.30.13.113:80");
    }

    #[test]
    fn test_control_url() {
        let link = CameraLink::new("10.0.0.5", 8080);
        assert_eq!(
            link.control_url("framesize", "16"),
            "http://10.0.0.5:8080/control?var=framesize&val=16"
        );
    }

    #[test]
    fn test_capture_url_has_cache_buster() {
        let link = CameraLink::new("10.0.0.5", 80);
        let url = link.capture_url();
        assert!(url.starts_with("http://10.0.0.5:80/capture?_cb="));
    }
}
