//! Device configuration settings
//!
//! Builds the ordered key/value list applied to the camera's `/control`
//! endpoint. Values are passed through verbatim; the device firmware defines
//! their meaning and ranges.

/// Resolution preset name -> device framesize value
const RESOLUTIONS: &[(&str, u8)] = &[
    ("96x96", 0),
    ("QQVGA", 1),   // 160x120
    ("128x128", 2),
    ("QCIF", 3),    // 176x144
    ("HQVGA", 4),   // 240x176
    ("240x240", 5),
    ("QVGA", 6),    // 320x240
    ("320x320", 7),
    ("CIF", 8),     // 400x296
    ("HVGA", 9),    // 480x320
    ("VGA", 10),    // 640x480
    ("SVGA", 11),   // 800x600
    ("XGA", 12),    // 1024x768
    ("HD", 13),     // 1280x720
    ("SXGA", 14),   // 1280x1024
    ("UXGA", 15),   // 1600x1200
    ("FHD", 16),    // 1920x1080
    ("PHD", 17),    // 720x1280 (portrait)
    ("P3MP", 18),   // 864x1564
    ("QXGA", 19),   // 2048x1564
];

/// Look up the framesize value for a resolution preset name
pub fn framesize_for(resolution: &str) -> Option<u8> {
    RESOLUTIONS
        .iter()
        .find(|(name, _)| *name == resolution)
        .map(|&(_, value)| value)
}

/// Names of all resolution presets, in device order
pub fn resolution_names() -> Vec<&'static str> {
    RESOLUTIONS.iter().map(|&(name, _)| name).collect()
}

/// Camera settings applied once at session start
#[derive(Debug, Clone)]
pub struct CameraSettings {
    pub framesize: u8,
    pub quality: i32,
    pub brightness: i32,
    pub contrast: i32,
    pub saturation: i32,
    pub sharpness: i32,
    pub denoise: i32,
    pub ae_level: i32,
    pub gainceiling: i32,
    pub special_effect: i32,
    pub awb: bool,
    pub dcw: bool,
    pub awb_gain: bool,
    pub wb_mode: i32,
    pub aec: bool,
    pub aec_value: i32,
    pub aec2: bool,
    pub agc: bool,
    pub agc_gain: i32,
    pub raw_gma: bool,
    pub lenc: bool,
    pub hmirror: bool,
    pub vflip: bool,
    pub bpc: bool,
    pub wpc: bool,
    pub colorbar: bool,
}

impl CameraSettings {
    /// Ordered key/value pairs for the configuration endpoint
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        fn flag(v: bool) -> String {
            if v { "1".to_string() } else { "0".to_string() }
        }

        vec![
            ("framesize".to_string(), self.framesize.to_string()),
            ("quality".to_string(), self.quality.to_string()),
            ("brightness".to_string(), self.brightness.to_string()),
            ("contrast".to_string(), self.contrast.to_string()),
            ("saturation".to_string(), self.saturation.to_string()),
            ("sharpness".to_string(), self.sharpness.to_string()),
            ("denoise".to_string(), self.denoise.to_string()),
            ("ae_level".to_string(), self.ae_level.to_string()),
            ("gainceiling".to_string(), self.gainceiling.to_string()),
            ("special_effect".to_string(), self.special_effect.to_string()),
            ("awb".to_string(), flag(self.awb)),
            ("dcw".to_string(), flag(self.dcw)),
            ("awb_gain".to_string(), flag(self.awb_gain)),
            ("wb_mode".to_string(), self.wb_mode.to_string()),
            ("aec".to_string(), flag(self.aec)),
            ("aec_value".to_string(), self.aec_value.to_string()),
            ("aec2".to_string(), flag(self.aec2)),
            ("agc".to_string(), flag(self.agc)),
            ("agc_gain".to_string(), self.agc_gain.to_string()),
            ("raw_gma".to_string(), flag(self.raw_gma)),
            ("lenc".to_string(), flag(self.lenc)),
            ("hmirror".to_string(), flag(self.hmirror)),
            ("vflip".to_string(), flag(self.vflip)),
            ("bpc".to_string(), flag(self.bpc)),
            ("wpc".to_string(), flag(self.wpc)),
            ("colorbar".to_string(), flag(self.colorbar)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framesize_lookup() {
        assert_eq!(framesize_for("FHD"), Some(16));
        assert_eq!(framesize_for("VGA"), Some(10));
        assert_eq!(framesize_for("4K"), None);
    }

    #[test]
    fn test_pairs_order_and_flags() {
        let settings = CameraSettings {
            framesize: 16,
            quality: 10,
            brightness: 0,
            contrast: 0,
            saturation: 0,
            sharpness: 2,
            denoise: 0,
            ae_level: 0,
            gainceiling: 0,
            special_effect: 0,
            awb: true,
            dcw: true,
            awb_gain: false,
            wb_mode: 0,
            aec: true,
            aec_value: 320,
            aec2: false,
            agc: false,
            agc_gain: 5,
            raw_gma: false,
            lenc: true,
            hmirror: false,
            vflip: true,
            bpc: false,
            wpc: true,
            colorbar: false,
        };

        let pairs = settings.to_pairs();
        assert_eq!(pairs.len(), 26);
        assert_eq!(pairs[0], ("framesize".to_string(), "16".to_string()));
        assert_eq!(pairs[10], ("awb".to_string(), "1".to_string()));
        assert_eq!(pairs[22], ("vflip".to_string(), "1".to_string()));
    }
}
