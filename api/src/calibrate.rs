//! Color calibration endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::Http;
use crate::error::ApiError;

/// 8-bit RGB triple as exchanged with the calibration backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    /// CSS color string for swatch rendering.
    pub fn css(&self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Backend response for one calibration request. The `status` string is the
/// backend's authoritative verdict and is displayed verbatim; the client-side
/// deviation threshold is presentation only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalibrationOutcome {
    pub reference_color: Rgb,
    pub detected_color: Rgb,
    pub deviation: f64,
    pub status: String,
    #[serde(default)]
    pub image_url: String,
    pub timestamp: String,
}

impl CalibrationOutcome {
    pub fn needs_adjustment(&self) -> bool {
        self.status == "needs_adjustment"
    }
}

pub struct CalibrateApi {
    pub(crate) http: Arc<Http>,
}

impl CalibrateApi {
    /// Submit a captured frame together with the expected reference color.
    pub async fn process(
        &self,
        frame_jpeg: Vec<u8>,
        expected: Rgb,
    ) -> Result<CalibrationOutcome, ApiError> {
        let part = reqwest::multipart::Part::bytes(frame_jpeg).file_name("calibration.jpg");
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("expected_r", expected.r.to_string())
            .text("expected_g", expected.g.to_string())
            .text("expected_b", expected.b.to_string());
        self.http.post_multipart("calibration/process/", form).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_calibration_outcome() {
        let body = r#"{
            "reference_color": {"r": 255, "g": 255, "b": 255},
            "detected_color": {"r": 248, "g": 244, "b": 236},
            "deviation": 11.4,
            "status": "ok",
            "image_url": "http://localhost:8000/media/calibration.jpg",
            "timestamp": "2024-03-05T10:00:00Z"
        }"#;

        let outcome: CalibrationOutcome = serde_json::from_str(body).unwrap();
        assert_eq!(outcome.reference_color, Rgb::WHITE);
        assert!(!outcome.needs_adjustment());
        assert!((outcome.deviation - 11.4).abs() < f64::EPSILON);
    }

    #[test]
    fn needs_adjustment_matches_backend_status() {
        let outcome = CalibrationOutcome {
            reference_color: Rgb::WHITE,
            detected_color: Rgb { r: 200, g: 180, b: 150 },
            deviation: 42.0,
            status: "needs_adjustment".into(),
            image_url: String::new(),
            timestamp: "2024-03-05T10:05:00Z".into(),
        };
        assert!(outcome.needs_adjustment());
    }

    #[test]
    fn css_swatch_string() {
        let c = Rgb { r: 12, g: 34, b: 56 };
        assert_eq!(c.css(), "rgb(12, 34, 56)");
    }
}
