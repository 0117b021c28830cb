//! Image classification endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::Http;
use crate::error::ApiError;

/// One detection inside a processed image. The backend may find several eggs
/// per image, or none at all (an empty array), which the analyze view reports
/// as its own "no detections" state.
///
/// The auxiliary defect fields are part of the wire contract but only
/// partially consumed; they default when the backend omits them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionRecord {
    pub id: String,
    pub viability: bool,
    pub confidence: f64,
    #[serde(default)]
    pub image_url: String,
    pub analyzed_at: String,
    #[serde(default)]
    pub cracks: bool,
    #[serde(default)]
    pub deformities: bool,
    #[serde(default)]
    pub defects: String,
    #[serde(default)]
    pub colorometry: String,
    #[serde(default)]
    pub position: String,
}

pub struct ClassifyApi {
    pub(crate) http: Arc<Http>,
}

impl ClassifyApi {
    /// Submit one image for classification. Returns zero or more detections.
    pub async fn process(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Vec<DetectionRecord>, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);
        self.http.post_multipart("api/eggs/process/", form).await
    }
}
