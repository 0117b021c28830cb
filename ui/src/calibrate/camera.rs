//! Scoped camera acquisition and still-frame capture.
//!
//! The live stream is an exclusively-held piece of hardware: `CameraFeed`
//! owns it, and every track is stopped on `stop()` or drop, so leaving the
//! calibration view can never leak a camera lock. On non-web targets
//! acquisition reports an unsupported-platform message and the view degrades
//! to an inline notice.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// One captured frame: raw JPEG bytes for upload plus the data URL used for
/// the in-page preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub jpeg: Vec<u8>,
    pub data_url: String,
}

/// Decode the base64 payload of an `image/*` data URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let payload = data_url
        .split(',')
        .nth(1)
        .ok_or("Malformed image data URL")?;
    BASE64
        .decode(payload)
        .map_err(|_| "Image payload was not valid base64".to_string())
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlVideoElement, MediaStream,
        MediaStreamConstraints, MediaStreamTrack,
    };

    use super::CapturedFrame;

    pub struct CameraFeed {
        stream: MediaStream,
    }

    impl CameraFeed {
        /// Request the default camera and attach the stream to the preview
        /// `<video>` element.
        pub async fn acquire(video_id: &str) -> Result<Self, String> {
            let window = web_sys::window().ok_or("window unavailable")?;
            let devices = window
                .navigator()
                .media_devices()
                .map_err(|_| "This browser does not expose camera devices.")?;

            let constraints = MediaStreamConstraints::new();
            constraints.set_video(&JsValue::TRUE);

            let request = devices
                .get_user_media_with_constraints(&constraints)
                .map_err(|_| "Camera access request failed.")?;
            let stream: MediaStream = JsFuture::from(request)
                .await
                .map_err(|_| "Camera permission was denied.")?
                .dyn_into()
                .map_err(|_| "Unexpected camera stream object.")?;

            let video: HtmlVideoElement = element(video_id)?;
            video.set_src_object(Some(&stream));

            Ok(Self { stream })
        }

        /// Stop every track. Idempotent; also invoked on drop.
        pub fn stop(&self) {
            for track in self.stream.get_tracks().iter() {
                if let Ok(track) = track.dyn_into::<MediaStreamTrack>() {
                    track.stop();
                }
            }
        }
    }

    impl Drop for CameraFeed {
        fn drop(&mut self) {
            self.stop();
        }
    }

    /// Draw the current video frame onto the hidden canvas and encode JPEG.
    pub fn capture_frame(video_id: &str, canvas_id: &str) -> Result<CapturedFrame, String> {
        let video: HtmlVideoElement = element(video_id)?;
        let canvas: HtmlCanvasElement = element(canvas_id)?;

        let width = video.video_width();
        let height = video.video_height();
        if width == 0 || height == 0 {
            return Err("The camera has not delivered a frame yet.".into());
        }

        canvas.set_width(width);
        canvas.set_height(height);

        let context: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| "Canvas context unavailable")?
            .ok_or("Canvas context missing")?
            .dyn_into()
            .map_err(|_| "Context cast failed")?;

        context
            .draw_image_with_html_video_element(&video, 0.0, 0.0)
            .map_err(|_| "Unable to draw the video frame")?;

        let data_url = canvas
            .to_data_url_with_type("image/jpeg")
            .map_err(|_| "Unable to encode the captured frame")?;
        let jpeg = super::decode_data_url(&data_url)?;

        Ok(CapturedFrame { jpeg, data_url })
    }

    fn element<T: JsCast>(id: &str) -> Result<T, String> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
            .ok_or_else(|| format!("element #{id} not found"))?
            .dyn_into::<T>()
            .map_err(|_| format!("element #{id} has an unexpected type"))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use super::CapturedFrame;

    const UNSUPPORTED: &str =
        "Live camera capture is only available in the web build. Use the web shell to calibrate.";

    pub struct CameraFeed;

    impl CameraFeed {
        pub async fn acquire(_video_id: &str) -> Result<Self, String> {
            Err(UNSUPPORTED.into())
        }

        pub fn stop(&self) {}
    }

    pub fn capture_frame(_video_id: &str, _canvas_id: &str) -> Result<CapturedFrame, String> {
        Err(UNSUPPORTED.into())
    }
}

pub use imp::{capture_frame, CameraFeed};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_jpeg_data_url_payload() {
        // "hello" in base64.
        let bytes = decode_data_url("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn rejects_a_url_without_a_payload() {
        assert!(decode_data_url("data:image/jpeg;base64").is_err());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_acquisition_reports_unsupported() {
        let outcome = futures::executor::block_on(CameraFeed::acquire("preview"));
        assert!(outcome.is_err());
    }
}
