use dioxus::prelude::*;

use crate::calibrate::CalibratePanel;

#[component]
pub fn Calibrate() -> Element {
    rsx! {
        section { class: "page page-calibrate",
            h1 { "Camera calibration" }
            p { "Capture a frame of a reference egg and compare the detected color against the expected value. Good lighting here pays off in every later analysis." }
            CalibratePanel {}
        }
    }
}
