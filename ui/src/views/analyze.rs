use dioxus::prelude::*;

use crate::analyze::AnalyzePanel;

#[component]
pub fn Analyze() -> Element {
    rsx! {
        section { class: "page page-analyze",
            h1 { "Image analysis" }
            p { "Upload egg images and evaluate their viability with the CNN backend. Files are submitted one at a time, in order." }
            AnalyzePanel {}
        }
    }
}
