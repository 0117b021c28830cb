use dioxus::prelude::*;

#[component]
pub fn Home() -> Element {
    rsx! {
        section { class: "page page-home",
            h1 { "Egg viability inspection" }
            p { class: "page-home__tagline",
                "Computer-vision screening for hatchery lines: upload candling images, keep the camera calibrated, and watch the aggregate numbers."
            }

            ul { class: "page-home__features",
                li {
                    strong { "Analyze" }
                    " — submit candling images to the CNN backend and review per-egg verdicts."
                }
                li {
                    strong { "Calibration" }
                    " — capture a reference frame and check the detected color against the expected one."
                }
                li {
                    strong { "Statistics" }
                    " — daily and monthly trends, confidence distribution, and error analysis over stored records."
                }
            }
            p { class: "page-home__cta",
                "Pick a module from the navigation bar to get started."
            }
        }
    }
}
