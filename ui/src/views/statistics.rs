use dioxus::prelude::*;

use crate::stats::StatisticsPanel;

#[component]
pub fn Statistics() -> Element {
    rsx! {
        section { class: "page page-statistics",
            h1 { "Statistics" }
            p { "Aggregates derived from the backend's stored classification records. Everything is recomputed from the listing on refresh." }
            StatisticsPanel {}
        }
    }
}
