use dioxus::prelude::*;
use once_cell::sync::OnceCell;

/// Platforms register a `NavBuilder` providing fully constructed `Link`
/// elements, so `ui` does not need to know each platform's `Route` enum.
/// Each closure receives the label text and returns a link that already
/// contains it as its child, preserving styling.
pub struct NavBuilder {
    pub home: fn(label: &str) -> Element,
    pub analyze: fn(label: &str) -> Element,
    pub calibrate: fn(label: &str) -> Element,
    pub statistics: fn(label: &str) -> Element,
}

static NAV_BUILDER: OnceCell<NavBuilder> = OnceCell::new();

/// Call once from the platform crate before rendering the root.
pub fn register_nav(builder: NavBuilder) {
    let _ = NAV_BUILDER.set(builder);
}

#[component]
pub fn AppNavbar() -> Element {
    let internal_nav: Option<VNode> = NAV_BUILDER.get().map(|b| {
        let home = (b.home)("Home");
        let analyze = (b.analyze)("Analyze");
        let calibrate = (b.calibrate)("Calibration");
        let statistics = (b.statistics)("Statistics");

        rsx! {
            nav { class: "navbar__links",
                {home}
                {analyze}
                {calibrate}
                {statistics}
            }
        }
        .expect("AppNavbar: rsx render failed")
    });

    rsx! {
        header {
            id: "navbar",
            class: "navbar",
            div { class: "navbar__inner",
                div { class: "navbar__brand",
                    span { class: "navbar__brand-link",
                        span { class: "navbar__brand-spark", aria_hidden: "true" }
                        span { class: "navbar__brand-mark", "Ovolens" }
                    }
                    span { class: "navbar__brand-subtitle", "Egg viability inspection" }
                }

                if let Some(nav) = internal_nav {
                    {nav}
                }
            }
        }
    }
}
