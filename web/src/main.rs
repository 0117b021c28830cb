use dioxus::prelude::*;

use ui::components::app_navbar::{register_nav, NavBuilder};
use ui::components::AppNavbar;
use ui::views::{Analyze, Calibrate, Home, Statistics};

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(WebNavbar)]
    #[route("/")]
    Home {},
    #[route("/analysis")]
    Analyze {},
    #[route("/calibration")]
    Calibrate {},
    #[route("/statistics")]
    Statistics {},
}

// Unified shared theme (ui/assets/theme/main.css); embedded so the web shell
// needs no separate asset copy.
const MAIN_CSS_INLINE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../ui/assets/theme/main.css"
));

fn nav_home(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Home {},
        "{label}"
    })
}
fn nav_analyze(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Analyze {},
        "{label}"
    })
}
fn nav_calibrate(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Calibrate {},
        "{label}"
    })
}
fn nav_statistics(label: &str) -> Element {
    rsx!(Link {
        class: "navbar__link",
        to: Route::Statistics {},
        "{label}"
    })
}

fn main() {
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    register_nav(NavBuilder {
        home: nav_home,
        analyze: nav_analyze,
        calibrate: nav_calibrate,
        statistics: nav_statistics,
    });

    rsx! {
        document::Style { "{MAIN_CSS_INLINE}" }

        Router::<Route> {}
    }
}

/// A web-specific Router around the shared `AppNavbar` component
/// which allows us to use the web-specific `Route` enum.
#[component]
fn WebNavbar() -> Element {
    rsx! {
        AppNavbar { }
        Outlet::<Route> {}
    }
}
