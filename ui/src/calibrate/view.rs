use dioxus::prelude::*;

use api::{CalibrationOutcome, Rgb};

use super::camera::{self, CameraFeed, CapturedFrame};
use super::deviation_is_good;
use crate::core::format;

const VIDEO_ID: &str = "calibration-preview";
const CANVAS_ID: &str = "calibration-scratch";

#[component]
pub fn CalibratePanel() -> Element {
    let mut camera_feed = use_signal(|| Option::<CameraFeed>::None);
    let mut frame = use_signal(|| Option::<CapturedFrame>::None);
    let mut reference = use_signal(|| Rgb::WHITE);
    let mut outcome = use_signal(|| Option::<CalibrationOutcome>::None);
    let mut busy = use_signal(|| false);
    let mut notice = use_signal(|| Option::<String>::None);

    // Acquire on view entry; the matching release lives in `use_drop` below
    // so the hardware lock can never outlive the view.
    use_future(move || async move {
        match CameraFeed::acquire(VIDEO_ID).await {
            Ok(feed) => camera_feed.set(Some(feed)),
            Err(message) => notice.set(Some(message)),
        }
    });

    use_drop(move || {
        if let Some(feed) = camera_feed.write().take() {
            feed.stop();
        }
    });

    let capture = move |_| match camera::capture_frame(VIDEO_ID, CANVAS_ID) {
        Ok(captured) => {
            frame.set(Some(captured));
            notice.set(None);
        }
        Err(message) => notice.set(Some(message)),
    };

    let submit = move |_| {
        let Some(captured) = frame() else {
            notice.set(Some("Capture a frame before sending it for calibration.".into()));
            return;
        };
        busy.set(true);
        notice.set(None);
        spawn(async move {
            let client = api::get_client();
            match client.calibrate.process(captured.jpeg, reference()).await {
                Ok(result) => outcome.set(Some(result)),
                Err(err) => notice.set(Some(err.notice())),
            }
            busy.set(false);
        });
    };

    let reset = move |_| {
        frame.set(None);
        outcome.set(None);
        notice.set(None);
    };

    let streaming = camera_feed.read().is_some();
    let has_frame = frame.read().is_some();
    let reference_now = reference();
    let reference_css = reference_now.css();

    rsx! {
        div { class: "calibrate",
            section { class: "stats-card calibrate__capture",
                div { class: "stats-card__header",
                    h2 { "Frame capture" }
                    span { class: "stats-card__meta",
                        "Point the camera at a reference egg and grab a still frame."
                    }
                }

                div { class: "calibrate__preview",
                    if !streaming {
                        p { class: "stats-card__placeholder", "Starting camera…" }
                    }
                    video { id: VIDEO_ID, class: "calibrate__video", autoplay: true, muted: true }
                    canvas { id: CANVAS_ID, class: "calibrate__scratch" }
                }

                div { class: "calibrate__actions",
                    button {
                        r#type: "button",
                        class: "button button--primary",
                        disabled: !streaming,
                        onclick: capture,
                        "Capture frame"
                    }
                    button {
                        r#type: "button",
                        class: "button button--accent",
                        disabled: !has_frame || busy(),
                        onclick: submit,
                        if busy() { "Sending…" } else { "Send for calibration" }
                    }
                    button {
                        r#type: "button",
                        class: "button button--ghost",
                        onclick: reset,
                        "Reset"
                    }
                }

                if let Some(captured) = frame() {
                    div { class: "calibrate__snapshot",
                        h3 { "Captured frame" }
                        img { src: "{captured.data_url}", alt: "Captured calibration frame" }
                    }
                }

                if let Some(message) = notice() {
                    div { class: "alert alert--error", "{message}" }
                }
            }

            section { class: "stats-card calibrate__reference",
                div { class: "stats-card__header",
                    h2 { "Reference color" }
                    span { class: "stats-card__meta", "The color the egg should have under correct lighting." }
                }

                div { class: "calibrate__swatch", style: "background-color: {reference_css};" }

                div { class: "calibrate__sliders",
                    label { class: "calibrate__slider",
                        span { "Red" }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "255",
                            step: "1",
                            value: "{reference_now.r}",
                            oninput: move |evt| {
                                if let Ok(v) = evt.value().parse::<u8>() {
                                    reference.with_mut(|c| c.r = v);
                                }
                            },
                        }
                        span { class: "calibrate__slider-value", "{reference_now.r}" }
                    }
                    label { class: "calibrate__slider",
                        span { "Green" }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "255",
                            step: "1",
                            value: "{reference_now.g}",
                            oninput: move |evt| {
                                if let Ok(v) = evt.value().parse::<u8>() {
                                    reference.with_mut(|c| c.g = v);
                                }
                            },
                        }
                        span { class: "calibrate__slider-value", "{reference_now.g}" }
                    }
                    label { class: "calibrate__slider",
                        span { "Blue" }
                        input {
                            r#type: "range",
                            min: "0",
                            max: "255",
                            step: "1",
                            value: "{reference_now.b}",
                            oninput: move |evt| {
                                if let Ok(v) = evt.value().parse::<u8>() {
                                    reference.with_mut(|c| c.b = v);
                                }
                            },
                        }
                        span { class: "calibrate__slider-value", "{reference_now.b}" }
                    }
                }
            }

            if let Some(result) = outcome() {
                {render_outcome(&result)}
            }
        }
    }
}

fn render_outcome(result: &CalibrationOutcome) -> Element {
    let is_good = deviation_is_good(result.deviation);
    let badge_class = if is_good {
        "badge badge--viable"
    } else {
        "badge badge--non-viable"
    };
    let verdict = if is_good { "Good match" } else { "Adjustment needed" };
    let deviation = format::format_deviation(result.deviation);
    let expected_css = result.reference_color.css();
    let detected_css = result.detected_color.css();
    let expected = result.reference_color;
    let detected = result.detected_color;
    let meter = ((1.0 - result.deviation / 50.0).clamp(0.0, 1.0) * 100.0).round();

    rsx! {
        section { class: "stats-card calibrate__result",
            div { class: "stats-card__header",
                h2 { "Calibration result" }
                span { class: "stats-card__meta", "Detected color against the expected reference." }
            }

            div { class: "calibrate__colors",
                div { class: "calibrate__color",
                    h4 { "Expected" }
                    div { class: "calibrate__swatch", style: "background-color: {expected_css};" }
                    p { "R {expected.r} · G {expected.g} · B {expected.b}" }
                }
                div { class: "calibrate__color",
                    h4 { "Detected" }
                    div { class: "calibrate__swatch", style: "background-color: {detected_css};" }
                    p { "R {detected.r} · G {detected.g} · B {detected.b}" }
                }
            }

            div { class: "calibrate__deviation",
                div { class: "calibrate__deviation-row",
                    span { "Color deviation: {deviation}" }
                    span { class: "{badge_class}", "{verdict}" }
                }
                div { class: "calibrate__meter",
                    div { class: "calibrate__meter-fill", style: "width: {meter}%;" }
                }
                p { class: "stats-card__meta", "Backend status: {result.status}" }
            }

            if result.needs_adjustment() {
                div { class: "alert alert--warning",
                    "Significant deviation detected. Adjust the lighting or white balance and calibrate again."
                }
            }

            p { class: "calibrate__timestamp", "Captured at {result.timestamp}" }
        }
    }
}
