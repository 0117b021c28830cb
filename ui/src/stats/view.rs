use dioxus::prelude::*;

use api::StoredRecord;

use super::aggregate::Summary;
use super::charts;
use crate::core::format;

#[component]
pub fn StatisticsPanel() -> Element {
    let mut records = use_resource(|| async move {
        api::get_client()
            .records
            .list()
            .await
            .map_err(|err| err.notice())
    });

    let body = match &*records.read_unchecked() {
        None => rsx! {
            p { class: "stats__loading", "Loading statistics…" }
        },
        Some(Err(notice)) => rsx! {
            div { class: "alert alert--error",
                p { "{notice}" }
                p { "Charts will populate once the record listing is reachable." }
            }
        },
        Some(Ok(list)) => render_summary(list),
    };

    rsx! {
        div { class: "stats",
            div { class: "stats__toolbar",
                button {
                    r#type: "button",
                    class: "button button--ghost",
                    onclick: move |_| records.restart(),
                    "Refresh"
                }
            }
            {body}
        }
    }
}

fn render_summary(records: &[StoredRecord]) -> Element {
    if records.is_empty() {
        return rsx! {
            p { class: "stats-card__placeholder",
                "No classification records yet. Run an analysis and the aggregates will appear here."
            }
        };
    }

    let summary = Summary::from_records(records);

    let viability_rate = format::format_pct_value(summary.viability_rate);
    let mean_confidence = format::format_percent(summary.mean_confidence);

    let daily_chart = charts::daily_chart_svg(&summary.daily);
    let monthly_chart = charts::monthly_chart_svg(&summary.monthly);
    let confidence_chart = charts::confidence_chart_svg(&summary.confidence);
    let error_chart = charts::error_chart_svg(&summary.errors);

    let confidence_rows: Vec<(String, String)> = summary
        .confidence
        .iter()
        .map(|b| {
            (
                b.range.to_string(),
                format!("{} ({})", b.count, format::format_pct_value(b.percentage)),
            )
        })
        .collect();

    let error_rows: Vec<(String, String)> = summary
        .errors
        .iter()
        .map(|b| {
            (
                b.label.to_string(),
                format!("{} ({})", b.count, format::format_pct_value(b.percentage)),
            )
        })
        .collect();

    rsx! {
        div { class: "stats-highlights",
            div { class: "stats-highlight",
                span { class: "stats-highlight__label", "Total processed" }
                strong { class: "stats-highlight__value", "{summary.total}" }
                span { class: "stats-highlight__meta", "{summary.daily.len()} active days" }
            }
            div { class: "stats-highlight",
                span { class: "stats-highlight__label", "Viability rate" }
                strong { class: "stats-highlight__value", "{viability_rate}" }
                span { class: "stats-highlight__meta", "{summary.viable} viable eggs" }
            }
            div { class: "stats-highlight",
                span { class: "stats-highlight__label", "Mean confidence" }
                strong { class: "stats-highlight__value", "{mean_confidence}" }
                span { class: "stats-highlight__meta", "Across all records" }
            }
            div { class: "stats-highlight",
                span { class: "stats-highlight__label", "Non-viable" }
                strong { class: "stats-highlight__value", "{summary.non_viable}" }
                span { class: "stats-highlight__meta", "Flagged for error analysis" }
            }
        }

        div { class: "stats__charts",
            {chart_card(daily_chart, "Eggs processed per day, split by viability.", Vec::new())}
            {chart_card(monthly_chart, "Viable and non-viable counts per calendar month.", Vec::new())}
            {chart_card(confidence_chart, "Model confidence, bucketed by fixed thresholds.", confidence_rows)}
            {chart_card(error_chart, "Heuristic error types over non-viable records.", error_rows)}
        }
    }
}

fn chart_card(svg: Result<String, String>, caption: &str, rows: Vec<(String, String)>) -> Element {
    rsx! {
        section { class: "stats-card",
            match svg {
                Ok(markup) => rsx! {
                    div { class: "stats-card__chart", dangerous_inner_html: "{markup}" }
                },
                Err(_) => rsx! {
                    p { class: "stats-card__placeholder", "Not enough data for this chart yet." }
                },
            }
            p { class: "stats-card__meta", "{caption}" }
            if !rows.is_empty() {
                ul { class: "stats-card__legend",
                    for (label, value) in rows.into_iter() {
                        li {
                            span { class: "stats-card__legend-label", "{label}" }
                            span { class: "stats-card__legend-value", "{value}" }
                        }
                    }
                }
            }
        }
    }
}
