use dioxus::prelude::*;
use futures_util::StreamExt;
use serde::Serialize;

use crate::core::download;
use crate::core::format;

use super::queue::{outcome_from_detections, FileOutcome, PendingImage, SubmissionQueue};

/// One accumulated result row. A single image can contribute several rows
/// (one per detection), so rows get their own client-side key; backend ids
/// are not unique across a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    #[serde(skip)]
    pub key: String,
    pub backend_id: String,
    pub filename: String,
    pub viable: bool,
    pub confidence: f64,
    pub analyzed_at: String,
    pub image_url: String,
}

#[derive(Clone, Debug, PartialEq)]
enum ExportStatus {
    Idle,
    Working,
    Done(String),
    Error(String),
}

#[derive(Debug, Clone)]
enum AnalyzeEvent {
    Submit,
}

#[component]
pub fn AnalyzePanel() -> Element {
    let mut pending = use_signal(Vec::<PendingImage>::new);
    let results = use_signal(Vec::<AnalysisRow>::new);
    let is_analyzing = use_signal(|| false);
    let progress = use_signal(|| (0usize, 0usize));
    let no_detection_notice = use_signal(|| Option::<String>::None);
    let failure_notices = use_signal(Vec::<String>::new);
    let export_status = use_signal(|| ExportStatus::Idle);

    let coroutine = {
        let pending_ref = pending;
        let results_ref = results;
        let analyzing_ref = is_analyzing;
        let progress_ref = progress;
        let no_detection_ref = no_detection_notice;
        let failures_ref = failure_notices;

        use_coroutine(move |mut rx: UnboundedReceiver<AnalyzeEvent>| {
            let mut pending_signal = pending_ref;
            let mut results_signal = results_ref;
            let mut analyzing_signal = analyzing_ref;
            let mut progress_signal = progress_ref;
            let mut no_detection_signal = no_detection_ref;
            let mut failures_signal = failures_ref;

            async move {
                while let Some(event) = rx.next().await {
                    match event {
                        AnalyzeEvent::Submit => {
                            let files = pending_signal.take();
                            if files.is_empty() {
                                continue;
                            }

                            analyzing_signal.set(true);
                            no_detection_signal.set(None);
                            failures_signal.set(Vec::new());
                            progress_signal.set((0, files.len()));

                            let client = api::get_client();
                            let queue = SubmissionQueue::default();
                            queue
                                .run(
                                    files,
                                    |file| {
                                        let client = client.clone();
                                        async move {
                                            match client
                                                .classify
                                                .process(&file.name, file.bytes)
                                                .await
                                            {
                                                Ok(detections) => {
                                                    outcome_from_detections(detections)
                                                }
                                                Err(err) => FileOutcome::Failed(err.notice()),
                                            }
                                        }
                                    },
                                    |index, name, outcome| {
                                        apply_outcome(
                                            name,
                                            outcome,
                                            &mut results_signal,
                                            &mut no_detection_signal,
                                            &mut failures_signal,
                                        );
                                        progress_signal.with_mut(|(done, _)| *done = index + 1);
                                    },
                                )
                                .await;

                            analyzing_signal.set(false);
                        }
                    }
                }
            }
        })
    };

    let on_file_input = move |evt: FormEvent| async move {
        if let Some(file_engine) = evt.files() {
            for name in file_engine.files() {
                if let Some(bytes) = file_engine.read_file(&name).await {
                    pending.write().push(PendingImage { name, bytes });
                }
            }
        }
    };

    let csv_handler = {
        let rows = results;
        let mut status_signal = export_status;
        move |_| {
            if matches!(status_signal(), ExportStatus::Working) {
                return;
            }
            status_signal.set(ExportStatus::Working);
            let rows = rows();

            #[cfg(target_arch = "wasm32")]
            {
                crate::core::platform::spawn_future(async move {
                    match perform_csv_export(rows).await {
                        Ok(message) => status_signal.set(ExportStatus::Done(message)),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    }
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                match futures::executor::block_on(perform_csv_export(rows)) {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
            }
        }
    };

    let json_handler = {
        let rows = results;
        let mut status_signal = export_status;
        move |_| {
            if matches!(status_signal(), ExportStatus::Working) {
                return;
            }
            status_signal.set(ExportStatus::Working);
            let rows = rows();

            #[cfg(target_arch = "wasm32")]
            {
                crate::core::platform::spawn_future(async move {
                    match perform_json_export(rows).await {
                        Ok(message) => status_signal.set(ExportStatus::Done(message)),
                        Err(err) => status_signal.set(ExportStatus::Error(err)),
                    }
                });
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                match futures::executor::block_on(perform_json_export(rows)) {
                    Ok(message) => status_signal.set(ExportStatus::Done(message)),
                    Err(err) => status_signal.set(ExportStatus::Error(err)),
                }
            }
        }
    };

    let pending_files = pending();
    let result_rows = results();
    let (done, total) = progress();
    let analyzing = is_analyzing();
    let export_feedback = match export_status() {
        ExportStatus::Idle | ExportStatus::Working => None,
        ExportStatus::Done(message) => Some(("stats-card__meta--success", message)),
        ExportStatus::Error(err) => Some(("stats-card__meta--error", err)),
    };

    rsx! {
        div { class: "analyze",
            section { class: "stats-card analyze__upload",
                div { class: "stats-card__header",
                    h2 { "Upload images" }
                    span { class: "stats-card__meta",
                        "JPG, PNG or WEBP, at least 224×224 px. Several files at once are fine."
                    }
                }

                label { class: "analyze__dropzone",
                    input {
                        r#type: "file",
                        accept: "image/*",
                        multiple: true,
                        onchange: on_file_input,
                    }
                    span { "Choose egg images to analyze" }
                }

                if !pending_files.is_empty() {
                    ul { class: "analyze__pending",
                        for (index, file) in pending_files.iter().enumerate() {
                            li { key: "{index}-{file.name}",
                                span { class: "analyze__pending-name", "{file.name}" }
                                button {
                                    r#type: "button",
                                    class: "button button--ghost",
                                    disabled: analyzing,
                                    onclick: move |_| {
                                        let mut list = pending.write();
                                        if index < list.len() {
                                            list.remove(index);
                                        }
                                    },
                                    "Remove"
                                }
                            }
                        }
                    }

                    div { class: "analyze__actions",
                        button {
                            r#type: "button",
                            class: "button button--primary",
                            disabled: analyzing,
                            onclick: move |_| coroutine.send(AnalyzeEvent::Submit),
                            if analyzing { "Analyzing…" } else { "Start analysis" }
                        }
                        if analyzing {
                            span { class: "analyze__progress", "Processing {done}/{total}" }
                        }
                    }
                }

                if let Some(filename) = no_detection_notice() {
                    div { class: "alert alert--warning",
                        "No eggs were detected in "
                        strong { "{filename}" }
                        ". Make sure the image is sharp and the egg is centred."
                    }
                }

                for notice in failure_notices().into_iter() {
                    div { class: "alert alert--error", "{notice}" }
                }
            }

            if !result_rows.is_empty() {
                section { class: "stats-card analyze__results",
                    div { class: "stats-card__header",
                        h2 { "Analysis results" }
                        span { class: "stats-card__meta", "{result_rows.len()} detections" }
                    }

                    div { class: "analyze__toolbar",
                        button {
                            r#type: "button",
                            class: "button",
                            onclick: csv_handler,
                            "Export CSV"
                        }
                        button {
                            r#type: "button",
                            class: "button",
                            onclick: json_handler,
                            "Export JSON"
                        }
                        button {
                            r#type: "button",
                            class: "button button--ghost",
                            onclick: move |_| {
                                let mut results = results;
                                results.set(Vec::new());
                            },
                            "Clear"
                        }
                    }

                    if let Some((class_suffix, message)) = export_feedback {
                        p { class: "stats-card__meta {class_suffix}", "{message}" }
                    }

                    ul { class: "analyze__rows",
                        for row in result_rows.iter() {
                            {render_row(row)}
                        }
                    }
                }
            }
        }
    }
}

fn render_row(row: &AnalysisRow) -> Element {
    let badge_class = if row.viable {
        "badge badge--viable"
    } else {
        "badge badge--non-viable"
    };
    let verdict = if row.viable { "Viable" } else { "Non-viable" };
    let confidence = format::format_percent(row.confidence);

    rsx! {
        li { key: "{row.key}", class: "analyze__row",
            div { class: "analyze__row-main",
                span { class: "analyze__row-file", "{row.filename}" }
                span { class: "analyze__row-time", "Analyzed {row.analyzed_at}" }
            }
            span { class: "{badge_class}", "{verdict}" }
            div { class: "analyze__row-confidence",
                strong { "{confidence}" }
                span { "confidence" }
            }
        }
    }
}

/// Fold one completed submission into the view state. Detections append
/// result rows; an empty response flags the file instead; failures queue an
/// inline notice and the batch moves on.
fn apply_outcome(
    name: &str,
    outcome: FileOutcome,
    results: &mut Signal<Vec<AnalysisRow>>,
    no_detection: &mut Signal<Option<String>>,
    failures: &mut Signal<Vec<String>>,
) {
    match outcome {
        FileOutcome::Detections(detections) => {
            results.with_mut(|rows| {
                for detection in detections {
                    rows.push(AnalysisRow {
                        key: uuid::Uuid::new_v4().to_string(),
                        backend_id: detection.id,
                        filename: name.to_string(),
                        viable: detection.viability,
                        confidence: detection.confidence,
                        analyzed_at: detection.analyzed_at,
                        image_url: detection.image_url,
                    });
                }
            });
        }
        FileOutcome::NoDetections => {
            no_detection.set(Some(name.to_string()));
        }
        FileOutcome::Failed(message) => {
            failures.with_mut(|list| list.push(format!("Could not process \"{name}\": {message}")));
        }
    }
}

async fn perform_json_export(rows: Vec<AnalysisRow>) -> Result<String, String> {
    if rows.is_empty() {
        return Err("Nothing to export yet.".into());
    }

    let json = serde_json::to_string_pretty(&rows).map_err(|err| err.to_string())?;
    download::copy_to_clipboard(json.clone()).await.ok();
    let filename = format!("ovolens-analysis-{}.json", download::timestamp_slug());
    let delivery = download::download_bytes(&filename, "application/json", json.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => format!("JSON saved to {path}"),
        None => "JSON download started".to_string(),
    })
}

async fn perform_csv_export(rows: Vec<AnalysisRow>) -> Result<String, String> {
    if rows.is_empty() {
        return Err("Nothing to export yet.".into());
    }

    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    table.push(
        ["id", "file", "result", "confidence_pct", "analyzed_at"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for row in &rows {
        table.push(vec![
            row.backend_id.clone(),
            row.filename.clone(),
            if row.viable { "viable" } else { "non-viable" }.to_string(),
            format!("{:.1}", row.confidence * 100.0),
            row.analyzed_at.clone(),
        ]);
    }

    let csv = download::build_csv(&table);
    download::copy_to_clipboard(csv.clone()).await.ok();
    let filename = format!("ovolens-analysis-{}.csv", download::timestamp_slug());
    let delivery = download::download_bytes(&filename, "text/csv", csv.into_bytes()).await?;
    Ok(match delivery {
        Some(path) => format!("CSV saved to {path}"),
        None => "CSV download started".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(id: &str, viable: bool) -> api::DetectionRecord {
        api::DetectionRecord {
            id: id.into(),
            viability: viable,
            confidence: 0.9,
            image_url: String::new(),
            analyzed_at: "2024-01-01T00:00:00Z".into(),
            cracks: false,
            deformities: false,
            defects: String::new(),
            colorometry: String::new(),
            position: String::new(),
        }
    }

    #[test]
    fn csv_export_refuses_an_empty_result_list() {
        let outcome = futures::executor::block_on(perform_csv_export(Vec::new()));
        assert!(outcome.is_err());
    }

    #[test]
    fn json_export_skips_the_client_side_key() {
        let row = AnalysisRow {
            key: "local-key".into(),
            backend_id: "egg-1".into(),
            filename: "front.jpg".into(),
            viable: true,
            confidence: 0.9,
            analyzed_at: "2024-01-01T00:00:00Z".into(),
            image_url: String::new(),
        };
        let json = serde_json::to_string(&row).unwrap();
        assert!(!json.contains("local-key"));
        assert!(json.contains("egg-1"));
    }

    #[test]
    fn one_image_can_yield_multiple_rows() {
        let mut rows = Vec::new();
        match outcome_from_detections(vec![detection("a", true), detection("b", false)]) {
            FileOutcome::Detections(detections) => {
                for d in detections {
                    rows.push((d.id, d.viability));
                }
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(rows.len(), 2);
        assert!(rows[0].1);
        assert!(!rows[1].1);
    }
}
