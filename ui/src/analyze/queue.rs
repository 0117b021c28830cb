//! Bounded submission queue for the analyze workflow.
//!
//! Invariant: at most `concurrency` submissions are in flight, and the
//! workflow runs with a limit of 1, so images go to the backend strictly
//! one at a time, in selection order. This bounds backend load at the cost
//! of total latency growing linearly with the batch size. Completions are
//! reported in submission order regardless of the limit. A failed file
//! never stops the batch; its outcome is recorded and the queue moves on.

use std::future::Future;

use futures_util::{stream, StreamExt};

use api::DetectionRecord;

/// One selected image waiting for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What happened to one submitted image. `NoDetections` is deliberately
/// distinct from both success-with-results and failure: the request worked,
/// the backend just found no eggs in the frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOutcome {
    Detections(Vec<DetectionRecord>),
    NoDetections,
    Failed(String),
}

/// Map a successful classify response onto its outcome.
pub fn outcome_from_detections(detections: Vec<DetectionRecord>) -> FileOutcome {
    if detections.is_empty() {
        FileOutcome::NoDetections
    } else {
        FileOutcome::Detections(detections)
    }
}

pub struct SubmissionQueue {
    concurrency: usize,
}

impl Default for SubmissionQueue {
    /// The analyze workflow's configuration: strictly one at a time.
    fn default() -> Self {
        Self::new(1)
    }
}

impl SubmissionQueue {
    pub fn new(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.max(1),
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Submit every pending image through `submit`, invoking `on_complete`
    /// with `(index, filename, outcome)` in submission order. An empty batch
    /// performs no submissions at all.
    pub async fn run<S, Fut, C>(&self, files: Vec<PendingImage>, mut submit: S, mut on_complete: C)
    where
        S: FnMut(PendingImage) -> Fut,
        Fut: Future<Output = FileOutcome>,
        C: FnMut(usize, &str, FileOutcome),
    {
        let mut completions = stream::iter(files)
            .map(|file| {
                let name = file.name.clone();
                let submission = submit(file);
                async move { (name, submission.await) }
            })
            .buffered(self.concurrency);

        let mut index = 0usize;
        while let Some((name, outcome)) = completions.next().await {
            on_complete(index, &name, outcome);
            index += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn pending(name: &str) -> PendingImage {
        PendingImage {
            name: name.into(),
            bytes: vec![0u8; 4],
        }
    }

    fn detection(id: &str) -> DetectionRecord {
        DetectionRecord {
            id: id.into(),
            viability: true,
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
    fn empty_batch_makes_no_submissions() {
        let submissions = Cell::new(0u32);
        let completions = Cell::new(0u32);

        futures::executor::block_on(SubmissionQueue::default().run(
            Vec::new(),
            |_file| {
                submissions.set(submissions.get() + 1);
                async { FileOutcome::NoDetections }
            },
            |_, _, _| completions.set(completions.get() + 1),
        ));

        assert_eq!(submissions.get(), 0);
        assert_eq!(completions.get(), 0);
    }

    #[test]
    fn completions_arrive_in_submission_order() {
        let mut seen = Vec::new();

        futures::executor::block_on(SubmissionQueue::default().run(
            vec![pending("one.jpg"), pending("two.jpg"), pending("three.jpg")],
            |file| async move { FileOutcome::Detections(vec![detection(&file.name)]) },
            |index, name, _| seen.push((index, name.to_string())),
        ));

        assert_eq!(
            seen,
            vec![
                (0, "one.jpg".to_string()),
                (1, "two.jpg".to_string()),
                (2, "three.jpg".to_string()),
            ]
        );
    }

    #[test]
    fn a_failed_file_does_not_stop_the_batch() {
        let mut outcomes = Vec::new();

        futures::executor::block_on(SubmissionQueue::default().run(
            vec![pending("ok.jpg"), pending("broken.jpg"), pending("late.jpg")],
            |file| async move {
                if file.name == "broken.jpg" {
                    FileOutcome::Failed("HTTP 500".into())
                } else {
                    FileOutcome::Detections(vec![detection(&file.name)])
                }
            },
            |_, name, outcome| outcomes.push((name.to_string(), outcome)),
        ));

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[1].1, FileOutcome::Failed(_)));
        assert!(matches!(outcomes[2].1, FileOutcome::Detections(_)));
    }

    #[test]
    fn empty_detection_list_maps_to_no_detections() {
        assert_eq!(outcome_from_detections(Vec::new()), FileOutcome::NoDetections);
        assert!(matches!(
            outcome_from_detections(vec![detection("egg-1")]),
            FileOutcome::Detections(_)
        ));
    }

    #[test]
    fn concurrency_is_clamped_to_at_least_one() {
        assert_eq!(SubmissionQueue::new(0).concurrency(), 1);
        assert_eq!(SubmissionQueue::default().concurrency(), 1);
    }
}
