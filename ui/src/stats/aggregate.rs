//! Derived aggregates over stored classification records.
//!
//! Everything the statistics page charts comes out of one pass over the
//! backend's record listing. Nothing here is persisted; a refresh recomputes
//! the lot.

use std::collections::BTreeMap;

use api::StoredRecord;
use time::macros::format_description;
use time::Date;

use crate::core::format::round1;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Confidence histogram bucket labels, descending threshold order.
const CONFIDENCE_RANGES: [&str; 5] = ["90-100%", "80-89%", "70-79%", "60-69%", "<60%"];

/// Error-type labels for non-viable records, descending confidence order.
/// A placeholder heuristic keyed on the scalar confidence alone; it does not
/// distinguish real failure causes.
const ERROR_LABELS: [&str; 5] = [
    "Likely false positive",
    "Likely false negative",
    "Blurry image",
    "Poor lighting",
    "Unknown",
];

/// Viable / non-viable counts for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub viable: u32,
    pub non_viable: u32,
    pub total: u32,
}

/// Processed counts for one calendar month (years merged, calendar order).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    pub month: &'static str,
    pub processed: u32,
    pub viable: u32,
    pub non_viable: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConfidenceBucket {
    pub range: &'static str,
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBucket {
    pub label: &'static str,
    pub count: u32,
    pub percentage: f64,
}

/// All derived aggregates for the statistics page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total: u32,
    pub viable: u32,
    pub non_viable: u32,
    /// `viable / total * 100`, one decimal. Zero when there are no records.
    pub viability_rate: f64,
    /// Mean confidence in [0,1]. Zero when there are no records.
    pub mean_confidence: f64,
    /// Ascending calendar-date order.
    pub daily: Vec<DailyCount>,
    /// Calendar-month order, empty months skipped.
    pub monthly: Vec<MonthlyCount>,
    /// All five buckets, descending threshold order; empty when no records.
    pub confidence: Vec<ConfidenceBucket>,
    /// Non-empty buckets only, descending confidence order; empty when no
    /// non-viable records exist (no division by zero).
    pub errors: Vec<ErrorBucket>,
}

impl Summary {
    pub fn from_records(records: &[StoredRecord]) -> Self {
        if records.is_empty() {
            return Self::default();
        }

        let mut viable = 0u32;
        let mut confidence_sum = 0.0f64;
        let mut daily: BTreeMap<String, (u32, u32)> = BTreeMap::new();
        let mut monthly = [(0u32, 0u32); 12];
        let mut confidence_counts = [0u32; 5];
        let mut error_counts = [0u32; 5];

        for record in records {
            confidence_sum += record.confidence;
            if record.viability {
                viable += 1;
            }

            let day = daily.entry(record.analyzed_date().to_string()).or_default();
            if record.viability {
                day.0 += 1;
            } else {
                day.1 += 1;
            }

            // Unparseable timestamps still count daily (raw prefix key) but
            // cannot be placed on the monthly trend.
            if let Some(month) = month_index(record.analyzed_date()) {
                if record.viability {
                    monthly[month].0 += 1;
                } else {
                    monthly[month].1 += 1;
                }
            }

            confidence_counts[confidence_bucket(record.confidence)] += 1;

            if !record.viability {
                error_counts[error_bucket(record.confidence)] += 1;
            }
        }

        let total = records.len() as u32;
        let non_viable = total - viable;

        let daily = daily
            .into_iter()
            .map(|(date, (viable, non_viable))| DailyCount {
                date,
                viable,
                non_viable,
                total: viable + non_viable,
            })
            .collect();

        let monthly = monthly
            .iter()
            .enumerate()
            .filter(|(_, (v, n))| v + n > 0)
            .map(|(index, &(viable, non_viable))| MonthlyCount {
                month: MONTH_LABELS[index],
                processed: viable + non_viable,
                viable,
                non_viable,
            })
            .collect();

        let confidence = CONFIDENCE_RANGES
            .iter()
            .zip(confidence_counts)
            .map(|(&range, count)| ConfidenceBucket {
                range,
                count,
                percentage: share(count, total),
            })
            .collect();

        let errors = ERROR_LABELS
            .iter()
            .zip(error_counts)
            .filter(|(_, count)| *count > 0)
            .map(|(&label, count)| ErrorBucket {
                label,
                count,
                percentage: share(count, non_viable),
            })
            .collect();

        Self {
            total,
            viable,
            non_viable,
            viability_rate: share(viable, total),
            mean_confidence: confidence_sum / total as f64,
            daily,
            monthly,
            confidence,
            errors,
        }
    }
}

/// `count / whole * 100` rounded to one decimal; zero when `whole` is zero.
fn share(count: u32, whole: u32) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round1(count as f64 / whole as f64 * 100.0)
    }
}

/// Bucket index into `CONFIDENCE_RANGES` for a confidence in [0,1].
fn confidence_bucket(confidence: f64) -> usize {
    if confidence >= 0.9 {
        0
    } else if confidence >= 0.8 {
        1
    } else if confidence >= 0.7 {
        2
    } else if confidence >= 0.6 {
        3
    } else {
        4
    }
}

/// Bucket index into `ERROR_LABELS`. The confidence is first scaled to a
/// one-decimal percentage, matching how the thresholds were originally tuned
/// (0.8999 rounds up into the 90 band).
fn error_bucket(confidence: f64) -> usize {
    let pct = round1(confidence * 100.0);
    if pct >= 90.0 {
        0
    } else if pct >= 80.0 {
        1
    } else if pct >= 70.0 {
        2
    } else if pct >= 60.0 {
        3
    } else {
        4
    }
}

fn month_index(date: &str) -> Option<usize> {
    let format = format_description!("[year]-[month]-[day]");
    Date::parse(date, &format)
        .ok()
        .map(|d| d.month() as usize - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn record(id: &str, viability: bool, confidence: f64, analyzed_at: &str) -> StoredRecord {
        StoredRecord {
            id: id.into(),
            viability,
            confidence,
            analyzed_at: analyzed_at.into(),
        }
    }

    #[test]
    fn empty_listing_yields_empty_aggregates() {
        let summary = Summary::from_records(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.daily.is_empty());
        assert!(summary.monthly.is_empty());
        assert!(summary.confidence.is_empty());
        assert!(summary.errors.is_empty());
        assert_eq!(summary.viability_rate, 0.0);
    }

    #[test]
    fn daily_counts_split_by_viability() {
        let records = vec![
            record("a", true, 0.95, "2024-01-01T08:00:00Z"),
            record("b", false, 0.55, "2024-01-01T09:30:00Z"),
        ];
        let summary = Summary::from_records(&records);

        assert_eq!(summary.daily.len(), 1);
        let day = &summary.daily[0];
        assert_eq!(day.date, "2024-01-01");
        assert_eq!(day.viable, 1);
        assert_eq!(day.non_viable, 1);
        assert_eq!(day.total, 2);
    }

    #[test]
    fn daily_groups_sort_by_date_not_arrival() {
        let records = vec![
            record("late", true, 0.9, "2024-03-02T10:00:00Z"),
            record("early", true, 0.9, "2024-02-28T10:00:00Z"),
            record("mid", false, 0.5, "2024-03-01T10:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        let dates: Vec<&str> = summary.daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-02-28", "2024-03-01", "2024-03-02"]);
    }

    #[test]
    fn monthly_trend_follows_calendar_order() {
        // An alphabetic label sort would put Apr before Jan.
        let records = vec![
            record("a", true, 0.9, "2024-04-10T10:00:00Z"),
            record("b", true, 0.9, "2024-01-05T10:00:00Z"),
            record("c", false, 0.5, "2024-12-24T10:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        let months: Vec<&str> = summary.monthly.iter().map(|m| m.month).collect();
        assert_eq!(months, vec!["Jan", "Apr", "Dec"]);
    }

    #[test]
    fn monthly_merges_years_and_counts_processed() {
        let records = vec![
            record("a", true, 0.9, "2023-06-10T10:00:00Z"),
            record("b", false, 0.5, "2024-06-12T10:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.monthly.len(), 1);
        assert_eq!(summary.monthly[0].month, "Jun");
        assert_eq!(summary.monthly[0].processed, 2);
        assert_eq!(summary.monthly[0].viable, 1);
        assert_eq!(summary.monthly[0].non_viable, 1);
    }

    #[test]
    fn confidence_buckets_cover_all_ranges() {
        let records = vec![
            record("a", true, 0.95, "2024-01-01T00:00:00Z"),
            record("b", true, 0.85, "2024-01-01T00:00:00Z"),
            record("c", true, 0.75, "2024-01-01T00:00:00Z"),
            record("d", true, 0.65, "2024-01-01T00:00:00Z"),
            record("e", true, 0.10, "2024-01-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        let ranges: Vec<&str> = summary.confidence.iter().map(|b| b.range).collect();
        assert_eq!(ranges, vec!["90-100%", "80-89%", "70-79%", "60-69%", "<60%"]);
        for bucket in &summary.confidence {
            assert_eq!(bucket.count, 1);
            assert_eq!(bucket.percentage, 20.0);
        }
    }

    #[test]
    fn boundary_confidences_land_in_the_higher_bucket() {
        let records = vec![
            record("a", true, 0.9, "2024-01-01T00:00:00Z"),
            record("b", true, 0.6, "2024-01-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.confidence[0].count, 1); // 90-100%
        assert_eq!(summary.confidence[3].count, 1); // 60-69%
    }

    #[test]
    fn error_heuristic_maps_confidence_bands() {
        let records = vec![
            record("fp", false, 0.95, "2024-01-01T00:00:00Z"),
            record("unknown", false, 0.55, "2024-01-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        let labels: Vec<&str> = summary.errors.iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Likely false positive", "Unknown"]);
        for bucket in &summary.errors {
            assert_eq!(bucket.percentage, 50.0);
        }
    }

    #[test]
    fn no_error_buckets_without_non_viable_records() {
        let records = vec![
            record("a", true, 0.9, "2024-01-01T00:00:00Z"),
            record("b", true, 0.7, "2024-01-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.non_viable, 0);
        assert!(summary.errors.is_empty());
    }

    #[test]
    fn viable_records_never_enter_error_analysis() {
        let records = vec![
            record("a", true, 0.95, "2024-01-01T00:00:00Z"),
            record("b", false, 0.95, "2024-01-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].count, 1);
        assert_eq!(summary.errors[0].percentage, 100.0);
    }

    #[test]
    fn kpis_match_the_listing() {
        let records = vec![
            record("a", true, 0.9, "2024-01-01T00:00:00Z"),
            record("b", true, 0.8, "2024-01-01T00:00:00Z"),
            record("c", false, 0.4, "2024-01-02T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.viable, 2);
        assert_eq!(summary.non_viable, 1);
        assert_eq!(summary.viability_rate, 66.7);
        assert!((summary.mean_confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn unparseable_dates_stay_out_of_the_monthly_trend() {
        let records = vec![
            record("a", true, 0.9, "not-a-date"),
            record("b", true, 0.9, "2024-05-01T00:00:00Z"),
        ];
        let summary = Summary::from_records(&records);
        assert_eq!(summary.daily.len(), 2);
        assert_eq!(summary.monthly.len(), 1);
        assert_eq!(summary.monthly[0].month, "May");
    }

    proptest! {
        #[test]
        fn confidence_percentages_sum_to_one_hundred(
            confidences in proptest::collection::vec(0.0f64..=1.0, 1..200)
        ) {
            let records: Vec<StoredRecord> = confidences
                .iter()
                .enumerate()
                .map(|(i, &c)| record(&format!("r{i}"), true, c, "2024-01-01T00:00:00Z"))
                .collect();

            let summary = Summary::from_records(&records);
            let sum: f64 = summary.confidence.iter().map(|b| b.percentage).sum();
            // Five buckets rounded to one decimal: at most 0.05 error each.
            prop_assert!((sum - 100.0).abs() <= 0.3, "percentages summed to {sum}");
        }
    }
}
