//! Historical record listing endpoint.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::client::Http;
use crate::error::ApiError;

/// One stored classification result. Owned by the backend's store and
/// immutable here; the statistics view only derives aggregates from these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub viability: bool,
    pub confidence: f64,
    pub analyzed_at: String,
}

impl StoredRecord {
    /// Calendar-date prefix of the analysis timestamp ("2024-03-05"). The
    /// listing timestamps are ISO strings; truncating at `T` is all the
    /// daily grouping needs and never fails.
    pub fn analyzed_date(&self) -> &str {
        self.analyzed_at
            .split_once('T')
            .map(|(date, _)| date)
            .unwrap_or(self.analyzed_at.as_str())
    }
}

pub struct RecordsApi {
    pub(crate) http: Arc<Http>,
}

impl RecordsApi {
    /// Fetch every stored classification record.
    pub async fn list(&self) -> Result<Vec<StoredRecord>, ApiError> {
        self.http.get_json("api/eggs/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_listing_rows() {
        let body = r#"[
            {"id": "a", "viability": true, "confidence": 0.95, "analyzed_at": "2024-01-01T08:00:00Z"},
            {"id": "b", "viability": false, "confidence": 0.55, "analyzed_at": "2024-01-01T09:30:00Z"}
        ]"#;

        let rows: Vec<StoredRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].analyzed_date(), "2024-01-01");
    }

    #[test]
    fn date_prefix_falls_back_to_whole_string() {
        let row = StoredRecord {
            id: "c".into(),
            viability: true,
            confidence: 0.8,
            analyzed_at: "2024-02-14".into(),
        };
        assert_eq!(row.analyzed_date(), "2024-02-14");
    }
}
