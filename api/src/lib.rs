//! HTTP client for the Ovolens inspection backend.
//!
//! The backend owns all heavy lifting (CNN classification, defect detection,
//! color calibration) and the record store. This crate only marshals requests
//! and decodes responses: three endpoints, plain unauthenticated HTTP/JSON
//! against a fixed local address.

pub mod calibrate;
pub mod classify;
pub mod client;
pub mod error;
pub mod records;

pub use calibrate::{CalibrationOutcome, Rgb};
pub use classify::DetectionRecord;
pub use client::{get_client, ApiClient};
pub use error::ApiError;
pub use records::StoredRecord;
