//! Error taxonomy for backend calls.

use thiserror::Error;

/// Everything a backend call can fail with. Each variant maps onto one of the
/// user-facing notices the views render; none of them are retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network unreachable, DNS failure, connection reset, etc.
    #[error("backend unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {status}")]
    Status { status: u16 },

    /// The body arrived but could not be decoded into the expected shape.
    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Short operator-facing message for inline banners.
    pub fn notice(&self) -> String {
        match self {
            ApiError::Transport(_) => "Could not reach the inspection backend.".to_string(),
            ApiError::Status { status } => {
                format!("The inspection backend rejected the request (HTTP {status}).")
            }
            ApiError::Decode(_) => "The backend sent an unreadable response.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_names_the_code() {
        let err = ApiError::Status { status: 503 };
        assert_eq!(err.to_string(), "backend returned HTTP 503");
        assert!(err.notice().contains("503"));
    }

    #[test]
    fn decode_error_has_a_generic_notice() {
        let inner = serde_json::from_str::<u32>("not json").unwrap_err();
        let err = ApiError::Decode(inner);
        assert_eq!(err.notice(), "The backend sent an unreadable response.");
    }
}
