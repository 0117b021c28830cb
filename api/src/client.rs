//! Shared HTTP plumbing and the client facade.

use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;

use crate::calibrate::CalibrateApi;
use crate::classify::ClassifyApi;
use crate::error::ApiError;
use crate::records::RecordsApi;

/// Base URL of the inspection backend. Resolved at compile time so the wasm
/// build needs no runtime environment access.
fn backend_base_url() -> String {
    option_env!("OVOLENS_BACKEND_URL")
        .unwrap_or("http://localhost:8000")
        .trim_end_matches('/')
        .to_string()
}

/// Thin wrapper around a `reqwest::Client` bound to the backend base URL.
/// All endpoint modules go through this so status checking and body decoding
/// happen in exactly one place.
pub struct Http {
    base_url: String,
    client: reqwest::Client,
}

impl Http {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn new_shared(base_url: String) -> Arc<Self> {
        Arc::new(Self::new(base_url))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.get(&url).send().await?;
        decode(response).await
    }

    /// POST a multipart form to `path` and decode the JSON body.
    pub async fn post_multipart<T>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self.client.post(&url).multipart(form).send().await?;
        decode(response).await
    }
}

/// Route non-success statuses and undecodable bodies to their own variants so
/// the views can word their notices precisely.
async fn decode<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        return Err(ApiError::Status {
            status: status.as_u16(),
        });
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

/// One sub-API per backend concern, all sharing the same `Http`.
pub struct ApiClient {
    pub classify: ClassifyApi,
    pub records: RecordsApi,
    pub calibrate: CalibrateApi,
}

static API_CLIENT: Lazy<Arc<ApiClient>> = Lazy::new(|| Arc::new(new_client(backend_base_url())));

/// Shared client instance used by every view.
pub fn get_client() -> Arc<ApiClient> {
    API_CLIENT.clone()
}

fn new_client(base_url: String) -> ApiClient {
    let http = Http::new_shared(base_url);
    ApiClient {
        classify: ClassifyApi {
            http: Arc::clone(&http),
        },
        records: RecordsApi {
            http: Arc::clone(&http),
        },
        calibrate: CalibrateApi {
            http: Arc::clone(&http),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_has_no_trailing_slash() {
        assert!(!backend_base_url().ends_with('/'));
    }
}
