//! HTTP client for the report backend.

use sentiboard_core::report::RerunRequest;
use sentiboard_core::{ReportMeta, RerunIntent, RerunResponse};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("the current report has no CSV file")]
    NoCsv,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<serde_json::Value>,
}

/// Prefer the server's `detail` message over the raw body.
fn error_detail(body: String) -> String {
    match serde_json::from_str::<ErrorBody>(&body) {
        Ok(ErrorBody {
            detail: Some(serde_json::Value::String(detail)),
        }) => detail,
        Ok(ErrorBody {
            detail: Some(detail),
        }) => detail.to_string(),
        _ => body,
    }
}

/// Last path segment of a server file path: `/files/x.csv` → `x.csv`.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Client for the backend's report, rerun and file endpoints.
pub struct ReportClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ReportClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8000`).
    ///
    /// When `api_key` is set it is sent as `x-api-key` on every request.
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header("x-api-key", key),
            None => req,
        }
    }

    /// Metadata for the latest report. A backend with no report yet
    /// answers 404, which maps to an empty [`ReportMeta`].
    pub async fn get_report(&self) -> Result<ReportMeta, ReportError> {
        let url = format!("{}/report", self.base_url);

        info!(url = %url, "fetching report metadata");
        let resp = self.authorize(self.client.get(&url)).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            info!("no report available yet");
            return Ok(ReportMeta::default());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let meta: ReportMeta = serde_json::from_str(&resp.text().await?)?;
        debug!(generated_at = ?meta.generated_at, csv = ?meta.csv, "report metadata");
        Ok(meta)
    }

    /// Ask the backend to regenerate the report. Blocks until the backend
    /// finishes.
    pub async fn rerun(&self, intent: RerunIntent) -> Result<RerunResponse, ReportError> {
        let url = format!("{}/rerun", self.base_url);

        info!(url = %url, intent = %intent, "requesting report rerun");
        let resp = self
            .authorize(self.client.post(&url))
            .json(&RerunRequest { intent })
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::Server {
                status: status.as_u16(),
                body: error_detail(body),
            });
        }

        let result: RerunResponse = serde_json::from_str(&resp.text().await?)?;
        info!(status = %result.status, "rerun complete");
        Ok(result)
    }

    /// Download a report file as text.
    pub async fn get_file(&self, name: &str) -> Result<String, ReportError> {
        let url = self.file_url(name);

        info!(url = %url, "downloading report file");
        let resp = self.authorize(self.client.get(&url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ReportError::Server {
                status: status.as_u16(),
                body: error_detail(body),
            });
        }

        let text = resp.text().await?;
        debug!(bytes = text.len(), "downloaded report file");
        Ok(text)
    }

    /// Report metadata, then the CSV it points at.
    pub async fn fetch_report_csv(&self) -> Result<String, ReportError> {
        let meta = self.get_report().await?;
        let csv = meta.csv().ok_or(ReportError::NoCsv)?;
        self.get_file(file_name_of(csv)).await
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("{}/files/{}", self.base_url, name)
    }

    pub fn pdf_view_url(&self, name: &str) -> String {
        format!("{}/pdf/view/{}", self.base_url, name)
    }

    pub fn pdf_download_url(&self, name: &str) -> String {
        format!("{}/pdf/download/{}", self.base_url, name)
    }

    pub fn word_cloud_url(&self) -> String {
        self.file_url("danger_wc.png")
    }
}
