//! Shared report-service types exchanged with the backend.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Metadata for the latest generated report.
///
/// Paths are server-relative (`/files/analysis_output.csv`). The backend
/// writes an empty string for an artifact it did not produce.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMeta {
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub docx: Option<String>,
    /// Backend local time, `YYYY-MM-DD HH:MM:SS`.
    #[serde(default)]
    pub generated_at: Option<String>,
}

fn present(path: &Option<String>) -> Option<&str> {
    path.as_deref().filter(|p| !p.is_empty())
}

impl ReportMeta {
    /// No report has been generated yet.
    pub fn is_empty(&self) -> bool {
        self.pdf().is_none() && self.csv().is_none() && self.docx().is_none()
    }

    pub fn pdf(&self) -> Option<&str> {
        present(&self.pdf)
    }

    pub fn csv(&self) -> Option<&str> {
        present(&self.csv)
    }

    pub fn docx(&self) -> Option<&str> {
        present(&self.docx)
    }
}

/// How much work a regeneration should do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RerunIntent {
    #[default]
    Light,
    Medium,
    Deep,
}

impl RerunIntent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Deep => "deep",
        }
    }
}

impl fmt::Display for RerunIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RerunIntent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "medium" => Ok(Self::Medium),
            "deep" => Ok(Self::Deep),
            other => Err(format!("unknown rerun intent '{other}' (expected light, medium or deep)")),
        }
    }
}

/// Body of `POST /rerun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerunRequest {
    pub intent: RerunIntent,
}

/// Successful rerun result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerunResponse {
    pub status: String,
    #[serde(default)]
    pub pdf: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub docx: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_meta_from_backend_json() {
        let json = r#"{
            "pdf": "/files/report.pdf",
            "csv": "/files/analysis_output.csv",
            "docx": "",
            "generated_at": "2025-09-14 18:02:11"
        }"#;
        let meta: ReportMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.csv(), Some("/files/analysis_output.csv"));
        assert_eq!(meta.docx(), None);
        assert!(!meta.is_empty());
    }

    #[test]
    fn empty_object_is_no_report() {
        let meta: ReportMeta = serde_json::from_str("{}").unwrap();
        assert!(meta.is_empty());
        assert_eq!(meta, ReportMeta::default());
    }

    #[test]
    fn intent_serializes_lowercase() {
        let body = serde_json::to_string(&RerunRequest {
            intent: RerunIntent::Medium,
        })
        .unwrap();
        assert_eq!(body, r#"{"intent":"medium"}"#);
    }

    #[test]
    fn intent_parses_case_insensitively() {
        assert_eq!("Deep".parse::<RerunIntent>(), Ok(RerunIntent::Deep));
        assert!("full".parse::<RerunIntent>().is_err());
    }

    #[test]
    fn rerun_response_json() {
        let json = r#"{"status": "ok", "pdf": "/files/report.pdf", "csv": "", "docx": ""}"#;
        let resp: RerunResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.pdf.as_deref(), Some("/files/report.pdf"));
    }
}
