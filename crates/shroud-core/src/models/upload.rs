use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ClientError;

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A file chosen by the user, with the MIME type it declares.
#[derive(Clone)]
pub struct SourceFile {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Human-readable size ("1.50 MB", "12.00 KB").
    pub fn size_label(&self) -> String {
        format_file_size(self.size() as u64)
    }

    /// Local preview reference (`data:` URL). Built without touching the network.
    pub fn preview_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.data)
        )
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size())
            .finish()
    }
}

/// Format a byte count the way the upload screen shows it.
pub fn format_file_size(bytes: u64) -> String {
    let bytes = bytes as f64;
    if bytes > BYTES_PER_MB {
        format!("{:.2} MB", bytes / BYTES_PER_MB)
    } else {
        format!("{:.2} KB", bytes / BYTES_PER_KB)
    }
}

/// Monotonically increasing identifier of an upload job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Validating,
    Transferring,
    Succeeded,
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Idle => "idle",
            JobStatus::Validating => "validating",
            JobStatus::Transferring => "transferring",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One attempt to submit a single image for processing.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub id: JobId,
    pub source: SourceFile,
    pub status: JobStatus,
    pub processed_asset_url: Option<String>,
    pub redacted_region_count: Option<u32>,
    pub error: Option<ClientError>,
}

impl UploadJob {
    /// A freshly selected file: no result, no error.
    pub fn new(id: JobId, source: SourceFile) -> Self {
        Self {
            id,
            source,
            status: JobStatus::Validating,
            processed_asset_url: None,
            redacted_region_count: None,
            error: None,
        }
    }

    pub fn start_transfer(&mut self) {
        self.status = JobStatus::Transferring;
        self.processed_asset_url = None;
        self.redacted_region_count = None;
        self.error = None;
    }

    pub fn succeed(&mut self, processed_asset_url: String, redacted_region_count: u32) {
        self.status = JobStatus::Succeeded;
        self.processed_asset_url = Some(processed_asset_url);
        self.redacted_region_count = Some(redacted_region_count);
        self.error = None;
    }

    pub fn fail(&mut self, error: ClientError) {
        self.status = JobStatus::Failed;
        self.processed_asset_url = None;
        self.redacted_region_count = None;
        self.error = Some(error);
    }
}

/// Response of `POST /upload/`. `processed_url` is relative to the service origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedImage {
    pub processed_url: String,
    pub faces_detected: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
