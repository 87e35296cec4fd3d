use serde::Serialize;
use shroud_core::{JobStatus, UploadJob};

/// What the host UI should render for the current job.
///
/// Derived from controller state without side effects. Before a result exists the
/// preview is local (a `data:` URL); after success it is the processed asset URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobDisplay {
    Empty {
        message: Option<String>,
    },
    Preview {
        file_name: String,
        size: String,
        #[serde(skip_serializing)]
        preview_url: String,
        in_flight: bool,
        message: Option<String>,
    },
    Processed {
        file_name: String,
        processed_url: String,
        redacted_regions: u32,
        message: Option<String>,
    },
    Failed {
        file_name: String,
        code: &'static str,
        message: String,
    },
}

impl JobDisplay {
    pub(crate) fn derive(job: Option<&UploadJob>, message: Option<String>) -> Self {
        let Some(job) = job else {
            return JobDisplay::Empty { message };
        };

        match job.status {
            JobStatus::Idle | JobStatus::Validating | JobStatus::Transferring => {
                JobDisplay::Preview {
                    file_name: job.source.file_name.clone(),
                    size: job.source.size_label(),
                    preview_url: job.source.preview_url(),
                    in_flight: job.status == JobStatus::Transferring,
                    message,
                }
            }
            JobStatus::Succeeded => JobDisplay::Processed {
                file_name: job.source.file_name.clone(),
                processed_url: job.processed_asset_url.clone().unwrap_or_default(),
                redacted_regions: job.redacted_region_count.unwrap_or_default(),
                message,
            },
            JobStatus::Failed => {
                let code = job
                    .error
                    .as_ref()
                    .map(|e| e.error_code())
                    .unwrap_or("UNKNOWN");
                JobDisplay::Failed {
                    file_name: job.source.file_name.clone(),
                    code,
                    message: message.unwrap_or_else(|| "Upload failed".to_string()),
                }
            }
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            JobDisplay::Empty { message }
            | JobDisplay::Preview { message, .. }
            | JobDisplay::Processed { message, .. } => message.as_deref(),
            JobDisplay::Failed { message, .. } => Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shroud_core::{AuthError, ClientError, JobId, SourceFile};

    fn job() -> UploadJob {
        UploadJob::new(
            JobId(7),
            SourceFile::new("street.png", "image/png", vec![1u8, 2, 3]),
        )
    }

    #[test]
    fn empty_without_job() {
        assert_eq!(
            JobDisplay::derive(None, None),
            JobDisplay::Empty { message: None }
        );
    }

    #[test]
    fn preview_is_local() {
        let display = JobDisplay::derive(Some(&job()), None);
        match display {
            JobDisplay::Preview {
                preview_url,
                in_flight,
                size,
                ..
            } => {
                assert!(preview_url.starts_with("data:image/png;base64,"));
                assert!(!in_flight);
                assert_eq!(size, "0.00 KB");
            }
            other => panic!("unexpected display {:?}", other),
        }
    }

    #[test]
    fn processed_and_failed() {
        let mut job = job();
        job.start_transfer();
        job.succeed("http://svc/static/out.png".into(), 4);
        assert_eq!(
            JobDisplay::derive(Some(&job), Some("done".into())),
            JobDisplay::Processed {
                file_name: "street.png".into(),
                processed_url: "http://svc/static/out.png".into(),
                redacted_regions: 4,
                message: Some("done".into()),
            }
        );

        job.fail(ClientError::from(AuthError::SessionExpired));
        let display = JobDisplay::derive(Some(&job), None);
        assert_eq!(display.message(), Some("Upload failed"));
        assert!(matches!(
            display,
            JobDisplay::Failed {
                code: "SESSION_EXPIRED",
                ..
            }
        ));
    }

    #[test]
    fn serialized_preview_omits_data_url() {
        let value = serde_json::to_value(JobDisplay::derive(Some(&job()), None)).unwrap();
        assert_eq!(value["state"], "preview");
        assert!(value.get("preview_url").is_none());
    }
}
