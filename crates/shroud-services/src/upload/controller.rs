//! Upload controller
//!
//! Drives a single image through `Idle -> Validating -> Transferring -> Succeeded`
//! (or `Failed`). Exactly one job is active; selecting a file replaces it.
//!
//! A transfer is split into `begin_transfer` (state change, captures job id and
//! token), `TransferTicket::run` (the network call, bounded by the upload timeout)
//! and `finish_transfer` (applies the outcome). Outcomes whose job id no longer
//! matches the active job are discarded. `submit` composes the three steps.

use shroud_api_client::{log_error, ServiceApi};
use shroud_core::constants::UPLOAD_TIMEOUT;
use shroud_core::validation::validate_image;
use shroud_core::{
    AuthError, ClientError, JobId, JobStatus, ProcessedImage, SourceFile, TransportError,
    UploadJob,
};
use std::sync::Arc;
use std::time::Duration;

use super::display::JobDisplay;
use crate::session::SessionManager;

const NO_FILE_MESSAGE: &str = "Please select a file first";
const NOT_SIGNED_IN_MESSAGE: &str = "Please log in first";
const BUSY_MESSAGE: &str = "An upload is already in progress";

/// Result of `submit` / `finish_transfer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The transfer ran and the job reached `Succeeded` or `Failed`.
    Finished(JobStatus),
    /// Nothing was sent; the job is unchanged.
    Skipped(ClientError),
    /// The job was superseded while its transfer was outstanding.
    Discarded(JobId),
}

/// Everything needed to run one transfer, detached from the controller.
pub struct TransferTicket {
    job_id: JobId,
    token: String,
    file: SourceFile,
    api: Arc<dyn ServiceApi>,
    timeout: Duration,
}

impl TransferTicket {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    /// Perform the upload. A transfer that outlives the timeout is dropped,
    /// which aborts the pending request, and reported as `Timeout`.
    pub async fn run(self) -> TransferOutcome {
        tracing::debug!(
            job_id = %self.job_id,
            file_name = %self.file.file_name,
            size = self.file.size(),
            "Starting transfer"
        );

        let result = match tokio::time::timeout(
            self.timeout,
            self.api.upload(&self.token, &self.file),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::from(TransportError::Timeout)),
        };

        TransferOutcome {
            job_id: self.job_id,
            token: self.token,
            result,
        }
    }
}

/// What came back from a transfer.
pub struct TransferOutcome {
    pub job_id: JobId,
    token: String,
    pub result: Result<ProcessedImage, ClientError>,
}

pub struct UploadController {
    api: Arc<dyn ServiceApi>,
    job: Option<UploadJob>,
    next_job_id: u64,
    notice: Option<ClientError>,
    timeout: Duration,
}

impl UploadController {
    pub fn new(api: Arc<dyn ServiceApi>) -> Self {
        Self {
            api,
            job: None,
            next_job_id: 1,
            notice: None,
            timeout: UPLOAD_TIMEOUT,
        }
    }

    pub fn status(&self) -> JobStatus {
        self.job
            .as_ref()
            .map(|job| job.status)
            .unwrap_or(JobStatus::Idle)
    }

    pub fn job(&self) -> Option<&UploadJob> {
        self.job.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.status() == JobStatus::Transferring
    }

    /// Select a file, replacing whatever job was active.
    ///
    /// A non-image file is rejected: no job remains and `submit` becomes a no-op.
    pub fn select_file(&mut self, file: SourceFile) -> Result<JobId, ClientError> {
        if let Err(e) = validate_image(&file) {
            tracing::debug!(
                file_name = %file.file_name,
                content_type = %file.content_type,
                "Rejected file selection"
            );
            let error = ClientError::from(e);
            self.job = None;
            self.notice = Some(error.clone());
            return Err(error);
        }

        if let Some(previous) = &self.job {
            if previous.status == JobStatus::Transferring {
                tracing::debug!(job_id = %previous.id, "Superseding job with outstanding transfer");
            }
        }

        let id = JobId(self.next_job_id);
        self.next_job_id += 1;
        self.job = Some(UploadJob::new(id, file));
        self.notice = None;
        Ok(id)
    }

    /// Move the active job to `Transferring` and hand out the work to perform.
    ///
    /// A call made while a transfer is outstanding is refused without touching the
    /// status line of the running job.
    pub fn begin_transfer(&mut self, token: Option<&str>) -> Result<TransferTicket, ClientError> {
        if self.is_busy() {
            let error = ClientError::precondition(BUSY_MESSAGE);
            log_error("upload", &error);
            return Err(error);
        }

        let result = self.prepare_transfer(token);
        match &result {
            Ok(_) => self.notice = None,
            Err(e) => {
                log_error("upload", e);
                self.notice = Some(e.clone());
            }
        }
        result
    }

    fn prepare_transfer(&mut self, token: Option<&str>) -> Result<TransferTicket, ClientError> {
        let job = self
            .job
            .as_mut()
            .ok_or_else(|| ClientError::precondition(NO_FILE_MESSAGE))?;

        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| ClientError::precondition(NOT_SIGNED_IN_MESSAGE))?;

        job.start_transfer();

        Ok(TransferTicket {
            job_id: job.id,
            token: token.to_string(),
            file: job.source.clone(),
            api: Arc::clone(&self.api),
            timeout: self.timeout,
        })
    }

    /// Apply a transfer outcome.
    ///
    /// A rejected token tears the session down if it still holds that token. A
    /// session that changed or vanished while the transfer was outstanding fails
    /// the job with `SessionExpired`.
    pub fn finish_transfer(
        &mut self,
        outcome: TransferOutcome,
        session: &mut SessionManager,
    ) -> SubmitOutcome {
        let TransferOutcome {
            job_id,
            token,
            result,
        } = outcome;

        if matches!(&result, Err(e) if e.is_session_expired()) {
            session.invalidate(&token);
        }

        let job = match self.job.as_mut() {
            Some(job) if job.id == job_id && job.status == JobStatus::Transferring => job,
            _ => {
                tracing::debug!(job_id = %job_id, "Discarding outcome of superseded job");
                return SubmitOutcome::Discarded(job_id);
            }
        };
        self.notice = None;

        let result = if session.current_token() == Some(token.as_str()) {
            result
        } else {
            Err(ClientError::from(AuthError::SessionExpired))
        };

        match result {
            Ok(processed) => {
                let url = self.api.resolve_url(&processed.processed_url);
                tracing::info!(
                    job_id = %job_id,
                    redacted_regions = processed.faces_detected,
                    "Image processed"
                );
                job.succeed(url, processed.faces_detected);
            }
            Err(error) => {
                log_error(format_args!("upload {}", job_id), &error);
                job.fail(error);
            }
        }

        SubmitOutcome::Finished(job.status)
    }

    /// Submit the active job with the session's token.
    ///
    /// No-op (`Skipped`) without a selected file, without a token, or while a
    /// transfer is running. Never retries.
    pub async fn submit(&mut self, session: &mut SessionManager) -> SubmitOutcome {
        let ticket = match self.begin_transfer(session.current_token()) {
            Ok(ticket) => ticket,
            Err(e) => return SubmitOutcome::Skipped(e),
        };

        let outcome = ticket.run().await;
        self.finish_transfer(outcome, session)
    }

    /// Display-ready view of the controller. Pure.
    pub fn display(&self) -> JobDisplay {
        JobDisplay::derive(self.job.as_ref(), self.status_message())
    }

    /// Human-readable status line, if there is anything to say.
    pub fn status_message(&self) -> Option<String> {
        if let Some(notice) = &self.notice {
            return Some(notice.upload_message());
        }

        let job = self.job.as_ref()?;
        match job.status {
            JobStatus::Idle | JobStatus::Validating => None,
            JobStatus::Transferring => Some("Processing image...".to_string()),
            JobStatus::Succeeded => Some(format!(
                "Processed successfully! Regions blurred: {}",
                job.redacted_region_count.unwrap_or_default()
            )),
            JobStatus::Failed => job.error.as_ref().map(ClientError::upload_message),
        }
    }

    #[cfg(test)]
    fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
