use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{FileId, JobStatus, TargetFormat};

/// Progress checkpoints observed by pollers. Coarse by design: they signal
/// "accepted", "started", "backend invoked", and "finished".
pub const PROGRESS_QUEUED: u8 = 5;
pub const PROGRESS_STARTED: u8 = 25;
pub const PROGRESS_CONVERTING: u8 = 60;
pub const PROGRESS_DONE: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle record for one conversion request.
///
/// Status moves along queued -> running -> done | failed and never leaves a
/// terminal state. Progress is non-decreasing and reaches 100 exactly when
/// the job is done. All mutation goes through the transition methods below;
/// they are the only place the invariants are encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub file_id: FileId,
    pub target_format: TargetFormat,
    pub status: JobStatus,
    pub progress: u8,
    pub output_filename: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(file_id: FileId, target_format: TargetFormat) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::new(),
            file_id,
            target_format,
            status: JobStatus::Queued,
            progress: PROGRESS_QUEUED,
            output_filename: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// queued -> running; marks the job as picked up by a worker.
    pub fn start(&mut self) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Queued {
            return Err(JobTransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Running,
            });
        }
        self.status = JobStatus::Running;
        self.progress = self.progress.max(PROGRESS_STARTED);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Intermediate checkpoint while running. Lower values than the current
    /// progress are ignored so pollers never observe a decrease; 100 is
    /// reserved for `complete`.
    pub fn advance_progress(&mut self, progress: u8) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Running {
            return Err(JobTransitionError::NotRunning(self.status));
        }
        if progress >= PROGRESS_DONE {
            return Err(JobTransitionError::ProgressOutOfRange(progress));
        }
        self.progress = self.progress.max(progress);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// running -> done; records the produced output filename.
    pub fn complete(&mut self, output_filename: String) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Running {
            return Err(JobTransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Done,
            });
        }
        self.status = JobStatus::Done;
        self.progress = PROGRESS_DONE;
        self.output_filename = Some(output_filename);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// running -> failed; records the failure cause.
    pub fn fail(&mut self, error_message: impl Into<String>) -> Result<(), JobTransitionError> {
        if self.status != JobStatus::Running {
            return Err(JobTransitionError::InvalidTransition {
                from: self.status,
                to: JobStatus::Failed,
            });
        }
        self.status = JobStatus::Failed;
        self.error_message = Some(error_message.into());
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JobTransitionError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: JobStatus, to: JobStatus },
    #[error("cannot update progress of a {0} job")]
    NotRunning(JobStatus),
    #[error("progress {0} is reserved for completion")]
    ProgressOutOfRange(u8),
}
