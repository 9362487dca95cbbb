use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobTransitionError};

/// Process-lifetime job records over a concurrency-safe map.
///
/// Each transition runs under the shard write lock of the owning entry, so a
/// poller either sees the record before or after a step, never mid-mutation,
/// and the per-job transition order is total.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: DashMap<JobId, Job>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn transition<F>(&self, id: JobId, apply: F) -> Result<(), RepositoryError>
    where
        F: FnOnce(&mut Job) -> Result<(), JobTransitionError>,
    {
        let mut entry = self
            .jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(format!("job {}", id.as_uuid())))?;
        apply(entry.value_mut())
            .map_err(|e| RepositoryError::ConstraintViolation(e.to_string()))
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        if self.jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} already exists",
                job.id.as_uuid()
            )));
        }
        self.jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.get(&id).map(|j| j.clone()))
    }

    async fn mark_running(&self, id: JobId) -> Result<(), RepositoryError> {
        self.transition(id, |job| job.start())
    }

    async fn advance_progress(&self, id: JobId, progress: u8) -> Result<(), RepositoryError> {
        self.transition(id, |job| job.advance_progress(progress))
    }

    async fn mark_done(&self, id: JobId, output_filename: String) -> Result<(), RepositoryError> {
        self.transition(id, |job| job.complete(output_filename))
    }

    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError> {
        self.transition(id, |job| job.fail(error_message))
    }
}
