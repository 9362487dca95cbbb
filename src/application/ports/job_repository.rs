use async_trait::async_trait;

use crate::domain::{Job, JobId};

use super::RepositoryError;

/// Owns job records. Transition methods mirror the domain state machine so
/// the only way to mutate a stored job is through a legal lifecycle step;
/// implementations must apply each step atomically with respect to readers.
#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError>;

    async fn mark_running(&self, id: JobId) -> Result<(), RepositoryError>;

    async fn advance_progress(&self, id: JobId, progress: u8) -> Result<(), RepositoryError>;

    async fn mark_done(&self, id: JobId, output_filename: String) -> Result<(), RepositoryError>;

    async fn mark_failed(&self, id: JobId, error_message: &str) -> Result<(), RepositoryError>;
}
