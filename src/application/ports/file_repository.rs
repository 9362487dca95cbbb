use async_trait::async_trait;

use crate::domain::{FileId, FileRecord};

use super::RepositoryError;

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, record: &FileRecord) -> Result<(), RepositoryError>;

    async fn get_by_id(&self, id: FileId) -> Result<Option<FileRecord>, RepositoryError>;
}
