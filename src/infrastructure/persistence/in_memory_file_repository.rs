use async_trait::async_trait;
use dashmap::DashMap;

use crate::application::ports::{FileRepository, RepositoryError};
use crate::domain::{FileId, FileRecord};

/// Process-lifetime file records. Injected rather than held as a global so
/// tests can substitute isolated instances.
#[derive(Default)]
pub struct InMemoryFileRepository {
    records: DashMap<FileId, FileRecord>,
}

impl InMemoryFileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FileRepository for InMemoryFileRepository {
    async fn create(&self, record: &FileRecord) -> Result<(), RepositoryError> {
        if self.records.contains_key(&record.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "file {} already exists",
                record.id.as_uuid()
            )));
        }
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: FileId) -> Result<Option<FileRecord>, RepositoryError> {
        Ok(self.records.get(&id).map(|r| r.clone()))
    }
}
