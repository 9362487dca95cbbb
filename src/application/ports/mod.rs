mod artifact_store;
mod conversion_engine;
mod file_repository;
mod job_repository;
mod repository_error;

pub use artifact_store::{ArtifactStore, ArtifactStoreError};
pub use conversion_engine::{ConversionEngine, ConversionError};
pub use file_repository::FileRepository;
pub use job_repository::JobRepository;
pub use repository_error::RepositoryError;
