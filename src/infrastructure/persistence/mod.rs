mod in_memory_file_repository;
mod in_memory_job_repository;

pub use in_memory_file_repository::InMemoryFileRepository;
pub use in_memory_job_repository::InMemoryJobRepository;
