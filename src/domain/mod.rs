mod file_record;
mod format;
mod job;
mod job_status;
mod storage_path;

pub use file_record::{FileId, FileRecord};
pub use format::TargetFormat;
pub use job::{
    Job, JobId, JobTransitionError, PROGRESS_CONVERTING, PROGRESS_DONE, PROGRESS_QUEUED,
    PROGRESS_STARTED,
};
pub use job_status::JobStatus;
pub use storage_path::StoragePath;
