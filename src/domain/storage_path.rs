use std::fmt;

use super::{FileId, JobId};

/// Key of one object in the artifact store.
///
/// Uploads and outputs are keyed by a composite of the owning identifier and
/// a sanitized filename, so two uploads of `report.pdf` never collide and a
/// hostile filename cannot escape the store root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn for_upload(file_id: &FileId, filename: &str) -> Self {
        Self(format!("{}__{}", file_id.as_uuid(), sanitize(filename)))
    }

    pub fn for_output(job_id: &JobId, filename: &str) -> Self {
        Self(format!("{}__{}", job_id.as_uuid(), sanitize(filename)))
    }

    pub fn for_message(unix_timestamp: i64) -> Self {
        Self(format!("message_{}.txt", unix_timestamp))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Strips path separators so a filename can never address outside the store.
fn sanitize(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
