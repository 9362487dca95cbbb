use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StoragePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(Uuid);

impl FileId {
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

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

/// Metadata for one uploaded input. Immutable once created; jobs reference
/// a record by id and never own it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub id: FileId,
    pub filename: String,
    pub size_bytes: u64,
    pub media_type: Option<String>,
    pub storage_path: StoragePath,
    pub created_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(
        id: FileId,
        filename: String,
        size_bytes: u64,
        media_type: Option<String>,
        storage_path: StoragePath,
    ) -> Self {
        Self {
            id,
            filename,
            size_bytes,
            media_type,
            storage_path,
            created_at: Utc::now(),
        }
    }

    /// Lower-cased extension of the original filename, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }

    /// Filename without its extension, used to derive the output name.
    pub fn base_name(&self) -> String {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("converted")
            .to_string()
    }
}
