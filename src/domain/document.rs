use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A registered source document. `file_hash` is the SHA-256 of the file
/// contents and acts as the stable external identifier; `file_name` is
/// the full path on the document share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub file_name: String,
    pub file_hash: String,
    pub file_size: i64,
    pub file_creation_ts: DateTime<Utc>,
    pub file_modification_ts: DateTime<Utc>,
}

impl DocumentRecord {
    pub fn new(
        file_name: String,
        file_hash: String,
        file_size: i64,
        file_creation_ts: DateTime<Utc>,
        file_modification_ts: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name,
            file_hash,
            file_size,
            file_creation_ts,
            file_modification_ts,
        }
    }
}
