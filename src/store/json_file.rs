use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::{LeadRecord, StoreError, SubmissionStore};

/// Keeps all submissions as a single pretty-printed JSON array on disk.
///
/// Appends hold an in-process lock around the read-modify-write and replace the
/// file through a temporary sibling plus rename, so a crash mid-write leaves the
/// previous contents in place. Separate processes sharing one file are not
/// coordinated.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    async fn load(&self) -> Result<Vec<LeadRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(StoreError::Corrupt)
    }

    async fn replace(&self, records: &[LeadRecord]) -> Result<(), StoreError> {
        let dir = self.parent_dir();
        tokio::fs::create_dir_all(&dir).await?;

        let bytes = serde_json::to_vec_pretty(records).map_err(StoreError::Serialization)?;
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| StoreError::Io(e.error))?;
            Ok(())
        })
        .await??;
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for JsonFileStore {
    async fn append(&self, record: LeadRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        records.push(record);
        self.replace(&records).await?;
        debug!(path = ?self.path, total = records.len(), "Submission store updated.");
        Ok(())
    }

    async fn read_all(&self) -> Result<Vec<LeadRecord>, StoreError> {
        self.load().await
    }
}
