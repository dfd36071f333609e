use crate::error::CacheError;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

/// A stored payload and the moment it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub body: String,
    pub written_at: DateTime<Utc>,
}

/// Where snapshots live. The filesystem in production, a map in tests.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<Snapshot>, CacheError>;
    fn write(&self, key: &str, body: &str) -> Result<(), CacheError>;
}

/// Filesystem-backed storage: one `<key>.json` file per key under the data
/// directory, with the file's modification time as the write timestamp.
#[derive(Debug, Clone)]
pub struct FsStorage {
    data_dir: PathBuf,
}

impl FsStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }
}

impl Storage for FsStorage {
    fn read(&self, key: &str) -> Result<Option<Snapshot>, CacheError> {
        let path = self.path(key);
        if !path.exists() {
            return Ok(None);
        }

        let body = fs::read_to_string(&path)?;
        let modified = fs::metadata(&path)?.modified()?;
        Ok(Some(Snapshot {
            body,
            written_at: DateTime::<Utc>::from(modified),
        }))
    }

    fn write(&self, key: &str, body: &str) -> Result<(), CacheError> {
        fs::create_dir_all(&self.data_dir)?;
        fs::write(self.path(key), body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_storage_round_trips_body_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        storage.write("share_prices", r#"{"data": {}}"#).unwrap();
        let snapshot = storage.read("share_prices").unwrap().unwrap();

        assert_eq!(snapshot.body, r#"{"data": {}}"#);
        let age = Utc::now() - snapshot.written_at;
        assert!(age.num_seconds() >= 0 && age.num_seconds() < 60);
    }

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FsStorage::new(dir.path());

        assert_eq!(storage.read("never_written").unwrap(), None);
    }

    #[test]
    fn write_creates_the_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("data").join("snapshots");
        let storage = FsStorage::new(&nested);

        storage.write("open_trades", "[]").unwrap();

        assert!(nested.join("open_trades.json").exists());
    }
}
