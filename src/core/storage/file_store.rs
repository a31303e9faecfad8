//! Directory-backed store: one `<key>.json` file per key.
//!
//! Each write lands in a temp file inside the same directory and is renamed
//! over the target, so a crash mid-write leaves the previous blob intact.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::error::{StorageError, StorageResult};
use super::kv::KeyValueStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StorageError::Init {
            path: dir.clone(),
            source,
        })?;
        log::info!("File store opened at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let target = self.path_for(key);
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| StorageError::write(key, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| StorageError::write(key, e))?;
        tmp.persist(&target)
            .map_err(|e| StorageError::write(key, e.error))?;
        log::debug!("Wrote {} bytes to {}", value.len(), target.display());
        Ok(())
    }
}
