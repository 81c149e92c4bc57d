use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nevado_core::{CoreError, CoreResult, KeyValueStore};
use tracing::info;

use crate::app_config::StorageConfig;

/// Durable [`KeyValueStore`] keeping one file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at `storage.resume_dir`
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.resume_dir.clone())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> CoreResult<PathBuf> {
        let valid = !key.is_empty()
            && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoreError::Storage(format!("Invalid key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::Storage(e.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir).map_err(|e| CoreError::Storage(e.to_string()))?;

        // Write then rename so a reader never sees a half-written entry
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| CoreError::Storage(e.to_string()))?;
        fs::rename(&tmp, &path).map_err(|e| CoreError::Storage(e.to_string()))?;
        info!("Stored {} in {}", key, self.dir.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Storage(e.to_string())),
        }
    }
}
