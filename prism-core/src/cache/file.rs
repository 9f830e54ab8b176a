use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::Cache;
use crate::error::{PrismError, PrismResult};

const ENTRY_FILE_EXT: &str = "cache";

/// Cache that keeps one file per key inside a directory.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// reader never observes a half-written blob.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Opens (creating if needed) a cache rooted at `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> PrismResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| PrismError::IoError { path: dir.clone(), source: e })?;
        Ok(FileCache { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", encode_key(key), ENTRY_FILE_EXT))
    }
}

/// Maps a key to a file stem. ASCII alphanumerics, `-` and `_` are kept,
/// every other byte becomes `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            encoded.push(byte as char);
        } else {
            let _ = write!(encoded, "%{:02X}", byte);
        }
    }
    encoded
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> PrismResult<Option<Vec<u8>>> {
        let path = self.entry_path(key);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(key, path = ?path, "Cache miss");
                Ok(None)
            }
            Err(e) => Err(PrismError::IoError { path, source: e }),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> PrismResult<()> {
        let path = self.entry_path(key);
        let tmp_path = path.with_extension(format!("{}.tmp", ENTRY_FILE_EXT));
        fs::write(&tmp_path, &value).map_err(|e| PrismError::IoError { path: tmp_path.clone(), source: e })?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(PrismError::IoError { path, source: e });
        }
        debug!(key, path = ?path, bytes = value.len(), "Cache entry written");
        Ok(())
    }

    fn delete(&self, key: &str) -> PrismResult<()> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PrismError::IoError { path, source: e }),
        }
    }

    fn contains(&self, key: &str) -> PrismResult<bool> {
        Ok(self.entry_path(key).is_file())
    }
}
