//! File-backed cart slot.
//!
//! The cart lives in `<data_dir>/fixev_cart.json`. Writes go to a temporary
//! sibling first and are renamed into place, so a crash mid-write leaves the
//! previous cart intact instead of a truncated file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fixev_core::{CART_STORAGE_KEY, CartRepository, StorageError};

/// Cart slot stored as a JSON file.
#[derive(Debug, Clone)]
pub struct FileCartRepository {
    path: PathBuf,
}

impl FileCartRepository {
    /// Open (and create if needed) the slot directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        fs::create_dir_all(data_dir)?;
        Ok(Self {
            path: data_dir.join(format!("{CART_STORAGE_KEY}.json")),
        })
    }

    /// Path of the slot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

impl CartRepository for FileCartRepository {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, payload: &str) -> Result<(), StorageError> {
        let temp = self.temp_path();
        fs::write(&temp, payload)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}
