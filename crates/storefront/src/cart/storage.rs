//! Durable key-value slots for client-side state.
//!
//! A slot holds one serialized value. The cart keeps its snapshot in the
//! [`CART_SLOT_KEY`] slot; the CLI also keeps the logged-in identity in a
//! separate slot.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// Key of the slot holding the serialized cart.
pub const CART_SLOT_KEY: &str = "ix_cart_v1";

/// Errors raised by slot backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backend refused the operation (e.g. quota exceeded).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A durable slot holding a single serialized value.
///
/// Readers and writers sharing a slot race with last-writer-wins semantics;
/// there is no locking and no conflict detection.
pub trait DurableSlot: Send {
    /// Read the stored value, `None` when nothing has been written.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn save(&self, value: &str) -> Result<(), StorageError>;

    /// Delete the stored value. Removing an empty slot is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self) -> Result<(), StorageError>;
}

impl<T: DurableSlot + ?Sized> DurableSlot for Box<T> {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        (**self).save(value)
    }

    fn remove(&self) -> Result<(), StorageError> {
        (**self).remove()
    }
}

// =============================================================================
// MemorySlot
// =============================================================================

/// In-process slot.
///
/// Clones share the same underlying value, the way several browser tabs
/// share one local storage entry.
#[derive(Debug, Clone, Default)]
pub struct MemorySlot {
    value: Arc<Mutex<Option<String>>>,
}

impl MemorySlot {
    /// Create an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a slot that already holds `value`.
    #[must_use]
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Arc::new(Mutex::new(Some(value.into()))),
        }
    }

    /// Current contents, for inspection.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.value
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DurableSlot for MemorySlot {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.contents())
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// FileSlot
// =============================================================================

/// Slot backed by a single file.
///
/// Writes go to `<file>.tmp` and are renamed over the target, so readers
/// never see a partially-written value. Parent directories are created on
/// first write.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Use the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use `<dir>/<key>.json`.
    #[must_use]
    pub fn in_dir(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{key}.json")))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DurableSlot for FileSlot {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, value: &str) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        std::fs::write(&tmp_path, value).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
