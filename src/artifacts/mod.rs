//! Artifacts Module - persisted model storage
//!
//! Explicit keyed repository instead of ambient file paths, injected into
//! the cluster engine and the classifier. Artifacts are immutable once
//! written; writes go to a temp file in the same directory and are renamed
//! into place so a concurrent reader never sees a partial file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants;


// ============================================================================
// ERROR HANDLING
// ============================================================================

#[derive(Debug)]
pub enum ArtifactError {
    NotFound(String),
    Io(io::Error),
    Serialization(serde_json::Error),
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactError::NotFound(key) => write!(f, "Artifact not found: {}", key),
            ArtifactError::Io(e) => write!(f, "Artifact IO error: {}", e),
            ArtifactError::Serialization(e) => write!(f, "Artifact serialization error: {}", e),
        }
    }
}

impl std::error::Error for ArtifactError {}

impl From<io::Error> for ArtifactError {
    fn from(err: io::Error) -> Self {
        ArtifactError::Io(err)
    }
}

impl From<serde_json::Error> for ArtifactError {
    fn from(err: serde_json::Error) -> Self {
        ArtifactError::Serialization(err)
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Capability to load and save artifacts by key
pub trait ArtifactStore: Send + Sync {
    fn exists(&self, key: &str) -> bool;
    fn read(&self, key: &str) -> Result<Vec<u8>, ArtifactError>;
    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ArtifactError>;
}

/// Filesystem-backed store rooted at one directory
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store at the platform default location (env-overridable)
    pub fn default_location() -> Self {
        Self::new(constants::get_artifact_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn exists(&self, key: &str) -> bool {
        self.key_path(key).exists()
    }

    fn read(&self, key: &str) -> Result<Vec<u8>, ArtifactError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Err(ArtifactError::NotFound(key.to_string()));
        }
        Ok(fs::read(path)?)
    }

    fn write(&self, key: &str, bytes: &[u8]) -> Result<(), ArtifactError> {
        fs::create_dir_all(&self.dir)?;

        // Temp file in the same directory so the rename stays on one filesystem
        let tmp = self.dir.join(format!(".{}.tmp-{}", key, uuid::Uuid::new_v4()));
        fs::write(&tmp, bytes)?;
        match fs::rename(&tmp, self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) => {
                let _ = fs::remove_file(&tmp);
                Err(e.into())
            }
        }
    }
}

/// Read and deserialize a JSON artifact
pub fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn ArtifactStore,
    key: &str,
) -> Result<T, ArtifactError> {
    let bytes = store.read(key)?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Serialize and atomically write a JSON artifact
pub fn write_json<T: serde::Serialize>(
    store: &dyn ArtifactStore,
    key: &str,
    value: &T,
) -> Result<(), ArtifactError> {
    let bytes = serde_json::to_vec_pretty(value)?;
    store.write(key, &bytes)
}
