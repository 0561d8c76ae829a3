// Client-local storage for the sign-in credential.
//
// A stored credential means the user was signed in last time; it is
// re-exchanged with the backend at boot. No stored credential means
// anonymous, read-only mode.

use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to write credential file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to remove credential file {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub trait CredentialStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&mut self, credential: &str) -> Result<(), CredentialError>;
    fn clear(&mut self) -> Result<(), CredentialError>;
}

/// Keeps the credential in a single file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileCredentialStore { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read credential file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn save(&mut self, credential: &str) -> Result<(), CredentialError> {
        let write_err = |source| CredentialError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, credential).map_err(write_err)
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CredentialError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Credential held only for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    credential: Option<String>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: impl Into<String>) -> Self {
        MemoryCredentialStore {
            credential: Some(credential.into()),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.credential.clone()
    }

    fn save(&mut self, credential: &str) -> Result<(), CredentialError> {
        self.credential = Some(credential.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CredentialError> {
        self.credential = None;
        Ok(())
    }
}
