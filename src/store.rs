//! Durable storage for session state: one JSON file, replaced atomically.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, SessionError};

/// The file a session's state lives in.
///
/// Writes go to a temporary file next to it which is synced and then renamed over the target, so
/// the file always holds either the previous or the new state in full.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// Names the file at `path`. Nothing is touched until it is loaded or saved.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the state lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether any state is saved.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Reads the saved state. A missing file is `Ok(None)`.
    pub fn load<S>(&self) -> Result<Option<S>>
    where
        S: DeserializeOwned,
    {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SessionError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        debug!(path = %self.path.display(), bytes = bytes.len(), "read session state");

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SessionError::Decode {
                path: self.path.clone(),
                source,
            })
    }

    /// Replaces the saved state with `state`.
    pub fn save<S>(&self, state: &S) -> Result<()>
    where
        S: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(state).map_err(SessionError::Encode)?;
        let temp = self.temp_path();

        let write = || -> io::Result<()> {
            let mut file = File::create(&temp)?;
            file.write_all(&bytes)?;
            file.sync_all()?;
            fs::rename(&temp, &self.path)
        };
        if let Err(source) = write() {
            // The target was never touched; don't leave a half-written sibling behind.
            let _ = fs::remove_file(&temp);
            return Err(SessionError::Write {
                path: self.path.clone(),
                source,
            });
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved session state");
        Ok(())
    }

    /// Deletes the saved state. Deleting state that doesn't exist succeeds.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed session state");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
