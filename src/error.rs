//! Errors that can end a session. Oracle signals are not errors; only storage problems and saved
//! state that can't be trusted are.

use std::io;
use std::path::PathBuf;

use crate::inserter::Inconsistency;

/// Convenience alias for results carrying a [`SessionError`].
pub type Result<T, E = SessionError> = std::result::Result<T, E>;

/// Why a session couldn't be opened, saved or finished.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The saved state exists but couldn't be read.
    #[error("failed to read session state from {}", .path.display())]
    Read {
        /// Where the state was expected.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// The saved state isn't valid JSON for this item type.
    #[error("session state at {} could not be decoded", .path.display())]
    Decode {
        /// Where the state was read from.
        path: PathBuf,
        /// The underlying failure.
        source: serde_json::Error,
    },
    /// The saved state was written by an incompatible version.
    #[error("session state at {} has format version {found}, expected {expected}", .path.display())]
    Version {
        /// Where the state was read from.
        path: PathBuf,
        /// The version found in the file.
        found: u32,
        /// The version this crate writes.
        expected: u32,
    },
    /// The saved state decodes but contradicts itself.
    #[error("session state at {} is corrupt", .path.display())]
    Corrupt {
        /// Where the state was read from.
        path: PathBuf,
        /// What is wrong with it.
        source: Inconsistency,
    },
    /// The state couldn't be serialized.
    #[error("failed to encode session state")]
    Encode(#[source] serde_json::Error),
    /// The state couldn't be written. The previously saved state, if any, is still in place.
    #[error("failed to write session state to {}", .path.display())]
    Write {
        /// Where the state was being written.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// The saved state couldn't be deleted.
    #[error("failed to remove session state at {}", .path.display())]
    Remove {
        /// Where the state is.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },
    /// The session was asked to finish while an insertion was still waiting on the oracle.
    #[error("session at {} still has an interrupted insertion", .path.display())]
    Unfinished {
        /// Where the state is saved.
        path: PathBuf,
    },
}
