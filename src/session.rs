//! A sort that survives being stopped halfway.
//!
//! A [`Session`] wraps an [`Inserter`] and a [`StateFile`]. Whenever the oracle answers
//! [`Decision::Exit`](crate::oracle::Decision::Exit) the whole inserter is written to the file
//! before the exit is reported, and opening a session on that file replays the interrupted
//! insertion straight back to the question that was interrupted.
//!
//! # Examples
//!
//! ```
//! use resumable_sort::oracle::Decision;
//! use resumable_sort::{Flow, Session};
//!
//! # fn main() -> resumable_sort::Result<()> {
//! let dir = tempfile::tempdir().unwrap();
//! let path = dir.path().join("sort.json");
//! let items = ["pear", "apple", "fig", "kiwi"];
//!
//! // Stop at the third question.
//! let mut asked = 0;
//! let mut impatient = |item: &String, against: &String| {
//!     asked += 1;
//!     if asked == 3 {
//!         Decision::Exit
//!     } else {
//!         Decision::from(item.cmp(against))
//!     }
//! };
//! let (mut session, _) = Session::open(&path, &mut impatient)?;
//! for item in items {
//!     if session.insert(item.to_string(), &mut impatient)? == Flow::Exit {
//!         break;
//!     }
//! }
//! assert!(path.exists());
//!
//! // Pick up where we left off. Items already handed over are skipped.
//! let mut patient = |item: &String, against: &String| Decision::from(item.cmp(against));
//! let (mut session, _) = Session::open(&path, &mut patient)?;
//! for item in items {
//!     let item = item.to_string();
//!     if !session.contains(&item) {
//!         let _ = session.insert(item, &mut patient)?;
//!     }
//! }
//!
//! assert_eq!(session.finalize()?, ["apple", "fig", "kiwi", "pear"]);
//! assert!(!path.exists());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SessionError};
use crate::inserter::{Flow, Inserter};
use crate::oracle::Oracle;
use crate::store::StateFile;

/// The format version written into every saved state.
pub const STATE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SavedRef<'a, T> {
    version: u32,
    inserter: &'a Inserter<T>,
}

#[derive(Deserialize)]
struct Saved<T> {
    version: u32,
    inserter: Inserter<T>,
}

/// An [`Inserter`] whose state is saved whenever the oracle asks to exit.
#[derive(Debug)]
pub struct Session<T> {
    inserter: Inserter<T>,
    file: StateFile,
    exited: bool,
}

impl<T> Session<T>
where
    T: Clone + PartialEq + Serialize + DeserializeOwned,
{
    /// Opens the session saved at `path`, or a new one if nothing is saved there.
    ///
    /// A saved session immediately resumes its interrupted insertion (and then any deferred
    /// values), so the oracle's first question is the one it was asked when it exited. If it exits
    /// again during that, the state is saved again and the returned [`Flow`] is [`Flow::Exit`].
    ///
    /// Saved state that can't be read, decoded, or trusted is an error; nothing is overwritten.
    pub fn open<O>(path: impl Into<PathBuf>, oracle: &mut O) -> Result<(Self, Flow)>
    where
        O: Oracle<T> + ?Sized,
    {
        let file = StateFile::new(path);
        let inserter = match file.load::<Saved<T>>()? {
            None => {
                debug!(path = %file.path().display(), "no saved session, starting fresh");
                Inserter::new()
            }
            Some(saved) => {
                if saved.version != STATE_VERSION {
                    return Err(SessionError::Version {
                        path: file.path().to_owned(),
                        found: saved.version,
                        expected: STATE_VERSION,
                    });
                }
                saved
                    .inserter
                    .check()
                    .map_err(|source| SessionError::Corrupt {
                        path: file.path().to_owned(),
                        source,
                    })?;
                info!(
                    path = %file.path().display(),
                    values = saved.inserter.history().len(),
                    pending = saved.inserter.pending().len(),
                    "loaded saved session"
                );
                saved.inserter
            }
        };

        let mut session = Self {
            inserter,
            file,
            exited: false,
        };
        let flow = session.inserter.resume(oracle);
        let flow = session.conclude(flow)?;
        Ok((session, flow))
    }

    /// Inserts `value`, saving the session if the oracle exits.
    ///
    /// Once the oracle has exited the session is over: later calls ask nothing and report
    /// [`Flow::Exit`] again.
    pub fn insert<O>(&mut self, value: T, oracle: &mut O) -> Result<Flow>
    where
        O: Oracle<T> + ?Sized,
    {
        if self.exited {
            return Ok(Flow::Exit);
        }
        let flow = self.inserter.insert(value, oracle);
        self.conclude(flow)
    }

    /// Whether `value` was handed over already, in this run or a previous one. Use it to skip
    /// items when feeding the same list to a resumed session.
    pub fn contains(&self, value: &T) -> bool {
        self.inserter.contains(value)
    }

    /// Deletes the saved state and returns every value in the order the oracle decided.
    ///
    /// Fails without deleting anything if an insertion is still waiting on the oracle.
    pub fn finalize(self) -> Result<Vec<T>> {
        if self.exited || self.inserter.is_in_flight() {
            return Err(SessionError::Unfinished {
                path: self.file.path().to_owned(),
            });
        }

        self.file.remove()?;
        info!(
            path = %self.file.path().display(),
            values = self.inserter.history().len(),
            "session finished"
        );
        Ok(self.inserter.into_sorted())
    }

    fn conclude(&mut self, flow: Flow) -> Result<Flow> {
        if flow == Flow::Exit {
            self.exited = true;
            self.file.save(&SavedRef {
                version: STATE_VERSION,
                inserter: &self.inserter,
            })?;
            info!(
                path = %self.file.path().display(),
                values = self.inserter.history().len(),
                "saved session for later"
            );
        }
        Ok(flow)
    }
}

impl<T> Session<T> {
    /// The inserter driving this session.
    pub fn inserter(&self) -> &Inserter<T> {
        &self.inserter
    }

    /// Where the session is saved.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Whether the oracle has asked to exit.
    pub fn is_exited(&self) -> bool {
        self.exited
    }
}
