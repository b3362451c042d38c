#![allow(dead_code)]

use std::collections::BTreeSet;

use resumable_sort::oracle::{Decision, Oracle};

/// Installs a subscriber so `RUST_LOG=resumable_sort=trace` shows what the inserter is doing.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// An oracle that compares honestly, except that it answers `Undo` at the listed call numbers
/// (counting from 0) and `Exit` once at `exit_at`.
///
/// The question answered with `Exit` is left out of `calls` and doesn't count, so a run that
/// exits and resumes records the same calls as one that never stopped.
#[derive(Debug)]
pub struct Script<T> {
    pub undo_at: BTreeSet<usize>,
    pub exit_at: Option<usize>,
    pub calls: Vec<(T, T)>,
}

impl<T> Script<T> {
    pub fn honest() -> Self {
        Self {
            undo_at: BTreeSet::new(),
            exit_at: None,
            calls: Vec::new(),
        }
    }

    pub fn undoing(undo_at: impl IntoIterator<Item = usize>) -> Self {
        Self {
            undo_at: undo_at.into_iter().collect(),
            ..Self::honest()
        }
    }

    pub fn exiting_at(mut self, call: usize) -> Self {
        self.exit_at = Some(call);
        self
    }
}

impl<T> Oracle<T> for Script<T>
where
    T: Ord + Clone,
{
    fn compare(&mut self, item: &T, against: &T) -> Decision {
        let call = self.calls.len();
        if self.exit_at == Some(call) {
            self.exit_at = None;
            return Decision::Exit;
        }

        self.calls.push((item.clone(), against.clone()));
        if self.undo_at.contains(&call) {
            Decision::Undo
        } else {
            Decision::from(item.cmp(against))
        }
    }
}
