//! The external decision source that orders items.
//!
//! An [`Oracle`] is asked about one pair of items at a time: the item being inserted and an item
//! already stored in the tree. Besides the two orderings it can ask to take back its previous
//! answer ([`Decision::Undo`]) or to stop the whole sort so it can be resumed later
//! ([`Decision::Exit`]). Any `FnMut(&T, &T) -> Decision` closure is an oracle.
//!
//! ```
//! use resumable_sort::oracle::{Decision, Oracle};
//!
//! let mut oracle = |item: &i32, against: &i32| Decision::from(item.cmp(against));
//!
//! assert_eq!(oracle.compare(&1, &2), Decision::Less);
//! assert_eq!(oracle.compare(&2, &2), Decision::GreaterOrEqual);
//! ```

use std::cmp::Ordering;

/// An oracle's answer to a single comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Decision {
    /// The item goes before the stored item.
    Less,
    /// The item goes after the stored item, or is equal to it.
    GreaterOrEqual,
    /// Retract the decision made before this question and ask that one again.
    Undo,
    /// Stop sorting. The session is saved and can be resumed at this very question.
    Exit,
}

impl From<Ordering> for Decision {
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Less,
            Ordering::Equal | Ordering::Greater => Self::GreaterOrEqual,
        }
    }
}

/// Decides how pairs of items are ordered. Implementations may block for as long as they like
/// (e.g. waiting on a person) but must not change either item.
pub trait Oracle<T: ?Sized> {
    /// Compares `item`, the value being inserted, to `against`, a value already in the tree.
    fn compare(&mut self, item: &T, against: &T) -> Decision;
}

impl<T, F> Oracle<T> for F
where
    T: ?Sized,
    F: FnMut(&T, &T) -> Decision,
{
    fn compare(&mut self, item: &T, against: &T) -> Decision {
        self(item, against)
    }
}
