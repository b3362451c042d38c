//! This crate sorts items by asking an external oracle, one comparison at a time, and lets that
//! oracle change its mind or walk away halfway through.
//!
//! ## Strictly balanced trees
//!
//! Items are kept in a [`Tree`], a Binary Search Tree in which every `Node` stores its `height`
//! (the longest path down to an empty slot) and its `min_height` (the shortest). After each
//! insertion or deletion the tree is rebalanced on the way back up:
//!
//! 1. Any `Node` whose subtrees' heights differ by more than one is rotated, like an AVL tree.
//! 2. Any `Node` whose `height` exceeds its `min_height` by more than one moves its value to the
//!    shorter side and takes the neighbouring value from the taller side. This is a "shift".
//!
//! The second rule keeps every level but the last full, so inserting `N` items never takes more
//! than `ceil(lg(N + 1))` comparisons. When each comparison is a question put to a person, that
//! matters more than the extra work the shifts do.
//!
//! ## Undo and exit
//!
//! The [`Inserter`] drives insertions through an [`Oracle`], which answers each question with a
//! [`Decision`]. Besides "less" and "greater or equal" the oracle may undo its previous answer
//! (even one made while inserting an earlier item) or exit. A [`Session`] saves everything to a
//! file on exit so that the next run asks the interrupted question again.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

pub mod error;
pub mod inserter;
pub mod oracle;
pub mod session;
pub mod store;
pub mod tree;

pub use error::{Result, SessionError};
pub use inserter::{Flow, Inserter};
pub use oracle::{Decision, Oracle};
pub use session::Session;
pub use tree::{Direction, Shape, Tree};
