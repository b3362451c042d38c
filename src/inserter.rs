//! Insertion into a [`Tree`] where every comparison is made by an [`Oracle`] and any comparison
//! can be taken back.
//!
//! The inserter keeps, for every value it was handed, the path of values it was compared against
//! and the direction decided at each of them. It also keeps a copy of the tree from before every
//! insertion but the first. With those it can:
//!
//! - retract the latest decision and ask the one before it again, one level further up the tree
//!   for every [`Decision::Undo`];
//! - undo past the start of an insertion by putting the tree back the way it was before the
//!   previous insertion and replaying that insertion's recorded path, asking the oracle again only
//!   at its last comparison. The value whose insertion was abandoned is deferred and retried once
//!   things settle, most recently deferred first;
//! - stop at any question ([`Decision::Exit`]) and later continue from exactly that question.
//!
//! The tree is only modified once a descent has settled on an empty slot. Until then an insertion
//! is nothing but its recorded path, which is what makes undo and resumption cheap.
//!
//! # Examples
//!
//! ```
//! use resumable_sort::inserter::{Flow, Inserter};
//! use resumable_sort::oracle::Decision;
//!
//! let mut inserter = Inserter::new();
//! let mut calls = 0;
//! let mut oracle = |item: &i32, against: &i32| {
//!     calls += 1;
//!     // Change our mind about the very first question asked for 7.
//!     if calls == 5 {
//!         Decision::Undo
//!     } else {
//!         Decision::from(item.cmp(against))
//!     }
//! };
//!
//! for value in [5, 3, 8, 1, 7] {
//!     assert_eq!(inserter.insert(value, &mut oracle), Flow::Settled);
//! }
//!
//! assert_eq!(inserter.into_sorted(), vec![1, 3, 5, 7, 8]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::oracle::{Decision, Oracle};
use crate::tree::{Direction, Shape, Tree, Violation};

/// How a call into the inserter ended.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    /// Every value handed over so far is in the tree.
    Settled,
    /// The oracle asked to stop. The interrupted insertion is still in flight and resumes at the
    /// question that was interrupted.
    Exit,
}

/// One comparison made while inserting a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Step<T> {
    /// The value stored at the node that was compared against.
    against: T,
    /// Where the inserted value went from here, or `None` while the question is open.
    went: Option<Direction>,
}

/// The comparisons made for one inserted value, from the root down.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPath<T> {
    steps: Vec<Step<T>>,
}

impl<T> Default for DecisionPath<T> {
    fn default() -> Self {
        Self { steps: Vec::new() }
    }
}

impl<T> DecisionPath<T> {
    /// The number of comparisons on this path.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been compared yet.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The values compared against, from the root down.
    pub fn compared(&self) -> impl Iterator<Item = &T> + '_ {
        self.steps.iter().map(|step| &step.against)
    }

    /// The directions decided so far, from the root down.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.steps.iter().map_while(|step| step.went)
    }

    /// Whether the last comparison is still waiting for an answer.
    pub fn is_open(&self) -> bool {
        self.steps.last().map_or(false, |step| step.went.is_none())
    }

    fn ask(&mut self, against: T) {
        self.steps.push(Step {
            against,
            went: None,
        });
    }

    fn answer(&mut self, direction: Direction) {
        if let Some(step) = self.steps.last_mut() {
            step.went = Some(direction);
        }
    }

    /// Forgets the last comparison and opens the one before it again.
    fn retract(&mut self) {
        self.steps.pop();
        self.reopen();
    }

    fn reopen(&mut self) {
        if let Some(step) = self.steps.last_mut() {
            step.went = None;
        }
    }

    fn clear(&mut self) {
        self.steps.clear();
    }
}

/// A state the inserter should never be in. Only reachable through deserialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Inconsistency {
    /// Every value in the history needs exactly one decision path.
    #[error("{paths} decision paths recorded for {values} values")]
    PathCount {
        /// The number of decision paths.
        paths: usize,
        /// The number of values in the history.
        values: usize,
    },
    /// Every insertion but the first leaves one snapshot behind.
    #[error("{snapshots} snapshots recorded where {expected} were expected")]
    SnapshotCount {
        /// The number of snapshots.
        snapshots: usize,
        /// The number implied by the history.
        expected: usize,
    },
    /// The tree holds every value of the history except one still in flight.
    #[error("tree holds {stored} values where {expected} were expected")]
    TreeSize {
        /// The number of values in the tree.
        stored: usize,
        /// The number implied by the history.
        expected: usize,
    },
    /// Only the latest insertion can be waiting for an answer.
    #[error("a finished insertion has an open decision")]
    OpenPath,
    /// The in-flight decision path must lead through the tree as it is.
    #[error("the in-flight decision path diverges from the tree at depth {depth}")]
    Diverged {
        /// How many comparisons matched before the divergence.
        depth: usize,
    },
    /// The tree or one of its snapshots is malformed.
    #[error(transparent)]
    Tree(#[from] Violation),
}

/// Inserts values into a [`Tree`], letting the [`Oracle`] retract its decisions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inserter<T> {
    tree: Tree<T>,
    /// Every value handed to `insert`, in order. Deferred values are removed until retried.
    history: Vec<T>,
    /// One per entry in `history`.
    paths: Vec<DecisionPath<T>>,
    /// The tree as it was before each insertion into a non-empty tree.
    snapshots: Vec<Tree<T>>,
    /// Values whose insertion was abandoned by an undo, most recent last.
    pending: Vec<T>,
}

impl<T> Default for Inserter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Inserter<T> {
    /// Generate a new, empty `Inserter` over a strictly balanced tree.
    pub fn new() -> Self {
        Self::with_shape(Shape::Strict)
    }

    /// Generate a new, empty `Inserter` over a tree of the given shape.
    pub fn with_shape(shape: Shape) -> Self {
        Self {
            tree: Tree::with_shape(shape),
            history: Vec::new(),
            paths: Vec::new(),
            snapshots: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// The tree of every value inserted so far.
    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    /// Every value handed over, in the order it was (last) handed over.
    pub fn history(&self) -> &[T] {
        &self.history
    }

    /// The decision path of every value in [`history`](Self::history).
    pub fn paths(&self) -> &[DecisionPath<T>] {
        &self.paths
    }

    /// Values waiting to be retried, the next one last.
    pub fn pending(&self) -> &[T] {
        &self.pending
    }

    /// The number of trees kept to roll back to.
    pub fn snapshot_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Whether an insertion was interrupted by [`Decision::Exit`] and still needs resuming.
    pub fn is_in_flight(&self) -> bool {
        self.paths.last().map_or(false, DecisionPath::is_open)
    }

    /// Whether the value was handed over already (including values waiting to be retried).
    pub fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.history.contains(value) || self.pending.contains(value)
    }

    /// Consumes the inserter, yielding the inserted values in the order the oracle decided.
    pub fn into_sorted(self) -> Vec<T> {
        self.tree.into_sorted()
    }

    /// Inserts `value`, asking `oracle` to compare it with the values on its way down the tree,
    /// then retries any values deferred by undos along the way.
    ///
    /// If an earlier insertion is still in flight, it is resumed first. Should the oracle exit
    /// during that resumption, `value` is not recorded at all.
    pub fn insert<O>(&mut self, value: T, oracle: &mut O) -> Flow
    where
        T: Clone,
        O: Oracle<T> + ?Sized,
    {
        if self.is_in_flight() && self.resume(oracle) == Flow::Exit {
            return Flow::Exit;
        }

        self.begin(value);
        self.settle(oracle)
    }

    /// Continues an insertion interrupted by [`Decision::Exit`]. Its recorded decisions are
    /// replayed without consulting the oracle, so the first question asked is the one that was
    /// interrupted. Values still waiting to be retried are inserted afterwards.
    pub fn resume<O>(&mut self, oracle: &mut O) -> Flow
    where
        T: Clone,
        O: Oracle<T> + ?Sized,
    {
        if self.is_in_flight() {
            info!(
                position = self.history.len(),
                depth = self.paths.last().map_or(0, DecisionPath::len),
                "resuming interrupted insertion"
            );
        } else {
            match self.pending.pop() {
                Some(value) => self.begin(value),
                None => return Flow::Settled,
            }
        }

        self.settle(oracle)
    }

    /// Checks the invariants tying the history, decision paths, snapshots and tree together.
    pub fn check(&self) -> Result<(), Inconsistency>
    where
        T: PartialEq,
    {
        if self.paths.len() != self.history.len() {
            return Err(Inconsistency::PathCount {
                paths: self.paths.len(),
                values: self.history.len(),
            });
        }

        let in_flight = usize::from(self.is_in_flight());
        let finished = self.paths.len() - in_flight;
        if self.paths[..finished].iter().any(DecisionPath::is_open) {
            return Err(Inconsistency::OpenPath);
        }

        let expected = finished.saturating_sub(1);
        if self.snapshots.len() != expected {
            return Err(Inconsistency::SnapshotCount {
                snapshots: self.snapshots.len(),
                expected,
            });
        }

        let stored = self.tree.len();
        if stored != finished {
            return Err(Inconsistency::TreeSize {
                stored,
                expected: finished,
            });
        }

        self.tree.check()?;
        for snapshot in &self.snapshots {
            snapshot.check()?;
        }

        if in_flight == 1 {
            let path = &self.paths[finished];
            for (depth, against) in path.compared().enumerate() {
                if self.tree.probe(path.directions().take(depth)) != Some(against) {
                    return Err(Inconsistency::Diverged { depth });
                }
            }
        }

        Ok(())
    }

    fn begin(&mut self, value: T) {
        self.history.push(value);
        self.paths.push(DecisionPath::default());
    }

    /// Finishes the latest insertion, then retries deferred values until none are left.
    fn settle<O>(&mut self, oracle: &mut O) -> Flow
    where
        T: Clone,
        O: Oracle<T> + ?Sized,
    {
        loop {
            if self.descend(oracle) == Flow::Exit {
                return Flow::Exit;
            }

            match self.pending.pop() {
                Some(value) => {
                    debug!(remaining = self.pending.len(), "retrying deferred value");
                    self.begin(value);
                }
                None => return Flow::Settled,
            }
        }
    }

    /// Walks the latest value down the tree, following whatever its path already decided and
    /// asking the oracle from there on, until it reaches an empty slot.
    ///
    /// An undo past the start of the latest insertion makes the previous value the latest one.
    /// This keeps going until *some* value is placed; the caller retries the deferred ones.
    fn descend<O>(&mut self, oracle: &mut O) -> Flow
    where
        T: Clone,
        O: Oracle<T> + ?Sized,
    {
        loop {
            let path = self.paths.last_mut().expect("An insertion is in flight.");
            let value = self.history.last().expect("An insertion is in flight.");
            let Some(against) = self.tree.probe(path.directions()) else {
                self.place();
                return Flow::Settled;
            };

            if !path.is_open() {
                path.ask(against.clone());
            }
            trace!(depth = path.len(), "asking oracle");

            match oracle.compare(value, against) {
                Decision::Less => path.answer(Direction::Left),
                Decision::GreaterOrEqual => path.answer(Direction::Right),
                Decision::Undo => self.undo(),
                Decision::Exit => {
                    info!(depth = path.len(), "oracle asked to exit");
                    return Flow::Exit;
                }
            }
        }
    }

    fn undo(&mut self) {
        let path = self.paths.last_mut().expect("An insertion is in flight.");
        if path.len() > 1 {
            path.retract();
            debug!(depth = path.len(), "retracted decision");
            return;
        }

        let Some(snapshot) = self.snapshots.pop() else {
            // Only one value is in the tree and it needed no decisions, so there is nothing
            // before this insertion to go back to.
            path.clear();
            debug!("restarting insertion from the root");
            return;
        };

        let deferred = self.history.pop().expect("An insertion is in flight.");
        self.paths.pop();
        self.pending.push(deferred);
        self.tree = snapshot;
        if let Some(previous) = self.paths.last_mut() {
            previous.reopen();
        }
        info!(
            position = self.history.len(),
            pending = self.pending.len(),
            "rolled back to the previous insertion"
        );
    }

    /// Puts the latest value in the empty slot its path leads to.
    fn place(&mut self)
    where
        T: Clone,
    {
        let path = self.paths.last().expect("An insertion is in flight.");
        let value = self
            .history
            .last()
            .expect("An insertion is in flight.")
            .clone();

        if !self.tree.is_empty() {
            self.snapshots.push(self.tree.clone());
        }
        self.tree.insert_along(path.directions(), value);
        debug!(
            comparisons = path.len(),
            position = self.history.len(),
            "placed value"
        );
    }
}
