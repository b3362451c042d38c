//! A strictly balanced Binary Search Tree. It is an AVL tree with one extra rebalancing step: after
//! the usual rotations, a node whose shortest and longest paths to an empty subtree differ by more
//! than one has a single value "shifted" through it from its heavier side to its lighter side.
//! Shifting needs no comparisons at all so the tree can afford to stay almost perfectly balanced,
//! which keeps the number of comparisons for future insertions close to `lg N`.
//!
//! Equal values are kept (the tree is a multiset) and descend to the right.
//!
//! # Examples
//!
//! ```
//! use resumable_sort::tree::Tree;
//!
//! let mut tree = Tree::new();
//! for value in [1, 2, 3, 5, 6, 4, 7] {
//!     tree.insert(value);
//! }
//!
//! assert_eq!(tree.to_sorted(), vec![1, 2, 3, 4, 5, 6, 7]);
//!
//! // A plain AVL tree needs four levels for the same insertions.
//! assert_eq!(tree.height(), 3);
//!
//! assert_eq!(tree.delete(&4), Some(4));
//! assert_eq!(tree.delete(&4), None);
//! ```

use std::cmp::Ordering;
use std::iter;
use std::mem;

use serde::{Deserialize, Serialize};

/// Which child of a node a value descends into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards smaller values.
    Left,
    /// Towards larger (or equal) values.
    Right,
}

impl Direction {
    /// The other child.
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl From<Ordering> for Direction {
    /// `Less` goes left. `Equal` and `Greater` both go right.
    fn from(ordering: Ordering) -> Self {
        match ordering {
            Ordering::Less => Self::Left,
            Ordering::Equal | Ordering::Greater => Self::Right,
        }
    }
}

/// How hard the tree works to stay balanced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    /// AVL rotations followed by shifting, so that every node's height and minimum height differ
    /// by at most one.
    #[default]
    Strict,
    /// AVL rotations only.
    Avl,
}

/// A structural invariant that doesn't hold. See [`Tree::check`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Violation {
    /// A node's cached heights don't match its children.
    #[error("node caches heights ({stored_height}, {stored_min_height}) but its children give ({height}, {min_height})")]
    StaleHeight {
        /// The cached height.
        stored_height: usize,
        /// The cached minimum height.
        stored_min_height: usize,
        /// The height computed from the children.
        height: usize,
        /// The minimum height computed from the children.
        min_height: usize,
    },
    /// The AVL invariant doesn't hold.
    #[error("subtree heights {left} and {right} differ by more than one")]
    Unbalanced {
        /// Height of the left subtree.
        left: usize,
        /// Height of the right subtree.
        right: usize,
    },
    /// The strict balance invariant doesn't hold.
    #[error("height {height} exceeds minimum height {min_height} by more than one")]
    NotStrict {
        /// Height of the subtree.
        height: usize,
        /// Minimum height of the subtree.
        min_height: usize,
    },
}

type Link<T> = Option<Box<Node<T>>>;

/// A balanced Binary Search Tree. Cloning it produces a fully independent copy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tree<T> {
    root: Link<T>,
    shape: Shape,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty, strictly balanced `Tree`.
    pub fn new() -> Self {
        Self::with_shape(Shape::Strict)
    }

    /// Generate a new, empty `Tree` that only performs AVL rotations.
    pub fn avl() -> Self {
        Self::with_shape(Shape::Avl)
    }

    /// Generate a new, empty `Tree` with the given balancing behaviour.
    pub fn with_shape(shape: Shape) -> Self {
        Self { root: None, shape }
    }

    /// The balancing behaviour of this tree.
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// The number of values in the tree.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// The number of levels in the tree. An empty tree has a height of 0.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Inserts the value into the tree using its `Ord` implementation.
    ///
    /// # Examples
    ///
    /// ```
    /// use resumable_sort::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(2);
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.to_sorted(), vec![1, 2]);
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        self.insert_by(value, T::cmp);
    }

    /// Inserts the value into the tree, asking `compare(value, stored)` at every node on the way
    /// down. Only the nodes on that single path are compared; rebalancing asks nothing.
    pub fn insert_by<F>(&mut self, value: T, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut directions = Vec::new();
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            let direction = Direction::from(compare(&value, &node.value));
            directions.push(direction);
            cursor = node.child(direction);
        }

        self.insert_along(directions, value);
    }

    /// Inserts the value by following already decided `directions` from the root down to an empty
    /// slot, then rebalances on the way back up.
    ///
    /// ## Panics
    ///
    /// When `directions` runs out before reaching an empty slot.
    pub fn insert_along<I>(&mut self, directions: I, value: T)
    where
        I: IntoIterator<Item = Direction>,
    {
        let shape = self.shape;
        Self::insert_at(&mut self.root, &mut directions.into_iter(), value, shape);
    }

    /// Deletes one value equal to `value` from the tree and returns it. If the tree doesn't contain
    /// such a value, nothing happens.
    ///
    /// # Examples
    ///
    /// ```
    /// use resumable_sort::tree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert(1);
    ///
    /// assert_eq!(tree.delete(&1), Some(1));
    /// assert!(tree.is_empty());
    /// ```
    pub fn delete(&mut self, value: &T) -> Option<T>
    where
        T: Ord,
    {
        self.delete_by(value, T::cmp)
    }

    /// Deletes one value for which `compare(value, stored)` is `Equal`.
    pub fn delete_by<F>(&mut self, value: &T, mut compare: F) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let shape = self.shape;
        Self::delete_at(&mut self.root, value, &mut compare, shape)
    }

    /// The value reached by following `directions` from the root, or `None` if they lead to an
    /// empty slot.
    pub fn probe<I>(&self, directions: I) -> Option<&T>
    where
        I: IntoIterator<Item = Direction>,
    {
        let mut cursor = self.root.as_deref();
        for direction in directions {
            cursor = cursor?.child(direction);
        }
        cursor.map(|node| &node.value)
    }

    /// Iterates over the values in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.root.as_deref())
    }

    /// The values in ascending order.
    pub fn to_sorted(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Consumes the tree, yielding its values in ascending order.
    pub fn into_sorted(self) -> Vec<T> {
        fn drain<T>(link: Link<T>, sorted: &mut Vec<T>) {
            if let Some(node) = link {
                let Node {
                    value, left, right, ..
                } = *node;
                drain(left, sorted);
                sorted.push(value);
                drain(right, sorted);
            }
        }

        let mut sorted = Vec::new();
        drain(self.root, &mut sorted);
        sorted
    }

    /// The values in pre-order: every node before its left subtree, then its right subtree.
    pub fn to_preorder(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut preorder = Vec::new();
        let mut stack: Vec<&Node<T>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = stack.pop() {
            preorder.push(node.value.clone());
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        preorder
    }

    /// Verifies the cached heights, the AVL invariant and (for [`Shape::Strict`]) the strict
    /// balance invariant at every node.
    pub fn check(&self) -> Result<(), Violation> {
        Self::check_link(&self.root, self.shape).map(|_| ())
    }

    fn check_link(link: &Link<T>, shape: Shape) -> Result<(usize, usize), Violation> {
        let Some(node) = link else {
            return Ok((0, 0));
        };
        let (left_height, left_min) = Self::check_link(&node.left, shape)?;
        let (right_height, right_min) = Self::check_link(&node.right, shape)?;
        let height = left_height.max(right_height) + 1;
        let min_height = left_min.min(right_min) + 1;

        if node.height != height || node.min_height != min_height {
            return Err(Violation::StaleHeight {
                stored_height: node.height,
                stored_min_height: node.min_height,
                height,
                min_height,
            });
        }
        if left_height.abs_diff(right_height) > 1 {
            return Err(Violation::Unbalanced {
                left: left_height,
                right: right_height,
            });
        }
        if shape == Shape::Strict && height - min_height > 1 {
            return Err(Violation::NotStrict { height, min_height });
        }
        Ok((height, min_height))
    }

    fn insert_at<I>(link: &mut Link<T>, directions: &mut I, value: T, shape: Shape)
    where
        I: Iterator<Item = Direction>,
    {
        match link {
            Some(node) => {
                let direction = directions
                    .next()
                    .expect("Directions ended before an empty slot.");
                Self::insert_at(node.child_mut(direction), directions, value, shape);
                Self::rebalance(link, shape);
            }
            None => *link = Some(Node::new_boxed(value)),
        }
    }

    fn delete_at<F>(link: &mut Link<T>, target: &T, compare: &mut F, shape: Shape) -> Option<T>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let node = link.as_mut()?;
        let removed = match compare(target, &node.value) {
            Ordering::Less => Self::delete_at(&mut node.left, target, compare, shape)?,
            Ordering::Greater => Self::delete_at(&mut node.right, target, compare, shape)?,
            // With two children, the successor takes this node's place.
            Ordering::Equal if node.left.is_some() && node.right.is_some() => {
                let successor = Self::delete_extreme(&mut node.right, Direction::Left, shape)
                    .expect("Right child has a minimum.");
                mem::replace(&mut node.value, successor)
            }
            // With at most one child, that child (already balanced) takes this node's place.
            Ordering::Equal => {
                let node = link.take()?;
                let Node {
                    value, left, right, ..
                } = *node;
                *link = left.or(right);
                return Some(value);
            }
        };

        Self::rebalance(link, shape);
        Some(removed)
    }

    /// Removes the value at the far `side` of the subtree: its minimum for [`Direction::Left`] and
    /// its maximum for [`Direction::Right`]. This only walks one kind of child so it never compares
    /// anything.
    fn delete_extreme(link: &mut Link<T>, side: Direction, shape: Shape) -> Option<T> {
        let node = link.as_mut()?;
        if node.child(side).is_some() {
            let value = Self::delete_extreme(node.child_mut(side), side, shape);
            Self::rebalance(link, shape);
            return value;
        }

        let node = link.take()?;
        let Node {
            value, left, right, ..
        } = *node;
        *link = match side {
            Direction::Left => right,
            Direction::Right => left,
        };
        Some(value)
    }

    /// Balances the subtree at `link` using the heights of its children, assuming both children are
    /// already balanced.
    ///
    /// See https://en.wikipedia.org/wiki/AVL_tree#Rebalancing for the rotation terminology.
    fn rebalance(link: &mut Link<T>, shape: Shape) {
        let Some(node) = link.as_mut() else {
            return;
        };
        node.fix_height();
        let balance_factor = node.balance_factor();
        if balance_factor > 1 {
            if node.left.as_ref().map_or(0, |left| left.balance_factor()) < 0 {
                Self::rotate(&mut node.left, Direction::Left);
            }
            Self::rotate(link, Direction::Right);
        } else if balance_factor < -1 {
            if node.right.as_ref().map_or(0, |right| right.balance_factor()) > 0 {
                Self::rotate(&mut node.right, Direction::Right);
            }
            Self::rotate(link, Direction::Left);
        }

        if shape == Shape::Strict {
            if let Some(node) = link.as_mut() {
                if node.height - node.min_height > 1 {
                    let toward = if min_height(&node.left) > min_height(&node.right) {
                        Direction::Right
                    } else {
                        Direction::Left
                    };
                    Self::shift(node, toward, shape);
                }
            }
        }

        if cfg!(debug_assertions) {
            let Some(node) = link.as_deref() else {
                return;
            };
            let left_height = height(&node.left);
            let right_height = height(&node.right);
            assert_eq!(node.height, left_height.max(right_height) + 1);
            assert!(left_height.abs_diff(right_height) <= 1);
            if shape == Shape::Strict {
                assert!(node.height - node.min_height <= 1);
            }
        }
    }

    /// Rotate the subtree at `link` so that its root moves down in `direction` and the root's
    /// child on the opposite side moves up to replace it.
    ///
    /// ## Panics
    ///
    /// When the subtree is empty or the rising child doesn't exist.
    ///
    /// # Diagram
    ///
    /// For `Direction::Right` we perform this transformation (`Direction::Left` mirrors it):
    ///
    /// ```text
    ///      old_root                 new_root
    ///      /     \                  /     \
    ///  new_root   z     rotate ->  x    old_root
    ///   /  \                              /  \
    ///  x    y                            y    z
    /// ```
    fn rotate(link: &mut Link<T>, direction: Direction) {
        let rising = direction.opposite();
        let mut old_root = link.take().expect("Cannot rotate empty tree/node.");
        let mut new_root = old_root
            .child_mut(rising)
            .take()
            .expect("Rotation needs a child to lift.");

        *old_root.child_mut(rising) = new_root.child_mut(direction).take();
        old_root.fix_height();

        *new_root.child_mut(direction) = Some(old_root);
        new_root.fix_height();
        *link = Some(new_root);
    }

    /// Moves one value through `node` toward its lighter side: the value nearest to `node` on the
    /// heavier side is promoted into `node` and `node`'s old value becomes the extreme value of the
    /// lighter side. The BST invariant tells us exactly where both values belong so this, like
    /// rotation, never compares anything.
    ///
    /// ```text
    ///  shifting toward the right:
    ///
    ///       5                    4
    ///      / \                  / \
    ///     3   6     shift ->   3   6
    ///    / \                  /   /
    ///   1   4                1   5
    /// ```
    fn shift(node: &mut Node<T>, toward: Direction, shape: Shape) {
        let from = toward.opposite();
        let promoted = Self::delete_extreme(node.child_mut(from), toward, shape)
            .expect("Shifting out of an empty subtree.");
        let demoted = mem::replace(&mut node.value, promoted);
        Self::insert_at(
            node.child_mut(toward),
            &mut iter::repeat(from),
            demoted,
            shape,
        );
        node.fix_height();
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An in-order iterator over a [`Tree`]'s values.
pub struct Iter<'a, T> {
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn new(root: Option<&'a Node<T>>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Node<T>>) {
        while let Some(node) = cursor {
            self.stack.push(node);
            cursor = node.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.value)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Node<T> {
    value: T,
    left: Link<T>,
    right: Link<T>,

    /// How many levels are in the subtree rooted at this node.
    /// A node with no children has a height of 1.
    height: usize,
    /// The length of the shortest path from this node to an empty subtree, counted the same way
    /// as `height`. A node with only one child has a minimum height of 1.
    min_height: usize,
}

impl<T> Node<T> {
    fn new_boxed(value: T) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
            height: 1,
            min_height: 1,
        })
    }

    fn child(&self, direction: Direction) -> Option<&Self> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    fn child_mut(&mut self, direction: Direction) -> &mut Link<T> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }

    /// Adjusts `height` and `min_height` to match the children.
    fn fix_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
        self.min_height = min_height(&self.left).min(min_height(&self.right)) + 1;
    }

    /// The height of the left subtree minus the height of the right subtree.
    fn balance_factor(&self) -> isize {
        height(&self.left) as isize - height(&self.right) as isize
    }
}

fn height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.height)
}

fn min_height<T>(link: &Link<T>) -> usize {
    link.as_ref().map_or(0, |node| node.min_height)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert the height and minimum height of the root, and the heights of its left and right
    /// children.
    macro_rules! assert_heights {
        ($tree:ident, $height:expr, $min_height:expr, $left_height:expr, $right_height:expr) => {{
            match $tree.root.as_deref() {
                Some(n) => {
                    assert_eq!(n.height, $height);
                    assert_eq!(n.min_height, $min_height);
                    assert_eq!(height(&n.left), $left_height);
                    assert_eq!(height(&n.right), $right_height);
                }
                None => assert_eq!(0, $height),
            }
        }};
    }

    fn build(shape: Shape, values: &[i32]) -> Tree<i32> {
        let mut tree = Tree::with_shape(shape);
        for value in values {
            tree.insert(*value);
            assert_eq!(tree.check(), Ok(()));
        }
        tree
    }

    #[test]
    fn always_adding_left() {
        let values = [10, 9, 8, 7, 6, 5, 4, 3, 2, 1];
        let tree = build(Shape::Strict, &values);

        assert_eq!(tree.to_sorted(), (1..=10).collect::<Vec<_>>());
        assert_eq!(tree.to_preorder(), vec![7, 3, 2, 1, 5, 4, 6, 9, 8, 10]);
    }

    #[test]
    fn always_adding_right() {
        let tree = build(Shape::Strict, &[1, 2, 3, 4, 5, 6, 7]);

        assert_eq!(tree.to_preorder(), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_heights!(tree, 3, 3, 2, 2);
    }

    #[test]
    fn test_left_right_rebalance() {
        let tree = build(Shape::Strict, &[0, -2, -1]);

        assert_heights!(tree, 2, 2, 1, 1);
        assert_eq!(tree.to_preorder(), vec![-1, -2, 0]);
    }

    #[test]
    fn test_right_left_rebalance() {
        let tree = build(Shape::Strict, &[0, 2, 1]);

        assert_heights!(tree, 2, 2, 1, 1);
        assert_eq!(tree.to_preorder(), vec![1, 0, 2]);
    }

    #[test]
    fn strict_tree_is_shorter_than_avl_tree() {
        let values = [1, 2, 3, 5, 6, 4, 7];

        let avl = build(Shape::Avl, &values);
        assert_eq!(avl.to_preorder(), vec![3, 2, 1, 5, 4, 6, 7]);
        assert_heights!(avl, 4, 2, 2, 3);

        let strict = build(Shape::Strict, &values);
        assert_eq!(strict.to_preorder(), vec![4, 2, 1, 3, 6, 5, 7]);
        assert_heights!(strict, 3, 3, 2, 2);
    }

    #[test]
    fn avl_tree_tolerates_loose_balance() {
        let avl = build(Shape::Avl, &[1, 2, 3, 5, 6, 4, 7]);
        let relabelled = Tree {
            root: avl.root.clone(),
            shape: Shape::Strict,
        };

        assert_eq!(avl.check(), Ok(()));
        assert_eq!(
            relabelled.check(),
            Err(Violation::NotStrict {
                height: 4,
                min_height: 2
            })
        );
    }

    #[test]
    fn shift_through_root() {
        let tree = build(Shape::Strict, &[5, 3, 8, 2, 6, 9, 7]);

        assert_eq!(tree.to_preorder(), vec![6, 3, 2, 5, 8, 7, 9]);
    }

    #[test]
    fn rotate_moves_subtrees() {
        let mut link = Some(Node::new_boxed(5));
        let node = link.as_mut().unwrap();
        node.left = Some(Node::new_boxed(3));
        node.right = Some(Node::new_boxed(6));
        node.fix_height();

        Tree::rotate(&mut link, Direction::Right);

        let root = link.as_deref().unwrap();
        assert_eq!(root.value, 3);
        assert_eq!(root.height, 3);
        assert!(root.left.is_none());
        let right = root.right.as_deref().unwrap();
        assert_eq!(right.value, 5);
        assert_eq!(right.right.as_deref().map(|n| n.value), Some(6));
    }

    #[test]
    fn delete_with_no_children() {
        let mut tree = build(Shape::Strict, &[5, 3, 7]);

        assert_eq!(tree.delete(&7), Some(7));
        assert_eq!(tree.to_sorted(), vec![3, 5]);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn delete_with_null_left() {
        let mut tree = build(Shape::Strict, &[5, 3, 7, 9]);

        assert_eq!(tree.delete(&7), Some(7));
        assert_eq!(tree.to_preorder(), vec![5, 3, 9]);
    }

    #[test]
    fn delete_with_null_right() {
        let mut tree = build(Shape::Strict, &[5, 3, 7, 6]);

        assert_eq!(tree.delete(&7), Some(7));
        assert_eq!(tree.to_preorder(), vec![5, 3, 6]);
    }

    #[test]
    fn delete_with_successor() {
        let mut tree = build(Shape::Strict, &[5, 3, 8, 2, 6, 9, 7]);

        assert_eq!(tree.delete(&8), Some(8));
        assert_eq!(tree.to_preorder(), vec![6, 3, 2, 5, 9, 7]);
        assert_eq!(tree.check(), Ok(()));
    }

    #[test]
    fn delete_root() {
        let mut tree = build(Shape::Strict, &[5]);

        assert_eq!(tree.delete(&5), Some(5));
        assert!(tree.is_empty());
        assert_eq!(tree.delete(&5), None);
    }

    #[test]
    fn delete_missing() {
        let mut tree = build(Shape::Strict, &[5, 3, 7]);

        assert_eq!(tree.delete(&4), None);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn duplicates_are_kept() {
        let mut tree = build(Shape::Strict, &[2, 1, 2, 2, 3]);

        assert_eq!(tree.to_sorted(), vec![1, 2, 2, 2, 3]);
        assert_eq!(tree.delete(&2), Some(2));
        assert_eq!(tree.to_sorted(), vec![1, 2, 2, 3]);
    }

    #[test]
    fn insert_along_follows_directions() {
        let mut tree = build(Shape::Strict, &[5, 3, 8]);

        tree.insert_along([Direction::Left, Direction::Right], 4);

        assert_eq!(tree.to_sorted(), vec![3, 4, 5, 8]);
        assert_eq!(tree.probe([Direction::Left, Direction::Right]), Some(&4));
        assert_eq!(tree.probe([Direction::Right, Direction::Left]), None);
    }

    #[test]
    #[should_panic(expected = "Directions ended before an empty slot.")]
    fn insert_along_requires_a_slot() {
        let mut tree = build(Shape::Strict, &[5, 3, 8]);

        tree.insert_along([Direction::Left], 4);
    }

    #[test]
    fn clone_is_independent() {
        let mut tree = build(Shape::Strict, &[5, 3, 8]);
        let snapshot = tree.clone();

        tree.insert(1);
        tree.delete(&8);

        assert_eq!(snapshot.to_sorted(), vec![3, 5, 8]);
        assert_eq!(tree.to_sorted(), vec![1, 3, 5]);
    }

    #[test]
    fn insert_by_counts_comparisons() {
        let mut tree = build(Shape::Strict, &[4, 2, 6, 1, 3, 5, 7]);
        let mut comparisons = 0;

        tree.insert_by(8, |a, b| {
            comparisons += 1;
            a.cmp(b)
        });

        assert_eq!(comparisons, 3);
    }

    #[test]
    fn into_sorted_consumes() {
        let tree = build(Shape::Strict, &[3, 1, 2]);

        assert_eq!(tree.into_sorted(), vec![1, 2, 3]);
    }
}
