//! # avl-index
//!
//! An ordered index of named records backed by an AVL-balanced binary search
//! tree.
//!
//! Records implement [`Entry`]: an ordering key used for placement and exact
//! lookup, and a display name used for substring search. The tree answers
//! three kinds of query:
//!
//! - exact lookup by key, O(log n)
//! - substring containment on the display name, O(n)
//! - the full listing in ascending key order, O(n)
//!
//! ## Example
//!
//! ```rust
//! use avl_index::AvlTree;
//!
//! let mut tree: AvlTree<String> = AvlTree::new();
//! tree.insert("Sushi Place".to_string());
//! tree.insert("Pizza Place".to_string());
//! tree.insert("Sushi Bar".to_string());
//!
//! assert_eq!(tree.search_exact("Pizza Place").map(String::as_str), Some("Pizza Place"));
//! assert_eq!(tree.search_by_contains("Sushi").len(), 2);
//! assert_eq!(tree.count_nodes(), 3);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;

pub mod catalog;
pub mod entry;
pub mod error;
pub mod pages;

pub use catalog::{BatchSource, Catalog, CatalogConfig, IterSource};
pub use entry::{Entry, Named};
pub use error::{Error, Result};
pub use pages::Pages;

// =============================================================================
// Configuration
// =============================================================================

/// Entries per page when no explicit page size is configured.
pub const DEFAULT_PAGE_SIZE: usize = 12;

// =============================================================================
// Nodes
// =============================================================================

type Link<T> = Option<Box<Node<T>>>;

#[derive(Clone)]
struct Node<T> {
    entry: T,
    left: Link<T>,
    right: Link<T>,
    /// Height of the subtree rooted here; a leaf has height 1.
    height: u8,
}

impl<T> Node<T> {
    fn leaf(entry: T) -> Self {
        Self {
            entry,
            left: None,
            right: None,
            height: 1,
        }
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    #[inline]
    fn balance_factor(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }
}

#[inline]
fn height<T>(link: &Link<T>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

// =============================================================================
// Rotations and rebalancing
// =============================================================================

fn rotate_left<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut pivot = node
        .right
        .take()
        .expect("rotate_left is only applied to a node with a right child");

    #[cfg(feature = "tracing")]
    tracing::trace!(height = node.height, "rotate_left");

    node.right = pivot.left.take();
    node.update_height();
    pivot.left = Some(node);
    pivot.update_height();
    pivot
}

fn rotate_right<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let mut pivot = node
        .left
        .take()
        .expect("rotate_right is only applied to a node with a left child");

    #[cfg(feature = "tracing")]
    tracing::trace!(height = node.height, "rotate_right");

    node.left = pivot.right.take();
    node.update_height();
    pivot.right = Some(node);
    pivot.update_height();
    pivot
}

/// Restores `|height(left) - height(right)| <= 1` at `node`, assuming it
/// already holds for both children.
fn rebalance<T>(mut node: Box<Node<T>>) -> Box<Node<T>> {
    let factor = node.balance_factor();
    if factor > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if height(&left.left) < height(&left.right) {
                rotate_left(left)
            } else {
                left
            });
        }
        rotate_right(node)
    } else if factor < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if height(&right.right) < height(&right.left) {
                rotate_right(right)
            } else {
                right
            });
        }
        rotate_left(node)
    } else {
        node
    }
}

fn insert_node<T: Entry>(link: Link<T>, entry: T, inserted: &mut bool) -> Box<Node<T>> {
    let Some(mut node) = link else {
        *inserted = true;
        return Box::new(Node::leaf(entry));
    };

    match Ord::cmp(entry.key(), node.entry.key()) {
        Ordering::Less => node.left = Some(insert_node(node.left.take(), entry, inserted)),
        Ordering::Greater => node.right = Some(insert_node(node.right.take(), entry, inserted)),
        // Duplicate key: the incoming entry is dropped.
        Ordering::Equal => return node,
    }

    node.update_height();
    rebalance(node)
}

// =============================================================================
// AvlTree
// =============================================================================

/// An AVL-balanced binary search tree of [`Entry`] records.
///
/// Every node owns its two children; rotations move owned subtrees between
/// slots. Duplicate keys are ignored on insertion and there is no removal.
#[derive(Clone)]
pub struct AvlTree<T> {
    root: Link<T>,
}

impl<T> AvlTree<T> {
    pub fn new() -> Self {
        Self { root: None }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the root node, 0 for an empty tree.
    #[inline]
    pub fn height(&self) -> u8 {
        height(&self.root)
    }

    /// Counts the nodes by walking the whole tree. The result is not cached.
    pub fn count_nodes(&self) -> usize {
        fn count<T>(link: &Link<T>) -> usize {
            link.as_ref()
                .map_or(0, |node| 1 + count(&node.left) + count(&node.right))
        }
        count(&self.root)
    }

    /// All entries in ascending key order.
    pub fn to_list(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Consumes the tree, returning its entries in ascending key order.
    pub fn into_sorted_vec(self) -> Vec<T> {
        fn drain<T>(link: Link<T>, out: &mut Vec<T>) {
            if let Some(node) = link {
                let Node {
                    entry, left, right, ..
                } = *node;
                drain(left, out);
                out.push(entry);
                drain(right, out);
            }
        }

        let mut out = Vec::new();
        drain(self.root, &mut out);
        out
    }

    pub fn iter(&self) -> Iter<'_, T> {
        let mut iter = Iter { stack: Vec::new() };
        iter.push_left_spine(self.root.as_deref());
        iter
    }
}

impl<T: Entry> AvlTree<T> {
    /// Inserts `entry`, rebalancing every ancestor on the way back up.
    ///
    /// Returns `false` (and drops `entry`) when an entry with the same key is
    /// already present.
    pub fn insert(&mut self, entry: T) -> bool {
        let mut inserted = false;
        self.root = Some(insert_node(self.root.take(), entry, &mut inserted));
        inserted
    }

    /// Binary search on the ordering key.
    pub fn search_exact<Q>(&self, key: &Q) -> Option<&T>
    where
        T::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            let node_key: &Q = node.entry.key().borrow();
            match key.cmp(node_key) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.entry),
            }
        }
        None
    }

    /// Every entry whose name contains `fragment` (case-sensitive substring,
    /// not just a prefix), in ascending key order.
    pub fn search_by_contains(&self, fragment: &str) -> Vec<&T> {
        fn walk<'a, T: Entry>(link: &'a Link<T>, fragment: &str, out: &mut Vec<&'a T>) {
            if let Some(node) = link {
                walk(&node.left, fragment, out);
                if node.entry.name().contains(fragment) {
                    out.push(&node.entry);
                }
                walk(&node.right, fragment, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.root, fragment, &mut out);
        out
    }

    /// First entry, in key order, whose name equals `name`.
    ///
    /// This is a linear scan; use [`AvlTree::search_exact`] when the name is
    /// also the ordering key.
    pub fn find_by_name(&self, name: &str) -> Option<&T> {
        self.iter().find(|entry| entry.name() == name)
    }
}

impl<T> Default for AvlTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for AvlTree<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Entry> FromIterator<T> for AvlTree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T: Entry> Extend<T> for AvlTree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for entry in iter {
            self.insert(entry);
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlTree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`AvlTree`].
pub struct Iter<'a, T> {
    /// Nodes whose left subtree has been pushed but which are not yet yielded.
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iter<'a, T> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<T>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        Some(&node.entry)
    }
}


#[cfg(test)]
mod proptests;
