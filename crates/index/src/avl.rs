//! Self-balancing ordered map keyed by string.
//!
//! `BalancedIndex` is an AVL tree with exclusively-owning nodes: each node
//! owns its children outright, so there is no sharing and no aliasing.
//! Ordering is lexicographic over the key string. After every structural
//! change, heights are recomputed bottom-up and the tree is rebalanced with
//! the standard four rotation cases so that for every node
//! |height(left) − height(right)| ≤ 1.

use std::cmp::Ordering;

struct Node<V> {
    key: String,
    value: V,
    height: i32,
    left: Option<Box<Node<V>>>,
    right: Option<Box<Node<V>>>,
}

impl<V> Node<V> {
    fn new(key: String, value: V) -> Self {
        Node {
            key,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance_factor(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height<V>(node: &Option<Box<Node<V>>>) -> i32 {
    node.as_ref().map_or(0, |n| n.height)
}

/// Ordered key → value store with logarithmic insert and lookup.
pub struct BalancedIndex<V> {
    root: Option<Box<Node<V>>>,
    len: usize,
}

impl<V> Default for BalancedIndex<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> BalancedIndex<V> {
    /// Create an empty index.
    pub fn new() -> Self {
        BalancedIndex { root: None, len: 0 }
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check whether the index holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert or overwrite the value for `key`, then rebalance.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        let root = self.root.take();
        let (root, fresh) = Self::insert_node(root, &key, value);
        self.root = Some(root);
        if fresh {
            self.len += 1;
        }
    }

    /// Look up the value for `key`.
    ///
    /// Absence is reported distinctly from a found-but-empty value.
    pub fn get(&self, key: &str) -> Option<&V> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.cmp(node.key.as_str()) {
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
                Ordering::Equal => return Some(&node.value),
            }
        }
        None
    }

    /// Look up a mutable reference to the value for `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.as_str()) {
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.value),
            }
        }
        None
    }

    /// Visit every entry in ascending key order.
    ///
    /// The persistence path uses this to serialize the whole tree, not only
    /// the root.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &V),
    {
        Self::walk(&self.root, &mut f);
    }

    /// Verify the height invariant for every node.
    ///
    /// Intended for tests and debugging; queries never need this.
    pub fn is_balanced(&self) -> bool {
        fn check<V>(node: &Option<Box<Node<V>>>) -> Option<i32> {
            match node {
                None => Some(0),
                Some(n) => {
                    let lh = check(&n.left)?;
                    let rh = check(&n.right)?;
                    if (lh - rh).abs() > 1 {
                        return None;
                    }
                    Some(1 + lh.max(rh))
                }
            }
        }
        check(&self.root).is_some()
    }

    fn walk<'a, F>(node: &'a Option<Box<Node<V>>>, f: &mut F)
    where
        F: FnMut(&'a str, &'a V),
    {
        if let Some(n) = node {
            Self::walk(&n.left, f);
            f(&n.key, &n.value);
            Self::walk(&n.right, f);
        }
    }

    fn insert_node(node: Option<Box<Node<V>>>, key: &str, value: V) -> (Box<Node<V>>, bool) {
        let mut node = match node {
            None => return (Box::new(Node::new(key.to_owned(), value)), true),
            Some(n) => n,
        };

        let fresh = match key.cmp(node.key.as_str()) {
            Ordering::Less => {
                let (child, fresh) = Self::insert_node(node.left.take(), key, value);
                node.left = Some(child);
                fresh
            }
            Ordering::Greater => {
                let (child, fresh) = Self::insert_node(node.right.take(), key, value);
                node.right = Some(child);
                fresh
            }
            Ordering::Equal => {
                node.value = value;
                return (node, false);
            }
        };

        node.update_height();
        (Self::rebalance(node, key), fresh)
    }

    /// Standard four-case AVL rebalancing, selecting the case by comparing
    /// the inserted key against the unbalanced node's children.
    fn rebalance(mut node: Box<Node<V>>, key: &str) -> Box<Node<V>> {
        let balance = node.balance_factor();

        if balance > 1 {
            if let Some(left) = node.left.as_deref() {
                if key < left.key.as_str() {
                    // left-left
                    return Self::rotate_right(node);
                }
                if key > left.key.as_str() {
                    // left-right
                    node.left = node.left.take().map(Self::rotate_left);
                    return Self::rotate_right(node);
                }
            }
        } else if balance < -1 {
            if let Some(right) = node.right.as_deref() {
                if key > right.key.as_str() {
                    // right-right
                    return Self::rotate_left(node);
                }
                if key < right.key.as_str() {
                    // right-left
                    node.right = node.right.take().map(Self::rotate_right);
                    return Self::rotate_left(node);
                }
            }
        }

        node
    }

    fn rotate_right(mut y: Box<Node<V>>) -> Box<Node<V>> {
        match y.left.take() {
            Some(mut x) => {
                y.left = x.right.take();
                y.update_height();
                x.right = Some(y);
                x.update_height();
                x
            }
            // Unreachable by construction: rotation is only requested for a
            // left-heavy node.
            None => y,
        }
    }

    fn rotate_left(mut x: Box<Node<V>>) -> Box<Node<V>> {
        match x.right.take() {
            Some(mut y) => {
                x.right = y.left.take();
                x.update_height();
                y.left = Some(x);
                y.update_height();
                y
            }
            None => x,
        }
    }
}
