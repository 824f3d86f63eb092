//! An ordered map backed by a plain (unbalanced) binary search tree with parent links.

// Terminology used in comments:
// - The height of a node `x` is the length of the longest downward path from `x` to a missing
//   child. Leaves have height 0 and a missing child counts as height -1, so
//   `h(x) = 1 + max(h(left(x)), h(right(x)))`.
// - The reattachment point of an orphaned subtree `s` searched from `a` is the node returned by
//   `index(a, key(s))`: the node whose empty child slot `s` belongs in.
//
// The structural invariants are:
// 1. For every node, keys in its left subtree compare less than its key and keys in its right
//    subtree compare greater.
// 2. Parent links are the inverse of child links, and only the root has no parent.
// 3. Every cached height satisfies the formula above.
//
// No rotations are ever performed. Insertion order alone determines the shape of the tree, so
// the worst case of every search is linear in the number of entries.

#![forbid(unsafe_code)]

use core::{borrow::Borrow, cmp::Ordering, fmt, mem};

mod cursor;
mod debug;
mod error;
mod iter;
mod map;
#[cfg(any(test, feature = "model"))]
pub mod model;
#[cfg(test)]
mod tests;

pub use cursor::{Cursor, CursorMut};
pub use error::InvariantViolation;
pub use iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

/// An ordered map based on a binary search tree whose nodes link back to their parents.
///
/// Nodes are kept in an internal arena and refer to each other by index, so traversal in either
/// direction only needs the links stored in the nodes themselves.
///
/// The tree is never rebalanced. Lookups, insertions and removals cost _O(h)_ where _h_ is the
/// height of the tree, which degrades to _O(n)_ when keys are inserted in sorted order.
pub struct BstMap<K, V> {
    nodes: Vec<Option<Node<K, V>>>,
    free: Vec<NodeId>,
    root: Link,
    len: usize,
}

/// Index of a node slot in the arena of a [`BstMap`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    #[inline]
    fn new(index: usize) -> NodeId {
        match u32::try_from(index) {
            Ok(index) => NodeId(index),
            Err(_) => panic!("node arena exceeded {} slots", u32::MAX),
        }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

type Link = Option<NodeId>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Dir {
    Left = 0,
    Right = 1,
}

#[derive(Clone, Debug)]
struct Links {
    parent: Link,
    children: [Link; 2],
    height: u32,
    // Never updated; nothing rebalances the tree.
    balance: i8,
}

pub(crate) struct Node<K, V> {
    links: Links,
    pub(crate) key: K,
    pub(crate) value: V,
}

impl<K, V> BstMap<K, V> {
    /// Returns a new, empty map.
    pub const fn new() -> BstMap<K, V> {
        BstMap {
            nodes: Vec::new(),
            free: Vec::new(),
            root: None,
            len: 0,
        }
    }

    /// Returns `true` if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        let empty = self.len == 0;
        debug_assert_eq!(empty, self.root.is_none());
        empty
    }

    /// Returns the number of elements in the map.
    pub const fn len(&self) -> usize {
        self.len
    }

    // Arena ==================================================================

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<K, V> {
        match self.nodes.get(id.index()) {
            Some(Some(node)) => node,
            _ => dangling(id),
        }
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.nodes.get_mut(id.index()) {
            Some(Some(node)) => node,
            _ => dangling(id),
        }
    }

    #[inline]
    fn links(&self, id: NodeId) -> &Links {
        &self.node(id).links
    }

    #[inline]
    fn links_mut(&mut self, id: NodeId) -> &mut Links {
        &mut self.node_mut(id).links
    }

    fn alloc(&mut self, key: K, value: V) -> NodeId {
        let node = Node {
            links: Links {
                parent: None,
                children: [None; 2],
                height: 0,
                balance: 0,
            },
            key,
            value,
        };

        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::new(self.nodes.len());
                self.nodes.push(Some(node));
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let node = match self.nodes.get_mut(id.index()).and_then(Option::take) {
            Some(node) => node,
            None => dangling(id),
        };
        self.free.push(id);
        node
    }

    // Navigation =============================================================

    #[inline]
    pub(crate) fn root_id(&self) -> Link {
        self.root
    }

    #[inline]
    fn parent(&self, id: NodeId) -> Link {
        self.links(id).parent
    }

    #[inline]
    fn child(&self, id: NodeId, dir: Dir) -> Link {
        self.links(id).children[dir as usize]
    }

    #[inline]
    fn left(&self, id: NodeId) -> Link {
        self.child(id, Dir::Left)
    }

    #[inline]
    fn right(&self, id: NodeId) -> Link {
        self.child(id, Dir::Right)
    }

    #[inline]
    pub(crate) fn height_of(&self, id: NodeId) -> u32 {
        self.links(id).height
    }

    // Returns which child of `parent` the node `child` is.
    fn which_child(&self, parent: NodeId, child: NodeId) -> Dir {
        if self.left(parent) == Some(child) {
            Dir::Left
        } else {
            debug_assert_eq!(self.right(parent), Some(child), "not a child of `parent`");
            Dir::Right
        }
    }

    /// Returns the edge symbol used by the renderer: `-` for the root, `\` for a left child and
    /// `/` for a right child.
    pub(crate) fn edge_symbol(&self, id: NodeId) -> char {
        match self.parent(id) {
            None => '-',
            Some(parent) => match self.which_child(parent, id) {
                Dir::Left => '\\',
                Dir::Right => '/',
            },
        }
    }

    // Follows left links to exhaustion.
    pub(crate) fn first_from(&self, mut cur: NodeId) -> NodeId {
        while let Some(left) = self.left(cur) {
            cur = left;
        }
        cur
    }

    // Follows right links to exhaustion.
    pub(crate) fn last_from(&self, mut cur: NodeId) -> NodeId {
        while let Some(right) = self.right(cur) {
            cur = right;
        }
        cur
    }

    pub(crate) fn first_id(&self) -> Link {
        self.root.map(|root| self.first_from(root))
    }

    pub(crate) fn last_id(&self) -> Link {
        self.root.map(|root| self.last_from(root))
    }

    /// Returns the in-order successor of `id`, walking parent links when there is no right
    /// subtree.
    pub(crate) fn successor(&self, id: NodeId) -> Link {
        if let Some(right) = self.right(id) {
            return Some(self.first_from(right));
        }

        // Ascend while `cur` is a right child. The first ancestor reached from its left is the
        // successor.
        let mut cur = id;
        while let Some(parent) = self.parent(cur) {
            if self.right(parent) != Some(cur) {
                return Some(parent);
            }
            cur = parent;
        }

        None
    }

    // Link maintenance =======================================================

    // Sets `child` as the `dir` child of `parent` and points `child` back at `parent`.
    fn attach(&mut self, parent: NodeId, dir: Dir, child: NodeId) {
        let old = mem::replace(&mut self.links_mut(parent).children[dir as usize], Some(child));
        debug_assert!(old.is_none(), "attachment slot already occupied");
        self.links_mut(child).parent = Some(parent);
    }

    /// Recomputes the cached height of `id` from its children and repeats for every ancestor up
    /// to the root.
    fn recalc_height(&mut self, id: NodeId) {
        let mut opt_cur = Some(id);

        while let Some(cur) = opt_cur {
            let left = self.left(cur).map(|l| self.height_of(l));
            let right = self.right(cur).map(|r| self.height_of(r));

            // `None` orders below every `Some`, matching a missing child's height of -1.
            self.links_mut(cur).height = left.max(right).map_or(0, |h| h + 1);

            opt_cur = self.parent(cur);
        }
    }

    /// Removes every element from the map.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free.clear();
        self.root = None;
        self.len = 0;
    }
}

impl<K: Ord, V> BstMap<K, V> {
    /// Returns the in-order predecessor of `id`, walking parent links when there is no left
    /// subtree.
    ///
    /// A candidate whose key equals the key of `id` is never returned, so the minimum has no
    /// predecessor even in a degenerate walk.
    pub(crate) fn predecessor(&self, id: NodeId) -> Link {
        let candidate = match self.left(id) {
            Some(left) => Some(self.last_from(left)),
            None => {
                let mut cur = id;
                loop {
                    match self.parent(cur) {
                        Some(parent) if self.left(parent) == Some(cur) => cur = parent,
                        parent => break parent,
                    }
                }
            }
        };

        candidate.filter(|&pred| self.node(pred).key != self.node(id).key)
    }

    /// Searches the subtree rooted at `from` for `key`.
    ///
    /// Returns the node holding `key` if there is one, and otherwise the node whose empty child
    /// slot `key` would be inserted into. Keys that do not compare less are routed right.
    pub(crate) fn index<Q>(&self, from: NodeId, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut cur = from;

        loop {
            let next = match key.cmp(self.node(cur).key.borrow()) {
                Ordering::Equal => return cur,
                Ordering::Less => self.left(cur),
                Ordering::Greater => self.right(cur),
            };

            match next {
                Some(next) => cur = next,
                None => return cur,
            }
        }
    }

    pub(crate) fn find_id<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let found = self.index(self.root?, key);
        (self.node(found).key.borrow() == key).then_some(found)
    }

    /// Returns the node for `key`, inserting one with the value produced by `default` if the key
    /// is absent. The flag is `true` when a node was inserted.
    pub(crate) fn find_or_insert_with<F>(&mut self, key: K, default: F) -> (NodeId, bool)
    where
        F: FnOnce() -> V,
    {
        let root = match self.root {
            Some(root) => root,
            None => {
                // Tree is empty. The new node becomes the root.
                let id = self.alloc(key, default());
                self.root = Some(id);
                self.len += 1;
                tracing::trace!(node = ?id, "root created");
                return (id, true);
            }
        };

        let found = self.index(root, &key);
        let dir = match key.cmp(&self.node(found).key) {
            Ordering::Equal => return (found, false),
            Ordering::Less => Dir::Left,
            Ordering::Greater => Dir::Right,
        };

        let id = self.alloc(key, default());
        self.attach(found, dir, id);
        self.recalc_height(id);
        self.len += 1;

        tracing::trace!(node = ?id, parent = ?found, ?dir, "node attached");

        (id, true)
    }

    // Finds a new home for the orphaned subtree rooted at `child` by searching from `from`, then
    // links it in and refreshes heights from the reattachment point upward.
    fn reattach(&mut self, from: NodeId, child: NodeId) {
        let point = self.index(from, &self.node(child).key);

        let dir = match self.node(child).key.cmp(&self.node(point).key) {
            Ordering::Less => Dir::Left,
            _ => Dir::Right,
        };

        self.attach(point, dir, child);
        self.recalc_height(point);

        tracing::trace!(subtree = ?child, point = ?point, ?dir, "subtree reattached");
    }

    /// Removes the node `id` from the tree and returns its key and value.
    ///
    /// The node's subtrees are not spliced through its successor. Each one is detached and
    /// grafted back independently through a fresh search: from the promoted child when `id` is
    /// the root, or from `id`'s parent otherwise.
    pub(crate) fn erase_at(&mut self, id: NodeId) -> (K, V) {
        // Detach both subtrees from the erased node before deciding their fate.
        let links = self.links_mut(id);
        let parent = links.parent;
        let [left, right] = mem::take(&mut links.children);

        match parent {
            None => {
                let node = self.release(id);
                self.len -= 1;

                let (promoted, other) = match (left, right) {
                    (None, None) => {
                        // Sole node.
                        self.root = None;
                        tracing::trace!(node = ?id, "root erased, tree now empty");
                        return (node.key, node.value);
                    }
                    (Some(left), right) => (left, right),
                    (None, Some(right)) => (right, None),
                };

                self.links_mut(promoted).parent = None;
                self.root = Some(promoted);
                tracing::trace!(node = ?id, root = ?promoted, "root erased, child promoted");

                if let Some(other) = other {
                    self.reattach(promoted, other);
                }

                (node.key, node.value)
            }

            Some(parent) => {
                let dir = self.which_child(parent, id);
                self.links_mut(parent).children[dir as usize] = None;

                let node = self.release(id);
                self.len -= 1;
                tracing::trace!(node = ?id, ?parent, "node erased");

                if left.is_none() && right.is_none() {
                    self.recalc_height(parent);
                }

                for child in [left, right].into_iter().flatten() {
                    self.reattach(parent, child);
                }

                (node.key, node.value)
            }
        }
    }
}

impl<K: Clone, V: Clone> BstMap<K, V> {
    /// Copies the tree node by node into a fresh, compacted arena.
    ///
    /// The copy's parent links point at the copy's own nodes.
    fn deep_clone(&self) -> BstMap<K, V> {
        let mut nodes: Vec<Option<Node<K, V>>> = Vec::with_capacity(self.len);

        // Each entry is a source node and the slot in the copy it must be linked into.
        let mut stack: Vec<(NodeId, Option<(NodeId, Dir)>)> = Vec::new();

        if let Some(root) = self.root {
            stack.push((root, None));
        }

        while let Some((src, slot)) = stack.pop() {
            let src_node = self.node(src);
            let id = NodeId::new(nodes.len());

            nodes.push(Some(Node {
                links: Links {
                    parent: slot.map(|(parent, _)| parent),
                    children: [None; 2],
                    height: src_node.links.height,
                    balance: src_node.links.balance,
                },
                key: src_node.key.clone(),
                value: src_node.value.clone(),
            }));

            if let Some((parent, dir)) = slot {
                if let Some(Some(parent_node)) = nodes.get_mut(parent.index()) {
                    parent_node.links.children[dir as usize] = Some(id);
                }
            }

            for dir in [Dir::Right, Dir::Left] {
                if let Some(child) = self.child(src, dir) {
                    stack.push((child, Some((id, dir))));
                }
            }
        }

        tracing::debug!(nodes = nodes.len(), "tree cloned");

        BstMap {
            root: (!nodes.is_empty()).then_some(NodeId(0)),
            nodes,
            free: Vec::new(),
            len: self.len,
        }
    }
}

impl<K: Ord + fmt::Debug, V> BstMap<K, V> {
    /// Walks the whole tree and verifies its structural invariants: key ordering, parent links,
    /// cached heights and the element count.
    pub fn sanity_check(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len {
                0 => Ok(()),
                len => Err(InvariantViolation::Len {
                    reported: len,
                    reachable: 0,
                }),
            };
        };

        if self.parent(root).is_some() {
            return Err(InvariantViolation::RootHasParent {
                key: format!("{:?}", self.node(root).key),
            });
        }

        // Structure and heights, visiting every reachable node once. The visit count is capped by
        // the arena size so that a cycle cannot loop forever.
        let mut reachable = 0;
        let mut stack = vec![root];
        while let Some(cur) = stack.pop() {
            reachable += 1;
            if reachable > self.nodes.len() {
                break;
            }

            let mut expected: Option<u32> = None;
            for dir in [Dir::Left, Dir::Right] {
                let Some(child) = self.child(cur, dir) else {
                    continue;
                };

                if self.parent(child) != Some(cur) {
                    return Err(InvariantViolation::ParentLink {
                        parent: format!("{:?}", self.node(cur).key),
                        child: format!("{:?}", self.node(child).key),
                    });
                }

                expected = expected.max(Some(self.height_of(child)));
                stack.push(child);
            }

            let actual = expected.map_or(0, |h| h + 1);
            let cached = self.height_of(cur);
            if cached != actual {
                return Err(InvariantViolation::Height {
                    key: format!("{:?}", self.node(cur).key),
                    cached,
                    actual,
                });
            }
        }

        if reachable != self.len {
            return Err(InvariantViolation::Len {
                reported: self.len,
                reachable,
            });
        }

        // Ordering: an in-order walk must visit strictly increasing keys.
        let mut opt_prev = self.first_id();
        while let Some(prev) = opt_prev {
            let next = self.successor(prev);
            if let Some(next) = next {
                if self.node(prev).key >= self.node(next).key {
                    return Err(InvariantViolation::Order {
                        prev: format!("{:?}", self.node(prev).key),
                        next: format!("{:?}", self.node(next).key),
                    });
                }
            }
            opt_prev = next;
        }

        Ok(())
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn assert_invariants(&self) {
        if let Err(violation) = self.sanity_check() {
            panic!("tree invariant violated: {violation}");
        }
    }
}

#[cold]
#[track_caller]
fn dangling(id: NodeId) -> ! {
    panic!("dangling node id {id:?}")
}
