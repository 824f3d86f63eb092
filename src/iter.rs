use core::iter::FusedIterator;
use std::vec;

use crate::{BstMap, Link, NodeId};

/// An iterator over the entries of a [`BstMap`], sorted by key.
///
/// Both ends walk the tree through the parent links; no stack is kept.
pub struct Iter<'map, K, V> {
    map: &'map BstMap<K, V>,
    front: Link,
    back: Link,
    len: usize,
}

impl<'map, K: Ord, V> Iter<'map, K, V> {
    pub(crate) fn new(map: &'map BstMap<K, V>) -> Self {
        Iter {
            map,
            front: map.first_id(),
            back: map.last_id(),
            len: map.len(),
        }
    }

    fn entry(&self, id: NodeId) -> (&'map K, &'map V) {
        let node = self.map.node(id);
        (&node.key, &node.value)
    }
}

impl<'map, K: Ord, V> Iterator for Iter<'map, K, V> {
    type Item = (&'map K, &'map V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.front?;
        self.front = self.map.successor(cur);
        self.len -= 1;

        Some(self.entry(cur))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.len, Some(self.len))
    }
}

impl<K: Ord, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.len == 0 {
            return None;
        }

        let cur = self.back?;
        self.back = self.map.predecessor(cur);
        self.len -= 1;

        Some(self.entry(cur))
    }
}

impl<K: Ord, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K: Ord, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter {
            map: self.map,
            front: self.front,
            back: self.back,
            len: self.len,
        }
    }
}

// Node ids in key order.
fn in_order<K: Ord, V>(map: &BstMap<K, V>) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(map.len());
    let mut opt_cur = map.first_id();

    while let Some(cur) = opt_cur {
        order.push(cur);
        opt_cur = map.successor(cur);
    }

    order
}

/// A mutable iterator over the entries of a [`BstMap`], sorted by key.
pub struct IterMut<'map, K, V> {
    order: vec::IntoIter<NodeId>,
    // Disjoint borrows of every arena slot, indexed by node id. Each is taken exactly once.
    slots: Vec<Option<(&'map K, &'map mut V)>>,
}

impl<'map, K: Ord, V> IterMut<'map, K, V> {
    pub(crate) fn new(map: &'map mut BstMap<K, V>) -> Self {
        let order = in_order(map).into_iter();

        let slots = map
            .nodes
            .iter_mut()
            .map(|slot| slot.as_mut().map(|node| (&node.key, &mut node.value)))
            .collect();

        IterMut { order, slots }
    }

    fn take_slot(&mut self, id: NodeId) -> Option<(&'map K, &'map mut V)> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }
}

impl<'map, K: Ord, V> Iterator for IterMut<'map, K, V> {
    type Item = (&'map K, &'map mut V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.order.next()?;
        self.take_slot(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let id = self.order.next_back()?;
        self.take_slot(id)
    }
}

impl<K: Ord, V> ExactSizeIterator for IterMut<'_, K, V> {}

impl<K: Ord, V> FusedIterator for IterMut<'_, K, V> {}

/// An owning iterator over the entries of a [`BstMap`], sorted by key.
pub struct IntoIter<K, V> {
    inner: vec::IntoIter<(K, V)>,
}

impl<K: Ord, V> IntoIter<K, V> {
    pub(crate) fn new(map: BstMap<K, V>) -> Self {
        let order = in_order(&map);
        let mut slots = map.nodes;

        let entries = order
            .into_iter()
            .filter_map(|id| slots.get_mut(id.index()).and_then(Option::take))
            .map(|node| (node.key, node.value))
            .collect::<Vec<_>>();

        IntoIter {
            inner: entries.into_iter(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}

/// An iterator over the keys of a [`BstMap`], in sorted order.
pub struct Keys<'map, K, V> {
    pub(crate) inner: Iter<'map, K, V>,
}

impl<'map, K: Ord, V> Iterator for Keys<'map, K, V> {
    type Item = &'map K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K: Ord, V> ExactSizeIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`BstMap`], in order by key.
pub struct Values<'map, K, V> {
    pub(crate) inner: Iter<'map, K, V>,
}

impl<'map, K: Ord, V> Iterator for Values<'map, K, V> {
    type Item = &'map V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K: Ord, V> ExactSizeIterator for Values<'_, K, V> {}

/// A mutable iterator over the values of a [`BstMap`], in order by key.
pub struct ValuesMut<'map, K, V> {
    pub(crate) inner: IterMut<'map, K, V>,
}

impl<'map, K: Ord, V> Iterator for ValuesMut<'map, K, V> {
    type Item = &'map mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K: Ord, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K: Ord, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
