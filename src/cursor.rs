use core::fmt;

use crate::{BstMap, Link};

/// A cursor over a [`BstMap`].
///
/// A cursor points either to an entry of the map or to the "end" non-element that sits one past
/// the maximum entry. All end cursors compare equal, and two cursors pointing at entries compare
/// equal when they point at the same entry.
pub struct Cursor<'map, K, V> {
    map: &'map BstMap<K, V>,
    node: Link,
}

impl<'map, K: Ord, V> Cursor<'map, K, V> {
    pub(crate) fn new(map: &'map BstMap<K, V>, node: Link) -> Cursor<'map, K, V> {
        Cursor { map, node }
    }

    /// Returns `true` if the cursor points at the end non-element.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves the cursor to the next entry of the map.
    ///
    /// If the cursor points at the maximum entry it moves to the end non-element. If it already
    /// points at the end, nothing happens.
    pub fn move_next(&mut self) {
        if let Some(node) = self.node {
            self.node = self.map.successor(node);
        }
    }

    /// Moves the cursor to the previous entry of the map.
    ///
    /// If the cursor points at the end non-element it moves to the maximum entry. If it points at
    /// the minimum entry it moves to the end.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(node) => self.map.predecessor(node),
            None => self.map.last_id(),
        };
    }

    /// Returns the entry pointed to by the cursor.
    ///
    /// This returns `None` if the cursor points at the end non-element.
    pub fn get(&self) -> Option<(&'map K, &'map V)> {
        let map = self.map;
        self.node.map(|id| {
            let node = map.node(id);
            (&node.key, &node.value)
        })
    }

    /// Returns the key of the entry pointed to by the cursor.
    pub fn key(&self) -> Option<&'map K> {
        self.get().map(|(key, _)| key)
    }

    /// Returns the value of the entry pointed to by the cursor.
    pub fn value(&self) -> Option<&'map V> {
        self.get().map(|(_, value)| value)
    }

    /// Returns the entry after the one pointed to by the cursor.
    ///
    /// Returns `None` at the maximum entry and at the end non-element.
    pub fn peek_next(&self) -> Option<(&'map K, &'map V)> {
        let mut next = *self;
        next.move_next();
        next.get()
    }

    /// Returns the entry before the one pointed to by the cursor.
    ///
    /// At the end non-element this is the maximum entry.
    pub fn peek_prev(&self) -> Option<(&'map K, &'map V)> {
        let mut prev = *self;
        prev.move_prev();
        prev.get()
    }
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for Cursor<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Cursor").field(&self.get()).finish()
    }
}

/// A cursor over a [`BstMap`] which supports editing operations.
///
/// A cursor points either to an entry of the map or to the "end" non-element that sits one past
/// the maximum entry.
pub struct CursorMut<'map, K, V> {
    map: &'map mut BstMap<K, V>,
    node: Link,
}

impl<'map, K: Ord, V> CursorMut<'map, K, V> {
    pub(crate) fn new(map: &'map mut BstMap<K, V>, node: Link) -> CursorMut<'map, K, V> {
        CursorMut { map, node }
    }

    /// Returns a read-only cursor pointing to the current entry.
    ///
    /// The `CursorMut` remains immutably borrowed for the lifetime of the returned `Cursor`.
    pub fn as_cursor(&self) -> Cursor<'_, K, V> {
        Cursor::new(&*self.map, self.node)
    }

    /// Returns `true` if the cursor points at the end non-element.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }

    /// Moves the cursor to the next entry of the map.
    ///
    /// If the cursor points at the maximum entry it moves to the end non-element. If it already
    /// points at the end, nothing happens.
    pub fn move_next(&mut self) {
        if let Some(node) = self.node {
            self.node = self.map.successor(node);
        }
    }

    /// Moves the cursor to the previous entry of the map.
    ///
    /// If the cursor points at the end non-element it moves to the maximum entry. If it points at
    /// the minimum entry it moves to the end.
    pub fn move_prev(&mut self) {
        self.node = match self.node {
            Some(node) => self.map.predecessor(node),
            None => self.map.last_id(),
        };
    }

    /// Returns the entry pointed to by the cursor.
    pub fn get(&self) -> Option<(&K, &V)> {
        self.node.map(|id| {
            let node = self.map.node(id);
            (&node.key, &node.value)
        })
    }

    /// Returns the entry pointed to by the cursor with a mutable reference to its value.
    ///
    /// This returns `None` if the cursor points at the end non-element.
    pub fn get_mut(&mut self) -> Option<(&K, &mut V)> {
        let id = self.node?;
        let node = self.map.node_mut(id);
        Some((&node.key, &mut node.value))
    }

    /// Converts the cursor into a mutable reference to the current value, borrowed for the
    /// lifetime of the map.
    pub fn into_value_mut(self) -> Option<&'map mut V> {
        let id = self.node?;
        let map = self.map;
        Some(&mut map.node_mut(id).value)
    }

    /// Returns the entry after the one pointed to by the cursor.
    pub fn peek_next(&self) -> Option<(&K, &V)> {
        self.as_cursor().peek_next()
    }

    /// Returns the entry before the one pointed to by the cursor.
    pub fn peek_prev(&self) -> Option<(&K, &V)> {
        self.as_cursor().peek_prev()
    }

    /// Removes the current entry from the map.
    ///
    /// This returns the removed entry and moves the cursor to the entry that followed it. If the
    /// cursor points at the end non-element, this method returns `None`, and neither the map nor
    /// the cursor is modified.
    pub fn erase(&mut self) -> Option<(K, V)> {
        let remove = self.node?;

        self.move_next();

        Some(self.map.erase_at(remove))
    }

    /// Removes the current entry from the map.
    ///
    /// This returns the removed entry and moves the cursor to the entry that preceded it. If the
    /// cursor points at the end non-element, this method returns `None`, and neither the map nor
    /// the cursor is modified.
    pub fn erase_and_move_prev(&mut self) -> Option<(K, V)> {
        let remove = self.node?;

        self.move_prev();

        Some(self.map.erase_at(remove))
    }
}

impl<K: Ord + fmt::Debug, V: fmt::Debug> fmt::Debug for CursorMut<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CursorMut").field(&self.get()).finish()
    }
}
