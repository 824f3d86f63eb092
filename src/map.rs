use core::{
    borrow::Borrow,
    fmt,
    iter::FromIterator,
    mem,
    ops::Index,
};

use crate::{BstMap, Cursor, CursorMut, IntoIter, Iter, IterMut, Keys, Values, ValuesMut};

impl<K: Ord, V> BstMap<K, V> {
    /// Returns a mutable reference to the value associated with `key`, inserting
    /// `V::default()` first if the key is absent.
    ///
    /// Accessing the same key again returns the same slot; its value is never reset.
    ///
    /// ```
    /// let mut map: bstmap::BstMap<&str, u32> = bstmap::BstMap::new();
    ///
    /// *map.at_or_insert("apples") += 3;
    /// *map.at_or_insert("apples") += 2;
    ///
    /// assert_eq!(map.get("apples"), Some(&5));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn at_or_insert(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        let (id, _) = self.find_or_insert_with(key, V::default);
        &mut self.node_mut(id).value
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the key was already present its value is replaced and the old value returned. The key
    /// itself is not updated.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        if let Some(id) = self.find_id(&key) {
            return Some(mem::replace(&mut self.node_mut(id).value, value));
        }

        self.find_or_insert_with(key, || value);
        None
    }

    /// Returns `true` if the map contains a value associated with `key`.
    #[inline]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).is_some()
    }

    /// Returns a reference to the value associated with `key`.
    #[inline]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_id(key).map(|id| &self.node(id).value)
    }

    /// Returns a mutable reference to the value associated with `key`.
    #[inline]
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.find_id(key)?;
        Some(&mut self.node_mut(id).value)
    }

    /// Returns a cursor pointing at the entry for `key`, or the end cursor if there is none.
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_id(key);
        Cursor::new(self, node)
    }

    /// Returns an editing cursor pointing at the entry for `key`, or the end cursor if there is
    /// none.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node = self.find_id(key);
        CursorMut::new(self, node)
    }

    /// Returns a cursor pointing at the minimum entry, or the end cursor if the map is empty.
    pub fn begin(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, self.first_id())
    }

    /// Returns the end cursor, positioned one past the maximum entry.
    pub fn end(&self) -> Cursor<'_, K, V> {
        Cursor::new(self, None)
    }

    /// Returns an editing cursor pointing at the minimum entry.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V> {
        let node = self.first_id();
        CursorMut::new(self, node)
    }

    /// Returns the editing end cursor.
    pub fn end_mut(&mut self) -> CursorMut<'_, K, V> {
        CursorMut::new(self, None)
    }

    /// Removes the entry for `key` and returns its value.
    ///
    /// Equivalent to erasing through the cursor returned by [`find_mut`](Self::find_mut).
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_mut(key).erase().map(|(_, value)| value)
    }

    /// Returns the first key-value pair in the map.
    ///
    /// The returned key is the minimum key in the map.
    #[inline]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.begin().get()
    }

    /// Returns the last key-value pair in the map.
    ///
    /// The returned key is the maximum key in the map.
    #[inline]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.last_id().map(|id| {
            let node = self.node(id);
            (&node.key, &node.value)
        })
    }

    /// Returns the height of the tree, or `None` if the map is empty.
    ///
    /// A map with a single entry has height 0.
    pub fn height(&self) -> Option<u32> {
        self.root_id().map(|root| self.height_of(root))
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Gets a mutable iterator over the entries of the map, sorted by key.
    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(self)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Gets a mutable iterator over the values of the map, in order by key.
    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<K, V> BstMap<K, V> {
    /// Moves every entry out of `self` into a new map, leaving `self` empty.
    pub fn take(&mut self) -> BstMap<K, V> {
        mem::take(self)
    }
}

impl<K, V> Default for BstMap<K, V> {
    fn default() -> Self {
        BstMap::new()
    }
}

impl<K: Clone, V: Clone> Clone for BstMap<K, V> {
    fn clone(&self) -> Self {
        self.deep_clone()
    }

    fn clone_from(&mut self, source: &Self) {
        // `self` and `source` never alias here.
        *self = source.deep_clone();
    }
}

impl<K: fmt::Debug + Ord, V: fmt::Debug> fmt::Debug for BstMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V: PartialEq> PartialEq for BstMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Ord, V: Eq> Eq for BstMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for BstMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = BstMap::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for BstMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V, Q> Index<&Q> for BstMap<K, V>
where
    K: Borrow<Q>,
    Q: Ord + ?Sized,
{
    type Output = V;

    /// Returns a reference to the value associated with `key`.
    ///
    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    #[inline]
    fn index(&self, key: &Q) -> &V {
        self.get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V> IntoIterator for BstMap<K, V> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self)
    }
}

impl<'map, K: Ord, V> IntoIterator for &'map BstMap<K, V> {
    type Item = (&'map K, &'map V);
    type IntoIter = Iter<'map, K, V>;

    fn into_iter(self) -> Iter<'map, K, V> {
        self.iter()
    }
}

impl<'map, K: Ord, V> IntoIterator for &'map mut BstMap<K, V> {
    type Item = (&'map K, &'map mut V);
    type IntoIter = IterMut<'map, K, V>;

    fn into_iter(self) -> IterMut<'map, K, V> {
        self.iter_mut()
    }
}
