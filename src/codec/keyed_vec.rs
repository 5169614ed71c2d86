//! Ordered key/value storage with list semantics.
//!
//! A flat binary (key, value) sequence has to survive a decode → mutate →
//! encode cycle with its original ordering intact, which a hash map cannot
//! guarantee.  [`KeyedVec`] therefore stores pairs in a plain vector and
//! layers key lookup on top:
//!
//!   - [`KeyedVec::get`] scans from the end, so the most-recently-appended
//!     pair wins even if duplicates were injected through positional calls.
//!   - [`KeyedVec::set`] replaces a matching slot in place and only appends
//!     for genuinely new keys, so assignment never reorders existing entries.
//!   - [`KeyedVec::push`] is the raw positional append; it can create
//!     duplicate keys.  Uniqueness during mutation is the caller's
//!     responsibility, [`DictCodec`](super::DictCodec) only enforces it at
//!     decode time.
//!
//! Lookup is a linear scan; these containers are schema-sized.

use std::fmt;

use super::CodecError;

/// An insertion-ordered sequence of (key, value) pairs with dict-like access.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedVec<K, V> {
    pub(crate) pairs: Vec<(K, V)>,
}

impl<K, V> Default for KeyedVec<K, V> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<K, V> KeyedVec<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing pair sequence.  Key uniqueness is NOT checked here;
    /// the decode-time check lives in the adapter.
    pub fn from_pairs(pairs: Vec<(K, V)>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair at a storage position.
    pub fn get_at(&self, index: usize) -> Option<(&K, &V)> {
        self.pairs.get(index).map(|(k, v)| (k, v))
    }

    /// Overwrite the pair at a storage position.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds, like vector indexing.
    pub fn set_at(&mut self, index: usize, key: K, value: V) {
        self.pairs[index] = (key, value);
    }

    /// Append a pair at the end.  Does not look at existing keys, so this
    /// can introduce duplicates.
    pub fn push(&mut self, key: K, value: V) {
        self.pairs.push((key, value));
    }

    /// Iterate pairs in storage order.  The iterator is lazy, finite, and
    /// restartable.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.pairs.iter().map(|(k, v)| (k, v))
    }
}

impl<K: PartialEq, V> KeyedVec<K, V> {
    /// Value for `key`, scanning from the end so the most recently appended
    /// match wins.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Like [`get`](Self::get) but a miss is a [`CodecError::KeyNotFound`],
    /// for lookup chains inside schema accessors.
    pub fn fetch(&self, key: &K) -> Result<&V, CodecError>
    where
        K: fmt::Display,
    {
        self.get(key)
            .ok_or_else(|| CodecError::KeyNotFound(key.to_string()))
    }

    /// Assign `value` to `key`.  The first slot holding `key` is replaced in
    /// place, keeping its position; if no slot matches, the pair is appended.
    pub fn set(&mut self, key: K, value: V) {
        match self.pairs.iter().position(|(k, _)| *k == key) {
            Some(index) => self.pairs[index] = (key, value),
            None => self.pairs.push((key, value)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for KeyedVec<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

impl<K, V> IntoIterator for KeyedVec<K, V> {
    type Item = (K, V);
    type IntoIter = std::vec::IntoIter<(K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a KeyedVec<K, V> {
    type Item = &'a (K, V);
    type IntoIter = std::slice::Iter<'a, (K, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
