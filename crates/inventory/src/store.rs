//! Insertion-ordered arena used for both parts and products.

use std::collections::HashMap;
use std::hash::Hash;

use stockroom_core::{DomainError, DomainResult};
use stockroom_parts::PartKey;
use stockroom_products::ProductKey;

/// Handle type an [`OrderedStore`] hands out.
pub trait ArenaKey: Copy + Eq + Hash + core::fmt::Debug {
    fn from_raw(raw: u64) -> Self;
}

impl ArenaKey for PartKey {
    fn from_raw(raw: u64) -> Self {
        PartKey::from_raw(raw)
    }
}

impl ArenaKey for ProductKey {
    fn from_raw(raw: u64) -> Self {
        ProductKey::from_raw(raw)
    }
}

/// Map from key to value plus the explicit iteration order.
///
/// Keys are allocated on insert and never reused, so a removed key can't come
/// back pointing at a different value.
#[derive(Debug, Clone)]
pub struct OrderedStore<K, V> {
    values: HashMap<K, V>,
    order: Vec<K>,
    next_raw: u64,
}

impl<K, V> OrderedStore<K, V> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            order: Vec::new(),
            next_raw: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> &[K] {
        &self.order
    }
}

impl<K, V> Default for OrderedStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ArenaKey, V> OrderedStore<K, V> {
    /// Append a value at the end and return its new key.
    pub fn push(&mut self, value: V) -> K {
        let key = K::from_raw(self.next_raw);
        self.next_raw += 1;
        self.values.insert(key, value);
        self.order.push(key);
        key
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.values.get(&key)
    }

    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.values.get_mut(&key)
    }

    /// Position of `key` in iteration order.
    pub fn position(&self, key: K) -> Option<usize> {
        self.order.iter().position(|k| *k == key)
    }

    /// Key stored at a position in iteration order.
    pub fn key_at(&self, index: usize) -> Option<K> {
        self.order.get(index).copied()
    }

    /// Replace the value behind `key`, keeping its key and position.
    ///
    /// Returns the previous value, or `None` (and drops `value`) if the key is absent.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        let slot = self.values.get_mut(&key)?;
        Some(core::mem::replace(slot, value))
    }

    /// Replace the value at a position in iteration order.
    pub fn replace_at(&mut self, index: usize, value: V) -> DomainResult<K> {
        let key = self
            .key_at(index)
            .ok_or_else(|| DomainError::out_of_bounds(index, self.order.len()))?;
        match self.values.get_mut(&key) {
            Some(slot) => {
                *slot = value;
                Ok(key)
            }
            None => Err(DomainError::invariant(format!(
                "ordered key {key:?} has no stored value"
            ))),
        }
    }

    pub fn remove(&mut self, key: K) -> Option<V> {
        let value = self.values.remove(&key)?;
        self.order.retain(|k| *k != key);
        Some(value)
    }

    /// Values with their keys, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.values.get(key).map(|value| (*key, value)))
    }
}
