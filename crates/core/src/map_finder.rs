//! Finder backed by a hash set
//!
//! Membership is an expected O(1) hash lookup regardless of size, at the
//! price of hashing on every add and query. Elements are keys with a unit
//! value, so re-adding an existing element changes nothing.

use crate::finder::Finder;
use ahash::RandomState;
use std::collections::HashSet;
use std::hash::{BuildHasher, Hash};

/// Hashed finder
///
/// `T`'s `Hash` and `Eq` must agree: equal elements hash identically.
/// The hasher defaults to ahash and can be swapped with [`MapFinder::with_hasher`].
#[derive(Debug, Clone)]
pub struct MapFinder<T, S = RandomState> {
    set: HashSet<T, S>,
}

impl<T: Eq + Hash> MapFinder<T> {
    /// Create a finder holding the distinct values of `seed`
    pub fn new<I: IntoIterator<Item = T>>(seed: I) -> Self {
        seed.into_iter().collect()
    }

    /// Create an empty finder with room for `capacity` distinct elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            set: HashSet::with_capacity_and_hasher(capacity, RandomState::new()),
        }
    }
}

impl<T: Eq + Hash, S: BuildHasher> MapFinder<T, S> {
    /// Create an empty finder using `hasher` to hash elements
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            set: HashSet::with_hasher(hasher),
        }
    }

    /// Iterate over the distinct elements, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.set.iter()
    }
}

impl<T: Eq + Hash, S: BuildHasher> Finder<T> for MapFinder<T, S> {
    fn add(&mut self, elem: T) {
        self.set.insert(elem);
    }

    fn contains(&self, elem: &T) -> bool {
        self.set.contains(elem)
    }

    fn len(&self) -> usize {
        self.set.len()
    }
}

impl<T, S: Default> Default for MapFinder<T, S> {
    fn default() -> Self {
        Self {
            set: HashSet::default(),
        }
    }
}

impl<T: Eq + Hash, S: BuildHasher + Default> FromIterator<T> for MapFinder<T, S> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            set: iter.into_iter().collect(),
        }
    }
}

impl<T: Eq + Hash, S: BuildHasher> Extend<T> for MapFinder<T, S> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.set.extend(iter);
    }
}
