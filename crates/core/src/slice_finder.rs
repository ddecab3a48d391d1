//! Finder backed by an append-only vector
//!
//! `add` is an amortized O(1) push and `contains` scans from the front, so
//! membership costs O(n) in the number of stored entries. Cheap while the
//! finder stays small or when adds dominate.

use crate::finder::Finder;

/// Linear-scan finder
///
/// Adding a value that is already present stores it again; lookups are
/// unaffected but [`Finder::len`] grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceFinder<T> {
    elems: Vec<T>,
}

impl<T: PartialEq> SliceFinder<T> {
    /// Create a finder holding `seed`, in order
    pub fn new<I: IntoIterator<Item = T>>(seed: I) -> Self {
        Self {
            elems: seed.into_iter().collect(),
        }
    }

    /// Create an empty finder with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            elems: Vec::with_capacity(capacity),
        }
    }

    /// Stored entries, oldest first
    pub fn as_slice(&self) -> &[T] {
        &self.elems
    }
}

impl<T: PartialEq> Finder<T> for SliceFinder<T> {
    fn add(&mut self, elem: T) {
        self.elems.push(elem);
    }

    fn contains(&self, elem: &T) -> bool {
        self.elems.iter().any(|stored| stored == elem)
    }

    fn len(&self) -> usize {
        self.elems.len()
    }
}

impl<T> Default for SliceFinder<T> {
    fn default() -> Self {
        Self { elems: Vec::new() }
    }
}

impl<T: PartialEq> FromIterator<T> for SliceFinder<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<T: PartialEq> Extend<T> for SliceFinder<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.elems.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_contains() {
        let mut finder = SliceFinder::default();

        assert!(!finder.contains(&"hello"));
        finder.add("hello");
        assert!(finder.contains(&"hello"));
        assert!(!finder.contains(&"world"));
    }

    #[test]
    fn test_repeated_add_keeps_every_entry() {
        let mut finder = SliceFinder::new(["a", "b", "a"]);
        finder.add("a");

        assert_eq!(finder.len(), 4);
        assert_eq!(finder.as_slice(), &["a", "b", "a", "a"]);
        assert!(finder.contains(&"a"));
        assert!(finder.contains(&"b"));
    }

    #[test]
    fn test_collect_and_extend() {
        let mut finder: SliceFinder<u32> = (0..5).collect();
        finder.extend(10..12);

        assert_eq!(finder.len(), 7);
        assert!(finder.contains(&4));
        assert!(finder.contains(&11));
        assert!(!finder.contains(&5));
    }

    #[test]
    fn test_with_capacity_starts_empty() {
        let finder: SliceFinder<String> = SliceFinder::with_capacity(16);
        assert!(finder.is_empty());
    }
}
