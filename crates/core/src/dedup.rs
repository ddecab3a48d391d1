//! First-occurrence deduplication driven through a [`Finder`]
//!
//! The finder is borrowed mutably and left holding every value it has seen,
//! so several calls sharing one finder deduplicate a stream incrementally.

use crate::finder::Finder;
use serde::Serialize;

/// Statistics for a deduplication pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Total number of elements consumed
    pub total_seen: usize,
    /// Number of elements dropped because the finder already held them
    pub duplicates_found: usize,
    /// Number of elements emitted
    pub unique_count: usize,
}

impl DedupStats {
    /// Get the deduplication rate as a percentage
    pub fn dedup_rate(&self) -> f64 {
        if self.total_seen == 0 {
            0.0
        } else {
            (self.duplicates_found as f64 / self.total_seen as f64) * 100.0
        }
    }
}

/// Iterator adapter yielding only elements the finder has not seen.
///
/// Each yielded element is added to the finder before it is returned.
pub struct DedupIter<'f, I, F: ?Sized> {
    inner: I,
    finder: &'f mut F,
    stats: DedupStats,
}

impl<'f, I, F: ?Sized> DedupIter<'f, I, F> {
    pub fn new(inner: I, finder: &'f mut F) -> Self {
        Self {
            inner,
            finder,
            stats: DedupStats::default(),
        }
    }

    /// Counts for the elements consumed so far
    pub fn stats(&self) -> DedupStats {
        self.stats
    }
}

impl<'f, T, I, F> Iterator for DedupIter<'f, I, F>
where
    T: Clone,
    I: Iterator<Item = T>,
    F: Finder<T> + ?Sized,
{
    type Item = T;

    fn next(&mut self) -> Option<T> {
        for elem in self.inner.by_ref() {
            self.stats.total_seen += 1;

            if self.finder.contains(&elem) {
                self.stats.duplicates_found += 1;
                continue;
            }

            self.finder.add(elem.clone());
            self.stats.unique_count += 1;
            return Some(elem);
        }

        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

/// Return the first occurrence of every element of `input` not already in
/// `finder`, in input order.
///
/// `finder` may be pre-seeded; seeded values are dropped wherever they
/// appear. On return it also holds every distinct value of `input`.
pub fn dedupe<T, I, F>(input: I, finder: &mut F) -> Vec<T>
where
    T: Clone,
    I: IntoIterator<Item = T>,
    F: Finder<T> + ?Sized,
{
    DedupIter::new(input.into_iter(), finder).collect()
}

/// Like [`dedupe`], also returning counts for the pass
pub fn dedupe_with_stats<T, I, F>(input: I, finder: &mut F) -> (Vec<T>, DedupStats)
where
    T: Clone,
    I: IntoIterator<Item = T>,
    F: Finder<T> + ?Sized,
{
    let mut iter = DedupIter::new(input.into_iter(), finder);
    let output: Vec<T> = iter.by_ref().collect();
    (output, iter.stats())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::FinderKind;
    use crate::map_finder::MapFinder;
    use crate::slice_finder::SliceFinder;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    #[test]
    fn test_preserves_first_occurrence_order() {
        for kind in FinderKind::ALL {
            let mut finder = kind.build(Vec::<&str>::new());
            let out = dedupe(["a", "b", "a", "c", "b"], &mut finder);
            assert_eq!(out, vec!["a", "b", "c"], "{}", kind);
        }
    }

    #[test]
    fn test_seeded_values_are_dropped() {
        for kind in FinderKind::ALL {
            let mut finder = kind.build(["a"]);
            let out = dedupe(["a", "b", "c"], &mut finder);
            assert_eq!(out, vec!["b", "c"], "{}", kind);
        }
    }

    #[test]
    fn test_empty_input() {
        let mut finder = MapFinder::<String>::default();
        let out = dedupe(Vec::<String>::new(), &mut finder);
        assert!(out.is_empty());
        assert!(finder.is_empty());
    }

    #[test]
    fn test_finder_is_updated() {
        let mut finder = SliceFinder::default();
        dedupe(vec![3, 1, 3, 2], &mut finder);

        for elem in [1, 2, 3] {
            assert!(finder.contains(&elem));
        }
        assert!(!finder.contains(&4));
    }

    #[test]
    fn test_incremental_across_calls() {
        let mut finder = MapFinder::new(Vec::new());

        let first = dedupe(vec![1, 2, 2, 3], &mut finder);
        let second = dedupe(vec![3, 4, 1, 5, 4], &mut finder);

        assert_eq!(first, vec![1, 2, 3]);
        assert_eq!(second, vec![4, 5]);
    }

    #[test]
    fn test_dedupe_of_output_is_unchanged() {
        let input = vec!["x", "y", "x", "z", "y", "w"];
        let once = dedupe(input, &mut MapFinder::new(Vec::new()));
        let twice = dedupe(once.clone(), &mut SliceFinder::new(Vec::new()));
        assert_eq!(once, twice);
    }

    #[test]
    fn test_uniqueness_and_cardinality_on_random_inputs() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let len = rng.gen_range(0..300);
            let input: Vec<u8> = (0..len).map(|_| rng.gen_range(0..64)).collect();
            let seed: Vec<u8> = (0..rng.gen_range(0..8)).map(|_| rng.gen_range(0..64)).collect();

            let expected: HashSet<u8> = input
                .iter()
                .copied()
                .filter(|e| !seed.contains(e))
                .collect();

            for kind in FinderKind::ALL {
                let mut finder = kind.build(seed.clone());
                let out = dedupe(input.clone(), &mut finder);

                let distinct: HashSet<u8> = out.iter().copied().collect();
                assert_eq!(distinct.len(), out.len(), "duplicate in output of {}", kind);
                assert_eq!(distinct, expected, "{}", kind);
            }
        }
    }

    #[test]
    fn test_variants_produce_identical_output() {
        let mut rng = StdRng::seed_from_u64(7);
        let input: Vec<String> = (0..1000)
            .map(|_| rng.gen_range(0..250).to_string())
            .collect();

        let from_slice = dedupe(input.clone(), &mut SliceFinder::default());
        let from_map = dedupe(input, &mut MapFinder::new(Vec::new()));
        assert_eq!(from_slice, from_map);
    }

    #[test]
    fn test_stats() {
        let mut finder = MapFinder::new([0]);
        let (out, stats) = dedupe_with_stats(vec![0, 1, 1, 2, 1], &mut finder);

        assert_eq!(out, vec![1, 2]);
        assert_eq!(
            stats,
            DedupStats {
                total_seen: 5,
                duplicates_found: 3,
                unique_count: 2,
            }
        );
        assert!((stats.dedup_rate() - 60.0).abs() < 1e-9);
        assert_eq!(DedupStats::default().dedup_rate(), 0.0);
    }

    #[test]
    fn test_iterator_is_lazy() {
        let mut finder = SliceFinder::default();
        let mut iter = DedupIter::new(vec![5, 5, 6, 7].into_iter(), &mut finder);

        assert_eq!(iter.next(), Some(5));
        assert_eq!(iter.next(), Some(6));
        assert_eq!(iter.stats().total_seen, 3);

        drop(iter);
        assert!(finder.contains(&6));
        assert!(!finder.contains(&7));
    }
}
