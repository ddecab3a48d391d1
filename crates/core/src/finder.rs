//! The "has this value been seen before" contract
//!
//! Two implementations live next to this module: [`SliceFinder`] scans an
//! append-only vector and [`MapFinder`] looks elements up in a hash set.
//! Callers that pick the variant at runtime go through [`FinderKind`].

use crate::map_finder::MapFinder;
use crate::slice_finder::SliceFinder;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Membership test over previously added elements.
///
/// After any sequence of `add` calls, `contains(x)` is true iff `x` was
/// added at least once (or was part of the seed the finder was built with).
/// Nothing is ever removed.
pub trait Finder<T> {
    /// Record `elem` as seen.
    fn add(&mut self, elem: T);

    /// Whether `elem` has been added before. Does not mutate.
    fn contains(&self, elem: &T) -> bool;

    /// Number of stored entries.
    ///
    /// For [`SliceFinder`] this counts repeated adds of the same value;
    /// for [`MapFinder`] it is the number of distinct elements.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, F: Finder<T> + ?Sized> Finder<T> for Box<F> {
    fn add(&mut self, elem: T) {
        (**self).add(elem)
    }

    fn contains(&self, elem: &T) -> bool {
        (**self).contains(elem)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}

/// Runtime selector for a finder implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinderKind {
    /// Linear scan over an ordered sequence
    Slice,
    /// Hashed lookup
    Map,
}

impl FinderKind {
    /// Every variant, in the order reports list them
    pub const ALL: [FinderKind; 2] = [FinderKind::Slice, FinderKind::Map];

    pub fn name(&self) -> &'static str {
        match self {
            FinderKind::Slice => "slice_finder",
            FinderKind::Map => "map_finder",
        }
    }

    /// Construct the selected variant, seeded with `seed`
    pub fn build<T, I>(&self, seed: I) -> Box<dyn Finder<T>>
    where
        T: Eq + Hash + 'static,
        I: IntoIterator<Item = T>,
    {
        match self {
            FinderKind::Slice => Box::new(SliceFinder::new(seed)),
            FinderKind::Map => Box::new(MapFinder::new(seed)),
        }
    }
}

impl fmt::Display for FinderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FinderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "slice" | "slice_finder" => Ok(FinderKind::Slice),
            "map" | "map_finder" => Ok(FinderKind::Map),
            _ => Err(Error::UnknownFinder(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_seeded_membership() {
        for kind in FinderKind::ALL {
            let finder = kind.build(words(&["a", "b", "a"]));

            assert!(finder.contains(&"a".to_string()), "{}", kind);
            assert!(finder.contains(&"b".to_string()), "{}", kind);
            assert!(!finder.contains(&"c".to_string()), "{}", kind);
            assert!(!finder.contains(&String::new()), "{}", kind);
        }
    }

    #[test]
    fn test_empty_finder() {
        for kind in FinderKind::ALL {
            let finder = kind.build(Vec::<String>::new());
            assert!(finder.is_empty());
            assert!(!finder.contains(&"a".to_string()));
        }
    }

    #[test]
    fn test_add_is_idempotent_for_contains() {
        for kind in FinderKind::ALL {
            let mut once = kind.build(Vec::<u32>::new());
            let mut twice = kind.build(Vec::<u32>::new());

            once.add(7);
            twice.add(7);
            twice.add(7);

            for probe in 0..10 {
                assert_eq!(once.contains(&probe), twice.contains(&probe), "{}", kind);
            }
        }
    }

    #[test]
    fn test_variants_agree_on_random_workloads() {
        let mut rng = StdRng::seed_from_u64(0x5eed);

        for _ in 0..50 {
            let mut slice = FinderKind::Slice.build(Vec::<u16>::new());
            let mut map = FinderKind::Map.build(Vec::<u16>::new());

            let adds = rng.gen_range(0..200);
            for _ in 0..adds {
                let elem = rng.gen_range(0..256);
                slice.add(elem);
                map.add(elem);
            }

            for _ in 0..300 {
                let probe = rng.gen_range(0..512);
                assert_eq!(slice.contains(&probe), map.contains(&probe));
            }
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("slice".parse::<FinderKind>().unwrap(), FinderKind::Slice);
        assert_eq!("Map_Finder".parse::<FinderKind>().unwrap(), FinderKind::Map);
        assert_eq!(
            "tree".parse::<FinderKind>(),
            Err(Error::UnknownFinder("tree".to_string()))
        );
    }

    #[test]
    fn test_kind_display_matches_name() {
        assert_eq!(FinderKind::Slice.to_string(), "slice_finder");
        assert_eq!(FinderKind::Map.to_string(), "map_finder");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&FinderKind::ALL).unwrap();
        assert_eq!(json, r#"["slice","map"]"#);

        let parsed: Vec<FinderKind> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, FinderKind::ALL.to_vec());
    }
}
