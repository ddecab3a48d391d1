//! Membership lookup structures and first-occurrence deduplication
//!
//! This crate provides two interchangeable [`Finder`] implementations with
//! different lookup costs, a [`dedupe`] routine written purely against the
//! trait, and a harness that measures both on synthetic data.

pub mod error;
pub mod finder;
pub mod slice_finder;
pub mod map_finder;
pub mod dedup;
pub mod generate;
pub mod measure;

pub use dedup::{dedupe, dedupe_with_stats, DedupIter, DedupStats};
pub use error::{Error, Result};
pub use finder::{Finder, FinderKind};
pub use map_finder::MapFinder;
pub use slice_finder::SliceFinder;
