//! Synthetic inputs for the measurement harness
//!
//! Elements are decimal strings so that equality and hashing have real work
//! to do. The caller owns the random number generator; pass a seeded
//! `StdRng` for reproducible runs.

use crate::{Error, Result};
use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Tolerance used when deciding whether `n * rate` is a whole number
const WHOLE_EPSILON: f64 = 1e-9;

/// `n * rate` as an exact count, or `None` if it has a fractional part
pub fn whole_count(n: usize, rate: f64) -> Option<usize> {
    let exact = n as f64 * rate;
    let rounded = exact.round();
    if (exact - rounded).abs() < WHOLE_EPSILON {
        Some(rounded as usize)
    } else {
        None
    }
}

/// `n * rate` rounded down, treating values within rounding error of an
/// integer as that integer
pub fn floor_count(n: usize, rate: f64) -> usize {
    whole_count(n, rate).unwrap_or_else(|| (n as f64 * rate).floor() as usize)
}

fn check_rate(name: &str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, rate
        )))
    }
}

fn repeated(n: usize, str_len: usize) -> String {
    n.to_string().repeat(str_len)
}

/// Build an add set and a query set with a known hit rate.
///
/// The add set holds `num_elems` distinct strings, `i` repeated `str_len`
/// times. The query template copies it and swaps exactly
/// `num_elems * (1 - hit_rate)` random positions for strings absent from the
/// add set; the query set cycles that template up to `test_set_len`
/// entries. Both sets are shuffled. The observed hit rate equals `hit_rate`
/// exactly when `test_set_len` is a multiple of `num_elems`.
pub fn generate_elems<R: Rng>(
    num_elems: usize,
    test_set_len: usize,
    str_len: usize,
    hit_rate: f64,
    rng: &mut R,
) -> Result<(Vec<String>, Vec<String>)> {
    check_rate("hit_rate", hit_rate)?;
    if num_elems == 0 || test_set_len == 0 || str_len == 0 {
        return Err(Error::InvalidConfig(format!(
            "num_elems ({}), test_set_len ({}) and str_len ({}) must be positive",
            num_elems, test_set_len, str_len
        )));
    }

    let num_different =
        whole_count(num_elems, 1.0 - hit_rate).ok_or(Error::FractionalCount {
            num_elems,
            rate: 1.0 - hit_rate,
        })?;

    let mut add_set: Vec<String> = (0..num_elems).map(|i| repeated(i, str_len)).collect();

    let mut template = add_set.clone();
    for (i, pos) in index::sample(rng, num_elems, num_different)
        .into_iter()
        .enumerate()
    {
        template[pos] = repeated(i + num_elems, str_len);
    }

    let mut test_set: Vec<String> = template.iter().cycle().take(test_set_len).cloned().collect();

    add_set.shuffle(rng);
    test_set.shuffle(rng);

    Ok((add_set, test_set))
}

/// Build `num_elems` strings of which `floor(num_elems * dup_rate)` repeat
/// an earlier value.
///
/// Unique values are `0..num_unique` in decimal; each duplicate is drawn
/// uniformly from that range. The result is shuffled, so the output of a
/// correct dedupe has exactly `num_unique` elements.
pub fn generate_elems_with_dups<R: Rng>(
    num_elems: usize,
    dup_rate: f64,
    rng: &mut R,
) -> Result<Vec<String>> {
    check_rate("dup_rate", dup_rate)?;

    let num_dups = floor_count(num_elems, dup_rate);
    let num_unique = num_elems - num_dups;
    if num_unique == 0 {
        return Err(Error::UnsatisfiableDupRate {
            num_elems,
            dup_rate,
            num_unique,
        });
    }

    let mut elems: Vec<String> = (0..num_unique).map(|i| i.to_string()).collect();
    elems.extend((0..num_dups).map(|_| rng.gen_range(0..num_unique).to_string()));
    elems.shuffle(rng);

    Ok(elems)
}
