/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa. We use it to associate the identifiers
/// that states carry in an input description with their index in a [`crate::automaton::Dfa`].
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// Splits a sorted sequence of bytes into maximal runs of consecutive values, each given
/// as an inclusive `(lo, hi)` pair.
///
/// ```
/// use bytes_regex::math::byte_runs;
/// assert_eq!(byte_runs([1, 2, 3, 7, 9, 10]), vec![(1, 3), (7, 7), (9, 10)]);
/// ```
pub fn byte_runs<I: IntoIterator<Item = u8>>(bytes: I) -> Vec<(u8, u8)> {
    let mut runs: Vec<(u8, u8)> = Vec::new();
    for b in bytes {
        match runs.last_mut() {
            Some((_, hi)) if hi.checked_add(1) == Some(b) => *hi = b,
            _ => runs.push((b, b)),
        }
    }
    runs
}
