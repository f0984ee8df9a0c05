use std::fmt::Debug;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    alphabet::ByteAlphabet,
    automaton::{Dfa, StateIndex},
    math::{Bijection, Set},
};

/// Errors that can occur when completing a sparse description into a [`Dfa`].
/// State identifiers are stored through their `Debug` representation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Two entries for the same source state send an overlapping byte to different targets.
    #[error("transitions from state {state} overlap on byte {byte:#04x}, leading to both {first} and {second}")]
    OverlappingRange {
        /// The source state of both entries.
        state: String,
        /// The smallest byte on which the entries conflict.
        byte: u8,
        /// Target of the earlier entry.
        first: String,
        /// Target of the later entry.
        second: String,
    },
    /// The initial state or an accepting state does not occur in the transition table.
    #[error("state {0} does not occur in the transition table")]
    UnknownState(String),
    /// A range has bounds outside of `[0, 255]` or its start exceeds its end.
    #[error("invalid byte range [{start}, {end}]")]
    InvalidRange {
        /// Lower bound as given.
        start: u32,
        /// Upper bound as given.
        end: u32,
    },
}

/// One record of a sparse transition table: every byte in `[range_start, range_end]` leads
/// from `curr_state` to `next_state`. Bounds are plain integers as they come from the input,
/// they are validated when the automaton is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RangeEntry<Q> {
    /// Source state.
    pub curr_state: Q,
    /// Smallest byte of the range.
    pub range_start: u32,
    /// Largest byte of the range, inclusive.
    pub range_end: u32,
    /// Target state.
    pub next_state: Q,
}

impl<Q> RangeEntry<Q> {
    /// Creates a new entry.
    pub fn new(curr_state: Q, range_start: u32, range_end: u32, next_state: Q) -> Self {
        Self {
            curr_state,
            range_start,
            range_end,
            next_state,
        }
    }

    fn validated_bounds(&self) -> Result<(usize, usize), BuildError> {
        let max = u8::MAX as u32;
        if self.range_start > self.range_end || self.range_end > max {
            return Err(BuildError::InvalidRange {
                start: self.range_start,
                end: self.range_end,
            });
        }
        Ok((self.range_start as usize, self.range_end as usize))
    }
}

impl<Q> From<(Q, u32, u32, Q)> for RangeEntry<Q> {
    fn from((curr_state, range_start, range_end, next_state): (Q, u32, u32, Q)) -> Self {
        Self::new(curr_state, range_start, range_end, next_state)
    }
}

/// Helper struct for the construction of a complete [`Dfa`] from a sparse list of range entries.
///
/// # Example
///
/// We want a DFA that accepts exactly the nonempty strings of digits. State `1` is initial, state
/// `2` is accepting and all bytes which are not mentioned lead into the dead state.
/// ```
/// use bytes_regex::prelude::*;
///
/// let dfa = DfaBuilder::new(1)
///     .with_accepting([2])
///     .with_range(1, b'0' as u32, b'9' as u32, 2)
///     .with_range(2, b'0' as u32, b'9' as u32, 2)
///     .build()
///     .unwrap();
/// assert_eq!(dfa.size(), 3);
/// assert!(dfa.accepts("42"));
/// ```
#[derive(Debug, Clone)]
pub struct DfaBuilder<Q> {
    start: Q,
    accepting: Vec<Q>,
    entries: Vec<RangeEntry<Q>>,
}

impl<Q: Clone + Ord + Debug> DfaBuilder<Q> {
    /// Creates a builder for an automaton with initial state `start`.
    pub fn new(start: Q) -> Self {
        Self {
            start,
            accepting: vec![],
            entries: vec![],
        }
    }

    /// Marks the given states as accepting.
    pub fn with_accepting<I: IntoIterator<Item = Q>>(mut self, states: I) -> Self {
        self.accepting.extend(states);
        self
    }

    /// Adds an entry that sends every byte in `[lo, hi]` from `from` to `to`.
    pub fn with_range(mut self, from: Q, lo: u32, hi: u32, to: Q) -> Self {
        self.entries.push(RangeEntry::new(from, lo, hi, to));
        self
    }

    /// Adds a sequence of entries, keeping their order.
    pub fn with_entries<I: IntoIterator<Item = RangeEntry<Q>>>(mut self, entries: I) -> Self {
        self.entries.extend(entries);
        self
    }

    /// Adds a sequence of transitions given as tuples `(from, lo, hi, to)`, keeping their order.
    pub fn with_transitions<I: IntoIterator<Item = (Q, u32, u32, Q)>>(self, transitions: I) -> Self {
        self.with_entries(transitions.into_iter().map(RangeEntry::from))
    }

    /// Completes the collected entries into a [`Dfa`]. Every byte that has no entry for some
    /// state leads into an additional dead state, which loops on every byte and is rejecting.
    ///
    /// Fails if a range is malformed, if two entries send the same byte from the same state to
    /// different targets, or if the initial state or an accepting state does not occur in any
    /// entry.
    pub fn build(self) -> Result<Dfa<Q>, BuildError> {
        let Self {
            start,
            accepting,
            entries,
        } = self;

        let mut names: Bijection<Q, StateIndex> = Bijection::new();
        let mut intern = |q: &Q| -> StateIndex {
            if let Some(idx) = names.get_by_left(q) {
                return *idx;
            }
            let idx = names.len();
            names.insert(q.clone(), idx);
            idx
        };

        let mut resolved = Vec::with_capacity(entries.len());
        for entry in &entries {
            let (lo, hi) = entry.validated_bounds()?;
            let from = intern(&entry.curr_state);
            let to = intern(&entry.next_state);
            resolved.push((from, lo, hi, to));
        }

        let dead = names.len();
        let size = dead + 1;
        let mut table: Vec<Option<StateIndex>> = vec![None; size * ByteAlphabet::SIZE];

        let show = |q: StateIndex| -> String {
            names
                .get_by_right(&q)
                .map(|name| format!("{name:?}"))
                .unwrap_or_else(|| "dead".to_string())
        };

        for (from, lo, hi, to) in resolved {
            trace!("recording {} --[{lo}, {hi}]--> {}", show(from), show(to));
            let row = &mut table[from * ByteAlphabet::SIZE..(from + 1) * ByteAlphabet::SIZE];
            for (byte, cell) in row.iter_mut().enumerate().take(hi + 1).skip(lo) {
                match cell {
                    Some(existing) if *existing != to => {
                        return Err(BuildError::OverlappingRange {
                            state: show(from),
                            byte: byte as u8,
                            first: show(*existing),
                            second: show(to),
                        });
                    }
                    _ => *cell = Some(to),
                }
            }
        }

        let lookup = |q: &Q| {
            names
                .get_by_left(q)
                .copied()
                .ok_or_else(|| BuildError::UnknownState(format!("{q:?}")))
        };
        let start = lookup(&start)?;
        let accepting = accepting
            .iter()
            .map(lookup)
            .collect::<Result<Set<_>, _>>()?;

        // undefined cells, including the whole row of the dead state, go to the dead state
        let table: Vec<StateIndex> = table.into_iter().map(|t| t.unwrap_or(dead)).collect();

        debug!(
            "built DFA with {size} states ({} accepting) from {} entries",
            accepting.len(),
            entries.len()
        );

        Ok(Dfa {
            names,
            table,
            start,
            accepting,
            dead,
        })
    }
}

/// Builds a complete [`Dfa`] from an initial state, a collection of accepting states and a
/// sequence of range entries. See [`DfaBuilder::build`] for the possible errors.
pub fn build<Q, A, I>(start: Q, accepting: A, entries: I) -> Result<Dfa<Q>, BuildError>
where
    Q: Clone + Ord + Debug,
    A: IntoIterator<Item = Q>,
    I: IntoIterator<Item = RangeEntry<Q>>,
{
    DfaBuilder::new(start)
        .with_accepting(accepting)
        .with_entries(entries)
        .build()
}
