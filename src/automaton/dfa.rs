use std::fmt::{Debug, Display};

use itertools::Itertools;

use crate::{
    alphabet::{ByteAlphabet, Symbol},
    math::{Bijection, Set},
    regex::Regex,
    Show,
};

/// States of a [`Dfa`] are identified by their position in the transition table.
pub type StateIndex = usize;

/// A complete deterministic finite automaton over the [`ByteAlphabet`].
///
/// The transition function is stored as a flat table with one row of 256 entries per state, so
/// every state has exactly one successor for every byte. States that were declared in the input
/// carry a name of type `Q`, the implicit dead state has no name, it is never accepting and it
/// loops on every symbol. Input states are indexed in the order of their first occurrence in the
/// transition table and the dead state always has the largest index.
///
/// A `Dfa` is created through [`crate::automaton::DfaBuilder`] and is read-only afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct Dfa<Q: Ord = usize> {
    pub(crate) names: Bijection<Q, StateIndex>,
    pub(crate) table: Vec<StateIndex>,
    pub(crate) start: StateIndex,
    pub(crate) accepting: Set<StateIndex>,
    pub(crate) dead: StateIndex,
}

impl<Q: Ord> Dfa<Q> {
    /// Returns the number of states, including the dead state.
    pub fn size(&self) -> usize {
        self.table.len() / ByteAlphabet::SIZE
    }

    /// Returns the alphabet of the automaton.
    pub fn alphabet(&self) -> ByteAlphabet {
        ByteAlphabet
    }

    /// Returns the index of the initial state.
    pub fn start(&self) -> StateIndex {
        self.start
    }

    /// Returns the index of the dead state.
    pub fn dead(&self) -> StateIndex {
        self.dead
    }

    /// Returns an iterator over the indices of all states in ascending order.
    pub fn state_indices(&self) -> std::ops::Range<StateIndex> {
        0..self.size()
    }

    /// Gives the name that the state with index `q` carried in the input, `None` for the dead
    /// state and for indices that do not exist.
    pub fn name(&self, q: StateIndex) -> Option<&Q> {
        self.names.get_by_right(&q)
    }

    /// Looks up the index of the state with the given name.
    pub fn index_of(&self, name: &Q) -> Option<StateIndex> {
        self.names.get_by_left(name).copied()
    }

    /// Returns true if and only if `q` is an accepting state.
    pub fn is_accepting(&self, q: StateIndex) -> bool {
        self.accepting.contains(&q)
    }

    /// Returns the indices of all accepting states in ascending order.
    pub fn accepting_states(&self) -> Vec<StateIndex> {
        self.accepting.iter().copied().sorted().collect()
    }

    /// Returns the state that is reached from `q` on `symbol`.
    ///
    /// # Panics
    /// Panics if `q` is not a state of the automaton.
    pub fn successor(&self, q: StateIndex, symbol: Symbol) -> StateIndex {
        assert!(q < self.size(), "state {q} does not exist");
        self.table[q * ByteAlphabet::SIZE + symbol.index()]
    }

    /// Returns the row of the transition table that belongs to `q`, indexed by byte value.
    pub fn row(&self, q: StateIndex) -> &[StateIndex] {
        &self.table[q * ByteAlphabet::SIZE..(q + 1) * ByteAlphabet::SIZE]
    }

    /// Runs the automaton on `word` starting in `from` and returns the reached state.
    pub fn run(&self, from: StateIndex, word: &[u8]) -> StateIndex {
        word.iter()
            .fold(from, |q, b| self.successor(q, Symbol::from(*b)))
    }

    /// Returns true if and only if the run on `word` from the initial state ends in an
    /// accepting state.
    pub fn accepts<W: AsRef<[u8]>>(&self, word: W) -> bool {
        self.is_accepting(self.run(self.start, word.as_ref()))
    }

    /// Compresses the row of `q` into maximal runs of consecutive bytes that lead to the
    /// same target, given as `(lo, hi, target)`.
    pub fn ranges(&self, q: StateIndex) -> Vec<(u8, u8, StateIndex)> {
        let row = self.row(q);
        row.iter()
            .enumerate()
            .group_by(|(_, target)| **target)
            .into_iter()
            .map(|(target, mut chunk)| {
                let (lo, _) = chunk.next().expect("chunks are never empty");
                let hi = chunk.last().map(|(b, _)| b).unwrap_or(lo);
                (lo as u8, hi as u8, target)
            })
            .collect()
    }

    /// Returns the symbols on which `q` moves into `target`, in ascending order.
    pub fn symbols_between(&self, q: StateIndex, target: StateIndex) -> Vec<Symbol> {
        self.row(q)
            .iter()
            .enumerate()
            .filter(|(_, p)| **p == target)
            .map(|(b, _)| Symbol::from_index(b))
            .collect()
    }

    /// Synthesizes a regular expression that recognizes the language of `self`.
    pub fn to_regex(&self) -> Regex {
        crate::gnfa::synthesize(self)
    }
}

impl<Q: Ord + Debug> Dfa<Q> {
    fn state_label(&self, q: StateIndex) -> String {
        match self.name(q) {
            Some(name) => format!("{name:?}"),
            None => "dead".to_string(),
        }
    }

    /// Returns a string representation of the transition table, in which the outgoing
    /// transitions of each state are grouped into byte ranges.
    pub fn build_transition_table(&self) -> String {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["State", "Bytes", "Target"].map(String::from));
        for q in self.state_indices() {
            let mut decorated = self.state_label(q);
            if q == self.start {
                decorated = format!("-> {decorated}");
            }
            if self.is_accepting(q) {
                decorated = format!("{decorated} *");
            }
            let (bytes, targets): (Vec<_>, Vec<_>) = self
                .ranges(q)
                .into_iter()
                .map(|(lo, hi, target)| {
                    let range = if lo == hi {
                        Symbol::from(lo).show()
                    } else {
                        format!("{}-{}", Symbol::from(lo), Symbol::from(hi))
                    };
                    (range, self.state_label(target))
                })
                .unzip();
            builder.push_record([decorated, bytes.join("\n"), targets.join("\n")]);
        }

        builder
            .build()
            .with(tabled::settings::Style::rounded())
            .to_string()
    }
}

impl<Q: Ord + Debug> Display for Dfa<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.build_transition_table())
    }
}

impl<Q: Ord + Debug> Debug for Dfa<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "DFA with {} states, initial {}, accepting {}",
            self.size(),
            self.state_label(self.start),
            self.accepting_states()
                .into_iter()
                .map(|q| self.state_label(q))
                .join(", ")
        )?;
        write!(f, "{}", self.build_transition_table())
    }
}
