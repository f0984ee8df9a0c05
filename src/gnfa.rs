use std::fmt::Debug;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::{
    alphabet::Symbol,
    automaton::{Dfa, StateIndex},
    regex::Regex,
};

/// A generalized nondeterministic finite automaton, whose edges are labeled with regular
/// expressions.
///
/// The states of the [`Dfa`] it was lifted from keep their indices, the fresh initial state
/// and the fresh accepting state are appended after them. Labels are stored in an adjacency
/// matrix, a missing edge is labeled with [`Regex::empty`]. The fresh initial state has no
/// incoming edges and the fresh accepting state has no outgoing edges, which is preserved by
/// [`Gnfa::eliminate`].
#[derive(Clone)]
pub struct Gnfa {
    labels: Vec<Vec<Regex>>,
    interior: Vec<StateIndex>,
    start: StateIndex,
    accept: StateIndex,
}

impl Gnfa {
    /// Lifts a complete [`Dfa`] into a generalized automaton. For every ordered pair of
    /// states `(p, q)`, the symbols on which `p` moves to `q` are merged into a single union
    /// of literals, in ascending byte order.
    pub fn from_dfa<Q: Ord>(dfa: &Dfa<Q>) -> Self {
        let n = dfa.size();
        let (start, accept) = (n, n + 1);
        let mut labels = vec![vec![Regex::empty(); n + 2]; n + 2];

        for p in dfa.state_indices() {
            let by_target = dfa
                .row(p)
                .iter()
                .enumerate()
                .map(|(byte, q)| (*q, Symbol::from_index(byte)))
                .into_group_map();
            for (q, symbols) in by_target {
                trace!("lifted edge {p} -> {q} with {} symbols", symbols.len());
                labels[p][q] = Regex::union_all(symbols.into_iter().map(Regex::literal));
            }
        }

        labels[start][dfa.start()] = Regex::epsilon();
        for q in dfa.accepting_states() {
            labels[q][accept] = Regex::epsilon();
        }

        Self {
            labels,
            interior: dfa.state_indices().collect(),
            start,
            accept,
        }
    }

    /// Returns the fresh initial state.
    pub fn start(&self) -> StateIndex {
        self.start
    }

    /// Returns the fresh accepting state.
    pub fn accept(&self) -> StateIndex {
        self.accept
    }

    /// Returns the number of states that remain, including the fresh initial and accepting state.
    pub fn size(&self) -> usize {
        self.interior.len() + 2
    }

    /// Returns the states other than the fresh initial and accepting state that have not been
    /// eliminated yet, in ascending order.
    pub fn interior(&self) -> &[StateIndex] {
        &self.interior
    }

    /// Returns the label of the edge from `p` to `q`, which is empty if there is no such edge.
    pub fn label(&self, p: StateIndex, q: StateIndex) -> &Regex {
        &self.labels[p][q]
    }

    /// Removes the interior state `r` and folds its behaviour into the edges between the
    /// remaining states: for all remaining `p` and `q` the label of `p -> q` becomes
    /// `L(p, q) | L(p, r) L(r, r)* L(r, q)`. Returns false if `r` is not an interior state.
    pub fn eliminate(&mut self, r: StateIndex) -> bool {
        let Some(position) = self.interior.iter().position(|q| *q == r) else {
            return false;
        };
        self.interior.remove(position);

        let loop_closure = self.labels[r][r].star();
        let sources = self.interior.iter().copied().chain([self.start]).collect_vec();
        let targets = self.interior.iter().copied().chain([self.accept]).collect_vec();

        for &p in &sources {
            if self.labels[p][r].is_empty() {
                continue;
            }
            let entering = self.labels[p][r].concat(&loop_closure);
            for &q in &targets {
                if self.labels[r][q].is_empty() {
                    continue;
                }
                let through = entering.concat(&self.labels[r][q]);
                self.labels[p][q] = self.labels[p][q].union(&through);
            }
        }

        for q in 0..self.labels.len() {
            self.labels[r][q] = Regex::empty();
            self.labels[q][r] = Regex::empty();
        }
        true
    }

    /// Eliminates all interior states in ascending order and returns the label of the only
    /// remaining edge, from the fresh initial to the fresh accepting state.
    pub fn into_regex(mut self) -> Regex {
        let mut round = 0;
        while let Some(&r) = self.interior.first() {
            round += 1;
            self.eliminate(r);
            debug!(
                "elimination round {round} removed state {r}, {} states remain",
                self.size()
            );
        }
        self.labels[self.start][self.accept].clone()
    }
}

impl Debug for Gnfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let states = self
            .interior
            .iter()
            .copied()
            .chain([self.start, self.accept])
            .collect_vec();
        writeln!(f, "GNFA with states {}", states.iter().join(", "))?;
        for &p in &states {
            for &q in &states {
                if !self.labels[p][q].is_empty() {
                    writeln!(f, "{p} -> {q}: {}", self.labels[p][q])?;
                }
            }
        }
        Ok(())
    }
}

/// Synthesizes a regular expression recognizing the language of `dfa` through state
/// elimination. The result is the empty language if and only if `dfa` accepts no word.
///
/// # Example
/// ```
/// use bytes_regex::prelude::*;
///
/// let dfa = DfaBuilder::new(0)
///     .with_accepting([1])
///     .with_range(0, 65, 65, 1)
///     .build()
///     .unwrap();
/// assert_eq!(synthesize(&dfa).to_string(), "A");
/// ```
pub fn synthesize<Q: Ord>(dfa: &Dfa<Q>) -> Regex {
    debug!(
        "synthesizing regular expression for DFA with {} states",
        dfa.size()
    );
    Gnfa::from_dfa(dfa).into_regex()
}
