//! Library for turning deterministic finite automata over bytes into regular expressions.
//!
//! The input is a sparse description of a DFA: an initial state, a collection of accepting states
//! and a list of transitions, each of which sends a whole range of byte values from one state to
//! another. Processing happens in three steps, each of which lives in its own module.
//!
//! - [`alphabet`] defines the fixed alphabet of all 256 byte values and the canonical display
//!   form of each [`alphabet::Symbol`]: printable ASCII characters stand for themselves, all other
//!   bytes are written as `\xNN`.
//! - [`automaton`] completes the sparse description into an [`automaton::Dfa`]. The transition
//!   function is stored as a table with one entry per state and byte, all bytes that are not
//!   covered by some range lead into an implicit dead state. Malformed ranges, conflicting
//!   entries and unknown states are reported as [`automaton::BuildError`].
//! - [`gnfa`] lifts the DFA into a generalized automaton whose edges are labeled with
//!   [`regex::Regex`] fragments and eliminates states one by one until a single edge from a
//!   fresh initial to a fresh accepting state remains. Its label recognizes the language of
//!   the DFA and is rendered to pattern text through [`regex::Regex::render`].
//!
//! The [`description`] module contains the serializable form of the input, which can be read
//! from JSON.
//!
//! ```
//! use bytes_regex::prelude::*;
//!
//! let dfa = DfaBuilder::new("start")
//!     .with_accepting(["end"])
//!     .with_range("start", b'a' as u32, b'z' as u32, "end")
//!     .with_range("end", b'0' as u32, b'9' as u32, "end")
//!     .build()
//!     .unwrap();
//! assert_eq!(synthesize(&dfa).to_string(), "[a-z][0-9]*");
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use bytes_regex::prelude::*;` should be enough to use the package.
pub mod prelude {
    pub use super::{
        alphabet::{display, ByteAlphabet, Symbol},
        automaton::{build, BuildError, Dfa, DfaBuilder, RangeEntry, StateIndex},
        description::{DescriptionError, DfaDescription},
        gnfa::{synthesize, Gnfa},
        regex::{Regex, RegexNode},
        Show,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the crate and
/// do not really fit to the top level.
pub mod math;

/// Module that contains definitions for dealing with the byte alphabet and its symbols.
pub mod alphabet;

/// Defines the complete deterministic automaton and its construction from byte ranges.
pub mod automaton;

/// Regular expressions as trees, together with their rendering to text.
pub mod regex;

/// Generalized automata and the state elimination procedure.
pub mod gnfa;

/// The serializable description of an automaton, as it is produced by external tools.
pub mod description;

/// Implements the generation of random automata descriptions and words.
#[cfg(feature = "random")]
pub mod random;

/// Helper trait which can be used to display states, symbols and such.
pub trait Show {
    /// Returns a human readable representation of `self`, for a state index that should be
    /// for example q0, q1, q2, ... and for a symbol its canonical display form.
    /// Just use something that makes sense. This is mainly used for debugging purposes.
    fn show(&self) -> String;
}

impl Show for usize {
    fn show(&self) -> String {
        format!("q{self}")
    }
}

impl<S: Show> Show for [S] {
    fn show(&self) -> String {
        itertools::Itertools::join(&mut self.iter().map(|x| x.show()), "")
    }
}

impl<S: Show> Show for &S {
    fn show(&self) -> String {
        S::show(*self)
    }
}
