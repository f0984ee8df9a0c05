use std::{fmt::Debug, io::Read, path::Path};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::automaton::{BuildError, Dfa, DfaBuilder, RangeEntry};

/// Errors that can occur while loading a [`DfaDescription`] and turning it into a [`Dfa`].
#[derive(Debug, Error)]
pub enum DescriptionError {
    /// The description could not be read.
    #[error("could not read DFA description: {0}")]
    Io(#[from] std::io::Error),
    /// The description is not well-formed JSON or does not have the expected layout.
    #[error("malformed DFA description: {0}")]
    Json(#[from] serde_json::Error),
    /// The description is well-formed but does not describe a valid automaton.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// A sparse description of a DFA, as it is exported by external tools. It consists of an
/// initial state, a collection of accepting states and a list of byte range transitions.
///
/// # Example
/// ```
/// use bytes_regex::description::DfaDescription;
///
/// let json = r#"{
///     "start_state": 1,
///     "match_states": [2],
///     "transition_table": [
///         { "curr_state": 1, "range_start": 97, "range_end": 122, "next_state": 2 }
///     ]
/// }"#;
/// let dfa = DfaDescription::<usize>::from_json_str(json).unwrap().into_dfa().unwrap();
/// assert!(dfa.accepts("q"));
/// assert_eq!(dfa.to_regex().to_string(), "[a-z]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaDescription<Q = usize> {
    /// The initial state.
    pub start_state: Q,
    /// All accepting states.
    pub match_states: Vec<Q>,
    /// The transitions, each sending a range of bytes from one state to another.
    pub transition_table: Vec<RangeEntry<Q>>,
}

impl<Q: DeserializeOwned> DfaDescription<Q> {
    /// Parses a description from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a description from a reader that yields JSON.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }

    /// Reads and parses the JSON file at `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DescriptionError> {
        debug!("reading DFA description from {}", path.as_ref().display());
        Self::from_reader(std::fs::File::open(path)?)
    }
}

impl<Q: Clone + Ord + Debug> DfaDescription<Q> {
    /// Completes the description into a [`Dfa`].
    pub fn into_dfa(self) -> Result<Dfa<Q>, BuildError> {
        DfaBuilder::new(self.start_state)
            .with_accepting(self.match_states)
            .with_entries(self.transition_table)
            .build()
    }
}

impl<Q: Clone + Ord + Debug> TryFrom<DfaDescription<Q>> for Dfa<Q> {
    type Error = BuildError;

    fn try_from(value: DfaDescription<Q>) -> Result<Self, Self::Error> {
        value.into_dfa()
    }
}
