mod dfa;
pub use dfa::{Dfa, StateIndex};

/// Completes a sparse, range based description into a [`Dfa`].
pub mod builder;
pub use builder::{build, BuildError, DfaBuilder, RangeEntry};
