use tracing::trace;

use crate::{automaton::RangeEntry, description::DfaDescription, math};

/// Generates a random description of a DFA with `size` states, named `0..size` with `0` being
/// the initial state. Transitions only use bytes from `symbols`, which must not contain duplicates.
///
/// The algorithm is as follows:
/// 1. For each state, `symbols` are cut into consecutive blocks, a new block starts
///    with probability `split`.
/// 2. Each block is turned into range entries leading to a uniformly drawn target, or is left
///    out with probability `sparsity`, in which case it leads into the dead state.
/// 3. Each state that occurs in some entry is accepting with probability `1/2`.
///
/// The initial state always gets at least one entry, so the description can always be built.
pub fn generate_random_description(
    size: usize,
    symbols: &[u8],
    split: f64,
    sparsity: f64,
) -> DfaDescription<usize> {
    assert!(size > 0, "a DFA needs at least one state");
    assert!(!symbols.is_empty(), "need at least one symbol");

    let mut transition_table = vec![];
    for q in 0..size {
        let mut blocks: Vec<Vec<u8>> = vec![vec![symbols[0]]];
        for &sym in &symbols[1..] {
            if fastrand::f64() < split {
                blocks.push(vec![sym]);
            } else if let Some(block) = blocks.last_mut() {
                block.push(sym);
            }
        }

        let before = transition_table.len();
        for block in blocks {
            if fastrand::f64() < sparsity {
                continue;
            }
            let target = fastrand::usize(..size);
            transition_table.extend(
                math::byte_runs(block)
                    .into_iter()
                    .map(|(lo, hi)| RangeEntry::new(q, lo as u32, hi as u32, target)),
            );
        }
        if q == 0 && transition_table.len() == before {
            let sym = symbols[fastrand::usize(..symbols.len())] as u32;
            transition_table.push(RangeEntry::new(0, sym, sym, fastrand::usize(..size)));
        }
    }

    let mentioned: math::Set<usize> = transition_table
        .iter()
        .flat_map(|e| [e.curr_state, e.next_state])
        .collect();
    let mut match_states: Vec<usize> = (0..size)
        .filter(|q| mentioned.contains(q) && fastrand::bool())
        .collect();
    match_states.sort_unstable();

    trace!(
        "generated random description with {size} states, {} entries and {} accepting states",
        transition_table.len(),
        match_states.len()
    );

    DfaDescription {
        start_state: 0,
        match_states,
        transition_table,
    }
}

/// Generates a random word over `symbols`, the length is drawn uniformly from `min_len..=max_len`.
pub fn generate_random_word(symbols: &[u8], min_len: usize, max_len: usize) -> Vec<u8> {
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .map(|_| symbols[fastrand::usize(..symbols.len())])
        .collect()
}

/// Generates a set of `number` distinct random words over `symbols`, each with a length drawn
/// uniformly from `min_len..=max_len`. The caller has to make sure that enough distinct words exist.
pub fn generate_random_words(
    symbols: &[u8],
    min_len: usize,
    max_len: usize,
    number: usize,
) -> math::Set<Vec<u8>> {
    let mut word_set = math::Set::with_capacity_and_hasher(number, Default::default());

    while word_set.len() < number {
        word_set.insert(generate_random_word(symbols, min_len, max_len));
    }

    word_set
}
