use bytes_regex::prelude::*;
use bytes_regex::random::generate_random_description;

fn random_dfa(size: usize) -> Dfa {
    generate_random_description(size, b"\tAZaz~", 0.5, 0.3)
        .into_dfa()
        .unwrap()
}

#[test]
fn built_automata_are_total() {
    for size in 1..8 {
        let dfa = random_dfa(size);
        for q in dfa.state_indices() {
            for b in 0..=u8::MAX {
                assert!(dfa.successor(q, display(b)) < dfa.size());
            }
        }
        assert!(ByteAlphabet
            .universe()
            .all(|sym| dfa.successor(dfa.dead(), sym) == dfa.dead()));
        assert!(!dfa.is_accepting(dfa.dead()));
    }
}

#[test]
fn synthesis_is_deterministic() {
    for size in 1..6 {
        let dfa = random_dfa(size);
        let reference = synthesize(&dfa).render();
        assert_eq!(synthesize(&dfa).render(), reference);
        assert_eq!(dfa.clone().to_regex().render(), reference);
    }
}

#[test]
fn one_elimination_round_per_state() {
    for size in 1..6 {
        let dfa = random_dfa(size);
        let mut gnfa = Gnfa::from_dfa(&dfa);
        let mut rounds = 0;
        while let Some(&r) = gnfa.interior().first() {
            gnfa.eliminate(r);
            rounds += 1;
        }
        assert_eq!(rounds, dfa.size());
        assert_eq!(gnfa.size(), 2);
        assert_eq!(gnfa.label(gnfa.start(), gnfa.accept()), &synthesize(&dfa));
    }
}

#[test]
fn empty_language() {
    // the only accepting state is unreachable
    let dfa = build(
        0,
        [2],
        [RangeEntry::new(0, 0, 255, 1), RangeEntry::new(2, 0, 255, 0)],
    )
    .unwrap();
    let regex = synthesize(&dfa);
    assert!(regex.is_empty());
    assert_eq!(regex.render(), bytes_regex::regex::EMPTY_LANGUAGE);
}

#[test]
fn single_symbol() {
    let dfa = build(0, [1], [RangeEntry::new(0, 65, 65, 1)]).unwrap();
    let regex = synthesize(&dfa);
    assert_eq!(regex.render(), "A");
    let engine = regex::bytes::Regex::new(&format!("(?-u)^(?:{regex})$")).unwrap();
    assert!(engine.is_match(b"A"));
    for word in ["", "AA", "B", "a"] {
        assert!(!engine.is_match(word.as_bytes()));
    }
}

#[test]
fn escapes() {
    assert_eq!(display(10).to_string(), "\\x0a");
    assert_eq!(display(65).to_string(), "A");
    let dfa = build(0, [1], [RangeEntry::new(0, 10, 10, 1)]).unwrap();
    assert_eq!(synthesize(&dfa).render(), "\\x0a");
}

#[test]
fn overlap_rejection() {
    let result = build(
        0,
        [1],
        [RangeEntry::new(0, 10, 20, 1), RangeEntry::new(0, 15, 25, 2)],
    );
    assert!(matches!(
        result,
        Err(BuildError::OverlappingRange { byte: 15, .. })
    ));
}
