use bytes_regex::prelude::*;
use bytes_regex::random::{generate_random_description, generate_random_word};

/// Compiles the rendered expression with an off-the-shelf engine, anchored on both sides and
/// matching raw bytes.
fn engine(regex: &Regex) -> regex::bytes::Regex {
    let pattern = format!("(?-u)^(?:{})$", regex.render());
    regex::bytes::Regex::new(&pattern)
        .unwrap_or_else(|e| panic!("rendered pattern {pattern} is not accepted: {e}"))
}

fn assert_equivalent(dfa: &Dfa, words: &[Vec<u8>]) {
    let regex = synthesize(dfa);
    if regex.is_empty() {
        assert!(words.iter().all(|w| !dfa.accepts(w)), "{dfa:?}");
        return;
    }
    let engine = engine(&regex);
    for word in words {
        assert_eq!(
            dfa.accepts(word),
            engine.is_match(word),
            "disagreement on {:?} for {} and\n{dfa:?}",
            word.iter().copied().map(display).collect::<Vec<_>>().show(),
            regex
        );
    }
}

#[test_log::test]
fn random_automata_are_equivalent_to_their_regex() {
    // includes symbols that need escaping, inside and outside of classes
    let symbols = b"\x00\n (-.ab]^|\xff";
    let mut word_symbols = symbols.to_vec();
    word_symbols.push(b'z');

    for round in 0..60 {
        let size = 1 + round % 5;
        let description = generate_random_description(size, symbols, 0.4, 0.2);
        let dfa = description.into_dfa().unwrap();
        let words: Vec<Vec<u8>> = (0..150)
            .map(|_| generate_random_word(&word_symbols, 0, 8))
            .collect();
        assert_equivalent(&dfa, &words);
    }
}

#[test]
fn dense_ranges() {
    // identifiers: a letter or underscore followed by letters, digits and underscores
    let dfa = DfaBuilder::new(0)
        .with_accepting([1])
        .with_transitions([
            (0, b'A' as u32, b'Z' as u32, 1),
            (0, b'_' as u32, b'_' as u32, 1),
            (0, b'a' as u32, b'z' as u32, 1),
            (1, b'0' as u32, b'9' as u32, 1),
            (1, b'A' as u32, b'Z' as u32, 1),
            (1, b'_' as u32, b'_' as u32, 1),
            (1, b'a' as u32, b'z' as u32, 1),
        ])
        .build()
        .unwrap();
    let regex = synthesize(&dfa);
    assert_eq!(regex.to_string(), "[A-Z_a-z][0-9A-Z_a-z]*");
    let words: Vec<Vec<u8>> = ["x", "_1", "abc_09", "9a", "", "a-b", "Zz"]
        .iter()
        .map(|w| w.as_bytes().to_vec())
        .collect();
    assert_equivalent(&dfa, &words);
}

#[test]
fn binary_signature() {
    // a magic number followed by any number of non-zero bytes and a terminating zero
    let dfa = DfaBuilder::new("magic0")
        .with_accepting(["end"])
        .with_transitions([
            ("magic0", 0x7f, 0x7f, "magic1"),
            ("magic1", b'E' as u32, b'E' as u32, "body"),
            ("body", 1, 255, "body"),
            ("body", 0, 0, "end"),
        ])
        .build()
        .unwrap();
    let regex = synthesize(&dfa);
    assert_eq!(regex.to_string(), "\\x7fE[\\x01-\\xff]*\\x00");
    let engine = engine(&regex);
    assert!(engine.is_match(b"\x7fE\x00"));
    assert!(engine.is_match(b"\x7fEabc\xff\x00"));
    assert!(!engine.is_match(b"\x7fEab"));
    assert!(!engine.is_match(b"\x7fE\x00\x00"));
}

#[test]
fn optional_parts() {
    // accepts "", "a" and "ab"
    let dfa = DfaBuilder::new(0)
        .with_accepting([0, 1, 2])
        .with_transitions([(0, 97, 97, 1), (1, 98, 98, 2)])
        .build()
        .unwrap();
    let regex = synthesize(&dfa);
    let engine = engine(&regex);
    for (word, expected) in [("", true), ("a", true), ("ab", true), ("b", false), ("abb", false)] {
        assert_eq!(engine.is_match(word.as_bytes()), expected, "{regex}");
        assert_eq!(dfa.accepts(word), expected);
    }
}
