use std::{fmt::Display, sync::Arc};

use bit_set::BitSet;
use itertools::Itertools;

use crate::{alphabet::Symbol, math::byte_runs, Show};

/// A regular expression over the byte alphabet, represented as a tree.
///
/// Values are immutable and cheap to clone, subtrees are shared. They are combined through
/// [`Regex::union`], [`Regex::concat`] and [`Regex::star`], which keep the tree in a normal form:
/// - [`RegexNode::Empty`] never occurs below another node,
/// - unions and concatenations are flat, have at least two children and unions contain no duplicates,
/// - concatenations contain no [`RegexNode::Epsilon`],
/// - the operand of a star is neither empty, epsilon, a star nor a union containing epsilon.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Regex(Arc<RegexNode>);

/// The different kinds of nodes a [`Regex`] can consist of.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RegexNode {
    /// The empty language.
    Empty,
    /// The language containing only the empty word.
    Epsilon,
    /// A single symbol.
    Literal(Symbol),
    /// Union of at least two alternatives.
    Union(Vec<Regex>),
    /// Concatenation of at least two factors.
    Concat(Vec<Regex>),
    /// Kleene closure.
    Star(Regex),
}

impl Regex {
    fn new(node: RegexNode) -> Self {
        Self(Arc::new(node))
    }

    /// The regular expression denoting the empty language.
    pub fn empty() -> Self {
        Self::new(RegexNode::Empty)
    }

    /// The regular expression denoting the language that only contains the empty word.
    pub fn epsilon() -> Self {
        Self::new(RegexNode::Epsilon)
    }

    /// The regular expression matching exactly the given symbol.
    pub fn literal<S: Into<Symbol>>(symbol: S) -> Self {
        Self::new(RegexNode::Literal(symbol.into()))
    }

    /// Gives access to the root node.
    pub fn node(&self) -> &RegexNode {
        &self.0
    }

    /// Returns true if `self` is the empty language.
    pub fn is_empty(&self) -> bool {
        matches!(self.node(), RegexNode::Empty)
    }

    /// Returns true if `self` is exactly epsilon.
    pub fn is_epsilon(&self) -> bool {
        matches!(self.node(), RegexNode::Epsilon)
    }

    /// Returns true if the empty word belongs to the language of `self`.
    pub fn is_nullable(&self) -> bool {
        match self.node() {
            RegexNode::Empty | RegexNode::Literal(_) => false,
            RegexNode::Epsilon | RegexNode::Star(_) => true,
            RegexNode::Union(alternatives) => alternatives.iter().any(Regex::is_nullable),
            RegexNode::Concat(factors) => factors.iter().all(Regex::is_nullable),
        }
    }

    fn alternatives(&self) -> &[Regex] {
        match self.node() {
            RegexNode::Union(alternatives) => alternatives,
            _ => std::slice::from_ref(self),
        }
    }

    fn factors(&self) -> &[Regex] {
        match self.node() {
            RegexNode::Concat(factors) => factors,
            _ => std::slice::from_ref(self),
        }
    }

    /// Computes the union of `self` and `other`. The empty language is the identity.
    pub fn union(&self, other: &Regex) -> Regex {
        Regex::union_all([self.clone(), other.clone()])
    }

    /// Computes the union of all given expressions, keeping the order of their first
    /// occurrence. An empty iterator yields the empty language.
    pub fn union_all<I: IntoIterator<Item = Regex>>(parts: I) -> Regex {
        let mut alternatives: Vec<Regex> = vec![];
        for part in parts {
            for alternative in part.alternatives() {
                if !alternative.is_empty() && !alternatives.contains(alternative) {
                    alternatives.push(alternative.clone());
                }
            }
        }
        // epsilon is subsumed by any star
        if alternatives
            .iter()
            .any(|r| matches!(r.node(), RegexNode::Star(_)))
        {
            alternatives.retain(|r| !r.is_epsilon());
        }
        match alternatives.len() {
            0 => Regex::empty(),
            1 => alternatives.pop().expect("length was checked"),
            _ => Regex::new(RegexNode::Union(alternatives)),
        }
    }

    /// Computes the concatenation of `self` followed by `other`. The empty language is
    /// absorbing and epsilon is the identity.
    pub fn concat(&self, other: &Regex) -> Regex {
        Regex::concat_all([self.clone(), other.clone()])
    }

    /// Concatenates all given expressions in order. An empty iterator yields epsilon.
    pub fn concat_all<I: IntoIterator<Item = Regex>>(parts: I) -> Regex {
        let mut factors: Vec<Regex> = vec![];
        for part in parts {
            if part.is_empty() {
                return Regex::empty();
            }
            factors.extend(part.factors().iter().filter(|f| !f.is_epsilon()).cloned());
        }
        match factors.len() {
            0 => Regex::epsilon(),
            1 => factors.pop().expect("length was checked"),
            _ => Regex::new(RegexNode::Concat(factors)),
        }
    }

    /// Computes the Kleene closure of `self`. The closure of the empty language is epsilon.
    pub fn star(&self) -> Regex {
        match self.node() {
            RegexNode::Empty | RegexNode::Epsilon => Regex::epsilon(),
            RegexNode::Star(_) => self.clone(),
            RegexNode::Union(alternatives) if alternatives.iter().any(Regex::is_epsilon) => {
                // (e|r)* = r*
                Regex::union_all(alternatives.iter().filter(|r| !r.is_epsilon()).cloned()).star()
            }
            _ => Regex::new(RegexNode::Star(self.clone())),
        }
    }

    /// Renders `self` as pattern text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, Precedence::Alternation);
        out
    }

    fn render_into(&self, out: &mut String, context: Precedence) {
        match self.node() {
            RegexNode::Empty => out.push_str(EMPTY_LANGUAGE),
            RegexNode::Epsilon => out.push_str("()"),
            RegexNode::Literal(sym) => push_literal(out, *sym),
            RegexNode::Star(inner) => {
                inner.render_into(out, Precedence::Atom);
                out.push('*');
            }
            RegexNode::Concat(factors) => {
                let wrap = context > Precedence::Concatenation;
                if wrap {
                    out.push('(');
                }
                for factor in factors {
                    factor.render_into(out, Precedence::Postfix);
                }
                if wrap {
                    out.push(')');
                }
            }
            RegexNode::Union(alternatives) => render_union(alternatives, out, context),
        }
    }
}

/// Never matches anything, not even the empty word.
pub const EMPTY_LANGUAGE: &str = "[^\\x00-\\xff]";

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Alternation,
    Concatenation,
    Postfix,
    Atom,
}

/// Renders a union. Alternatives that are single symbols are merged into one bracket class,
/// an epsilon alternative turns the rest into an optional.
fn render_union(alternatives: &[Regex], out: &mut String, context: Precedence) {
    let mut class = BitSet::with_capacity(256);
    let mut others: Vec<&Regex> = vec![];
    let mut optional = false;
    for alternative in alternatives {
        match alternative.node() {
            RegexNode::Literal(sym) => {
                class.insert(sym.index());
            }
            RegexNode::Epsilon => optional = true,
            _ => others.push(alternative),
        }
    }

    let branches = others.len() + usize::from(!class.is_empty());
    // an optional needs an atom as its operand
    let inner = if optional {
        Precedence::Atom
    } else {
        context
    };
    let group = branches > 1 && inner > Precedence::Alternation;
    let outer = optional && context > Precedence::Postfix;

    if outer {
        out.push('(');
    }
    if group {
        out.push('(');
    }
    let mut first = true;
    if !class.is_empty() {
        push_class(out, &class);
        first = false;
    }
    let operand = if branches > 1 {
        Precedence::Concatenation
    } else {
        inner
    };
    for other in others {
        if !first {
            out.push('|');
        }
        first = false;
        other.render_into(out, operand);
    }
    if group {
        out.push(')');
    }
    if optional {
        out.push('?');
    }
    if outer {
        out.push(')');
    }
}

const META: &[u8] = b"\\.+*?()|[]{}^$";
const CLASS_META: &[u8] = b"\\[]^-&~";

fn push_literal(out: &mut String, sym: Symbol) {
    if sym.is_printable() && META.contains(&sym.byte()) {
        out.push('\\');
    }
    out.push_str(&sym.show());
}

fn push_class_member(out: &mut String, byte: u8) {
    let sym = Symbol::from(byte);
    if sym.is_printable() && CLASS_META.contains(&byte) {
        out.push('\\');
    }
    out.push_str(&sym.show());
}

fn push_class_runs(out: &mut String, runs: &[(u8, u8)]) {
    for &(lo, hi) in runs {
        push_class_member(out, lo);
        if hi > lo {
            // two neighbouring bytes read better without a dash
            if hi - lo > 1 {
                out.push('-');
            }
            push_class_member(out, hi);
        }
    }
}

/// Pushes a set of bytes, a single byte is rendered as a literal. If the complement needs fewer
/// runs, a negated class is used.
fn push_class(out: &mut String, class: &BitSet) {
    if class.len() == 1 {
        let byte = class.iter().next().expect("class has one element") as u8;
        push_literal(out, Symbol::from(byte));
        return;
    }
    let runs = byte_runs(class.iter().map(|b| b as u8));
    let complement = byte_runs((0..=u8::MAX).filter(|b| !class.contains(*b as usize)));
    out.push('[');
    if !complement.is_empty() && complement.len() < runs.len() {
        out.push('^');
        push_class_runs(out, &complement);
    } else {
        push_class_runs(out, &runs);
    }
    out.push(']');
}

impl Display for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}

impl std::fmt::Debug for Regex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.node() {
            RegexNode::Empty => write!(f, "∅"),
            RegexNode::Epsilon => write!(f, "ε"),
            RegexNode::Literal(sym) => write!(f, "{sym:?}"),
            RegexNode::Union(alternatives) => {
                write!(f, "({:?})", alternatives.iter().format(" + "))
            }
            RegexNode::Concat(factors) => write!(f, "({:?})", factors.iter().format(" . ")),
            RegexNode::Star(inner) => write!(f, "{inner:?}*"),
        }
    }
}

impl Show for Regex {
    fn show(&self) -> String {
        self.render()
    }
}

impl From<Symbol> for Regex {
    fn from(value: Symbol) -> Self {
        Regex::literal(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Decides membership of `word` through Brzozowski derivatives. Only used to check
    /// synthesized expressions against the automaton they come from.
    pub fn matches(regex: &Regex, word: &[u8]) -> bool {
        word.iter()
            .fold(regex.clone(), |r, b| derivative(&r, *b))
            .is_nullable()
    }

    fn derivative(regex: &Regex, byte: u8) -> Regex {
        match regex.node() {
            RegexNode::Empty | RegexNode::Epsilon => Regex::empty(),
            RegexNode::Literal(sym) if sym.byte() == byte => Regex::epsilon(),
            RegexNode::Literal(_) => Regex::empty(),
            RegexNode::Union(alternatives) => {
                Regex::union_all(alternatives.iter().map(|r| derivative(r, byte)))
            }
            RegexNode::Concat(factors) => {
                let (head, tail) = factors.split_first().expect("concatenations are nonempty");
                let tail = Regex::concat_all(tail.iter().cloned());
                let left = derivative(head, byte).concat(&tail);
                if head.is_nullable() {
                    left.union(&derivative(&tail, byte))
                } else {
                    left
                }
            }
            RegexNode::Star(inner) => derivative(inner, byte).concat(regex),
        }
    }

    fn lit(c: char) -> Regex {
        Regex::literal(c as u8)
    }

    fn union_of(s: &str) -> Regex {
        Regex::union_all(s.bytes().map(Regex::literal))
    }

    #[test]
    fn algebraic_identities() {
        let a = lit('a');
        assert_eq!(a.union(&Regex::empty()), a);
        assert_eq!(Regex::empty().union(&a), a);
        assert_eq!(a.concat(&Regex::empty()), Regex::empty());
        assert_eq!(Regex::epsilon().concat(&a), a);
        assert_eq!(Regex::empty().star(), Regex::epsilon());
        assert_eq!(Regex::epsilon().star(), Regex::epsilon());
        assert_eq!(a.star().star(), a.star());
        assert_eq!(a.union(&a), a);
        assert_eq!(Regex::epsilon().union(&a).star(), a.star());
        assert_eq!(Regex::epsilon().union(&a.star()), a.star());
        assert_eq!(Regex::union_all([]), Regex::empty());
        assert_eq!(Regex::concat_all([]), Regex::epsilon());
    }

    #[test]
    fn unions_and_concatenations_are_flat() {
        let abc = lit('a').union(&lit('b')).union(&lit('c'));
        assert!(matches!(abc.node(), RegexNode::Union(alts) if alts.len() == 3));
        let word = lit('a').concat(&lit('b')).concat(&lit('c'));
        assert!(matches!(word.node(), RegexNode::Concat(fs) if fs.len() == 3));
    }

    #[test]
    fn rendering() {
        let a = lit('a');
        let b = lit('b');
        assert_eq!(Regex::empty().render(), EMPTY_LANGUAGE);
        assert_eq!(Regex::epsilon().render(), "()");
        assert_eq!(a.render(), "a");
        assert_eq!(Regex::literal(10u8).render(), "\\x0a");
        assert_eq!(lit('(').render(), "\\(");
        assert_eq!(a.concat(&b).render(), "ab");
        assert_eq!(a.concat(&b).star().render(), "(ab)*");
        assert_eq!(a.concat(&b).union(&b.concat(&a)).render(), "ab|ba");
        assert_eq!(
            a.concat(&b).union(&b.concat(&a)).concat(&a).render(),
            "(ab|ba)a"
        );
        assert_eq!(a.union(&b).render(), "[ab]");
        assert_eq!(a.union(&b).star().render(), "[ab]*");
        assert_eq!(a.union(&Regex::epsilon()).render(), "a?");
        assert_eq!(
            a.concat(&b).union(&Regex::epsilon()).concat(&a).render(),
            "(ab)?a"
        );
        assert_eq!(
            a.concat(&b).union(&Regex::epsilon()).render(),
            "(ab)?"
        );
        assert_eq!(
            a.union(&b).union(&a.concat(&b).star()).render(),
            "[ab]|(ab)*"
        );
    }

    #[test]
    fn class_rendering() {
        assert_eq!(union_of("abcdef").render(), "[a-f]");
        assert_eq!(union_of("abx").render(), "[abx]");
        assert_eq!(union_of("0123456789az").render(), "[0-9az]");
        assert_eq!(union_of("-]^").render(), "[\\-\\]\\^]");
        let all_but_newline = Regex::union_all(
            (0..=u8::MAX)
                .filter(|b| *b != b'\n')
                .map(Regex::literal),
        );
        assert_eq!(all_but_newline.render(), "[^\\x0a]");
        let everything = Regex::union_all((0..=u8::MAX).map(Regex::literal));
        assert_eq!(everything.render(), "[\\x00-\\xff]");
        let controls = Regex::union_all((0..32).map(Regex::literal));
        assert_eq!(controls.render(), "[\\x00-\\x1f]");
    }

    #[test]
    fn derivative_matching() {
        let r = lit('a').concat(&lit('b').star()).union(&lit('c'));
        assert!(matches(&r, b"a"));
        assert!(matches(&r, b"abbb"));
        assert!(matches(&r, b"c"));
        assert!(!matches(&r, b""));
        assert!(!matches(&r, b"ac"));
        assert!(!matches(&Regex::empty(), b""));
        assert!(matches(&Regex::epsilon(), b""));
    }

    #[test]
    fn rendered_text_is_accepted_by_regex_engine() {
        let a = lit('a');
        let dot = lit('.');
        let r = a
            .concat(&dot.union(&Regex::literal(0u8)).star())
            .union(&Regex::epsilon())
            .concat(&lit('|'));
        let pattern = format!("(?-u)^(?:{})$", r.render());
        let engine = ::regex::bytes::Regex::new(&pattern).unwrap();
        assert!(engine.is_match(b"|"));
        assert!(engine.is_match(b"a.\x00.|"));
        assert!(!engine.is_match(b"a.b|"));
        assert!(!engine.is_match(b"a"));
    }
}
