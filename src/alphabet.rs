use std::fmt::{Debug, Display};

use crate::Show;

/// A single symbol of the [`ByteAlphabet`], i.e. one byte value.
///
/// Each symbol has a canonical display form, which is the literal character if the byte lies in
/// the printable ASCII range `[32, 126]` and the escape `\xNN` (two lowercase hexadecimal digits)
/// otherwise. As every printable character renders as exactly one character and every escape
/// has length four, no two bytes share a display form.
///
/// # Example
/// ```
/// use bytes_regex::alphabet::display;
/// assert_eq!(display(65).to_string(), "A");
/// assert_eq!(display(10).to_string(), "\\x0a");
/// ```
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Symbol(u8);

/// Returns the [`Symbol`] for the given byte value. This function is total and pure.
pub fn display(byte: u8) -> Symbol {
    Symbol(byte)
}

impl Symbol {
    /// Creates a symbol from an integer that is known to lie in `[0, 255]`.
    ///
    /// # Panics
    /// Panics if `index` is larger than 255, as this violates the contract of the caller.
    pub fn from_index(index: usize) -> Self {
        assert!(
            index <= u8::MAX as usize,
            "byte value {index} is out of range"
        );
        Symbol(index as u8)
    }

    /// Returns the byte value of this symbol.
    pub fn byte(&self) -> u8 {
        self.0
    }

    /// Returns the position of the symbol in the [`ByteAlphabet`], which coincides with
    /// its byte value.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns true if the symbol is displayed as a literal character.
    pub fn is_printable(&self) -> bool {
        (32..=126).contains(&self.0)
    }

    /// Parses the canonical display form of a symbol back. Returns `None` for strings
    /// that are not the display form of any byte.
    pub fn parse(input: &str) -> Option<Self> {
        let bytes = input.as_bytes();
        match bytes {
            [b] if (32..=126).contains(b) => Some(Symbol(*b)),
            [b'\\', b'x', hi, lo] => {
                let is_lower_hex = |c: &u8| c.is_ascii_digit() || (b'a'..=b'f').contains(c);
                if !is_lower_hex(hi) || !is_lower_hex(lo) {
                    return None;
                }
                let sym = Symbol(u8::from_str_radix(&input[2..], 16).ok()?);
                (!sym.is_printable()).then_some(sym)
            }
            _ => None,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_printable() {
            write!(f, "{}", self.0 as char)
        } else {
            write!(f, "\\x{:02x}", self.0)
        }
    }
}

impl Debug for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "'{self}'")
    }
}

impl Show for Symbol {
    fn show(&self) -> String {
        self.to_string()
    }
}

impl From<u8> for Symbol {
    fn from(value: u8) -> Self {
        Symbol(value)
    }
}

/// The fixed alphabet of all 256 byte values over which every automaton in this crate operates.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub struct ByteAlphabet;

impl ByteAlphabet {
    /// The number of symbols in the alphabet.
    pub const SIZE: usize = 256;

    /// Returns an iterator over all symbols in ascending byte order.
    pub fn universe(&self) -> impl Iterator<Item = Symbol> + Clone {
        (0..=u8::MAX).map(Symbol)
    }

    /// Returns the number of symbols, which is always [`Self::SIZE`].
    pub fn size(&self) -> usize {
        Self::SIZE
    }
}
