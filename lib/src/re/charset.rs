//! Scratch bitmap used while compiling character classes, and expansion of
//! backslash escapes.

use bitvec::array::BitArray;
use bitvec::order::Lsb0;

use crate::charclass::CharClassify;
use crate::re::instr::BITBLK;

/// Returns the byte at position `i` in `pattern`, or 0 if `i` is past the
/// end of the pattern.
#[inline]
pub(crate) fn peek(pattern: &[u8], i: usize) -> u8 {
    pattern.get(i).copied().unwrap_or(0)
}

/// A set of bytes that is being built for a `CCL` instruction.
pub(crate) struct CharSet {
    bits: BitArray<[u8; BITBLK], Lsb0>,
}

impl Default for CharSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CharSet {
    pub fn new() -> Self {
        Self { bits: BitArray::new([0_u8; BITBLK]) }
    }

    #[inline]
    pub fn set(&mut self, c: u8) {
        self.bits.set(c as usize, true);
    }

    /// Adds `c` to the set and, when `case_sensitive` is false and `c` is an
    /// ASCII letter, adds the letter in the opposite case too.
    pub fn set_with_case(&mut self, c: u8, case_sensitive: bool) {
        self.set(c);
        if !case_sensitive {
            if c.is_ascii_lowercase() {
                self.set(c.to_ascii_uppercase());
            } else if c.is_ascii_uppercase() {
                self.set(c.to_ascii_lowercase());
            }
        }
    }

    /// Adds every byte in `range`.
    pub fn set_range(&mut self, range: std::ops::RangeInclusive<u8>) {
        self.bits[*range.start() as usize..=*range.end() as usize].fill(true);
    }

    #[inline]
    pub fn contains(&self, c: u8) -> bool {
        self.bits[c as usize]
    }

    pub fn clear(&mut self) {
        self.bits.fill(false);
    }

    /// Appends the set's 32 bytes to `code`, each one XORed with `mask`, and
    /// leaves the set empty.
    pub fn emit(&mut self, mask: u8, code: &mut Vec<u8>) {
        code.extend(self.bits.data.iter().map(|b| b ^ mask));
        self.clear();
    }
}

/// Result of expanding a backslash escape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expansion {
    /// The escape stands for a single byte.
    Char(u8),
    /// The escape stands for a class, which has been added to the
    /// [`CharSet`] passed to [`expand_backslash`].
    Class,
}

/// Expands the escape whose first character (the one right after the
/// backslash) is at `pattern[i]`.
///
/// Returns the expansion and the number of pattern bytes consumed in
/// addition to `pattern[i]`. A backslash at the end of the pattern stands for
/// itself, and so does any character without a special meaning.
pub(crate) fn expand_backslash(
    pattern: &[u8],
    i: usize,
    set: &mut CharSet,
    classifier: &CharClassify,
) -> (Expansion, usize) {
    let c = match pattern.get(i) {
        Some(c) => *c,
        None => return (Expansion::Char(b'\\'), 0),
    };

    match c {
        b'a' => (Expansion::Char(0x07), 0),
        b'b' => (Expansion::Char(0x08), 0),
        b'f' => (Expansion::Char(0x0c), 0),
        b'n' => (Expansion::Char(b'\n'), 0),
        b'r' => (Expansion::Char(b'\r'), 0),
        b't' => (Expansion::Char(b'\t'), 0),
        b'v' => (Expansion::Char(0x0b), 0),
        b'e' => (Expansion::Char(0x1b), 0),
        b'x' => {
            let hi = hex_digit(peek(pattern, i + 1));
            let lo = hex_digit(peek(pattern, i + 2));
            match (hi, lo) {
                (Some(hi), Some(lo)) => (Expansion::Char(hi << 4 | lo), 2),
                _ => (Expansion::Char(b'x'), 0),
            }
        }
        b'd' => {
            set.set_range(b'0'..=b'9');
            (Expansion::Class, 0)
        }
        b'D' => {
            for b in (0..=u8::MAX).filter(|b| !b.is_ascii_digit()) {
                set.set(b);
            }
            (Expansion::Class, 0)
        }
        b's' => {
            for b in [b' ', b'\t', b'\n', b'\r', 0x0c, 0x0b] {
                set.set(b);
            }
            (Expansion::Class, 0)
        }
        b'S' => {
            for b in (0..=u8::MAX).filter(|b| *b != b' ' && !(0x09..=0x0d).contains(b)) {
                set.set(b);
            }
            (Expansion::Class, 0)
        }
        b'w' => {
            for b in (0..=u8::MAX).filter(|b| classifier.is_word(*b)) {
                set.set(b);
            }
            (Expansion::Class, 0)
        }
        b'W' => {
            for b in (0..=u8::MAX).filter(|b| !classifier.is_word(*b)) {
                set.set(b);
            }
            (Expansion::Class, 0)
        }
        c => (Expansion::Char(c), 0),
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}
