/*!
This module defines the instructions executed by the matcher, along with the
types that help decoding and displaying them.

Instruction encoding format
---------------------------

Each instruction is an opcode byte, followed by zero or more operands. Most
instructions have fixed size:

```text
  END                     terminates the NFA or the body of a closure
  CHR  <byte>             matches a literal byte
  ANY                     matches any byte
  CCL  <32 bytes>         matches a byte in a 256-bit class bitmap
  BOL, EOL                line start and line end anchors
  BOT  <tag>, EOT <tag>   start and end of a tagged group
  BOW, EOW                word start and word end anchors (\< and \>)
  REF  <tag>              backreference to a tagged group
  MWS, MWE                word start and word end as seen by the host (\h \H)
  MTWE, MTWEO             extend to the end of the current word (\i and \i?)
```

Closures (`CLO`, `CLQ` and `LCLO`) are followed by the atom they repeat,
which is always `ANY`, `CHR` or `CCL`, and an `END` that delimits the
closure's body. For instance, `fo*` is compiled as:

```text
  CHR 'f'  CLO  CHR 'o'  END  END
           ^^^^^^^^^^^^^^^^^
                closure
```

The number of bytes that the matcher skips after the closure opcode for
reaching the rest of the pattern is given by [`ANYSKIP`], [`CHRSKIP`] and
[`CCLSKIP`].
*/

use std::fmt::{Display, Formatter};

use bitvec::order::Lsb0;
use bitvec::slice::{BitSlice, IterOnes};

/// Number of bytes in a class bitmap.
pub const BITBLK: usize = 32;

/// Bytes skipped after a closure opcode for `[CLO] ANY END`.
pub const ANYSKIP: usize = 2;

/// Bytes skipped after a closure opcode for `[CLO] CHR chr END`.
pub const CHRSKIP: usize = 3;

/// Bytes skipped after a closure opcode for `[CLO] CCL bitmap END`.
pub const CCLSKIP: usize = 2 + BITBLK;

/// Instructions supported by the matcher.
#[derive(Debug, Clone, Copy)]
pub enum Instr<'a> {
    /// End of the NFA, or end of a closure's body.
    End,

    /// Matches a specific byte.
    Chr(u8),

    /// Matches any byte.
    Any,

    /// Matches a byte class represented by a 256-bit bitmap. If the N-th
    /// bit is set, the byte N is part of the class.
    Ccl(ClassBitmap<'a>),

    /// Matches the start of the line.
    Bol,

    /// Matches the end of the line.
    Eol,

    /// Start of the tagged group with the given number.
    Bot(u8),

    /// End of the tagged group with the given number.
    Eot(u8),

    /// Matches at a position where the previous character is not a word
    /// character and the next one is. This is a zero-length match.
    Bow,

    /// Matches at a position where the previous character is a word
    /// character and the next one is not. This is a zero-length match.
    Eow,

    /// Matches the text captured by the tagged group with the given number.
    Ref(u8),

    /// Greedy zero or more closure.
    Clo,

    /// Zero or one closure.
    Clq,

    /// Lazy zero or more closure.
    Lclo,

    /// Matches where the host says a word starts.
    WordStart,

    /// Matches where the host says a word ends.
    WordEnd,

    /// Consumes everything up to the end of the current word.
    ToWordEnd,

    /// Like [`Instr::ToWordEnd`], but matches also when already at the end
    /// of the word.
    ToWordEndOpt,

    /// Some byte that is not a valid opcode, or an opcode whose operands are
    /// truncated.
    Unknown(u8),
}

impl<'a> Instr<'a> {
    pub const END: u8 = 0;
    pub const CHR: u8 = 1;
    pub const ANY: u8 = 2;
    pub const CCL: u8 = 3;
    pub const BOL: u8 = 4;
    pub const EOL: u8 = 5;
    pub const BOT: u8 = 6;
    pub const EOT: u8 = 7;
    pub const BOW: u8 = 8;
    pub const EOW: u8 = 9;
    pub const REF: u8 = 10;
    pub const CLO: u8 = 11;
    pub const CLQ: u8 = 12;
    pub const LCLO: u8 = 13;
    pub const MWS: u8 = 14;
    pub const MWE: u8 = 15;
    pub const MTWE: u8 = 16;
    pub const MTWEO: u8 = 17;
}

/// Parses a slice of bytes that contains NFA instructions, returning
/// individual instructions and their addresses.
pub(crate) struct InstrParser<'a> {
    code: &'a [u8],
    addr: usize,
}

impl<'a> InstrParser<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        Self { code, addr: 0 }
    }

    /// Decodes the instruction at the start of `code`, returning the
    /// instruction and its size in bytes. An empty slice decodes as
    /// [`Instr::End`].
    #[inline(always)]
    pub fn decode_instr(code: &[u8]) -> (Instr, usize) {
        match code {
            [] => (Instr::End, 0),
            [Instr::END, ..] => (Instr::End, 1),
            [Instr::CHR, c, ..] => (Instr::Chr(*c), 2),
            [Instr::ANY, ..] => (Instr::Any, 1),
            [Instr::CCL, bitmap @ ..] if bitmap.len() >= BITBLK => (
                Instr::Ccl(ClassBitmap(&bitmap[..BITBLK])),
                1 + BITBLK,
            ),
            [Instr::BOL, ..] => (Instr::Bol, 1),
            [Instr::EOL, ..] => (Instr::Eol, 1),
            [Instr::BOT, n, ..] => (Instr::Bot(*n), 2),
            [Instr::EOT, n, ..] => (Instr::Eot(*n), 2),
            [Instr::BOW, ..] => (Instr::Bow, 1),
            [Instr::EOW, ..] => (Instr::Eow, 1),
            [Instr::REF, n, ..] => (Instr::Ref(*n), 2),
            [Instr::CLO, ..] => (Instr::Clo, 1),
            [Instr::CLQ, ..] => (Instr::Clq, 1),
            [Instr::LCLO, ..] => (Instr::Lclo, 1),
            [Instr::MWS, ..] => (Instr::WordStart, 1),
            [Instr::MWE, ..] => (Instr::WordEnd, 1),
            [Instr::MTWE, ..] => (Instr::ToWordEnd, 1),
            [Instr::MTWEO, ..] => (Instr::ToWordEndOpt, 1),
            [op, ..] => (Instr::Unknown(*op), 1),
        }
    }
}

impl<'a> Iterator for InstrParser<'a> {
    type Item = (Instr<'a>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.code.is_empty() {
            return None;
        }
        let (instr, size) = InstrParser::decode_instr(self.code);
        let addr = self.addr;
        self.addr += size;
        self.code = &self.code[size..];
        Some((instr, addr))
    }
}

/// A 256-bit class bitmap inside the NFA.
#[derive(Debug, Clone, Copy)]
pub struct ClassBitmap<'a>(&'a [u8]);

impl<'a> ClassBitmap<'a> {
    /// Returns an iterator over the bytes contained in the class.
    pub fn bytes(&self) -> IterOnes<'a, u8, Lsb0> {
        BitSlice::<_, Lsb0>::from_slice(self.0).iter_ones()
    }

    /// Returns true if the class contains the given byte.
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        BitSlice::<_, Lsb0>::from_slice(self.0)[byte as usize]
    }

    /// Returns the ranges of consecutive bytes contained in the class, both
    /// ends inclusive.
    pub fn ranges(&self) -> Vec<(u8, u8)> {
        let mut ranges: Vec<(u8, u8)> = Vec::new();
        for byte in self.bytes() {
            let byte = byte as u8;
            match ranges.last_mut() {
                Some((_, end)) if *end as usize + 1 == byte as usize => {
                    *end = byte
                }
                _ => ranges.push((byte, byte)),
            }
        }
        ranges
    }
}

/// A compiled regular expression.
///
/// This is the NFA produced by the compiler: a flat sequence of opcodes and
/// operands that always ends with an `END` opcode. Its [`Display`]
/// implementation disassembles the code, one instruction per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    code: Vec<u8>,
}

impl Default for Nfa {
    /// Returns an NFA that never matches, which consists in a single `END`.
    fn default() -> Self {
        Self { code: vec![Instr::END] }
    }
}

impl AsRef<[u8]> for Nfa {
    fn as_ref(&self) -> &[u8] {
        self.code.as_slice()
    }
}

impl From<Vec<u8>> for Nfa {
    fn from(code: Vec<u8>) -> Self {
        Self { code }
    }
}

impl Nfa {
    /// Size of the NFA in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Returns true if the NFA doesn't contain any code.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Returns the NFA's code.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.code.as_slice()
    }
}

impl Display for Nfa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;

        for (instr, addr) in InstrParser::new(self.code.as_slice()) {
            match instr {
                Instr::End => writeln!(f, "{:05x}: END", addr)?,
                Instr::Chr(c) if c.is_ascii_graphic() || c == b' ' => {
                    writeln!(f, "{:05x}: CHR {:#04x} '{}'", addr, c, c as char)?
                }
                Instr::Chr(c) => writeln!(f, "{:05x}: CHR {:#04x}", addr, c)?,
                Instr::Any => writeln!(f, "{:05x}: ANY", addr)?,
                Instr::Ccl(class) => {
                    write!(f, "{:05x}: CCL", addr)?;
                    for (start, end) in class.ranges() {
                        if start == end {
                            write!(f, " {:#04x}", start)?;
                        } else {
                            write!(f, " {:#04x}-{:#04x}", start, end)?;
                        }
                    }
                    writeln!(f)?;
                }
                Instr::Bol => writeln!(f, "{:05x}: BOL", addr)?,
                Instr::Eol => writeln!(f, "{:05x}: EOL", addr)?,
                Instr::Bot(n) => writeln!(f, "{:05x}: BOT {}", addr, n)?,
                Instr::Eot(n) => writeln!(f, "{:05x}: EOT {}", addr, n)?,
                Instr::Bow => writeln!(f, "{:05x}: BOW", addr)?,
                Instr::Eow => writeln!(f, "{:05x}: EOW", addr)?,
                Instr::Ref(n) => writeln!(f, "{:05x}: REF {}", addr, n)?,
                Instr::Clo => writeln!(f, "{:05x}: CLO", addr)?,
                Instr::Clq => writeln!(f, "{:05x}: CLQ", addr)?,
                Instr::Lclo => writeln!(f, "{:05x}: LCLO", addr)?,
                Instr::WordStart => writeln!(f, "{:05x}: MWS", addr)?,
                Instr::WordEnd => writeln!(f, "{:05x}: MWE", addr)?,
                Instr::ToWordEnd => writeln!(f, "{:05x}: MTWE", addr)?,
                Instr::ToWordEndOpt => writeln!(f, "{:05x}: MTWEO", addr)?,
                Instr::Unknown(op) => {
                    writeln!(f, "{:05x}: UNKNOWN {:#04x}", addr, op)?
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{ClassBitmap, Instr, InstrParser, Nfa, BITBLK};

    #[test]
    fn class_bitmap() {
        let mut bitmap = [0_u8; BITBLK];
        // 'a', 'b', 'c' and 'x'.
        bitmap[0x61 >> 3] |= 0b0000_1110;
        bitmap[0x78 >> 3] |= 0b0000_0001;

        let class = ClassBitmap(&bitmap);

        assert!(class.contains(b'a'));
        assert!(class.contains(b'c'));
        assert!(class.contains(b'x'));
        assert!(!class.contains(b'`'));
        assert!(!class.contains(b'd'));
        assert_eq!(class.bytes().collect::<Vec<_>>(), vec![0x61, 0x62, 0x63, 0x78]);
        assert_eq!(class.ranges(), vec![(b'a', b'c'), (b'x', b'x')]);
    }

    #[test]
    fn truncated_operands() {
        let (instr, size) = InstrParser::decode_instr(&[Instr::CHR]);
        assert!(matches!(instr, Instr::Unknown(Instr::CHR)));
        assert_eq!(size, 1);

        let (instr, size) = InstrParser::decode_instr(&[Instr::CCL, 0, 0]);
        assert!(matches!(instr, Instr::Unknown(Instr::CCL)));
        assert_eq!(size, 1);

        let (instr, size) = InstrParser::decode_instr(&[0xFF]);
        assert!(matches!(instr, Instr::Unknown(0xFF)));
        assert_eq!(size, 1);
    }

    #[test]
    fn disassemble() {
        let nfa = Nfa::from(vec![
            Instr::BOL,
            Instr::CHR,
            b'a',
            Instr::CLO,
            Instr::ANY,
            Instr::END,
            Instr::REF,
            1,
            Instr::CHR,
            b'\t',
            Instr::END,
        ]);

        assert_eq!(
            nfa.to_string(),
            r#"
00000: BOL
00001: CHR 0x61 'a'
00003: CLO
00004: ANY
00005: END
00006: REF 1
00008: CHR 0x09
0000a: END
"#
        );
    }
}
