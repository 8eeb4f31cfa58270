/*!
This module provides the compiler that translates a pattern into the NFA
executed by the matcher.

The compiler makes a single left-to-right pass over the pattern, emitting
code as it goes. The only construct that looks backwards is the quantifier
(`*`, `+` and `?`), which rewrites the code emitted for the previous atom,
inserting a closure opcode in front of it.
*/

use log::{debug, trace};

use crate::charclass::CharClassify;
use crate::re::charset::{expand_backslash, peek, CharSet, Expansion};
use crate::re::instr::{Instr, Nfa, BITBLK};
use crate::re::{Error, MAXNFA, MAXTAG};

/// The compiler stops with [`Error::TooLong`] when the code exceeds this
/// size before processing a pattern character. This leaves room for the
/// largest amount of code that a single character can produce (a class
/// wrapped in a closure).
const MAX_CODE_LEN: usize = MAXNFA - BITBLK - 10;

/// Compiles a pattern into an [`Nfa`].
///
/// A compiler is used for compiling a single pattern, as the state it keeps
/// (tag counters, class scratch, etc.) is only valid during the compilation
/// of a pattern.
pub(crate) struct Compiler<'a> {
    classifier: &'a CharClassify,

    /// When false, word characters are matched in both cases.
    case_sensitive: bool,

    /// When true, groups are written as `(...)` instead of `\(...\)`.
    posix: bool,

    code: Vec<u8>,

    /// Scratch bitmap for the class being compiled.
    set: CharSet,

    /// Numbers of the groups that are currently open.
    tag_stack: Vec<u8>,

    /// Number that will be assigned to the next group.
    next_tag: u8,

    /// Location of the code emitted for the previous pattern element, or
    /// `None` if nothing has been emitted yet.
    prev: Option<usize>,
}

impl<'a> Compiler<'a> {
    pub fn new(classifier: &'a CharClassify) -> Self {
        Self {
            classifier,
            case_sensitive: true,
            posix: false,
            code: Vec::with_capacity(64),
            set: CharSet::new(),
            tag_stack: Vec::with_capacity(MAXTAG),
            next_tag: 1,
            prev: None,
        }
    }

    /// Specifies whether literal characters are case-sensitive.
    pub fn case_sensitive(mut self, yes: bool) -> Self {
        self.case_sensitive = yes;
        self
    }

    /// Specifies whether groups use the POSIX syntax.
    pub fn posix(mut self, yes: bool) -> Self {
        self.posix = yes;
        self
    }

    pub fn compile(mut self, pattern: &[u8]) -> Result<Nfa, Error> {
        if pattern.is_empty() {
            return Err(Error::NoPreviousRegexp);
        }

        let mut i = 0;

        while i < pattern.len() {
            if self.code.len() > MAX_CODE_LEN {
                return Err(Error::TooLong);
            }

            let mut atom = self.code.len();

            match pattern[i] {
                b'.' => self.code.push(Instr::ANY),
                b'^' if i == 0 => self.code.push(Instr::BOL),
                b'$' if peek(pattern, i + 1) == 0 => {
                    self.code.push(Instr::EOL)
                }
                c @ (b'^' | b'$') => self.code.extend([Instr::CHR, c]),
                b'[' => i = self.class(pattern, i)?,
                q @ (b'*' | b'+' | b'?') => {
                    atom = self.closure(q, peek(pattern, i + 1))?;
                }
                b'\\' => {
                    i += 1;
                    i += self.escape(pattern, i)?;
                }
                b'(' if self.posix => self.open_group()?,
                b')' if self.posix => self.close_group()?,
                c => self.literal(c),
            }

            self.prev = Some(atom);
            i += 1;
        }

        if !self.tag_stack.is_empty() {
            return Err(Error::UnmatchedOpen { posix: self.posix });
        }

        self.code.push(Instr::END);

        let nfa = Nfa::from(self.code);

        debug!("compiled pattern into {} bytes", nfa.len());
        trace!("{}", nfa);

        Ok(nfa)
    }
}

impl<'a> Compiler<'a> {
    /// Returns the opcode emitted for the previous pattern element.
    #[inline]
    fn prev_opcode(&self) -> Option<u8> {
        self.prev.map(|prev| self.code[prev])
    }

    /// Emits code for an ordinary character.
    fn literal(&mut self, c: u8) {
        if self.case_sensitive || !self.classifier.is_word(c) {
            self.code.extend([Instr::CHR, c]);
        } else {
            self.code.push(Instr::CCL);
            self.set.set_with_case(c, false);
            self.set.emit(0, &mut self.code);
        }
    }

    /// Emits code for the escape sequence that starts at `pattern[i]`, right
    /// after the backslash. Returns the number of pattern bytes consumed
    /// after `pattern[i]`.
    fn escape(&mut self, pattern: &[u8], i: usize) -> Result<usize, Error> {
        match peek(pattern, i) {
            b'<' => self.code.push(Instr::BOW),
            b'>' => {
                if self.prev_opcode() == Some(Instr::BOW) {
                    return Err(Error::NullWordAnchors);
                }
                self.code.push(Instr::EOW)
            }
            b'h' => self.code.push(Instr::MWS),
            b'H' => {
                if self.prev_opcode() == Some(Instr::MWS) {
                    return Err(Error::NullWordBoundaries);
                }
                self.code.push(Instr::MWE)
            }
            b'i' => self.code.push(Instr::MTWE),
            n @ b'1'..=b'9' => {
                let n = n - b'0';
                if self.tag_stack.last() == Some(&n) {
                    return Err(Error::CyclicalReference);
                }
                if self.next_tag <= n {
                    return Err(Error::UndeterminedReference);
                }
                self.code.extend([Instr::REF, n]);
            }
            b'(' if !self.posix => self.open_group()?,
            b')' if !self.posix => self.close_group()?,
            _ => {
                let (expansion, extra) = expand_backslash(
                    pattern,
                    i,
                    &mut self.set,
                    self.classifier,
                );
                match expansion {
                    Expansion::Char(c) => self.code.extend([Instr::CHR, c]),
                    Expansion::Class => {
                        self.code.push(Instr::CCL);
                        self.set.emit(0, &mut self.code);
                    }
                }
                return Ok(extra);
            }
        }
        Ok(0)
    }

    fn open_group(&mut self) -> Result<(), Error> {
        if self.next_tag as usize >= MAXTAG {
            return Err(Error::TooManyGroups { posix: self.posix });
        }
        self.tag_stack.push(self.next_tag);
        self.code.extend([Instr::BOT, self.next_tag]);
        self.next_tag += 1;
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), Error> {
        if self.prev_opcode() == Some(Instr::BOT) {
            return Err(Error::NullGroup { posix: self.posix });
        }
        match self.tag_stack.pop() {
            Some(tag) => {
                self.code.extend([Instr::EOT, tag]);
                Ok(())
            }
            None => Err(Error::UnmatchedClose { posix: self.posix }),
        }
    }

    /// Rewrites the code of the previous atom for applying the quantifier
    /// `q`. `next` is the pattern character that follows the quantifier.
    ///
    /// Returns the location of the code that becomes the previous atom for
    /// the next pattern character.
    fn closure(&mut self, q: u8, next: u8) -> Result<usize, Error> {
        let prev = match self.prev {
            Some(prev) => prev,
            None => return Err(Error::EmptyClosure),
        };

        match self.code[prev] {
            // Quantifying a closure is a no-op: `a**`, `a*?`, `a?+`.
            Instr::CLO | Instr::LCLO | Instr::CLQ => return Ok(prev),
            Instr::BOL
            | Instr::BOT
            | Instr::EOT
            | Instr::BOW
            | Instr::EOW
            | Instr::REF => return Err(Error::IllegalClosure),
            Instr::MTWE if q == b'?' => {
                self.code[prev] = Instr::MTWEO;
                return Ok(prev);
            }
            Instr::MWS | Instr::MWE | Instr::MTWE | Instr::MTWEO => {
                return Err(Error::IllegalClosure)
            }
            _ => {}
        }

        let op = match (q, next) {
            (b'?', _) => Instr::CLQ,
            (_, b'?') => Instr::LCLO,
            _ => Instr::CLO,
        };

        // `a+` is compiled as `aa*`, the atom is duplicated and the closure
        // is applied to the copy.
        let start = if q == b'+' {
            let end = self.code.len();
            self.code.extend_from_within(prev..end);
            end
        } else {
            prev
        };

        self.code.insert(start, op);
        self.code.push(Instr::END);

        Ok(start)
    }

    /// Emits code for the class that starts with the `[` at `pattern[i]`.
    /// Returns the position of the closing `]`.
    fn class(&mut self, pattern: &[u8], mut i: usize) -> Result<usize, Error> {
        self.code.push(Instr::CCL);

        // The last character added to the set, or -1 if the last thing added
        // was a class like `\d`. Used for resolving ranges.
        let mut prev_char: i32 = 0;
        let mut mask = 0_u8;

        i += 1;

        if peek(pattern, i) == b'^' {
            mask = 0xFF;
            i += 1;
        }

        // A leading `-` or `]` is literal.
        if peek(pattern, i) == b'-' {
            prev_char = b'-' as i32;
            self.set.set(b'-');
            i += 1;
        }
        if peek(pattern, i) == b']' {
            prev_char = b']' as i32;
            self.set.set(b']');
            i += 1;
        }

        loop {
            let c = peek(pattern, i);
            if c == 0 || c == b']' {
                break;
            }
            match c {
                b'-' if prev_char < 0 => {
                    // After a class like `\d` the dash is literal.
                    prev_char = b'-' as i32;
                    self.set.set(b'-');
                }
                b'-' => match peek(pattern, i + 1) {
                    0 => return Err(Error::MissingBracket),
                    b']' => {
                        // Dash right before the `]`.
                        prev_char = b'-' as i32;
                        self.set.set(b'-');
                    }
                    _ => {
                        let first = prev_char + 1;
                        i += 1;
                        let mut last = pattern[i] as i32;
                        if last == b'\\' as i32 {
                            if peek(pattern, i + 1) == 0 {
                                return Err(Error::MissingBracket);
                            }
                            i += 1;
                            let (expansion, extra) = expand_backslash(
                                pattern,
                                i,
                                &mut self.set,
                                self.classifier,
                            );
                            i += extra;
                            match expansion {
                                // Escaped characters are case-sensitive.
                                Expansion::Char(c) => {
                                    self.set.set(c);
                                    prev_char = c as i32;
                                    last = c as i32;
                                }
                                Expansion::Class => prev_char = -1,
                            }
                        }
                        if prev_char < 0 {
                            // A range that ends with a class like `\d`, the
                            // dash is literal.
                            prev_char = b'-' as i32;
                            self.set.set(b'-');
                        } else {
                            for c in first..=last {
                                self.set.set_with_case(c as u8, self.case_sensitive);
                            }
                        }
                    }
                },
                b'\\' if peek(pattern, i + 1) != 0 => {
                    i += 1;
                    let (expansion, extra) = expand_backslash(
                        pattern,
                        i,
                        &mut self.set,
                        self.classifier,
                    );
                    i += extra;
                    match expansion {
                        Expansion::Char(c) => {
                            self.set.set(c);
                            prev_char = c as i32;
                        }
                        Expansion::Class => prev_char = -1,
                    }
                }
                c => {
                    prev_char = c as i32;
                    self.set.set_with_case(c, self.case_sensitive);
                }
            }
            i += 1;
        }

        if peek(pattern, i) == 0 {
            return Err(Error::MissingBracket);
        }

        self.set.emit(mask, &mut self.code);

        Ok(i)
    }
}
