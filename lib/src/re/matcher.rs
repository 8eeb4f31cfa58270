/*!
Backtracking matcher that executes the NFA produced by the compiler.

The matcher walks the NFA one instruction at a time, advancing the position
in the text as instructions match. Closures are the only source of
backtracking: a closure consumes as many characters as it can and then tries
to match the rest of the NFA recursively, moving back one character at a time
until the rest of the NFA matches or the position where the closure started
is reached.
*/

use log::warn;

use super::instr::{Instr, InstrParser, ANYSKIP, CCLSKIP, CHRSKIP};
use crate::charclass::CharClassify;
use crate::indexer::CharacterIndexer;
use crate::re::{MAXTAG, NOTFOUND};

/// Maximum number of closures that can be nested while matching. Each
/// closure tail is matched recursively, an NFA with more closures than this
/// is treated as malformed.
pub(crate) const MAX_CLOSURE_DEPTH: usize = 512;

/// Start and end positions of the whole match (slot 0) and of each tagged
/// subexpression (slots 1 to 9). Unused slots contain [`NOTFOUND`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Captures {
    pub bopat: [isize; MAXTAG],
    pub eopat: [isize; MAXTAG],
}

impl Default for Captures {
    fn default() -> Self {
        Self::new()
    }
}

impl Captures {
    pub fn new() -> Self {
        Self { bopat: [NOTFOUND; MAXTAG], eopat: [NOTFOUND; MAXTAG] }
    }

    pub fn clear(&mut self) {
        self.bopat = [NOTFOUND; MAXTAG];
        self.eopat = [NOTFOUND; MAXTAG];
    }
}

/// Executes an NFA against the text provided by a [`CharacterIndexer`].
pub(crate) struct Matcher<'a, I: CharacterIndexer + ?Sized> {
    code: &'a [u8],
    ci: &'a I,
    classifier: &'a CharClassify,
    captures: &'a mut Captures,
    /// Position where the current line starts, `BOL` matches only here.
    bol: isize,
    /// Set when a malformed NFA is found during the execution.
    failure: bool,
    /// Number of closures currently being matched.
    depth: usize,
}

impl<'a, I: CharacterIndexer + ?Sized> Matcher<'a, I> {
    pub fn new(
        code: &'a [u8],
        ci: &'a I,
        classifier: &'a CharClassify,
        captures: &'a mut Captures,
    ) -> Self {
        Self {
            code,
            ci,
            classifier,
            captures,
            bol: 0,
            failure: false,
            depth: 0,
        }
    }

    /// True if the last execution found a malformed NFA.
    #[inline]
    pub fn failure(&self) -> bool {
        self.failure
    }

    /// Searches for the leftmost match in the `[lp, endp)` range, where
    /// `bol` is the position where the line starts.
    ///
    /// On success, returns true and slot 0 of the captures contains the
    /// span of the match.
    pub fn execute(&mut self, bol: isize, mut lp: isize, endp: isize) -> bool {
        self.bol = bol;
        self.failure = false;
        self.depth = 0;
        self.captures.clear();

        let code = self.code;

        let ep = match code {
            // Anchored patterns are tried at the start position only.
            [Instr::BOL, ..] => self.pmatch(lp, endp, 0, 1, None),
            // A pattern that consists only in `$`.
            [Instr::EOL, Instr::END, ..] => {
                lp = endp;
                endp
            }
            [Instr::EOL, ..] | [Instr::END, ..] | [] => return false,
            [Instr::CHR, c, ..] => {
                // Locate the first character without going through pmatch.
                let c = *c;
                while lp < endp && self.ci.char_at(lp) != c {
                    lp += 1;
                }
                if lp >= endp {
                    return false;
                }
                self.scan(&mut lp, endp)
            }
            _ => self.scan(&mut lp, endp),
        };

        if ep == NOTFOUND || self.failure {
            return false;
        }

        self.captures.bopat[0] = lp;
        self.captures.eopat[0] = ep;

        true
    }

    /// Tries to match the NFA at every position from `lp` to `endp`, leaving
    /// `lp` at the position where the match starts.
    fn scan(&mut self, lp: &mut isize, endp: isize) -> isize {
        while *lp < endp {
            let mut offset = 1;
            let ep = self.pmatch(*lp, endp, 0, 1, Some(&mut offset));
            if ep != NOTFOUND {
                return ep;
            }
            if self.failure {
                break;
            }
            *lp += offset;
        }
        NOTFOUND
    }

    /// Matches the NFA starting at instruction `ap` and text position `lp`.
    /// Returns the position where the match ends, or [`NOTFOUND`].
    ///
    /// When the match fails because of a word boundary instruction,
    /// `offset` receives the distance, in direction `dir`, to the next
    /// position worth trying.
    fn pmatch(
        &mut self,
        mut lp: isize,
        endp: isize,
        mut ap: usize,
        dir: isize,
        mut offset: Option<&mut isize>,
    ) -> isize {
        let code = self.code;

        loop {
            let (instr, size) =
                InstrParser::decode_instr(code.get(ap..).unwrap_or_default());

            ap += size;

            match instr {
                Instr::End => return lp,
                Instr::Chr(c) => {
                    if lp >= endp || self.ci.char_at(lp) != c {
                        return NOTFOUND;
                    }
                    lp += 1;
                }
                Instr::Any => {
                    if lp >= endp {
                        return NOTFOUND;
                    }
                    lp += 1;
                }
                Instr::Ccl(class) => {
                    if lp >= endp || !class.contains(self.ci.char_at(lp)) {
                        return NOTFOUND;
                    }
                    lp += 1;
                }
                Instr::Bol => {
                    if lp != self.bol {
                        return NOTFOUND;
                    }
                }
                Instr::Eol => {
                    if lp < endp {
                        return NOTFOUND;
                    }
                }
                Instr::Bot(n) => {
                    if n as usize >= MAXTAG {
                        return self.fail(Instr::BOT);
                    }
                    lp = self.ci.move_position_outside_char(lp, -1);
                    self.captures.bopat[n as usize] = lp;
                }
                Instr::Eot(n) => {
                    if n as usize >= MAXTAG {
                        return self.fail(Instr::EOT);
                    }
                    lp = self.ci.move_position_outside_char(lp, 1);
                    self.captures.eopat[n as usize] = lp;
                }
                Instr::Bow => {
                    if (lp != self.bol && self.is_word(lp - 1, endp))
                        || !self.is_word(lp, endp)
                    {
                        return NOTFOUND;
                    }
                }
                Instr::Eow => {
                    if lp == self.bol
                        || !self.is_word(lp - 1, endp)
                        || self.is_word(lp, endp)
                    {
                        return NOTFOUND;
                    }
                }
                Instr::WordStart => {
                    if !self.ci.is_word_start_at(lp) {
                        if let Some(offset) = offset.as_deref_mut() {
                            *offset = self.step(lp, dir);
                        }
                        return NOTFOUND;
                    }
                }
                Instr::WordEnd => {
                    if lp == self.bol || !self.ci.is_word_end_at(lp) {
                        if let Some(offset) = offset.as_deref_mut() {
                            *offset = self.step(lp, dir);
                        }
                        return NOTFOUND;
                    }
                }
                Instr::ToWordEnd | Instr::ToWordEndOpt => {
                    let optional = matches!(instr, Instr::ToWordEndOpt);
                    let e = self.ci.extend_word_select(lp, 1).min(endp);
                    if (e == lp && !optional) || !self.ci.is_word_end_at(e) {
                        if let Some(offset) = offset.as_deref_mut() {
                            // Going forward, the whole word can be skipped.
                            *offset = if dir > 0 {
                                self.distance(lp, e, dir)
                            } else {
                                self.step(lp, dir)
                            };
                        }
                        return NOTFOUND;
                    }
                    lp = e;
                }
                Instr::Ref(n) => {
                    let n = n as usize;
                    if n >= MAXTAG {
                        return self.fail(Instr::REF);
                    }
                    let mut bp = self.captures.bopat[n];
                    let ep = self.captures.eopat[n];
                    while bp < ep {
                        if lp >= endp
                            || self.ci.char_at(bp) != self.ci.char_at(lp)
                        {
                            return NOTFOUND;
                        }
                        bp += 1;
                        lp += 1;
                    }
                }
                Instr::Clo | Instr::Clq | Instr::Lclo => {
                    return self.closure(instr, lp, endp, ap);
                }
                Instr::Unknown(op) => return self.fail(op),
            }
        }
    }

    /// Matches a closure whose atom is at `ap`, and the rest of the NFA.
    fn closure(
        &mut self,
        closure: Instr,
        lp: isize,
        endp: isize,
        ap: usize,
    ) -> isize {
        if self.depth >= MAX_CLOSURE_DEPTH {
            self.failure = true;
            warn!("more than {} nested closures", MAX_CLOSURE_DEPTH);
            return NOTFOUND;
        }
        self.depth += 1;
        let e = self.match_closure(closure, lp, endp, ap);
        self.depth -= 1;
        e
    }

    fn match_closure(
        &mut self,
        closure: Instr,
        mut lp: isize,
        endp: isize,
        ap: usize,
    ) -> isize {
        let code = self.code;
        let many = !matches!(closure, Instr::Clq);
        let lazy = matches!(closure, Instr::Lclo);
        let start = lp;

        let (atom, _) =
            InstrParser::decode_instr(code.get(ap..).unwrap_or_default());

        let skip = match atom {
            Instr::Any => {
                if many {
                    lp = lp.max(endp);
                } else if lp < endp {
                    lp += 1;
                }
                ANYSKIP
            }
            Instr::Chr(c) => {
                while lp < endp && self.ci.char_at(lp) == c {
                    lp += 1;
                    if !many {
                        break;
                    }
                }
                CHRSKIP
            }
            Instr::Ccl(class) => {
                while lp < endp && class.contains(self.ci.char_at(lp)) {
                    lp += 1;
                    if !many {
                        break;
                    }
                }
                CCLSKIP
            }
            _ => {
                self.failure = true;
                warn!("closure over an invalid atom at {:#06x}", ap);
                return NOTFOUND;
            }
        };

        let ap = ap + skip;
        let tail = code.get(ap).copied().unwrap_or(Instr::END);

        // Try to match the rest of the NFA starting at the rightmost
        // position reached by the closure, and move left on failure.
        let mut llp = lp;
        let mut e = NOTFOUND;

        while llp >= start {
            let mut qoff = -1;
            let q = self.pmatch(llp, endp, ap, -1, Some(&mut qoff));
            if self.failure {
                return NOTFOUND;
            }
            if q != NOTFOUND {
                e = q;
                lp = llp;
                if !lazy {
                    return e;
                }
            }
            if tail == Instr::END {
                return e;
            }
            llp += qoff;
        }

        // Attempts that failed after the chosen one may have overwritten
        // the tags in the tail, match it again so that they correspond to
        // the result.
        if lazy && e != NOTFOUND {
            self.pmatch(lp, endp, ap, 1, None);
        }

        e
    }

    /// True if the character at `pos` is a word character. Positions
    /// outside the `[0, endp)` range are never word characters.
    #[inline]
    fn is_word(&self, pos: isize, endp: isize) -> bool {
        pos >= 0 && pos < endp && self.classifier.is_word(self.ci.char_at(pos))
    }

    /// Distance from `lp` to the next character boundary in direction
    /// `dir`, never zero.
    fn step(&self, lp: isize, dir: isize) -> isize {
        let e = self.ci.move_position_outside_char(lp, dir);
        self.distance(lp, e, dir)
    }

    fn distance(&self, lp: isize, e: isize, dir: isize) -> isize {
        let d =
            if e == lp { self.ci.next_position(lp, dir) - lp } else { e - lp };
        if d == 0 {
            dir
        } else {
            d
        }
    }

    fn fail(&mut self, op: u8) -> isize {
        self.failure = true;
        warn!("malformed NFA, unexpected opcode {:#04x}", op);
        NOTFOUND
    }
}
