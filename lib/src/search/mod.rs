/*! The search engine used by the host for find and replace.

[`RESearch`] ties together the compiler and the matcher. It keeps the NFA
for the last compiled pattern, so that searching repeatedly with the same
pattern doesn't compile it again, and the positions matched by the pattern
and its tagged subexpressions after each successful execution.
*/

use std::ops::Range;

use bstr::ByteSlice;
use log::debug;

use crate::charclass::CharClassify;
use crate::indexer::CharacterIndexer;
use crate::re::compiler::Compiler;
use crate::re::instr::Nfa;
use crate::re::matcher::{Captures, Matcher};
use crate::re::Error;

pub use crate::re::{MAXTAG, NOTFOUND};

pub use flags::{FindFlag, FindFlags};

#[cfg(test)]
mod tests;

#[allow(missing_docs)]
mod flags {
    use bitmask::bitmask;

    bitmask! {
        /// Options that control a search.
        ///
        /// Only [`FindFlag::Posix`] changes the way in which patterns are
        /// compiled, but all the flags are taken into account when deciding
        /// whether a pattern must be compiled again.
        #[derive(Debug)]
        pub mask FindFlags: u32 where
        /// Each of the options that control a search.
        flags FindFlag {
            WholeWord = 0x0000_0002,
            MatchCase = 0x0000_0004,
            WordStart = 0x0010_0000,
            RegExp = 0x0020_0000,
            Posix = 0x0040_0000,
        }
    }
}

/// Status of the last compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No pattern has been compiled successfully, or the last compilation
    /// failed.
    Nop,
    /// The last compilation succeeded, the NFA is ready to be executed.
    Okp,
}

/// Identifies the last compiled pattern.
struct CacheKey {
    pattern: Vec<u8>,
    case_sensitive: bool,
    flags: FindFlags,
}

impl CacheKey {
    fn matches(
        &self,
        pattern: &[u8],
        case_sensitive: bool,
        flags: FindFlags,
    ) -> bool {
        self.pattern == pattern
            && self.case_sensitive == case_sensitive
            && self.flags == flags
    }
}

/// Regular expression search engine.
///
/// The engine is used in two steps: [`RESearch::compile`] compiles a pattern
/// and [`RESearch::execute`] searches for it in a range of text. After a
/// successful execution [`RESearch::span`] returns the spans of the whole
/// match and of each tagged subexpression, and [`RESearch::grab_matches`]
/// copies the matched text so that [`RESearch::pat`] and
/// [`RESearch::substitute`] can use it.
pub struct RESearch<'c> {
    classifier: &'c CharClassify,
    nfa: Nfa,
    captures: Captures,
    pat: [Vec<u8>; MAXTAG],
    status: Status,
    failure: bool,
    cache: Option<CacheKey>,
}

impl<'c> RESearch<'c> {
    /// Creates a new engine that uses `classifier` for deciding which
    /// characters are part of words.
    pub fn new(classifier: &'c CharClassify) -> Self {
        Self {
            classifier,
            nfa: Nfa::default(),
            captures: Captures::new(),
            pat: Default::default(),
            status: Status::Nop,
            failure: false,
            cache: None,
        }
    }

    /// Compiles a pattern.
    ///
    /// If the pattern, the case sensitivity and the flags are the same used
    /// in the last successful compilation, the NFA is reused. An empty
    /// pattern also reuses the last NFA, or fails with
    /// [`Error::NoPreviousRegexp`] if there's none.
    ///
    /// When the compilation fails the engine is left in the
    /// [`Status::Nop`] status, with an NFA that never matches.
    pub fn compile(
        &mut self,
        pattern: &[u8],
        case_sensitive: bool,
        flags: FindFlags,
    ) -> Result<(), Error> {
        if self.status == Status::Okp
            && (pattern.is_empty()
                || self.cache.as_ref().is_some_and(|key| {
                    key.matches(pattern, case_sensitive, flags)
                }))
        {
            return Ok(());
        }

        if pattern.is_empty() {
            self.nfa = Nfa::default();
            return Err(Error::NoPreviousRegexp);
        }

        self.status = Status::Nop;

        let result = Compiler::new(self.classifier)
            .case_sensitive(case_sensitive)
            .posix(flags.contains(FindFlag::Posix))
            .compile(pattern);

        match result {
            Ok(nfa) => {
                self.nfa = nfa;
                self.status = Status::Okp;
                self.cache = Some(CacheKey {
                    pattern: pattern.to_vec(),
                    case_sensitive,
                    flags,
                });
                Ok(())
            }
            Err(err) => {
                debug!("pattern `{}` not compiled: {}", pattern.as_bstr(), err);
                self.nfa = Nfa::default();
                self.cache = None;
                Err(err)
            }
        }
    }

    /// Searches for the leftmost match of the compiled pattern in the
    /// `[lp, endp)` range. `lp` is considered the start of the line.
    ///
    /// Returns true if a match was found.
    pub fn execute<I: CharacterIndexer + ?Sized>(
        &mut self,
        ci: &I,
        lp: isize,
        endp: isize,
    ) -> bool {
        self.execute_from(ci, lp, lp, endp)
    }

    /// Like [`RESearch::execute`], but the line starts at `bol`, which can
    /// be before `lp`. This allows searching for subsequent matches in the
    /// same line without `^` matching at `lp`.
    pub fn execute_from<I: CharacterIndexer + ?Sized>(
        &mut self,
        ci: &I,
        bol: isize,
        lp: isize,
        endp: isize,
    ) -> bool {
        self.clear();

        let mut matcher = Matcher::new(
            self.nfa.as_bytes(),
            ci,
            self.classifier,
            &mut self.captures,
        );

        let found = matcher.execute(bol, lp, endp);

        self.failure = matcher.failure();

        found
    }

    /// Copies the text matched by the pattern and its tagged subexpressions,
    /// making it available through [`RESearch::pat`].
    pub fn grab_matches<I: CharacterIndexer + ?Sized>(&mut self, ci: &I) {
        for n in 0..MAXTAG {
            let start = self.captures.bopat[n];
            let end = self.captures.eopat[n];
            if start != NOTFOUND && end != NOTFOUND {
                self.pat[n] = (start..end).map(|pos| ci.char_at(pos)).collect();
            }
        }
    }

    /// Forgets the result of the last execution.
    pub fn clear(&mut self) {
        self.captures.clear();
        for pat in self.pat.iter_mut() {
            pat.clear();
        }
    }

    /// Forgets the last compiled pattern, the next call to
    /// [`RESearch::compile`] will compile the pattern even if it didn't
    /// change.
    pub fn clear_cache(&mut self) {
        self.status = Status::Nop;
        self.cache = None;
    }

    /// Start of the text matched by the pattern (`n` = 0) or by a tagged
    /// subexpression (`n` = 1..9), or [`NOTFOUND`].
    pub fn bopat(&self, n: usize) -> isize {
        self.captures.bopat.get(n).copied().unwrap_or(NOTFOUND)
    }

    /// End of the text matched by the pattern (`n` = 0) or by a tagged
    /// subexpression (`n` = 1..9), or [`NOTFOUND`].
    pub fn eopat(&self, n: usize) -> isize {
        self.captures.eopat.get(n).copied().unwrap_or(NOTFOUND)
    }

    /// Span matched by the pattern (`n` = 0) or by a tagged subexpression
    /// (`n` = 1..9). Returns `None` if the subexpression didn't match.
    pub fn span(&self, n: usize) -> Option<Range<isize>> {
        let start = self.bopat(n);
        let end = self.eopat(n);
        if start == NOTFOUND || end == NOTFOUND {
            None
        } else {
            Some(start..end)
        }
    }

    /// Text matched by the pattern (`n` = 0) or by a tagged subexpression
    /// (`n` = 1..9), as copied by [`RESearch::grab_matches`].
    pub fn pat(&self, n: usize) -> &[u8] {
        self.pat.get(n).map(|pat| pat.as_slice()).unwrap_or_default()
    }

    /// The NFA for the last compiled pattern.
    pub fn nfa(&self) -> &Nfa {
        &self.nfa
    }

    /// Status of the last compilation.
    pub fn status(&self) -> Status {
        self.status
    }

    /// True if the last execution stopped because the NFA is malformed.
    pub fn failure(&self) -> bool {
        self.failure
    }

    /// Expands a replacement template using the text copied by
    /// [`RESearch::grab_matches`].
    ///
    /// `\0` is replaced with the whole match and `\1` to `\9` with the text
    /// matched by the corresponding tagged subexpression. The escapes
    /// `\a \b \f \n \r \t \v` produce the corresponding control characters
    /// and `\\` produces a single backslash. Any other backslash is copied
    /// as is, together with the character that follows.
    pub fn substitute(&self, template: &[u8]) -> Vec<u8> {
        let mut result = Vec::with_capacity(template.len());
        let mut iter = template.iter().copied();

        while let Some(c) = iter.next() {
            if c != b'\\' {
                result.push(c);
                continue;
            }
            match iter.next() {
                Some(n @ b'0'..=b'9') => {
                    result.extend_from_slice(self.pat((n - b'0') as usize))
                }
                Some(b'a') => result.push(0x07),
                Some(b'b') => result.push(0x08),
                Some(b'f') => result.push(0x0c),
                Some(b'n') => result.push(b'\n'),
                Some(b'r') => result.push(b'\r'),
                Some(b't') => result.push(b'\t'),
                Some(b'v') => result.push(0x0b),
                Some(b'\\') => result.push(b'\\'),
                Some(c) => result.extend_from_slice(&[b'\\', c]),
                None => result.push(b'\\'),
            }
        }

        result
    }
}
