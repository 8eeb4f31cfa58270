/*! This module compiles and executes regular expressions.

Patterns are compiled in a single left-to-right pass by the
[`compiler::Compiler`] into an NFA, which is a flat sequence of bytes where
each instruction is a one-byte opcode followed by its operands (see
[`instr`]). There's no intermediate representation: quantifiers are handled
by rewriting the code already emitted for the previous atom, inserting a
closure opcode in front of it.

The NFA is executed by the [`matcher::Matcher`], a backtracking matcher that
interprets the instructions recursively. Closures match as many characters as
possible in one go and then try to match the rest of the pattern from the
rightmost position, moving back towards the start of the closure until the
rest of the pattern matches.

This implementation uses a bit-set representation for character classes.
Each byte is represented by one bit in a 256-bit block, so a class always
occupies 32 bytes in the NFA, and the matcher checks membership with a single
bit test.

Examples:

```text
pattern:    foo*.*
compile:    CHR f CHR o CLO CHR o END CLO ANY END END
matches:    fo foo fooo foobar fobar foxx ...

pattern:    fo[ob]a[rz]
compile:    CHR f CHR o CCL bitset CHR a CCL bitset END
matches:    fobar fooar fobaz fooaz

pattern:    \(foo\)[1-3]\1  (same as foo[1-3]foo)
compile:    BOT 1 CHR f CHR o CHR o EOT 1 CCL bitset REF 1 END
matches:    foo1foo foo2foo foo3foo
```
*/

use thiserror::Error;

pub(crate) mod charset;
pub(crate) mod compiler;
pub(crate) mod instr;
pub(crate) mod matcher;


/// Maximum size of the compiled NFA. The compiler stops with
/// [`Error::TooLong`] when the code gets close to this size.
pub const MAXNFA: usize = 4096;

/// Number of capture slots. Slot 0 is the whole match, slots 1 to 9 are the
/// tagged subexpressions.
pub const MAXTAG: usize = 10;

/// Position returned when there's no match.
pub const NOTFOUND: isize = -1;

/// Errors returned while compiling a regular expression.
///
/// The text of each error is the short diagnostic shown to users. Errors
/// that involve round brackets are worded differently in POSIX mode, where
/// groups are written as `(...)` instead of `\(...\)`.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The pattern is empty and no pattern was compiled before.
    #[error("No previous regular expression")]
    NoPreviousRegexp,

    /// The compiled pattern doesn't fit in the NFA.
    #[error("Pattern too long")]
    TooLong,

    /// A quantifier appears at the start of the pattern.
    #[error("Empty closure")]
    EmptyClosure,

    /// A quantifier follows something that can't be repeated, like an
    /// anchor, a group delimiter or a backreference.
    #[error("Illegal closure")]
    IllegalClosure,

    /// A character class is not closed.
    #[error("Missing ]")]
    MissingBracket,

    /// A group is closed right after being opened.
    #[error("Null pattern inside {}", group(.posix))]
    NullGroup {
        /// True if the pattern was compiled in POSIX mode.
        posix: bool,
    },

    /// A backreference refers to the group that contains it.
    #[error("Cyclical reference")]
    CyclicalReference,

    /// A backreference refers to a group that was not opened yet.
    #[error("Undetermined reference")]
    UndeterminedReference,

    /// The pattern has more than nine groups.
    #[error("Too many {} pairs", group(.posix))]
    TooManyGroups {
        /// True if the pattern was compiled in POSIX mode.
        posix: bool,
    },

    /// A group is never closed.
    #[error("Unmatched {}", open_group(.posix))]
    UnmatchedOpen {
        /// True if the pattern was compiled in POSIX mode.
        posix: bool,
    },

    /// A group is closed, but it was never opened.
    #[error("Unmatched {}", close_group(.posix))]
    UnmatchedClose {
        /// True if the pattern was compiled in POSIX mode.
        posix: bool,
    },

    /// `\>` right after `\<`.
    #[error(r"Null pattern inside \<\>")]
    NullWordAnchors,

    /// `\H` right after `\h`.
    #[error(r"Null pattern inside \h\H")]
    NullWordBoundaries,
}

fn group(posix: &bool) -> &'static str {
    if *posix {
        "()"
    } else {
        r"\(\)"
    }
}

fn open_group(posix: &bool) -> &'static str {
    if *posix {
        "("
    } else {
        r"\("
    }
}

fn close_group(posix: &bool) -> &'static str {
    if *posix {
        ")"
    } else {
        r"\)"
    }
}
