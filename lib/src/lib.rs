/*! A line-oriented regular expression engine for interactive search.

This crate implements a small regular expression engine in the tradition of
the public domain `regex` routines by Ozan Yigit, which in turn descend from
Conroy's grep and the software tools books. Patterns are compiled into a
compact byte-coded NFA, and the NFA is executed against one line of text at a
time through the [`CharacterIndexer`] trait, which gives the engine random
access to the bytes of the line and tells it where character and word
boundaries are.

The main type is [`RESearch`]. It compiles a pattern, remembers the last
compiled pattern so that repeated searches don't recompile it, executes the
NFA against a line, and exposes the spans matched by the whole pattern and by
up to nine tagged subexpressions.

# Example

```rust
use research::{CharClassify, FindFlags, LineIndexer, RESearch};

let classifier = CharClassify::new();
let mut search = RESearch::new(&classifier);

search.compile(br"\(fo.*\)-\1", true, FindFlags::none()).unwrap();

let line = b"foobar-foobar tail";
let indexer = LineIndexer::new(line, &classifier);

assert!(search.execute(&indexer, 0, line.len() as isize));
assert_eq!(search.span(0), Some(0..13));
assert_eq!(search.span(1), Some(0..6));

search.grab_matches(&indexer);
assert_eq!(search.pat(1), b"foobar");
```
*/

#![deny(missing_docs)]

pub use charclass::CharClass;
pub use charclass::CharClassify;

pub use indexer::CharacterIndexer;
pub use indexer::LineIndexer;

pub use lines::find_in_lines;
pub use lines::LineMatch;
pub use lines::LineMatches;

pub use re::instr::Nfa;
pub use re::Error;

pub use search::FindFlag;
pub use search::FindFlags;
pub use search::RESearch;
pub use search::Status;
pub use search::MAXTAG;
pub use search::NOTFOUND;

mod charclass;
mod indexer;
mod lines;
mod re;
mod search;
