/*! Searching a pattern in every line of a text.

The engine works with one line at a time. [`find_in_lines`] splits a text in
lines and executes the engine on each of them, producing a [`LineMatch`] for
every match found.
*/

use std::ops::Range;

use bstr::ByteSlice;

use crate::charclass::CharClassify;
use crate::indexer::{CharacterIndexer, LineIndexer};
use crate::search::{RESearch, MAXTAG};

/// A match found by [`LineMatches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch<'t> {
    /// Line number, starting at 1.
    pub line: usize,
    /// Text of the line, without the line terminator.
    pub text: &'t [u8],
    /// Span of the match within the line.
    pub span: Range<usize>,
    /// Spans of the whole match (index 0) and of each tagged subexpression
    /// (indexes 1 to 9) within the line. `None` for subexpressions that
    /// didn't match.
    pub groups: [Option<Range<usize>>; MAXTAG],
}

/// Iterator returned by [`find_in_lines`].
pub struct LineMatches<'s, 'c, 't> {
    search: &'s mut RESearch<'c>,
    classifier: &'c CharClassify,
    lines: bstr::Lines<'t>,
    line: usize,
    /// Line being searched and the position where the next search starts,
    /// when more matches are expected in the same line.
    pending: Option<(&'t [u8], isize)>,
    all: bool,
}

/// Searches for the pattern compiled in `search` in every line of `text`.
///
/// Lines are terminated by `\n` or `\r\n`. By default only the first match
/// in each line is reported, use [`LineMatches::all`] for obtaining every
/// non-overlapping match.
pub fn find_in_lines<'s, 'c, 't>(
    search: &'s mut RESearch<'c>,
    text: &'t [u8],
    classifier: &'c CharClassify,
) -> LineMatches<'s, 'c, 't> {
    LineMatches {
        search,
        classifier,
        lines: text.lines(),
        line: 0,
        pending: None,
        all: false,
    }
}

impl<'s, 'c, 't> LineMatches<'s, 'c, 't> {
    /// If true, reports every non-overlapping match in each line instead of
    /// the first one only.
    pub fn all(mut self, yes: bool) -> Self {
        self.all = yes;
        self
    }
}

impl<'t> Iterator for LineMatches<'_, '_, 't> {
    type Item = LineMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (text, lp) = match self.pending.take() {
                Some(pending) => pending,
                None => {
                    let text = self.lines.next()?;
                    self.line += 1;
                    (text, 0)
                }
            };

            let ci = LineIndexer::new(text, self.classifier);
            let endp = ci.len();

            // The line always starts at 0, so `^` doesn't match at the
            // start of subsequent searches in the same line.
            if !self.search.execute_from(&ci, 0, lp, endp) {
                continue;
            }

            let groups: [Option<Range<usize>>; MAXTAG] =
                std::array::from_fn(|n| {
                    self.search
                        .span(n)
                        .map(|span| span.start as usize..span.end as usize)
                });

            let span = match &groups[0] {
                Some(span) => span.clone(),
                None => continue,
            };

            if self.all {
                let next = if !span.is_empty() {
                    Some(span.end as isize)
                } else if (span.start as isize) < endp {
                    // Empty match, advance one character.
                    Some(ci.next_position(span.start as isize, 1))
                } else {
                    None
                };
                self.pending = next.map(|lp| (text, lp));
            }

            return Some(LineMatch { line: self.line, text, span, groups });
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use bstr::ByteSlice;

    use super::find_in_lines;
    use crate::{CharClassify, FindFlags, RESearch};

    fn matches(pattern: &[u8], text: &[u8], all: bool) -> Vec<(usize, String)> {
        let classifier = CharClassify::new();
        let mut search = RESearch::new(&classifier);
        search.compile(pattern, true, FindFlags::none()).unwrap();
        find_in_lines(&mut search, text, &classifier)
            .all(all)
            .map(|m| (m.line, m.text[m.span].to_str_lossy().into_owned()))
            .collect()
    }

    fn expected(matches: &[(usize, &str)]) -> Vec<(usize, String)> {
        matches.iter().map(|(line, s)| (*line, s.to_string())).collect()
    }

    #[test]
    fn first_match_per_line() {
        assert_eq!(
            matches(b"o+", b"foo boo\nbar\r\nmoo\n", false),
            expected(&[(1, "oo"), (3, "oo")])
        );
    }

    #[test]
    fn every_match() {
        assert_eq!(
            matches(b"o+", b"foo boo\nbar\r\nmoo\n", true),
            expected(&[(1, "oo"), (1, "oo"), (3, "oo")])
        );
        assert_eq!(
            matches(br"\<b\w*", b"bar baz qux\nbob", true),
            expected(&[(1, "bar"), (1, "baz"), (2, "bob")])
        );
    }

    #[test]
    fn anchored_at_line_start() {
        assert_eq!(
            matches(b"^a", b"aaa\nba\na", true),
            expected(&[(1, "a"), (3, "a")])
        );
    }

    #[test]
    fn empty_matches_advance() {
        assert_eq!(matches(b"^$", b"a\n\nb\n", true), expected(&[(2, "")]));
        assert_eq!(matches(b"$", b"ab\n", true), expected(&[(1, "")]));
    }

    #[test]
    fn groups() {
        let classifier = CharClassify::new();
        let mut search = RESearch::new(&classifier);
        search.compile(br"\(\w+\)=\(\w*\)", true, FindFlags::none()).unwrap();

        let matches: Vec<_> =
            find_in_lines(&mut search, b"# comment\nkey=value\nempty=", &classifier)
                .collect();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].line, 2);
        assert_eq!(matches[0].groups[1], Some(0..3));
        assert_eq!(matches[0].groups[2], Some(4..9));
        assert_eq!(matches[0].groups[3], None);
        assert_eq!(matches[1].line, 3);
        assert_eq!(matches[1].groups[2], Some(6..6));
    }
}
