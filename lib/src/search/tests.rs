use pretty_assertions::assert_eq;

use crate::charclass::CharClassify;
use crate::indexer::{CharacterIndexer, LineIndexer};
use crate::re::Error;
use crate::search::{FindFlag, FindFlags, RESearch, Status, NOTFOUND};

fn posix() -> FindFlags {
    let mut flags = FindFlags::none();
    flags.set(FindFlag::Posix);
    flags
}

#[test]
fn empty_pattern_without_previous() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    assert_eq!(
        search.compile(b"", true, FindFlags::none()),
        Err(Error::NoPreviousRegexp)
    );
    assert_eq!(search.status(), Status::Nop);
    assert_eq!(search.nfa().as_bytes(), &[0]);
    assert_eq!(
        Error::NoPreviousRegexp.to_string(),
        "No previous regular expression"
    );
}

#[test]
fn empty_pattern_reuses_previous() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(b"ab*", true, FindFlags::none()).unwrap();
    let nfa = search.nfa().clone();

    assert_eq!(search.compile(b"", false, posix()), Ok(()));
    assert_eq!(search.status(), Status::Okp);
    assert_eq!(search.nfa(), &nfa);
}

#[test]
fn cache() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(b"abc", true, FindFlags::none()).unwrap();
    let nfa = search.nfa().clone();

    // Same pattern, same options.
    search.compile(b"abc", true, FindFlags::none()).unwrap();
    assert_eq!(search.nfa(), &nfa);

    // Case sensitivity is part of the cache key.
    search.compile(b"abc", false, FindFlags::none()).unwrap();
    assert_ne!(search.nfa(), &nfa);

    // And so are the flags.
    search.compile(b"(a)", true, FindFlags::none()).unwrap();
    let literal = search.nfa().clone();
    search.compile(b"(a)", true, posix()).unwrap();
    assert_ne!(search.nfa(), &literal);

    let mut flags = posix();
    flags.set(FindFlag::MatchCase);
    search.compile(b"(a)", true, flags).unwrap();
    assert_eq!(search.status(), Status::Okp);
}

#[test]
fn clear_cache() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(b"abc", true, FindFlags::none()).unwrap();
    search.clear_cache();
    assert_eq!(search.status(), Status::Nop);

    // Without a cached pattern the empty pattern is an error.
    assert_eq!(
        search.compile(b"", true, FindFlags::none()),
        Err(Error::NoPreviousRegexp)
    );

    search.compile(b"abc", true, FindFlags::none()).unwrap();
    assert_eq!(search.status(), Status::Okp);
}

#[test]
fn failed_compile() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(b"abc", true, FindFlags::none()).unwrap();

    assert_eq!(
        search.compile(b"[abc", true, FindFlags::none()),
        Err(Error::MissingBracket)
    );
    assert_eq!(search.status(), Status::Nop);
    assert_eq!(search.nfa().as_bytes(), &[0]);

    // The NFA never matches.
    let ci = LineIndexer::new(b"abc", &classifier);
    assert!(!search.execute(&ci, 0, ci.len()));
    assert!(!search.failure());

    // A compile error doesn't leave state behind.
    search.compile(b"[ab]c", true, FindFlags::none()).unwrap();
    assert!(search.execute(&ci, 0, ci.len()));
    assert_eq!(search.span(0), Some(1..3));
}

#[test]
fn captures() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search
        .compile(br"\(\w+\)=\(\w*\)", true, FindFlags::none())
        .unwrap();

    let ci = LineIndexer::new(b"  key=value", &classifier);

    assert!(search.execute(&ci, 0, ci.len()));
    assert_eq!(search.bopat(0), 2);
    assert_eq!(search.eopat(0), 11);
    assert_eq!(search.span(1), Some(2..5));
    assert_eq!(search.span(2), Some(6..11));
    assert_eq!(search.span(3), None);
    assert_eq!(search.span(10), None);
    assert_eq!(search.bopat(10), NOTFOUND);

    // Nothing is copied until grab_matches is called.
    assert_eq!(search.pat(0), b"");

    search.grab_matches(&ci);

    for n in 0..3 {
        let expected: Vec<u8> = search
            .span(n)
            .unwrap()
            .map(|pos| ci.char_at(pos))
            .collect();
        assert_eq!(search.pat(n), expected.as_slice());
    }

    assert_eq!(search.pat(0), b"key=value");
    assert_eq!(search.pat(1), b"key");
    assert_eq!(search.pat(2), b"value");
    assert_eq!(search.pat(42), b"");

    search.clear();
    assert_eq!(search.span(0), None);
    assert_eq!(search.pat(1), b"");
}

#[test]
fn execute_clears_previous_captures() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(br"\(b\)", true, FindFlags::none()).unwrap();

    let ci = LineIndexer::new(b"abc", &classifier);
    assert!(search.execute(&ci, 0, ci.len()));
    search.grab_matches(&ci);
    assert_eq!(search.pat(1), b"b");

    let ci = LineIndexer::new(b"xyz", &classifier);
    assert!(!search.execute(&ci, 0, ci.len()));
    assert_eq!(search.span(1), None);
    assert_eq!(search.pat(1), b"");
}

#[test]
fn execute_from_keeps_line_start() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search.compile(b"^a", true, FindFlags::none()).unwrap();

    let ci = LineIndexer::new(b"aaa", &classifier);
    assert!(search.execute(&ci, 1, ci.len()));
    assert_eq!(search.span(0), Some(1..2));
    assert!(!search.execute_from(&ci, 0, 1, ci.len()));

    search.compile(br"\<a", true, FindFlags::none()).unwrap();
    let ci = LineIndexer::new(b"ba a", &classifier);
    assert!(search.execute_from(&ci, 0, 1, ci.len()));
    assert_eq!(search.span(0), Some(3..4));
}

#[test]
fn substitute() {
    let classifier = CharClassify::new();
    let mut search = RESearch::new(&classifier);

    search
        .compile(br"\(\w+\)=\(\w+\)", true, FindFlags::none())
        .unwrap();

    let ci = LineIndexer::new(b"key=value", &classifier);
    assert!(search.execute(&ci, 0, ci.len()));
    search.grab_matches(&ci);

    assert_eq!(search.substitute(br"\2=\1"), b"value=key");
    assert_eq!(search.substitute(br"[\0]"), b"[key=value]");
    assert_eq!(search.substitute(br"\1\t\2\n"), b"key\tvalue\n");
    assert_eq!(search.substitute(br"\a\b\f\r\v"), b"\x07\x08\x0c\r\x0b");
    assert_eq!(search.substitute(br"a\\b"), br"a\b");
    assert_eq!(search.substitute(br"\q\3"), br"\q");
    assert_eq!(search.substitute(br"end\"), br"end\");
    assert_eq!(search.substitute(b""), b"");
}
