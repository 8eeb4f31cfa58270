/*! Access to the text being searched.

The matcher never sees the text as a slice. Instead it asks a
[`CharacterIndexer`] for individual bytes and for the location of character
and word boundaries. This way the host can search text stored in any data
structure (gap buffers, piece tables, ropes), and multi-byte encodings are
handled by the host instead of the matcher.

[`LineIndexer`] is the implementation used for plain UTF-8 lines stored in a
byte slice.
*/

use crate::charclass::{CharClass, CharClassify};

/// Random access view over the text searched by the engine.
///
/// Positions are byte offsets. Positions outside the text are allowed, and
/// `char_at` returns 0 for them.
pub trait CharacterIndexer {
    /// Returns the byte at `pos`, or 0 if `pos` is outside the text.
    fn char_at(&self, pos: isize) -> u8;

    /// Returns `pos` if it is already at a character boundary, or the
    /// nearest boundary in the direction indicated by `dir` (which is
    /// either 1 or -1) otherwise.
    fn move_position_outside_char(&self, pos: isize, dir: isize) -> isize;

    /// Returns the position of the character boundary that is one character
    /// away from `pos` in the direction indicated by `dir`.
    fn next_position(&self, pos: isize, dir: isize) -> isize;

    /// Returns true if a word starts at `pos`.
    fn is_word_start_at(&self, pos: isize) -> bool;

    /// Returns true if a word ends at `pos`.
    fn is_word_end_at(&self, pos: isize) -> bool;

    /// Starting at `pos`, moves in the direction indicated by `dir` while
    /// the characters found belong to the same class as the first one, and
    /// returns the position where it stopped.
    fn extend_word_select(&self, pos: isize, dir: isize) -> isize;
}

/// A [`CharacterIndexer`] for a single line of UTF-8 text.
///
/// Invalid UTF-8 sequences are treated as sequences of one-byte characters.
/// The class of ASCII characters is given by the [`CharClassify`] table,
/// while every non-ASCII character is considered a word character.
pub struct LineIndexer<'a> {
    text: &'a [u8],
    classifier: &'a CharClassify,
}

impl<'a> LineIndexer<'a> {
    /// Creates a new [`LineIndexer`] for `text`.
    pub fn new(text: &'a [u8], classifier: &'a CharClassify) -> Self {
        Self { text, classifier }
    }

    /// Length of the line in bytes.
    #[inline]
    pub fn len(&self) -> isize {
        self.text.len() as isize
    }

    /// Returns true if the line is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns the underlying bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.text
    }

    /// Number of bytes in the character that starts at `pos`. Bytes that
    /// don't start a well-formed sequence count as one-byte characters.
    fn char_width_at(&self, pos: usize) -> usize {
        let lead = match self.text.get(pos) {
            Some(lead) => *lead,
            None => return 0,
        };
        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return 1,
        };
        match self.text.get(pos + 1..pos + width) {
            Some(tail) if tail.iter().all(|b| is_continuation(*b)) => width,
            _ => 1,
        }
    }

    /// Start of the character that ends at `pos`, which must be > 0.
    fn char_start_before(&self, pos: usize) -> usize {
        let lowest = pos.saturating_sub(4);
        let mut start = pos - 1;
        while start > lowest && is_continuation(self.text[start]) {
            start -= 1;
        }
        if start + self.char_width_at(start) == pos {
            start
        } else {
            pos - 1
        }
    }

    fn class_of_char_at(&self, pos: usize) -> CharClass {
        match self.text.get(pos) {
            Some(b) if *b < 0x80 => self.classifier.get_class(*b),
            Some(_) => CharClass::Word,
            None => self.classifier.get_class(0),
        }
    }

    fn class_after(&self, pos: isize) -> CharClass {
        if pos < 0 || pos >= self.len() {
            return self.classifier.get_class(0);
        }
        self.class_of_char_at(pos as usize)
    }

    fn class_before(&self, pos: isize) -> CharClass {
        if pos <= 0 || pos > self.len() {
            return self.classifier.get_class(0);
        }
        self.class_of_char_at(self.char_start_before(pos as usize))
    }
}

impl CharacterIndexer for LineIndexer<'_> {
    fn char_at(&self, pos: isize) -> u8 {
        usize::try_from(pos)
            .ok()
            .and_then(|pos| self.text.get(pos))
            .copied()
            .unwrap_or(0)
    }

    fn move_position_outside_char(&self, pos: isize, dir: isize) -> isize {
        if pos <= 0 || pos >= self.len() {
            return pos.clamp(0, self.len());
        }
        let upos = pos as usize;
        if !is_continuation(self.text[upos]) {
            return pos;
        }
        let lowest = upos.saturating_sub(3);
        let mut start = upos;
        while start > lowest && is_continuation(self.text[start]) {
            start -= 1;
        }
        let end = start + self.char_width_at(start);
        if end <= upos {
            // Stray continuation byte, it is a character on its own.
            return pos;
        }
        if dir > 0 {
            end as isize
        } else {
            start as isize
        }
    }

    fn next_position(&self, pos: isize, dir: isize) -> isize {
        if dir > 0 {
            if pos >= self.len() {
                return self.len();
            }
            let pos = self.move_position_outside_char(pos.max(0), -1);
            pos + self.char_width_at(pos as usize) as isize
        } else {
            if pos <= 0 {
                return 0;
            }
            let pos = self.move_position_outside_char(pos.min(self.len()), 1);
            self.char_start_before(pos as usize) as isize
        }
    }

    fn is_word_start_at(&self, pos: isize) -> bool {
        if pos < 0 || pos >= self.len() {
            return false;
        }
        let after = self.class_after(pos);
        matches!(after, CharClass::Word | CharClass::Punctuation)
            && after != self.class_before(pos)
    }

    fn is_word_end_at(&self, pos: isize) -> bool {
        if pos <= 0 || pos > self.len() {
            return false;
        }
        let before = self.class_before(pos);
        matches!(before, CharClass::Word | CharClass::Punctuation)
            && before != self.class_after(pos)
    }

    fn extend_word_select(&self, pos: isize, dir: isize) -> isize {
        let mut pos = pos.clamp(0, self.len());
        if dir < 0 {
            let start_class = self.class_before(pos);
            while pos > 0 && self.class_before(pos) == start_class {
                pos = self.char_start_before(pos as usize) as isize;
            }
        } else {
            let start_class = self.class_after(pos);
            while pos < self.len() && self.class_after(pos) == start_class {
                pos += self.char_width_at(pos as usize) as isize;
            }
        }
        self.move_position_outside_char(pos, dir)
    }
}

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{CharacterIndexer, LineIndexer};
    use crate::charclass::CharClassify;

    #[test]
    fn char_at() {
        let cc = CharClassify::new();
        let ci = LineIndexer::new(b"abc", &cc);

        assert_eq!(ci.char_at(0), b'a');
        assert_eq!(ci.char_at(2), b'c');
        assert_eq!(ci.char_at(3), 0);
        assert_eq!(ci.char_at(-1), 0);
    }

    #[test]
    fn multi_byte_boundaries() {
        let cc = CharClassify::new();
        // "aé€b": a(0) é(1..3) €(3..6) b(6)
        let text = "a\u{e9}\u{20ac}b".as_bytes();
        let ci = LineIndexer::new(text, &cc);

        assert_eq!(ci.move_position_outside_char(1, 1), 1);
        assert_eq!(ci.move_position_outside_char(2, 1), 3);
        assert_eq!(ci.move_position_outside_char(2, -1), 1);
        assert_eq!(ci.move_position_outside_char(4, 1), 6);
        assert_eq!(ci.move_position_outside_char(5, -1), 3);
        assert_eq!(ci.move_position_outside_char(7, -1), 7);

        assert_eq!(ci.next_position(0, 1), 1);
        assert_eq!(ci.next_position(1, 1), 3);
        assert_eq!(ci.next_position(3, 1), 6);
        assert_eq!(ci.next_position(7, 1), 7);
        assert_eq!(ci.next_position(6, -1), 3);
        assert_eq!(ci.next_position(3, -1), 1);
        assert_eq!(ci.next_position(0, -1), 0);
    }

    #[test]
    fn invalid_utf8_is_single_bytes() {
        let cc = CharClassify::new();
        let ci = LineIndexer::new(b"a\x80\xC3b", &cc);

        assert_eq!(ci.move_position_outside_char(1, 1), 1);
        assert_eq!(ci.next_position(1, 1), 2);
        assert_eq!(ci.next_position(2, 1), 3);
        assert_eq!(ci.next_position(3, -1), 2);
    }

    #[test]
    fn word_predicates() {
        let cc = CharClassify::new();
        let ci = LineIndexer::new(b"foo bar+=baz", &cc);

        assert!(ci.is_word_start_at(0));
        assert!(!ci.is_word_start_at(1));
        assert!(!ci.is_word_start_at(3));
        assert!(ci.is_word_start_at(4));
        // Runs of punctuation are words too.
        assert!(ci.is_word_start_at(7));
        assert!(!ci.is_word_start_at(8));
        assert!(ci.is_word_start_at(9));
        assert!(!ci.is_word_start_at(12));

        assert!(!ci.is_word_end_at(0));
        assert!(ci.is_word_end_at(3));
        assert!(!ci.is_word_end_at(4));
        assert!(ci.is_word_end_at(7));
        assert!(ci.is_word_end_at(9));
        assert!(ci.is_word_end_at(12));
    }

    #[test]
    fn extend_word_select() {
        let cc = CharClassify::new();
        let ci = LineIndexer::new(b"foo bar+=baz", &cc);

        assert_eq!(ci.extend_word_select(0, 1), 3);
        assert_eq!(ci.extend_word_select(1, 1), 3);
        assert_eq!(ci.extend_word_select(3, 1), 4);
        assert_eq!(ci.extend_word_select(7, 1), 9);
        assert_eq!(ci.extend_word_select(12, 1), 12);
        assert_eq!(ci.extend_word_select(6, -1), 4);
        assert_eq!(ci.extend_word_select(3, -1), 0);
        assert_eq!(ci.extend_word_select(0, -1), 0);
    }
}
