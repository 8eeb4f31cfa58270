/*! Classification of bytes into character classes.

The engine needs to know which bytes are part of words for implementing the
`\w`, `\W`, `\<` and `\>` constructs, and for deciding whether a literal
character must be matched case-insensitively. The host editor owns this
knowledge, because users can change the set of word characters. The
[`CharClassify`] table is the way the host passes it to the engine.
*/

/// The class of a byte, as seen by word-oriented operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Blanks and control characters.
    Space,
    /// Line terminators (`\r` and `\n`).
    NewLine,
    /// Characters that form words.
    Word,
    /// Everything else.
    Punctuation,
}

/// Table that maps each of the 256 possible bytes to a [`CharClass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClassify {
    table: [CharClass; 256],
}

impl Default for CharClassify {
    fn default() -> Self {
        Self::new()
    }
}

impl CharClassify {
    /// Creates a table with the default classes.
    ///
    /// See [`CharClassify::set_default_char_classes`] for details.
    pub fn new() -> Self {
        let mut classify = Self { table: [CharClass::Space; 256] };
        classify.set_default_char_classes(true);
        classify
    }

    /// Resets the table to the default classes.
    ///
    /// `\r` and `\n` are line terminators, the remaining bytes below 0x20 and
    /// the space are blanks. When `include_word_class` is true, ASCII letters
    /// and digits, the underscore and every byte >= 0x80 are word characters.
    /// Everything else is punctuation.
    pub fn set_default_char_classes(&mut self, include_word_class: bool) {
        for (byte, class) in (0..=u8::MAX).zip(self.table.iter_mut()) {
            *class = if byte == b'\r' || byte == b'\n' {
                CharClass::NewLine
            } else if byte < 0x20 || byte == b' ' {
                CharClass::Space
            } else if include_word_class
                && (byte >= 0x80 || byte.is_ascii_alphanumeric() || byte == b'_')
            {
                CharClass::Word
            } else {
                CharClass::Punctuation
            };
        }
    }

    /// Assigns `class` to every byte in `chars`.
    pub fn set_char_classes(&mut self, chars: &[u8], class: CharClass) {
        for c in chars {
            self.table[*c as usize] = class;
        }
    }

    /// Returns the class of a byte.
    #[inline]
    pub fn get_class(&self, ch: u8) -> CharClass {
        self.table[ch as usize]
    }

    /// Returns true if the byte is a word character.
    #[inline]
    pub fn is_word(&self, ch: u8) -> bool {
        self.table[ch as usize] == CharClass::Word
    }

    /// Returns all the bytes that belong to `class`, in ascending order.
    pub fn get_chars_of_class(&self, class: CharClass) -> Vec<u8> {
        (0..=u8::MAX).filter(|c| self.get_class(*c) == class).collect()
    }
}
