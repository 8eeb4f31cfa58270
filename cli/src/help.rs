pub const CONFIG_FILE: &str = r#"Config file for rsr

Specifies a config file which controls the behavior of rsr. If config file is not
specified, ${HOME}/.rsr.toml is used. If it does not exist the default options are
applied.

Supported options:

[search]
case_sensitive = true
posix = false
word_chars = "-$"

[output]
color = true"#;

pub const PATTERN_LONG_HELP: &str = r#"Regular expression

Supported syntax:

  .          any character
  [abc]      character class, [^abc] negated class, [a-z] range
  * + ?      zero or more, one or more, zero or one (greedy)
  *?         zero or more (lazy)
  ^ $        start and end of line
  \< \>      start and end of word
  \h \H      start and end of word, as the editor sees them
  \i         to the end of the current word
  \( \)      tagged subexpression, ( ) with --posix
  \1 .. \9   text matched by a tagged subexpression
  \w \W      word character, non-word character
  \d \D      digit, non-digit
  \s \S      blank, non-blank
  \xHH       character with hexadecimal code HH"#;

pub const FIND_LONG_HELP: &str = r#"Print lines that match a pattern

Each line is searched separately, a match never spans multiple lines. When
no <PATH> is given, the standard input is searched.

Examples:

rsr find 'fo+' src/main.rs
rsr find -n --posix '(\w+)=\1' config.ini"#;

pub const REPLACE_LONG_HELP: &str = r#"Replace the first match in each line

Every line of the input is printed, with the first match of <PATTERN> replaced
by <TEMPLATE>. In <TEMPLATE>, \0 is the whole match, \1 to \9 are the tagged
subexpressions and \n, \t, \r, \a, \b, \f, \v and \\ are escapes.

Examples:

rsr replace '\(\w+\)=\(\w+\)' '\2=\1' config.ini"#;

pub const DUMP_LONG_HELP: &str = r#"Show the compiled form of a pattern

Prints the instructions of the NFA produced for <PATTERN>, one per line,
prefixed by their offset within the NFA."#;
