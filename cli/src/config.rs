use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use research::{CharClass, CharClassify};
use serde::{Deserialize, Serialize};

/// Configuration for the CLI.
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Options that control how patterns are compiled and matched.
    pub search: SearchConfig,
    /// Options that control the output.
    pub output: OutputConfig,
}

/// Configuration for pattern compilation and matching.
#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Match case-sensitively unless `--ignore-case` is used.
    pub case_sensitive: bool,
    /// Use POSIX syntax for groups even without `--posix`.
    pub posix: bool,
    /// Extra characters that are considered part of words, in addition to
    /// letters, digits, the underscore and non-ASCII bytes.
    pub word_chars: String,
}

/// Configuration for the output.
#[derive(Deserialize, Serialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Highlight matches with colors. Colors are never used when the
    /// output is not a terminal.
    pub color: bool,
}

impl Default for SearchConfig {
    fn default() -> SearchConfig {
        SearchConfig {
            case_sensitive: true,
            posix: false,
            word_chars: String::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> OutputConfig {
        OutputConfig { color: true }
    }
}

impl SearchConfig {
    /// Returns the character classification implied by this configuration.
    pub fn classifier(&self) -> CharClassify {
        let mut classifier = CharClassify::new();
        classifier.set_char_classes(self.word_chars.as_bytes(), CharClass::Word);
        classifier
    }
}

/// Load a config file from a given path. Path must contain a valid TOML file
/// or this function will propagate the error.
pub fn load_config_from_file(
    config_file: &Path,
) -> Result<Config, Box<figment::Error>> {
    let config: Config =
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file_exact(config_file))
            .extract()?;
    Ok(config)
}
