mod dump;
mod find;
mod replace;

pub use dump::*;
pub use find::*;
pub use replace::*;

use std::fs;
use std::io::{stdin, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use clap::{arg, command, crate_authors, value_parser, ArgMatches, Command};
use research::{FindFlag, FindFlags, RESearch};

use crate::config::SearchConfig;
use crate::{commands, help, APP_HELP_TEMPLATE};

pub fn command(name: &'static str) -> Command {
    Command::new(name).help_template(
        r#"{about-with-newline}
{usage-heading}
  {usage}

{all-args}
"#,
    )
}

pub fn cli() -> Command {
    command!()
        .author(crate_authors!("\n")) // requires `cargo` feature
        .arg_required_else_help(true)
        .arg(
            arg!(-C --config <CONFIG_FILE> "Config file")
                .value_parser(existing_path_parser)
                .long_help(help::CONFIG_FILE),
        )
        .help_template(APP_HELP_TEMPLATE)
        .subcommand_required(true)
        .subcommands(vec![
            commands::find(),
            commands::replace(),
            commands::dump(),
        ])
}

/// Adds the `<PATTERN>` argument and the options that control how it is
/// compiled.
fn pattern_args(command: Command) -> Command {
    command
        .arg(arg!(<PATTERN>).help("Regular expression").long_help(
            help::PATTERN_LONG_HELP,
        ))
        // Keep options sorted alphabetically by their long name.
        .arg(arg!(-i --"ignore-case").help("Match case-insensitively"))
        .arg(
            arg!(--posix)
                .help("Use ( and ) for tagged subexpressions instead of \\( and \\)"),
        )
}

/// Adds the optional `[PATH]...` argument.
fn path_args(command: Command) -> Command {
    command.arg(
        arg!([PATH] ...)
            .help("Files to search, the standard input is used if none is given")
            .value_parser(value_parser!(PathBuf)),
    )
}

/// Compiles the pattern passed in the command-line with the options given
/// by `args` and `config`.
fn compile_pattern(
    search: &mut RESearch,
    args: &ArgMatches,
    config: &SearchConfig,
) -> anyhow::Result<()> {
    let pattern = args
        .get_one::<String>("PATTERN")
        .ok_or(anyhow!("missing pattern"))?;

    let case_sensitive = config.case_sensitive && !args.get_flag("ignore-case");
    let posix = config.posix || args.get_flag("posix");

    let mut flags = FindFlags::none();
    flags.set(FindFlag::RegExp);
    if case_sensitive {
        flags.set(FindFlag::MatchCase);
    }
    if posix {
        flags.set(FindFlag::Posix);
    }

    search
        .compile(pattern.as_bytes(), case_sensitive, flags)
        .with_context(|| format!("invalid pattern `{}`", pattern))
}

/// Calls `f` with the path and the content of each input file. When no
/// paths were given in the command-line the content of the standard input
/// is passed instead, without a path.
fn for_each_input<F>(args: &ArgMatches, mut f: F) -> anyhow::Result<()>
where
    F: FnMut(Option<&Path>, &[u8]) -> anyhow::Result<()>,
{
    match args.get_many::<PathBuf>("PATH") {
        Some(paths) => {
            for path in paths {
                let data = fs::read(path).with_context(|| {
                    format!("can not read `{}`", path.display())
                })?;
                f(Some(path), &data)?;
            }
        }
        None => {
            let mut data = Vec::new();
            stdin()
                .read_to_end(&mut data)
                .context("can not read from standard input")?;
            f(None, &data)?;
        }
    }
    Ok(())
}

/// Parses a path and makes sure that it exists.
fn existing_path_parser(input: &str) -> Result<PathBuf, anyhow::Error> {
    let path = PathBuf::from(input);
    if path.try_exists()? {
        Ok(path)
    } else {
        Err(anyhow!("file not found"))
    }
}
