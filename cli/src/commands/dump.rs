use clap::{ArgMatches, Command};
use research::RESearch;

use crate::config::Config;
use crate::help;

/// Creates the `dump` command.
///
/// The `dump` command shows the NFA produced for a pattern.
pub fn dump() -> Command {
    super::pattern_args(
        super::command("dump")
            .about("Show the compiled form of a pattern")
            .long_about(help::DUMP_LONG_HELP),
    )
}

/// Executes the `dump` command.
pub fn exec_dump(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let classifier = config.search.classifier();
    let mut search = RESearch::new(&classifier);

    super::compile_pattern(&mut search, args, &config.search)?;

    // The disassembly starts with an empty line.
    print!("{}", search.nfa().to_string().trim_start());

    Ok(())
}
