use std::io::{stdout, Write};

use bstr::ByteSlice;
use clap::{arg, ArgMatches, Command};
use research::{LineIndexer, RESearch};
use yansi::Color::Green;
use yansi::Paint;

use crate::config::Config;
use crate::help;

/// Creates the `replace` command.
pub fn replace() -> Command {
    let command = super::command("replace")
        .about("Replace the first match in each line")
        .long_about(help::REPLACE_LONG_HELP);

    super::path_args(super::pattern_args(command).arg(
        arg!(<TEMPLATE>).help("Replacement, may refer to the match with \\0 to \\9"),
    ))
}

/// Executes the `replace` command.
pub fn exec_replace(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let template = args
        .get_one::<String>("TEMPLATE")
        .map(|template| template.as_bytes())
        .unwrap_or_default();

    let classifier = config.search.classifier();
    let mut search = RESearch::new(&classifier);

    super::compile_pattern(&mut search, args, &config.search)?;

    let mut output = stdout().lock();

    super::for_each_input(args, |_, data| {
        for line in data.lines() {
            let indexer = LineIndexer::new(line, &classifier);

            let span = if search.execute(&indexer, 0, indexer.len()) {
                search.span(0)
            } else {
                None
            };

            match span {
                Some(span) => {
                    search.grab_matches(&indexer);
                    let replacement = search.substitute(template);
                    writeln!(
                        output,
                        "{}{}{}",
                        line[..span.start as usize].as_bstr(),
                        replacement.as_bstr().paint(Green),
                        line[span.end as usize..].as_bstr(),
                    )?;
                }
                None => writeln!(output, "{}", line.as_bstr())?,
            }
        }
        Ok(())
    })?;

    output.flush()?;

    Ok(())
}
