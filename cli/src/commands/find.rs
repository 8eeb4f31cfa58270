use std::io::{stdout, Write};
use std::ops::Range;
use std::path::Path;

use bstr::ByteSlice;
use clap::{arg, ArgMatches, Command};
use research::{find_in_lines, RESearch};
use yansi::Color::{Green, Magenta, Red};
use yansi::Paint;

use crate::config::Config;
use crate::help;

/// Creates the `find` command.
pub fn find() -> Command {
    let command = super::command("find")
        .about("Print lines that match a pattern")
        .long_about(help::FIND_LONG_HELP);

    super::path_args(super::pattern_args(command))
        .arg(
            arg!(-a --all)
                .help("Highlight every match in each line, not only the first"),
        )
        .arg(
            arg!(-n --"line-number")
                .help("Print the line number of each matching line"),
        )
}

/// Executes the `find` command.
pub fn exec_find(args: &ArgMatches, config: &Config) -> anyhow::Result<()> {
    let all = args.get_flag("all");
    let line_numbers = args.get_flag("line-number");

    let classifier = config.search.classifier();
    let mut search = RESearch::new(&classifier);

    super::compile_pattern(&mut search, args, &config.search)?;

    let mut output = stdout().lock();

    super::for_each_input(args, |path, data| {
        let mut matches =
            find_in_lines(&mut search, data, &classifier).all(all).peekable();

        while let Some(first) = matches.next() {
            let mut spans = vec![first.span.clone()];
            while let Some(next) = matches.next_if(|m| m.line == first.line) {
                spans.push(next.span);
            }
            print_line(
                &mut output,
                path,
                line_numbers.then_some(first.line),
                first.text,
                &spans,
            )?;
        }

        Ok(())
    })?;

    output.flush()?;

    Ok(())
}

/// Prints a line in the `path:line:text` form, highlighting the given
/// spans.
fn print_line<W: Write>(
    output: &mut W,
    path: Option<&Path>,
    line: Option<usize>,
    text: &[u8],
    spans: &[Range<usize>],
) -> anyhow::Result<()> {
    if let Some(path) = path {
        write!(output, "{}:", path.display().paint(Magenta))?;
    }
    if let Some(line) = line {
        write!(output, "{}:", line.paint(Green))?;
    }

    let mut pos = 0;
    for span in spans {
        write!(
            output,
            "{}{}",
            text[pos..span.start].as_bstr(),
            text[span.clone()].as_bstr().paint(Red).bold()
        )?;
        pos = span.end;
    }

    writeln!(output, "{}", text[pos..].as_bstr())?;

    Ok(())
}
