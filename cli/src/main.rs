mod commands;
mod config;
mod help;

#[cfg(test)]
mod tests;

use std::io;
use std::path::PathBuf;
use std::{panic, process};

use anyhow::Context;
use crossterm::tty::IsTty;
use yansi::Color::Red;
use yansi::Paint;

use crate::commands::cli;
use crate::config::{load_config_from_file, Config};

const APP_HELP_TEMPLATE: &str = r#"rsr {version}, line-oriented regular expression search.

{author-with-newline}
{before-help}{usage-heading}
  {usage}

{all-args}{after-help}
"#;

const EXIT_ERROR: i32 = 1;
const CONFIG_FILE: &str = ".rsr.toml";

fn main() -> anyhow::Result<()> {
    // Enable support for ANSI escape codes in Windows. In other platforms
    // this is a no-op.
    if let Err(err) = enable_ansi_support::enable_ansi_support() {
        println!("could not enable ANSI support: {}", err)
    }

    #[cfg(feature = "logging")]
    env_logger::init();

    let args = cli().get_matches();

    // Exit as soon as some panic occurs, with the same status used for
    // errors.
    let orig_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        orig_hook(panic_info);
        process::exit(EXIT_ERROR);
    }));

    let result = load_config(args.get_one::<PathBuf>("config")).and_then(
        |config| {
            // Colors are turned off when stdout is redirected, so that the
            // output doesn't contain ANSI escape codes.
            if !config.output.color || !io::stdout().is_tty() {
                yansi::disable();
            }
            match args.subcommand() {
                Some(("find", args)) => commands::exec_find(args, &config),
                Some(("replace", args)) => {
                    commands::exec_replace(args, &config)
                }
                Some(("dump", args)) => commands::exec_dump(args, &config),
                _ => unreachable!(),
            }
        },
    );

    if let Err(err) = result {
        if let Some(source) = err.source() {
            eprintln!("{} {}: {}", "error:".paint(Red).bold(), err, source);
        } else {
            eprintln!("{} {}", "error:".paint(Red).bold(), err);
        }
        process::exit(EXIT_ERROR);
    }

    Ok(())
}

/// Loads the config file given with `--config`, or `~/.rsr.toml` if it
/// exists. Without a config file the defaults are used.
fn load_config(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.clone(),
        None => match home::home_dir() {
            Some(home) if !home.as_os_str().is_empty() => {
                home.join(CONFIG_FILE)
            }
            _ => return Ok(Config::default()),
        },
    };

    if !path.is_file() {
        return Ok(Config::default());
    }

    load_config_from_file(&path).with_context(|| {
        format!("can not load config file `{}`", path.display())
    })
}
