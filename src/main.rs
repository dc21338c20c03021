//! `appconf` binary: parses arguments and dispatches to [`appconf_cli::commands`].
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use appconf_cli::cli::{Cli, Command};
use appconf_cli::commands;
use appconf_cli::logging::{Logger, init_subscriber};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();

    let command = match &args.command {
        Command::Apply(_) => "apply",
        Command::List => "list",
        Command::Completions { .. } => "completions",
        Command::Version => "version",
    };
    init_subscriber(args.verbose, command);
    let log = Arc::new(Logger::new(command));

    match args.command {
        Command::Apply(opts) => commands::apply::run(&opts, args.dry_run, &log),
        Command::List => {
            commands::list::run(&log);
            Ok(())
        }
        Command::Completions { shell } => {
            commands::completions(shell);
            Ok(())
        }
        Command::Version => {
            commands::version::run(&log);
            Ok(())
        }
    }
}
