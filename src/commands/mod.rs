//! Subcommand entry points.
pub mod apply;
pub mod list;
pub mod version;

use std::io;

use clap::CommandFactory as _;
use clap_complete::Shell;

use crate::cli::Cli;

/// Write completions for `shell` to stdout.
pub fn completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "appconf", &mut io::stdout());
}
