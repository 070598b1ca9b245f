// shortform-cli/src/main.rs
//
// Entry point of the `shortform` binary: parses the command line, installs
// logging, dispatches the subcommand and maps failures to exit status 1.

use clap::Parser;
use shortform_cli::{Cli, Commands, logging, output, run_convert, run_submit};
use std::process;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init_logging(cli.verbose, cli.log_dir.as_deref()) {
        output::print_error(&e.to_string());
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Convert(args) => run_convert(args),
        Commands::Submit(args) => run_submit(args),
    };

    if let Err(e) = result {
        log::debug!("Command failed: {e:?}");
        output::print_error(&e.to_string());
        process::exit(1);
    }
}
