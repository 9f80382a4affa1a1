use std::process::ExitCode;

use clap::Parser;
use mindroot_cli::Cli;
use mindroot_cli::failure_message;
use mindroot_cli::init_logging;
use mindroot_cli::run;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", failure_message(&err));
            ExitCode::FAILURE
        }
    }
}
