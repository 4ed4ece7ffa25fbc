use std::process::ExitCode;

use clap::Parser;
use permuterm_search::cli::Cli;
use permuterm_search::{driver, tracing as app_tracing};

fn main() -> ExitCode {
    app_tracing::init();

    let cli = Cli::parse();

    let (vocab, tree, names) = match driver::ingest(&cli.documents) {
        Ok(built) => built,
        Err(err) => {
            eprintln!("{}", err.user_message());
            return ExitCode::FAILURE;
        }
    };

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = driver::repl(stdin.lock(), stdout.lock(), &vocab, &tree, &names) {
        tracing::error!(error = %e, "REPL terminated with an I/O error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
