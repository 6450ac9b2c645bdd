mod cli;
mod logging;

use clap::Parser;
use cli::Cli;

fn main() {
    let cli = Cli::parse();
    logging::init();

    if let Err(e) = cli::run::run(&cli) {
        tracing::debug!(code = e.error_code(), "exiting with error");
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
