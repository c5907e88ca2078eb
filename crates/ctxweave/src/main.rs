use std::io;
use std::sync::Arc;

use clap::Parser;
use ctxweave::cli::Cli;
use ctxweave_input::RealStdin;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = cli.into_options();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = ctxweave::run(&options, Arc::new(RealStdin), &mut out) {
        eprintln!("Fatal error: {:#}", e);
        std::process::exit(2);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
