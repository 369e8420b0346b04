//! `designpad` command-line entry point.

use clap::Parser;
use designpad_app::{Cli, run};

fn main() {
    env_logger::init();
    log::info!("Starting DesignPad");

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
