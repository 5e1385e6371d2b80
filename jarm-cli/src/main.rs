//! `jarm` — concurrent JARM fingerprint scanner CLI.

use std::process::ExitCode;

use clap::Parser;
use jarm_cli::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.debug { log::LevelFilter::Debug } else { log::LevelFilter::Info };
    env_logger::Builder::new().filter_level(filter).init();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("failed to start async runtime: {err}");
            return ExitCode::from(2);
        }
    };

    match runtime.block_on(jarm_cli::run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("jarm: {err}");
            ExitCode::from(2)
        }
    }
}
