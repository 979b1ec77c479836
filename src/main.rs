// src/main.rs

use clap::Parser;
use debindex::cli::Args;
use debindex::{logging, Config, Error, Interrupt};
use log::{error, info, warn};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let args = Args::parse();
    let config = Config::from_args(args);
    logging::init_logger(config.log_level.filter());

    println!("Debian Index Statistics Tool \"{}\"", env!("CARGO_PKG_NAME"));
    let start_time = Instant::now();

    let interrupt = Interrupt::install().unwrap_or_else(|e| {
        warn!("Could not install SIGINT handler: {}", e);
        Interrupt::new()
    });

    let code = {
        let mut stdout = std::io::stdout().lock();
        match debindex::run(&config, &interrupt, &mut stdout) {
            Ok(result) => {
                info!(
                    "Counted {} entries over {} packages in {:.2?}.",
                    result.total(),
                    result.len(),
                    start_time.elapsed()
                );
                ExitCode::SUCCESS
            }
            Err(Error::Cancelled) => {
                info!("Canceled by user.");
                ExitCode::SUCCESS
            }
            Err(e) if e.is_handled() => {
                error!("{}", e);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        }
    };

    println!("Finished.");
    code
}
