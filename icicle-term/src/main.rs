mod app;
mod buffer;
mod cli;
mod render;
mod terminal;
mod trace;

use std::fs::File;

use clap::Parser;
use simplelog::{Config, LevelFilter, WriteLogger};

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    match File::create(&cli.log_file) {
        Ok(file) => {
            if let Err(e) = WriteLogger::init(level, Config::default(), file) {
                eprintln!("Warning: logging disabled: {}", e);
            }
        }
        Err(e) => eprintln!(
            "Warning: cannot create log file {}: {}",
            cli.log_file.display(),
            e
        ),
    }

    if let Err(e) = app::run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
