//! Entry point for the `speedlimits` command.
#![forbid(unsafe_code)]

use std::error::Error as _;

use env_logger::Env;
use speedlimit_cli::CliError;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    match speedlimit_cli::run() {
        Ok(_) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("speedlimits: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            std::process::exit(1);
        }
    }
}
