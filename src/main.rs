use clap::Parser;
use color_eyre::eyre::{Report, Result};
use jackknife::{cli, cli::Cli};

fn main() -> Result<(), Report> {
    // Parse CLI parameters
    let args = Cli::parse();

    // initialize color_eyre crate for colorized logs
    color_eyre::install()?;

    // Set logging/verbosity level via RUST_LOG
    std::env::set_var("RUST_LOG", args.verbosity.to_string());

    // initialize env_logger crate for logging/verbosity level
    env_logger::init();

    match args.command {
        cli::Command::Run(args) => {
            jackknife::validate::run(&args)?;
        }
    }

    Ok(())
}
