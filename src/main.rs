use anyhow::Context;
use clap::Parser;
use std::process;
use vitibrasil_processor::cli::{args::Args, commands};

fn main() {
    let args = Args::parse();
    let command = args.command.name();

    let result = commands::run(args).with_context(|| format!("{} command failed", command));

    match result {
        Ok(outcome) => process::exit(outcome.exit_code()),
        Err(error) => {
            eprintln!("Error: {:#}", error);
            process::exit(1);
        }
    }
}
