// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// mit-tools — command line entry point.
//
// Parses arguments, initialises logging, loads the configuration, and runs
// the chosen subcommand.

mod cli;
mod commands;

use clap::Parser;

fn main() {
    let args = cli::Args::parse();
    cli::init_logging(args.log_level.as_deref());

    tracing::debug!(command = ?args.command, "mittools starting");

    if let Err(err) = cli::dispatch(args) {
        tracing::error!("{:#}", err);
        eprintln!("error: {:#}", err);
        std::process::exit(1);
    }
}
