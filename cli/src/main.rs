// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::{io, process};

use mimc_cli::MimcOptions;
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

// COMMAND RUNNER
// ================================================================================================

fn main() {
    // read command-line args
    let options = MimcOptions::from_args();

    // configure logging; RUST_LOG takes precedence over the verbosity flag
    let default_filter = if options.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    if let Err(err) = mimc_cli::run(&options, &mut stdout.lock()) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}
