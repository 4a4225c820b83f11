//! dmrradio - DMR radio codeplug, firmware and user database utility
//!
//! Reads and writes codeplugs on a radio, converts codeplugs between the
//! native, text, JSON and spreadsheet formats, and downloads, filters and
//! loads user databases.
//!
//! # Architecture
//!
//! Radios are reached through the `Radio` trait from `dmrradio-core`, so
//! every command works with any backend selected by `--device`. Each
//! subcommand hands off to exactly one collaborator: the codeplug loader,
//! the user database, or the radio. Long operations report progress through
//! a phase-labelled reporter.

mod cli;
mod commands;
mod display;
mod radios;
mod router;

use std::path::Path;

use clap::Parser;
use cli::Cli;
use router::Context;

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let ctx = Context {
        prog: program_name(),
        device: cli.device,
        models: cli.models,
        user_sources: (!cli.users_sources.is_empty()).then_some(cli.users_sources),
    };

    std::process::exit(router::dispatch(&ctx, &cli.args));
}

/// Name the program was invoked as
fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("dmrradio")
        .to_string()
}
