//! CLI argument parsing
//!
//! The top level only takes global options; the subcommand token and its
//! arguments are collected verbatim and handed to the router, which parses
//! them with the per-command structs below.

use clap::Parser;
use std::path::PathBuf;

use crate::radios;

/// Generate dynamic help text for the device argument
fn device_help() -> String {
    format!(
        "Radio to use, as name[:key=value,...] [available: {}]",
        radios::radio_names_short()
    )
}

#[derive(Parser)]
#[command(name = "dmrradio")]
#[command(
    author,
    version,
    about = "DMR radio codeplug, firmware and user database utility",
    long_about = None,
    override_usage = "dmrradio [OPTIONS] <subCommand> [args]..."
)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[arg(long, env = "DMRRADIO_DEVICE", help = device_help())]
    pub device: Option<String>,

    /// Model catalog file (RON format) replacing the built-in catalog
    #[arg(long)]
    pub models: Option<PathBuf>,

    /// User database download locations replacing the built-in ones
    #[arg(long = "users-source", env = "DMRRADIO_USERS_SOURCES", value_delimiter = ',')]
    pub users_sources: Vec<String>,

    /// Subcommand followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

/// `--model <model> --freq <freqRange> <codeplugFile>`
#[derive(Parser, Debug)]
pub struct ModelFileArgs {
    /// Radio model name
    #[arg(long, value_name = "modelName")]
    pub model: Option<String>,

    /// Frequency range of the model
    #[arg(long, value_name = "freqRange")]
    pub freq: Option<String>,

    /// Codeplug file
    #[arg(value_name = "codeplugFile")]
    pub file: PathBuf,
}

/// A single file argument
#[derive(Parser, Debug)]
pub struct FileArgs {
    /// File to read or write
    #[arg(value_name = "file")]
    pub file: PathBuf,
}

/// An input file and an output file
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// File to read
    #[arg(value_name = "inFile")]
    pub input: PathBuf,

    /// File to create
    #[arg(value_name = "outFile")]
    pub output: PathBuf,
}

/// `<usersFile> <countriesFile>`
#[derive(Parser, Debug)]
pub struct UserCountriesArgs {
    /// Users file to read
    #[arg(value_name = "usersFile")]
    pub users: PathBuf,

    /// Country list to create
    #[arg(value_name = "countriesFile")]
    pub countries: PathBuf,
}

/// `<countriesFile> <inUsersFile> <outUsersFile>`
#[derive(Parser, Debug)]
pub struct FilterUsersArgs {
    /// Countries to keep, one per line
    #[arg(value_name = "countriesFile")]
    pub countries: PathBuf,

    /// Users file to filter; "" downloads the curated users
    #[arg(value_name = "inUsersFile")]
    pub in_users: String,

    /// Filtered users file to create
    #[arg(value_name = "outUsersFile")]
    pub out_users: PathBuf,
}

/// No arguments
#[derive(Parser, Debug)]
pub struct NoArgs {}
