//! Command implementations
//!
//! Each handler parses its own arguments, then hands off to exactly one
//! collaborator: the codeplug loader, the user database or the radio.

pub mod codeplug;
pub mod convert;
pub mod flash;
pub mod users;

use std::error::Error;

use clap::{CommandFactory, FromArgMatches, Parser};
use dmrradio_core::model::ModelCatalog;
use dmrradio_core::progress::{PhaseSink, Progress, ProgressReporter};

use crate::cli::NoArgs;
use crate::display;
use crate::router::{CommandEntry, CommandResult, Context, Invocation, UsageError};

/// Accept the single-dash `-model`/`-freq` spellings as well
fn normalize_args(args: &[String]) -> Vec<String> {
    args.iter()
        .map(|arg| {
            for flag in ["-model", "-freq"] {
                if arg == flag || arg.starts_with(&format!("{}=", flag)) {
                    return format!("-{}", arg);
                }
            }
            arg.clone()
        })
        .collect()
}

fn build_command<T: CommandFactory>(
    ctx: &Context,
    entry: &CommandEntry,
    after_help: Option<String>,
) -> clap::Command {
    let cmd = T::command()
        .name(entry.name)
        .bin_name(format!("{} {}", ctx.prog, entry.name))
        .about(entry.about)
        .disable_version_flag(true);
    match after_help {
        Some(text) => cmd.after_help(text),
        None => cmd,
    }
}

fn parse_with<T: Parser>(
    ctx: &Context,
    invocation: &Invocation<'_>,
    after_help: Option<String>,
) -> Result<T, UsageError> {
    let argv = std::iter::once(invocation.entry.name.to_string())
        .chain(normalize_args(invocation.args));
    build_command::<T>(ctx, invocation.entry, after_help)
        .try_get_matches_from(argv)
        .and_then(|matches| T::from_arg_matches(&matches))
        .map_err(|e| UsageError(e.render().to_string()))
}

/// Parse a handler's arguments, rendering any problem as a usage error
pub(crate) fn parse_args<T: Parser>(
    ctx: &Context,
    invocation: &Invocation<'_>,
) -> Result<T, UsageError> {
    parse_with(ctx, invocation, None)
}

/// Help text listing every model and its frequency ranges
pub(crate) fn model_help(catalog: &ModelCatalog) -> String {
    let mut text = String::from(
        "modelName must be chosen from the following list,\n\
         and freqRange must be one of its associated values.\n",
    );
    for (model, ranges) in catalog.frequency_ranges() {
        text.push_str(&format!("\t{}\n", model));
        for range in ranges {
            text.push_str(&format!("\t\t\"{}\"\n", range));
        }
    }
    text
}

/// Parse `--model <modelName> --freq <freqRange> <file>` arguments
///
/// Both flags must name a catalog entry; the returned pair is validated.
pub(crate) fn parse_model_args(
    ctx: &Context,
    invocation: &Invocation<'_>,
    catalog: &ModelCatalog,
) -> Result<(crate::cli::ModelFileArgs, String, String), UsageError> {
    let help = model_help(catalog);
    let args: crate::cli::ModelFileArgs = parse_with(ctx, invocation, Some(help.clone()))?;

    let bad = |what: &str| {
        let mut cmd =
            build_command::<crate::cli::ModelFileArgs>(ctx, invocation.entry, Some(help.clone()));
        UsageError(format!("bad {}\n\n{}", what, cmd.render_help()))
    };

    let model = args.model.clone().unwrap_or_default();
    if catalog.get(&model).is_none() {
        return Err(bad("modelName"));
    }
    let freq = args.freq.clone().unwrap_or_default();
    if !catalog.supports(&model, &freq) {
        return Err(bad("freqRange"));
    }

    Ok((args, model, freq))
}

/// Run `op` with a console progress reporter for `phases`
///
/// The status line is terminated whether or not `op` succeeds.
pub(crate) fn with_progress<T, E, F>(phases: &[&str], op: F) -> Result<T, Box<dyn Error>>
where
    E: Into<Box<dyn Error>>,
    F: FnOnce(&mut dyn Progress) -> Result<T, E>,
{
    run_with_progress(display::reporter(phases.iter().copied()), op)
}

/// Run `op` against `reporter`, then finish the reporter
///
/// A failure to finish the status output is logged; the result of `op` is
/// what the caller sees.
fn run_with_progress<S, T, E, F>(
    mut reporter: ProgressReporter<S>,
    op: F,
) -> Result<T, Box<dyn Error>>
where
    S: PhaseSink,
    E: Into<Box<dyn Error>>,
    F: FnOnce(&mut dyn Progress) -> Result<T, E>,
{
    let result = op(&mut reporter);
    if let Err(e) = reporter.finish() {
        log::warn!("Failed to finish progress output: {}", e);
    }
    result.map_err(Into::into)
}

/// Print the version number
pub fn version(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let NoArgs {} = parse_args(ctx, invocation)?;
    println!("{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
