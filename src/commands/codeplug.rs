//! Codeplug commands: create, read from and write to the radio

use std::path::Path;

use dmrradio_core::codeplug::{load_codeplug, load_codeplug_as, CodeplugFile, FileType};

use super::{parse_args, parse_model_args, with_progress};
use crate::cli::FileArgs;
use crate::router::{CommandResult, Context, Invocation};

const READ_PHASES: &[&str] = &["Preparing to read codeplug", "Reading codeplug from radio."];

const WRITE_PHASES: &[&str] = &[
    "Preparing to write codeplug to radio",
    "Erasing the radio's codeplug",
    "Writing codeplug to radio",
];

/// Create a default codeplug file for a model and frequency range
pub fn new_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let catalog = ctx.catalog()?;
    let (args, model, freq) = parse_model_args(ctx, invocation, &catalog)?;

    let codeplug = load_codeplug_as(&catalog, FileType::New, Path::new(""), &model, &freq)?;
    codeplug.save_as(&args.file)?;
    Ok(())
}

/// Read the radio's codeplug into a file
pub fn read_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let catalog = ctx.catalog()?;
    let (args, model, freq) = parse_model_args(ctx, invocation, &catalog)?;

    let mut handle = ctx.open_radio()?;
    let image = with_progress(READ_PHASES, |progress| {
        handle.as_radio_mut().read_codeplug(progress)
    })?;
    handle.close()?;

    let codeplug = CodeplugFile::from_image(&image)?.load(&catalog, &model, &freq)?;
    codeplug.save_as(&args.file)?;
    Ok(())
}

/// Write a codeplug file to the radio
pub fn write_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;
    let catalog = ctx.catalog()?;

    let codeplug = load_codeplug(&catalog, FileType::None, &args.file)?;
    let image = codeplug.to_image()?;

    let mut handle = ctx.open_radio()?;
    with_progress(WRITE_PHASES, |progress| {
        handle.as_radio_mut().write_codeplug(&image, progress)
    })?;
    handle.close()
}
