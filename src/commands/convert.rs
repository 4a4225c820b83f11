//! Codeplug format conversions
//!
//! `*ToCodeplug` commands parse the input in the named format and save a
//! native codeplug. `codeplugTo*` commands accept any recognized input format
//! and export it.

use dmrradio_core::codeplug::{load_codeplug, Codeplug, FileType};

use super::parse_args;
use crate::cli::ConvertArgs;
use crate::router::{CommandResult, Context, Invocation};

fn to_codeplug(ctx: &Context, invocation: &Invocation<'_>, file_type: FileType) -> CommandResult {
    let args: ConvertArgs = parse_args(ctx, invocation)?;
    let codeplug = load_codeplug(&ctx.catalog()?, file_type, &args.input)?;
    codeplug.save_as(&args.output)?;
    Ok(())
}

fn from_codeplug<F>(ctx: &Context, invocation: &Invocation<'_>, export: F) -> CommandResult
where
    F: FnOnce(&Codeplug, &std::path::Path) -> dmrradio_core::Result<()>,
{
    let args: ConvertArgs = parse_args(ctx, invocation)?;
    let codeplug = load_codeplug(&ctx.catalog()?, FileType::None, &args.input)?;
    export(&codeplug, &args.output)?;
    Ok(())
}

/// Text codeplug to native codeplug
pub fn text_to_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    to_codeplug(ctx, invocation, FileType::Text)
}

/// JSON codeplug to native codeplug
pub fn json_to_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    to_codeplug(ctx, invocation, FileType::Json)
}

/// Spreadsheet codeplug to native codeplug
pub fn xlsx_to_codeplug(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    to_codeplug(ctx, invocation, FileType::Xlsx)
}

/// Any codeplug to text
pub fn codeplug_to_text(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    from_codeplug(ctx, invocation, Codeplug::export_text)
}

/// Any codeplug to JSON
pub fn codeplug_to_json(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    from_codeplug(ctx, invocation, Codeplug::export_json)
}

/// Any codeplug to a spreadsheet
pub fn codeplug_to_xlsx(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    from_codeplug(ctx, invocation, Codeplug::export_xlsx)
}
