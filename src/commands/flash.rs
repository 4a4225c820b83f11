//! Raw flash commands: SPI flash dump and firmware update

use std::fs::{self, File};
use std::io::{BufWriter, Write};

use super::{parse_args, with_progress};
use crate::cli::FileArgs;
use crate::router::{CommandResult, Context, Invocation};

const READ_FLASH_PHASES: &[&str] = &["Preparing to read flash", "Reading flash"];

const FIRMWARE_PHASES: &[&str] = &[
    "Preparing to write firmware",
    "Erasing flash memory",
    "Writing firmware",
];

/// Dump the radio's SPI flash to a file
pub fn read_spi_flash(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;

    let mut handle = ctx.open_radio()?;
    let file = File::create(&args.file)
        .map_err(|e| format!("Failed to create {}: {}", args.file.display(), e))?;
    let mut out = BufWriter::new(file);

    with_progress(READ_FLASH_PHASES, |progress| {
        handle.as_radio_mut().read_spi_flash(&mut out, progress)
    })?;
    out.flush()?;
    handle.close()
}

/// Write a firmware image to the radio
pub fn write_md380_firmware(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;

    let firmware = fs::read(&args.file)
        .map_err(|e| format!("Failed to read {}: {}", args.file.display(), e))?;
    log::info!("Read {} bytes from {}", firmware.len(), args.file.display());

    let mut handle = ctx.open_radio()?;
    with_progress(FIRMWARE_PHASES, |progress| {
        handle.as_radio_mut().write_firmware(&firmware, progress)
    })?;
    handle.close()
}
