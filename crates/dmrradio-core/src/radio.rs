//! Radio backend trait
//!
//! A [`Radio`] is a connected radio in programming mode. Every long-running
//! operation takes a [`Progress`] receiver and reports its phases on the
//! shared tick scale: a tick of zero starts a phase and the last tick of
//! the last phase is [`MAX_PROGRESS`](crate::progress::MAX_PROGRESS). An
//! error returned by the receiver aborts the operation and is returned to
//! the caller.

use std::io::Write;

use crate::error::Result;
use crate::progress::Progress;
use crate::users::UserRecord;

/// Flash layout of the user database area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsersLayout {
    /// MD-380 / MD-390 family
    Md380,
    /// MD-2017 / MD-UV380 family
    Uv380,
}

impl std::fmt::Display for UsersLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsersLayout::Md380 => f.write_str("MD-380"),
            UsersLayout::Uv380 => f.write_str("MD-UV380"),
        }
    }
}

/// A radio connected for programming
pub trait Radio {
    /// Backend name
    fn name(&self) -> &'static str;

    /// Read the codeplug image.
    ///
    /// Phases: prepare, read.
    fn read_codeplug(&mut self, progress: &mut dyn Progress) -> Result<Vec<u8>>;

    /// Replace the codeplug image.
    ///
    /// Phases: prepare, erase, write.
    fn write_codeplug(&mut self, image: &[u8], progress: &mut dyn Progress) -> Result<()>;

    /// Copy the whole SPI flash to `out`.
    ///
    /// Phases: prepare, read.
    fn read_spi_flash(&mut self, out: &mut dyn Write, progress: &mut dyn Progress) -> Result<()>;

    /// Read the stored user database in md380tools format.
    ///
    /// Phases: prepare, read.
    fn read_users(&mut self, out: &mut dyn Write, progress: &mut dyn Progress) -> Result<()>;

    /// Replace the stored user database.
    ///
    /// Phases: prepare, erase, write.
    fn write_users(
        &mut self,
        users: &[UserRecord],
        layout: UsersLayout,
        progress: &mut dyn Progress,
    ) -> Result<()>;

    /// Replace the firmware.
    ///
    /// Phases: prepare, erase, write.
    fn write_firmware(&mut self, data: &[u8], progress: &mut dyn Progress) -> Result<()>;

    /// Release the radio
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
