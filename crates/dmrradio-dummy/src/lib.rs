//! dmrradio-dummy - Emulated radio for testing
//!
//! This crate provides a radio backend that keeps the radio's SPI flash in
//! memory. It's useful for testing and development without real hardware.
//! The memory can be loaded from and saved to an image file so that
//! separate program runs see the same radio.
//!
//! Flash layout:
//!
//! | offset     | size    | contents                     |
//! |------------|---------|------------------------------|
//! | `0x000000` | 256 KiB | codeplug image               |
//! | `0x100000` | 1 MiB   | MD-380 user database         |
//! | `0x200000` | 1 MiB   | MD-UV380 user database       |
//! | `0x300000` | 1 MiB   | firmware                     |
//!
//! The user database and firmware areas start with a little-endian `u32`
//! payload length; an erased length means the area is empty.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use dmrradio_core::error::{Error, Result};
use dmrradio_core::progress::{scaled_tick, Progress, MAX_PROGRESS};
use dmrradio_core::radio::{Radio, UsersLayout};
use dmrradio_core::users::{self, UserRecord};

/// Default flash size
pub const DEFAULT_SIZE: usize = 4 * 1024 * 1024;

/// Smallest erase unit
pub const SECTOR_SIZE: usize = 4096;

/// Bytes transferred per progress tick when reading or programming
const CHUNK_SIZE: usize = 1024;

/// Length header of an erased area
const EMPTY_HEADER: u32 = 0xFFFF_FFFF;

/// A fixed area of flash
#[derive(Debug, Clone, Copy)]
struct Area {
    name: &'static str,
    offset: usize,
    len: usize,
}

const CODEPLUG: Area = Area {
    name: "codeplug",
    offset: 0x000000,
    len: 256 * 1024,
};
const MD380_USERS: Area = Area {
    name: "MD-380 users",
    offset: 0x100000,
    len: 1024 * 1024,
};
const UV380_USERS: Area = Area {
    name: "MD-UV380 users",
    offset: 0x200000,
    len: 1024 * 1024,
};
const FIRMWARE: Area = Area {
    name: "firmware",
    offset: 0x300000,
    len: 1024 * 1024,
};

/// Configuration for the emulated radio
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// Flash size in bytes
    pub size: usize,
    /// File the flash contents are loaded from and saved to
    pub image: Option<PathBuf>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            image: None,
        }
    }
}

/// Emulated radio
pub struct DummyRadio {
    config: DummyConfig,
    data: Vec<u8>,
}

impl DummyRadio {
    /// Create an emulated radio with erased flash, or with the contents of
    /// the configured image file if it exists
    pub fn new(config: DummyConfig) -> Result<Self> {
        let end = FIRMWARE.offset + FIRMWARE.len;
        if config.size < end || config.size % SECTOR_SIZE != 0 {
            return Err(Error::Radio(format!(
                "flash size must be a multiple of {} and at least {} bytes",
                SECTOR_SIZE, end
            )));
        }

        let mut data = vec![0xFF; config.size];
        if let Some(path) = &config.image {
            if path.exists() {
                let image = fs::read(path).map_err(|e| Error::io(path, e))?;
                if image.len() > data.len() {
                    return Err(Error::Radio(format!(
                        "{}: image is larger than the {}-byte flash",
                        path.display(),
                        data.len()
                    )));
                }
                data[..image.len()].copy_from_slice(&image);
                log::debug!("Loaded {} bytes from {}", image.len(), path.display());
            }
        }

        Ok(Self { config, data })
    }

    /// Create an emulated radio with erased flash of the default size
    pub fn new_default() -> Self {
        Self {
            config: DummyConfig::default(),
            data: vec![0xFF; DEFAULT_SIZE],
        }
    }

    /// Get a reference to the flash data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn prepare(&mut self, progress: &mut dyn Progress) -> Result<()> {
        progress.report(0)?;
        log::debug!("dummy: entering programming mode");
        progress.report(MAX_PROGRESS)?;
        Ok(())
    }

    fn erase(&mut self, area: Area, progress: &mut dyn Progress) -> Result<()> {
        progress.report(0)?;
        let sectors = area.len / SECTOR_SIZE;
        for i in 0..sectors {
            let start = area.offset + i * SECTOR_SIZE;
            // Erase sets all bytes to 0xFF
            self.data[start..start + SECTOR_SIZE].fill(0xFF);
            progress.report(scaled_tick(i + 1, sectors))?;
        }
        log::debug!("dummy: erased {} ({} sectors)", area.name, sectors);
        Ok(())
    }

    fn program(&mut self, area: Area, data: &[u8], progress: &mut dyn Progress) -> Result<()> {
        if data.len() > area.len {
            return Err(Error::Radio(format!(
                "{} bytes do not fit in the {}-byte {} area",
                data.len(),
                area.len,
                area.name
            )));
        }

        progress.report(0)?;
        let total = data.len().div_ceil(CHUNK_SIZE);
        for (i, chunk) in data.chunks(CHUNK_SIZE).enumerate() {
            let start = area.offset + i * CHUNK_SIZE;
            // Flash programming: can only change 1 -> 0
            for (dst, &byte) in self.data[start..start + chunk.len()].iter_mut().zip(chunk) {
                *dst &= byte;
            }
            progress.report(scaled_tick(i + 1, total))?;
        }
        if total == 0 {
            progress.report(MAX_PROGRESS)?;
        }
        log::debug!("dummy: programmed {} bytes of {}", data.len(), area.name);
        Ok(())
    }

    fn read(&self, area: Area, out: &mut dyn Write, progress: &mut dyn Progress) -> Result<()> {
        progress.report(0)?;
        let bytes = &self.data[area.offset..area.offset + area.len];
        let total = bytes.len().div_ceil(CHUNK_SIZE);
        for (i, chunk) in bytes.chunks(CHUNK_SIZE).enumerate() {
            out.write_all(chunk)?;
            progress.report(scaled_tick(i + 1, total))?;
        }
        if total == 0 {
            progress.report(MAX_PROGRESS)?;
        }
        Ok(())
    }

    /// Payload of a length-prefixed area
    fn payload(&self, area: Area) -> Result<&[u8]> {
        let base = area.offset;
        let header = u32::from_le_bytes([
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]);
        if header == EMPTY_HEADER {
            return Ok(&[]);
        }
        let len = header as usize;
        if len > area.len - 4 {
            return Err(Error::Radio(format!(
                "{} area holds an invalid length 0x{:X}",
                area.name, header
            )));
        }
        Ok(&self.data[base + 4..base + 4 + len])
    }

    fn with_header(payload: &[u8]) -> Result<Vec<u8>> {
        let len = u32::try_from(payload.len())
            .map_err(|_| Error::Radio("payload too large".to_string()))?;
        let mut out = Vec::with_capacity(payload.len() + 4);
        out.extend_from_slice(&len.to_le_bytes());
        out.extend_from_slice(payload);
        Ok(out)
    }

    fn replace(&mut self, area: Area, content: &[u8], progress: &mut dyn Progress) -> Result<()> {
        if content.len() > area.len {
            return Err(Error::Radio(format!(
                "{} bytes do not fit in the {}-byte {} area",
                content.len(),
                area.len,
                area.name
            )));
        }
        self.prepare(progress)?;
        self.erase(area, progress)?;
        self.program(area, content, progress)
    }
}

impl Radio for DummyRadio {
    fn name(&self) -> &'static str {
        "dummy"
    }

    fn read_codeplug(&mut self, progress: &mut dyn Progress) -> Result<Vec<u8>> {
        self.prepare(progress)?;
        let mut image = Vec::with_capacity(CODEPLUG.len);
        self.read(CODEPLUG, &mut image, progress)?;
        Ok(image)
    }

    fn write_codeplug(&mut self, image: &[u8], progress: &mut dyn Progress) -> Result<()> {
        self.replace(CODEPLUG, image, progress)
    }

    fn read_spi_flash(&mut self, out: &mut dyn Write, progress: &mut dyn Progress) -> Result<()> {
        self.prepare(progress)?;
        let whole = Area {
            name: "flash",
            offset: 0,
            len: self.data.len(),
        };
        self.read(whole, out, progress)
    }

    fn read_users(&mut self, out: &mut dyn Write, progress: &mut dyn Progress) -> Result<()> {
        self.prepare(progress)?;
        progress.report(0)?;
        let payload = self.payload(MD380_USERS)?;
        let total = payload.len().div_ceil(CHUNK_SIZE);
        for (i, chunk) in payload.chunks(CHUNK_SIZE).enumerate() {
            out.write_all(chunk)?;
            progress.report(scaled_tick(i + 1, total))?;
        }
        if total == 0 {
            progress.report(MAX_PROGRESS)?;
        }
        Ok(())
    }

    fn write_users(
        &mut self,
        users: &[UserRecord],
        layout: UsersLayout,
        progress: &mut dyn Progress,
    ) -> Result<()> {
        let mut sorted = users.to_vec();
        sorted.sort_by_key(|u| u.id);

        let mut text = Vec::new();
        users::write_users(&mut text, &sorted)?;
        let content = Self::with_header(&text)?;

        let area = match layout {
            UsersLayout::Md380 => MD380_USERS,
            UsersLayout::Uv380 => UV380_USERS,
        };
        log::info!("dummy: writing {} users to the {} area", sorted.len(), layout);
        self.replace(area, &content, progress)
    }

    fn write_firmware(&mut self, data: &[u8], progress: &mut dyn Progress) -> Result<()> {
        if data.is_empty() {
            return Err(Error::Radio("empty firmware image".to_string()));
        }
        let content = Self::with_header(data)?;
        self.replace(FIRMWARE, &content, progress)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(path) = &self.config.image {
            fs::write(path, &self.data).map_err(|e| Error::io(path, e))?;
            log::debug!("Saved {} bytes to {}", self.data.len(), path.display());
        }
        Ok(())
    }
}
