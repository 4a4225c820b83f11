//! dmrradio-core - Core library for DMR radio programming
//!
//! This crate holds everything the `dmrradio` command layer needs that is not
//! tied to a particular radio connection:
//!
//! - [`progress`] - phase-based progress reporting shared by every long
//!   running radio or network operation
//! - [`model`] - the catalog of supported radio models and their frequency
//!   ranges
//! - [`codeplug`] - codeplug formats and the loader that resolves an input
//!   file to a fully loaded [`codeplug::Codeplug`]
//! - [`users`] - user database records, country filters and country reports
//! - [`radio`] - the [`radio::Radio`] trait implemented by radio backends
//!
//! # Example
//!
//! ```ignore
//! use dmrradio_core::codeplug::{load_codeplug, FileType};
//! use dmrradio_core::model::ModelCatalog;
//!
//! let catalog = ModelCatalog::builtin()?;
//! let codeplug = load_codeplug(&catalog, FileType::None, "radio.bin".as_ref())?;
//! println!("{} ({})", codeplug.model(), codeplug.frequency_range());
//! codeplug.export_json("radio.json".as_ref())?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod codeplug;
pub mod error;
pub mod model;
pub mod progress;
pub mod radio;
pub mod users;

pub use error::{Error, Result};
