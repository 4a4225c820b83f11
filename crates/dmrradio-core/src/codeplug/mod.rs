//! Codeplugs and codeplug files
//!
//! A codeplug goes through two stages:
//!
//! 1. [`CodeplugFile`] - content parsed from some format, together with the
//!    models and frequency ranges the content declares. Nothing has been
//!    checked against the model catalog yet.
//! 2. [`Codeplug`] - content materialized for exactly one model and
//!    frequency range and validated against that model. Only this stage can
//!    be exported or written to a radio.
//!
//! [`load_codeplug`] performs both steps, picking the model and frequency
//! range automatically when the caller does not name one.

pub mod binary;
mod json;
mod loader;
mod record;
mod template;
mod text;
mod xlsx;

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub use loader::{load_codeplug, load_codeplug_as, resolve_model};
pub use record::{kinds, Field, Record};

use crate::error::{Error, Result};
use crate::model::ModelCatalog;

/// Requested input type for a codeplug file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// Unknown; detect the format from the file content
    None,
    /// No input; create a new codeplug from the model's template
    New,
    /// Text format
    Text,
    /// JSON format
    Json,
    /// Spreadsheet (xlsx) format
    Xlsx,
}

/// Format a codeplug was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Native binary image
    Native,
    /// JSON
    Json,
    /// Text
    Text,
    /// Spreadsheet (xlsx)
    Spreadsheet,
    /// Created from a model template
    New,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Native => "native",
            Format::Json => "JSON",
            Format::Text => "text",
            Format::Spreadsheet => "spreadsheet",
            Format::New => "new",
        };
        f.write_str(name)
    }
}

/// A model together with the frequency ranges a codeplug file claims to
/// support for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Model name as written in the file
    pub model: String,
    /// Frequency ranges as written in the file
    pub frequency_ranges: Vec<String>,
}

/// Parsed codeplug content with its declared models, not yet bound to a
/// model
#[derive(Debug, Clone)]
pub struct CodeplugFile {
    path: Option<PathBuf>,
    format: Format,
    declarations: Vec<Declaration>,
    records: Vec<Record>,
}

impl CodeplugFile {
    /// Read and parse the file at `path`
    ///
    /// [`FileType::None`] detects the format from the content.
    /// [`FileType::New`] has no file to read and is rejected.
    pub fn open(path: &Path, file_type: FileType) -> Result<Self> {
        if file_type == FileType::New {
            return Err(Error::ExplicitModelRequired);
        }
        let data = fs::read(path).map_err(|e| Error::io(path, e))?;
        let mut file = Self::parse(&data, file_type)?;
        log::debug!(
            "{}: {} codeplug, {} model declaration(s), {} record(s)",
            path.display(),
            file.format,
            file.declarations.len(),
            file.records.len()
        );
        file.path = Some(path.to_path_buf());
        Ok(file)
    }

    /// Parse in-memory content
    pub fn parse(data: &[u8], file_type: FileType) -> Result<Self> {
        let format = match file_type {
            FileType::None => detect_format(data),
            FileType::Text => Format::Text,
            FileType::Json => Format::Json,
            FileType::Xlsx => Format::Spreadsheet,
            FileType::New => return Err(Error::ExplicitModelRequired),
        };

        let (declarations, records) = match format {
            Format::Native => binary::decode(data)?,
            Format::Json => json::parse(data)?,
            Format::Spreadsheet => xlsx::parse(data)?,
            Format::Text | Format::New => {
                let content = std::str::from_utf8(data)
                    .map_err(|e| Error::malformed(Format::Text, e.to_string()))?;
                text::parse(content)?
            }
        };

        Ok(Self {
            path: None,
            format,
            declarations,
            records,
        })
    }

    /// Decode a native image as read from a radio
    pub fn from_image(data: &[u8]) -> Result<Self> {
        let (declarations, records) = binary::decode(data)?;
        Ok(Self {
            path: None,
            format: Format::Native,
            declarations,
            records,
        })
    }

    /// Path the content was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Format the content was parsed from
    pub fn format(&self) -> Format {
        self.format
    }

    /// Declarations as written in the file
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Parsed records
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Declared models known to `catalog`, each with its declared frequency
    /// ranges that the catalog also knows, in declared order
    ///
    /// A known model whose declared ranges are all unknown maps to an empty
    /// list.
    pub fn types_frequency_ranges(&self, catalog: &ModelCatalog) -> BTreeMap<String, Vec<String>> {
        let mut supported: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for decl in &self.declarations {
            let Some(info) = catalog.get(&decl.model) else {
                log::debug!("ignoring unknown model {:?}", decl.model);
                continue;
            };
            let ranges = supported.entry(decl.model.clone()).or_default();
            for range in &decl.frequency_ranges {
                if info.has_frequency_range(range) && !ranges.contains(range) {
                    ranges.push(range.clone());
                }
            }
        }
        supported
    }

    /// Materialize the content for `model` and `frequency_range`
    ///
    /// The pair must be one the file supports. The records are then checked
    /// against the model: every kind must be known, exactly one
    /// "General Settings" record must exist and the model's capacities must
    /// not be exceeded.
    pub fn load(self, catalog: &ModelCatalog, model: &str, frequency_range: &str) -> Result<Codeplug> {
        let supported = self.types_frequency_ranges(catalog);
        if !supported
            .get(model)
            .is_some_and(|ranges| ranges.iter().any(|r| r == frequency_range))
        {
            return Err(Error::UnsupportedPair {
                model: model.to_string(),
                frequency_range: frequency_range.to_string(),
            });
        }
        let info = catalog.require(model, frequency_range)?;

        for record in &self.records {
            if !kinds::is_known(&record.kind) {
                return Err(Error::malformed(
                    self.format,
                    format!("unknown record type \"{}\"", record.kind),
                ));
            }
        }

        let count = |kind: &str| self.records.iter().filter(|r| r.kind == kind).count();

        let general = count(kinds::GENERAL_SETTINGS);
        if general != 1 {
            return Err(Error::malformed(
                self.format,
                format!(
                    "expected one \"{}\" record, found {}",
                    kinds::GENERAL_SETTINGS,
                    general
                ),
            ));
        }

        for (kind, limit) in [
            (kinds::CHANNEL, info.max_channels),
            (kinds::ZONE, info.max_zones),
            (kinds::CONTACT, info.max_contacts),
        ] {
            let n = count(kind);
            if n > limit {
                return Err(Error::Capacity {
                    model: info.name.clone(),
                    kind,
                    limit,
                    count: n,
                });
            }
        }

        Ok(Codeplug {
            model: info.name.clone(),
            frequency_range: frequency_range.to_string(),
            source_format: self.format,
            records: self.records,
        })
    }
}

fn detect_format(data: &[u8]) -> Format {
    if binary::is_native(data) {
        Format::Native
    } else if xlsx::looks_like_xlsx(data) {
        Format::Spreadsheet
    } else if json::looks_like_json(data) {
        Format::Json
    } else {
        Format::Text
    }
}

/// A codeplug bound to one model and frequency range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codeplug {
    model: String,
    frequency_range: String,
    source_format: Format,
    records: Vec<Record>,
}

impl Codeplug {
    /// Create the default codeplug for `model` on `frequency_range`
    pub fn new_default(catalog: &ModelCatalog, model: &str, frequency_range: &str) -> Result<Self> {
        let info = catalog.require(model, frequency_range)?;
        Ok(Self {
            model: info.name.clone(),
            frequency_range: frequency_range.to_string(),
            source_format: Format::New,
            records: template::default_records(info, frequency_range),
        })
    }

    /// Model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Frequency range
    pub fn frequency_range(&self) -> &str {
        &self.frequency_range
    }

    /// Format the content came from
    pub fn source_format(&self) -> Format {
        self.source_format
    }

    /// Records in codeplug order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Native image, as stored in codeplug files and on the radio
    pub fn to_image(&self) -> Result<Vec<u8>> {
        let declaration = Declaration {
            model: self.model.clone(),
            frequency_ranges: vec![self.frequency_range.clone()],
        };
        binary::encode(&[declaration], &self.records)
    }

    /// Save as a native codeplug file
    pub fn save_as(&self, path: &Path) -> Result<()> {
        write_file(path, &self.to_image()?)
    }

    /// Export as a text codeplug
    pub fn export_text(&self, path: &Path) -> Result<()> {
        let out = text::render(&self.model, &self.frequency_range, &self.records)?;
        write_file(path, out.as_bytes())
    }

    /// Export as a JSON codeplug
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let out = json::render(&self.model, &self.frequency_range, &self.records)?;
        write_file(path, &out)
    }

    /// Export as a spreadsheet codeplug
    pub fn export_xlsx(&self, path: &Path) -> Result<()> {
        let out = xlsx::render(&self.model, &self.frequency_range, &self.records)?;
        write_file(path, &out)
    }
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    fs::write(path, data).map_err(|e| Error::io(path, e))?;
    log::info!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}
