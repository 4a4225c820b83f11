//! Open a codeplug file as a fully loaded [`Codeplug`]
//!
//! When the caller does not name a model, the model and frequency range are
//! chosen from what the file declares: the declared models are intersected
//! with the catalog, the lexicographically first remaining model is picked,
//! and its first remaining declared frequency range is used.

use std::collections::BTreeMap;
use std::path::Path;

use super::{Codeplug, CodeplugFile, FileType};
use crate::error::{Error, Result};
use crate::model::ModelCatalog;

/// Pick the model and frequency range to load from `supported`
///
/// `supported` maps model names to frequency ranges (as returned by
/// [`CodeplugFile::types_frequency_ranges`]).
pub fn resolve_model(supported: &BTreeMap<String, Vec<String>>) -> Result<(String, String)> {
    let (model, ranges) = supported.iter().next().ok_or(Error::UnknownModel)?;
    let frequency_range = ranges.first().ok_or(Error::UnknownFrequencyRange)?;
    Ok((model.clone(), frequency_range.clone()))
}

/// Load the codeplug at `path`, resolving model and frequency range from
/// its content
///
/// [`FileType::New`] needs an explicit model; use [`load_codeplug_as`].
pub fn load_codeplug(catalog: &ModelCatalog, file_type: FileType, path: &Path) -> Result<Codeplug> {
    let file = CodeplugFile::open(path, file_type)?;
    let (model, frequency_range) = resolve_model(&file.types_frequency_ranges(catalog))?;
    log::info!(
        "{}: loading as {} ({})",
        path.display(),
        model,
        frequency_range
    );
    file.load(catalog, &model, &frequency_range)
}

/// Load the codeplug at `path` for an explicit model and frequency range
///
/// For [`FileType::New`] no file is read; the model's default codeplug is
/// built instead.
pub fn load_codeplug_as(
    catalog: &ModelCatalog,
    file_type: FileType,
    path: &Path,
    model: &str,
    frequency_range: &str,
) -> Result<Codeplug> {
    if file_type == FileType::New {
        return Codeplug::new_default(catalog, model, frequency_range);
    }
    CodeplugFile::open(path, file_type)?.load(catalog, model, frequency_range)
}
