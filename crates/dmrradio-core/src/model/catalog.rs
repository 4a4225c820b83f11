//! Model catalog loading and lookup
//!
//! The catalog is described in RON. A built-in copy is compiled into the
//! crate; a replacement can be loaded from a file at runtime.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use super::ModelInfo;
use crate::error::{Error, Result};

/// Built-in catalog source
const BUILTIN_MODELS: &str = include_str!("../../data/models.ron");

/// RON file layout
#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    models: Vec<ModelInfo>,
}

/// The set of radio models dmrradio knows how to handle
#[derive(Debug, Clone, Default)]
pub struct ModelCatalog {
    models: Vec<ModelInfo>,
}

impl ModelCatalog {
    /// Load the catalog compiled into the crate
    pub fn builtin() -> Result<Self> {
        Self::from_ron(BUILTIN_MODELS)
    }

    /// Load a catalog from a RON file
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::from_ron(&content)?;
        log::debug!("Loaded {} models from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Parse a catalog from a RON string
    pub fn from_ron(content: &str) -> Result<Self> {
        let file: CatalogFile =
            ron::from_str(content).map_err(|e| Error::Catalog(e.to_string()))?;

        let mut seen = HashSet::new();
        for model in &file.models {
            if !seen.insert(model.name.as_str()) {
                return Err(Error::Catalog(format!("duplicate model {}", model.name)));
            }
            if model.frequency_ranges.is_empty() {
                return Err(Error::Catalog(format!(
                    "model {} has no frequency ranges",
                    model.name
                )));
            }
        }

        Ok(Self {
            models: file.models,
        })
    }

    /// Number of models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Look up a model by exact name
    pub fn get(&self, name: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.name == name)
    }

    /// Iterate over all models in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &ModelInfo> {
        self.models.iter()
    }

    /// Whether `model` exists and offers `frequency_range`
    pub fn supports(&self, model: &str, frequency_range: &str) -> bool {
        self.get(model)
            .is_some_and(|m| m.has_frequency_range(frequency_range))
    }

    /// Every model with its frequency ranges, models sorted by name
    pub fn frequency_ranges(&self) -> BTreeMap<String, Vec<String>> {
        self.models
            .iter()
            .map(|m| (m.name.clone(), m.frequency_ranges.clone()))
            .collect()
    }

    /// Look up a model and check it offers `frequency_range`
    pub fn require(&self, model: &str, frequency_range: &str) -> Result<&ModelInfo> {
        let info = self
            .get(model)
            .ok_or_else(|| Error::BadModelName(model.to_string()))?;
        if !info.has_frequency_range(frequency_range) {
            return Err(Error::BadFrequencyRange {
                model: model.to_string(),
                frequency_range: frequency_range.to_string(),
            });
        }
        Ok(info)
    }
}
