//! Radio model catalog
//!
//! A model is a radio family sharing one codeplug layout. Each model offers
//! one or more frequency ranges (band variants) and has fixed record
//! capacities.

mod catalog;

pub use catalog::ModelCatalog;

/// One supported radio model
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct ModelInfo {
    /// Model name (e.g., "MD-380")
    pub name: String,
    /// Frequency ranges offered, in preference order
    pub frequency_ranges: Vec<String>,
    /// Maximum number of channel records
    pub max_channels: usize,
    /// Maximum number of zone records
    pub max_zones: usize,
    /// Maximum number of contact records
    pub max_contacts: usize,
}

impl ModelInfo {
    /// Whether `frequency_range` is one of this model's ranges
    pub fn has_frequency_range(&self, frequency_range: &str) -> bool {
        self.frequency_ranges.iter().any(|r| r == frequency_range)
    }

    /// Lower edge in MHz of the first band in `frequency_range`
    ///
    /// Range names look like `"400-480 MHz"` or
    /// `"136-174 MHz & 400-480 MHz"`.
    pub fn band_start_mhz(frequency_range: &str) -> Option<f64> {
        let first = frequency_range.split('&').next()?;
        let low = first.trim().split('-').next()?;
        low.trim().parse().ok()
    }
}
