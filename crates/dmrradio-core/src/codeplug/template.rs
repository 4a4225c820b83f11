//! Default codeplug contents for a new codeplug

use super::record::{kinds, Record};
use crate::model::ModelInfo;

/// Records of a freshly created codeplug for `model` on `frequency_range`
pub(crate) fn default_records(model: &ModelInfo, frequency_range: &str) -> Vec<Record> {
    let mhz = ModelInfo::band_start_mhz(frequency_range).unwrap_or(0.0);
    let frequency = format!("{:.5}", mhz);

    vec![
        Record::new(kinds::GENERAL_SETTINGS)
            .with("Radio Name", model.name.as_str())
            .with("Radio ID", "1")
            .with("Intro Screen Line 1", model.name.as_str())
            .with("Intro Screen Line 2", "DMR"),
        Record::new(kinds::CONTACT)
            .with("Name", "Local")
            .with("Call ID", "2")
            .with("Call Type", "Group"),
        Record::new(kinds::CHANNEL)
            .with("Name", "Channel1")
            .with("Channel Mode", "Digital")
            .with("Rx Frequency", frequency.as_str())
            .with("Tx Frequency", frequency.as_str())
            .with("Color Code", "1")
            .with("Contact Name", "Local"),
        Record::new(kinds::ZONE)
            .with("Name", "Zone1")
            .with("Channel", "Channel1"),
    ]
}
