//! JSON codeplug format

use serde::{Deserialize, Serialize};

use super::record::Record;
use super::{Declaration, Format};
use crate::error::{Error, Result};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonCodeplug {
    #[serde(default)]
    models: Vec<JsonModel>,
    #[serde(default)]
    records: Vec<Record>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct JsonModel {
    model: String,
    #[serde(default)]
    frequency_ranges: Vec<String>,
}

/// Whether `data` looks like a JSON document
pub fn looks_like_json(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'{')
}

/// Parse a JSON codeplug
pub fn parse(data: &[u8]) -> Result<(Vec<Declaration>, Vec<Record>)> {
    let doc: JsonCodeplug =
        serde_json::from_slice(data).map_err(|e| Error::malformed(Format::Json, e.to_string()))?;

    let declarations = doc
        .models
        .into_iter()
        .map(|m| Declaration {
            model: m.model,
            frequency_ranges: m.frequency_ranges,
        })
        .collect();

    Ok((declarations, doc.records))
}

/// Render a loaded codeplug as pretty-printed JSON
pub fn render(model: &str, frequency_range: &str, records: &[Record]) -> Result<Vec<u8>> {
    let doc = JsonCodeplug {
        models: vec![JsonModel {
            model: model.to_string(),
            frequency_ranges: vec![frequency_range.to_string()],
        }],
        records: records.to_vec(),
    };
    let mut out = serde_json::to_vec_pretty(&doc)?;
    out.push(b'\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeplug::record::kinds;

    #[test]
    fn test_parse() {
        let doc = br#"{
            "Models": [{"Model": "MD-UV380", "FrequencyRanges": ["136-174 MHz & 400-480 MHz"]}],
            "Records": [
                {"Type": "General Settings", "Fields": [{"Name": "Radio Name", "Value": "Base"}]},
                {"Type": "Zone"}
            ]
        }"#;
        let (declarations, records) = parse(doc).unwrap();
        assert_eq!(declarations[0].model, "MD-UV380");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("Radio Name"), Some("Base"));
        assert_eq!(records[1].kind, kinds::ZONE);
        assert!(records[1].fields.is_empty());
    }

    #[test]
    fn test_render_uses_schema_names() {
        let records = vec![Record::new(kinds::CHANNEL).with("Name", "Simplex")];
        let out = String::from_utf8(render("MD-380", "400-480 MHz", &records).unwrap()).unwrap();
        assert!(out.contains("\"Models\""));
        assert!(out.contains("\"FrequencyRanges\""));
        assert!(out.contains("\"Type\": \"Channel\""));

        let (declarations, parsed) = parse(out.as_bytes()).unwrap();
        assert_eq!(declarations[0].frequency_ranges, vec!["400-480 MHz"]);
        assert_eq!(parsed, records);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(
            parse(b"{\"Models\": 3}"),
            Err(Error::Malformed {
                format: Format::Json,
                ..
            })
        ));
        assert!(looks_like_json(b"  \n{}"));
        assert!(!looks_like_json(b"Model: MD-380"));
    }
}
