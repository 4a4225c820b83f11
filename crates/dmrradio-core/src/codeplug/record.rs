//! Codeplug records
//!
//! The command layer treats record content as opaque: a record is a kind
//! plus an ordered list of named string fields.

use serde::{Deserialize, Serialize};

/// Record kinds understood by dmrradio
pub mod kinds {
    /// Radio-wide settings; exactly one per codeplug
    pub const GENERAL_SETTINGS: &str = "General Settings";
    /// A channel
    pub const CHANNEL: &str = "Channel";
    /// A zone (named group of channels)
    pub const ZONE: &str = "Zone";
    /// A digital contact
    pub const CONTACT: &str = "Contact";
    /// A receive group list
    pub const RX_GROUP_LIST: &str = "Rx Group List";
    /// A scan list
    pub const SCAN_LIST: &str = "Scan List";
    /// A canned text message
    pub const TEXT_MESSAGE: &str = "Text Message";

    /// Every known kind
    pub const ALL: &[&str] = &[
        GENERAL_SETTINGS,
        CHANNEL,
        ZONE,
        CONTACT,
        RX_GROUP_LIST,
        SCAN_LIST,
        TEXT_MESSAGE,
    ];

    /// Whether `kind` is known
    pub fn is_known(kind: &str) -> bool {
        ALL.contains(&kind)
    }
}

/// A named field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Field {
    /// Field name
    pub name: String,
    /// Field value
    pub value: String,
}

/// One codeplug record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Record {
    /// Record kind (see [`kinds`])
    #[serde(rename = "Type")]
    pub kind: String,
    /// Fields in display order
    #[serde(default)]
    pub fields: Vec<Field>,
}

impl Record {
    /// Create an empty record of `kind`
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style [`Record::push`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
    }

    /// Value of the first field called `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}
