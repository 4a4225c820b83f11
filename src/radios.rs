//! Radio registration and dispatch
//!
//! Radios are selected with a spec string of the form `name` or
//! `name:key1=value1,key2=value2`, from `--device` or `DMRRADIO_DEVICE`.

use std::collections::HashMap;
use std::error::Error;

use dmrradio_core::radio::Radio;

/// Information about a radio backend
pub struct RadioInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Short description
    pub description: &'static str,
}

/// Get information about all available radio backends (enabled at compile
/// time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_radios() -> Vec<RadioInfo> {
    let mut radios = Vec::new();

    #[cfg(feature = "dummy")]
    radios.push(RadioInfo {
        name: "dummy",
        description: "Emulated radio kept in memory (image=<file>,size=<bytes>)",
    });

    radios
}

/// Generate a short list of radio names for CLI help
pub fn radio_names_short() -> String {
    let radios = available_radios();
    let names: Vec<&str> = radios.iter().map(|r| r.name).collect();
    names.join(", ")
}

/// Parsed radio parameters
#[derive(Debug)]
pub struct RadioParams {
    /// Backend name
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

/// Parse a radio spec into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
pub fn parse_radio_params(s: &str) -> Result<RadioParams, Box<dyn Error>> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            if let Some((key, value)) = opt.split_once('=') {
                params.insert(key.to_string(), value.to_string());
            } else {
                return Err(
                    format!("Invalid parameter format: '{}' (expected key=value)", opt).into(),
                );
            }
        }
    }

    Ok(RadioParams {
        name: name.to_string(),
        params,
    })
}

/// Parse a string as a hex or decimal usize
#[cfg(feature = "dummy")]
fn parse_size(s: &str) -> Result<usize, Box<dyn Error>> {
    let parsed = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        usize::from_str_radix(hex, 16)
    } else {
        s.parse::<usize>()
    };
    parsed.map_err(|e| format!("Invalid size '{}': {}", s, e).into())
}

/// An open radio, released when dropped
pub struct RadioHandle {
    radio: Box<dyn Radio>,
    closed: bool,
}

impl RadioHandle {
    fn new(radio: Box<dyn Radio>) -> Self {
        Self {
            radio,
            closed: false,
        }
    }

    /// Access the radio
    pub fn as_radio_mut(&mut self) -> &mut dyn Radio {
        self.radio.as_mut()
    }

    /// Release the radio, reporting any error
    pub fn close(mut self) -> Result<(), Box<dyn Error>> {
        self.closed = true;
        self.radio.close()?;
        Ok(())
    }
}

impl Drop for RadioHandle {
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.radio.close() {
                log::warn!("Failed to release {} radio: {}", self.radio.name(), e);
            }
        }
    }
}

/// Open a radio from its spec
pub fn open_radio(spec: &str) -> Result<RadioHandle, Box<dyn Error>> {
    let params = parse_radio_params(spec)?;
    log::debug!("Opening radio {} with {:?}", params.name, params.params);

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),
        _ => Err(format!(
            "Unknown radio: {} (available: {})",
            params.name,
            radio_names_short()
        )
        .into()),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &RadioParams) -> Result<RadioHandle, Box<dyn Error>> {
    use dmrradio_dummy::{DummyConfig, DummyRadio};

    let mut config = DummyConfig::default();
    for (key, value) in &params.params {
        match key.as_str() {
            "image" => config.image = Some(value.into()),
            "size" => config.size = parse_size(value)?,
            _ => return Err(format!("Unknown dummy parameter: {}", key).into()),
        }
    }

    let radio = DummyRadio::new(config)?;
    log::info!("Opened emulated radio ({} bytes)", radio.data().len());
    Ok(RadioHandle::new(Box::new(radio)))
}
