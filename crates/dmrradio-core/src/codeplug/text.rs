//! Line-oriented text codeplug format
//!
//! ```text
//! Model: MD-380
//! Frequency Range: 400-480 MHz
//!
//! [Channel]
//! Name: Simplex
//! Rx Frequency: 446.00000
//! Intro Screen Line 1: "  centered  "
//! ```
//!
//! Header lines come before the first section. Each `Model:` line starts a
//! new model declaration; `Frequency Range:` lines attach to the most recent
//! model. Lines whose first non-blank character is `#` are comments.
//!
//! Values are one line each. `\\`, `\n`, `\r`, `\t` and `\"` are escapes, and
//! a value with leading or trailing blanks is written in double quotes.
//! Field names cannot contain `:` or line breaks, start with `#` or `[`, or
//! carry surrounding blanks.

use super::record::Record;
use super::{Declaration, Format};
use crate::error::{Error, Result};

const MODEL_KEY: &str = "Model";
const FREQUENCY_RANGE_KEY: &str = "Frequency Range";

fn escape_into(out: &mut String, c: char) {
    match c {
        '\\' => out.push_str("\\\\"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\t' => out.push_str("\\t"),
        '"' => out.push_str("\\\""),
        _ => out.push(c),
    }
}

/// Encode a value for the right-hand side of a `Name: Value` line
fn encode_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    let quoted = value.trim() != value;
    if quoted {
        out.push('"');
    }
    value.chars().for_each(|c| escape_into(&mut out, c));
    if quoted {
        out.push('"');
    }
    out
}

/// Decode a value written by [`encode_value`]
///
/// Unknown escapes are kept as written so hand-edited files with stray
/// backslashes still load.
fn decode_value(raw: &str, line_no: usize) -> Result<String> {
    let raw = raw.trim();
    let (body, quoted) = match raw.strip_prefix('"') {
        Some(rest) => (rest, true),
        None => (raw, false),
    };

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            },
            '"' if quoted => {
                if !chars.as_str().trim().is_empty() {
                    return Err(Error::malformed(
                        Format::Text,
                        format!("line {}: text after closing quote", line_no),
                    ));
                }
                return Ok(out);
            }
            _ => out.push(c),
        }
    }

    if quoted {
        return Err(Error::malformed(
            Format::Text,
            format!("line {}: unterminated quoted value", line_no),
        ));
    }
    Ok(out)
}

fn unrepresentable(detail: String) -> Error {
    Error::Unrepresentable {
        format: Format::Text,
        detail,
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.trim() != name
        || name.contains([':', '\n', '\r'])
        || name.starts_with(['#', '['])
    {
        return Err(unrepresentable(format!("field name {:?}", name)));
    }
    Ok(())
}

fn check_kind(kind: &str) -> Result<()> {
    if kind.trim() != kind || kind.contains(['\n', '\r']) {
        return Err(unrepresentable(format!("record kind {:?}", kind)));
    }
    Ok(())
}

/// Parse a text codeplug
pub fn parse(content: &str) -> Result<(Vec<Declaration>, Vec<Record>)> {
    let mut declarations: Vec<Declaration> = Vec::new();
    let mut records: Vec<Record> = Vec::new();

    for (index, raw) in content.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(kind) = line.strip_prefix('[') {
            let kind = kind.strip_suffix(']').ok_or_else(|| {
                Error::malformed(Format::Text, format!("line {}: unterminated section", line_no))
            })?;
            records.push(Record::new(kind.trim()));
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            Error::malformed(Format::Text, format!("line {}: expected \"Name: Value\"", line_no))
        })?;
        let key = key.trim();
        let value = decode_value(value, line_no)?;

        if let Some(record) = records.last_mut() {
            record.push(key, value);
            continue;
        }

        match key {
            MODEL_KEY => declarations.push(Declaration {
                model: value,
                frequency_ranges: Vec::new(),
            }),
            FREQUENCY_RANGE_KEY => {
                let decl = declarations.last_mut().ok_or_else(|| {
                    Error::malformed(
                        Format::Text,
                        format!("line {}: frequency range before model", line_no),
                    )
                })?;
                decl.frequency_ranges.push(value);
            }
            other => {
                return Err(Error::malformed(
                    Format::Text,
                    format!("line {}: unknown header \"{}\"", line_no, other),
                ))
            }
        }
    }

    Ok((declarations, records))
}

/// Render a loaded codeplug as text
///
/// Fails when a record kind or field name cannot be written on one line.
pub fn render(model: &str, frequency_range: &str, records: &[Record]) -> Result<String> {
    let mut out = String::new();
    out.push_str(&format!("{}: {}\n", MODEL_KEY, encode_value(model)));
    out.push_str(&format!(
        "{}: {}\n",
        FREQUENCY_RANGE_KEY,
        encode_value(frequency_range)
    ));

    for record in records {
        check_kind(&record.kind)?;
        out.push_str(&format!("\n[{}]\n", record.kind));
        for field in &record.fields {
            check_name(&field.name)?;
            out.push_str(&format!("{}: {}\n", field.name, encode_value(&field.value)));
        }
    }

    Ok(out)
}
