//! Native binary codeplug encoding
//!
//! The same bytes are used for codeplug files and for the codeplug area of a
//! radio. All integers are little endian; every string is UTF-8 with a `u16`
//! length prefix.
//!
//! ```text
//! magic        8 bytes   "DMRCPLG\0"
//! version      u16
//! model count  u16
//!   name       str
//!   nranges    u16
//!     range    str
//! record count u32
//!   kind       str
//!   nfields    u16
//!     name     str
//!     value    str
//! ```
//!
//! Bytes after the last record must be erased flash (0xFF).

use super::record::Record;
use super::{Declaration, Format};
use crate::error::{Error, Result};

/// Native codeplug signature
pub const MAGIC: &[u8; 8] = b"DMRCPLG\0";

/// Encoding version written by this crate
const VERSION: u16 = 1;

/// Check if data starts with the native signature
pub fn is_native(data: &[u8]) -> bool {
    data.len() >= MAGIC.len() && &data[..MAGIC.len()] == MAGIC
}

/// Bounds-checked little-endian reader
struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| {
                Error::malformed(
                    Format::Native,
                    format!("truncated at offset 0x{:X}", self.offset),
                )
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn string(&mut self) -> Result<String> {
        let at = self.offset;
        let len = self.u16()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| {
            Error::malformed(Format::Native, format!("invalid UTF-8 at offset 0x{:X}", at))
        })
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

fn put_u16(out: &mut Vec<u8>, value: usize, what: &str) -> Result<()> {
    let value = u16::try_from(value)
        .map_err(|_| Error::malformed(Format::Native, format!("too many bytes in {}", what)))?;
    out.extend_from_slice(&value.to_le_bytes());
    Ok(())
}

fn put_string(out: &mut Vec<u8>, s: &str) -> Result<()> {
    put_u16(out, s.len(), "string")?;
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Encode declarations and records
pub fn encode(declarations: &[Declaration], records: &[Record]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4096);
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&VERSION.to_le_bytes());

    put_u16(&mut out, declarations.len(), "model list")?;
    for decl in declarations {
        put_string(&mut out, &decl.model)?;
        put_u16(&mut out, decl.frequency_ranges.len(), "frequency range list")?;
        for range in &decl.frequency_ranges {
            put_string(&mut out, range)?;
        }
    }

    let count = u32::try_from(records.len())
        .map_err(|_| Error::malformed(Format::Native, "too many records"))?;
    out.extend_from_slice(&count.to_le_bytes());
    for record in records {
        put_string(&mut out, &record.kind)?;
        put_u16(&mut out, record.fields.len(), "field list")?;
        for field in &record.fields {
            put_string(&mut out, &field.name)?;
            put_string(&mut out, &field.value)?;
        }
    }

    Ok(out)
}

/// Decode a native codeplug
pub fn decode(data: &[u8]) -> Result<(Vec<Declaration>, Vec<Record>)> {
    if !is_native(data) {
        return Err(Error::malformed(Format::Native, "missing codeplug signature"));
    }

    let mut r = Reader::new(data);
    r.take(MAGIC.len())?;

    let version = r.u16()?;
    if version > VERSION {
        return Err(Error::malformed(
            Format::Native,
            format!("unsupported version {}", version),
        ));
    }

    let model_count = r.u16()?;
    let mut declarations = Vec::with_capacity(model_count as usize);
    for _ in 0..model_count {
        let model = r.string()?;
        let range_count = r.u16()?;
        let mut frequency_ranges = Vec::with_capacity(range_count as usize);
        for _ in 0..range_count {
            frequency_ranges.push(r.string()?);
        }
        declarations.push(Declaration {
            model,
            frequency_ranges,
        });
    }

    let record_count = r.u32()?;
    let mut records = Vec::new();
    for _ in 0..record_count {
        let mut record = Record::new(r.string()?);
        let field_count = r.u16()?;
        for _ in 0..field_count {
            let name = r.string()?;
            let value = r.string()?;
            record.push(name, value);
        }
        records.push(record);
    }

    if r.rest().iter().any(|&b| b != 0xFF) {
        return Err(Error::malformed(
            Format::Native,
            format!("unexpected data after last record at offset 0x{:X}", r.offset),
        ));
    }

    Ok((declarations, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codeplug::record::kinds;

    fn sample() -> (Vec<Declaration>, Vec<Record>) {
        let declarations = vec![
            Declaration {
                model: "MD-380".into(),
                frequency_ranges: vec!["400-480 MHz".into(), "136-174 MHz".into()],
            },
            Declaration {
                model: "RT3".into(),
                frequency_ranges: vec!["400-480 MHz".into()],
            },
        ];
        let records = vec![
            Record::new(kinds::GENERAL_SETTINGS).with("Radio Name", "Base"),
            Record::new(kinds::CHANNEL)
                .with("Name", "Simplex")
                .with("Rx Frequency", "446.00000"),
        ];
        (declarations, records)
    }

    #[test]
    fn test_encode_decode() {
        let (declarations, records) = sample();
        let data = encode(&declarations, &records).unwrap();
        assert!(is_native(&data));

        let (d, r) = decode(&data).unwrap();
        assert_eq!(d, declarations);
        assert_eq!(r, records);
    }

    #[test]
    fn test_erased_padding_accepted() {
        let (declarations, records) = sample();
        let mut data = encode(&declarations, &records).unwrap();
        data.resize(data.len() + 64, 0xFF);
        assert!(decode(&data).is_ok());
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let (declarations, records) = sample();
        let mut data = encode(&declarations, &records).unwrap();
        data.push(0x00);
        assert!(matches!(decode(&data), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_truncated() {
        let (declarations, records) = sample();
        let data = encode(&declarations, &records).unwrap();
        let err = decode(&data[..data.len() - 3]).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn test_missing_signature() {
        assert!(!is_native(b"DMRCPL"));
        assert!(matches!(
            decode(&[0xFF; 32]),
            Err(Error::Malformed { .. })
        ));
    }
}
