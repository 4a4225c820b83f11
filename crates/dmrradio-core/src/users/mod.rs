//! User database records
//!
//! Users are stored in md380tools format, one user per line:
//!
//! ```text
//! 3100001,N0CALL,John Doe,Springfield,Illinois,Johnny,United States
//! ```
//!
//! Columns are id, callsign, name, city, state, nickname and country. An
//! empty country means the country is unknown.

mod countries;
mod filter;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub use countries::{distinct_countries, write_country_list, CountryCounts};
pub use filter::{filter_users, CountryFilter};

use crate::error::{Error, Result};

/// Line-file spelling of the unknown country
pub const NO_COUNTRY: &str = "<none>";

/// Number of columns in a users file line
const COLUMNS: usize = 7;

/// One user database entry
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// DMR radio id
    pub id: u32,
    /// Callsign
    pub callsign: String,
    /// Full name
    pub name: String,
    /// City
    pub city: String,
    /// State or province
    pub state: String,
    /// Nickname
    pub nick: String,
    /// Country; empty when unknown
    pub country: String,
}

impl UserRecord {
    /// Parse one users file line. `line_no` is used in errors.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self> {
        let cols: Vec<&str> = line.splitn(COLUMNS, ',').map(str::trim).collect();
        let id = cols[0].parse().map_err(|_| Error::MalformedUsers {
            line: line_no,
            detail: format!("bad radio id \"{}\"", cols[0]),
        })?;
        let col = |i: usize| cols.get(i).copied().unwrap_or("").to_string();

        Ok(Self {
            id,
            callsign: col(1),
            name: col(2),
            city: col(3),
            state: col(4),
            nick: col(5),
            country: col(6),
        })
    }

    /// Render as a users file line, without line terminator
    pub fn to_line(&self) -> String {
        let clean = |s: &str| s.replace(',', " ");
        format!(
            "{},{},{},{},{},{},{}",
            self.id,
            clean(&self.callsign),
            clean(&self.name),
            clean(&self.city),
            clean(&self.state),
            clean(&self.nick),
            clean(&self.country)
        )
    }
}

/// Parse users from a reader. Blank lines are skipped.
pub fn parse_users<R: BufRead>(reader: R) -> Result<Vec<UserRecord>> {
    let mut users = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        users.push(UserRecord::parse_line(&line, index + 1)?);
    }
    Ok(users)
}

/// Write users, one line each
pub fn write_users<W: Write>(mut writer: W, users: &[UserRecord]) -> Result<()> {
    for user in users {
        writeln!(writer, "{}", user.to_line())?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a users file
pub fn read_users_file(path: &Path) -> Result<Vec<UserRecord>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let users = parse_users(BufReader::new(file)).map_err(|e| match e {
        Error::Stream(source) => Error::io(path, source),
        other => other,
    })?;
    log::debug!("Read {} users from {}", users.len(), path.display());
    Ok(users)
}

/// Write a users file
pub fn write_users_file(path: &Path, users: &[UserRecord]) -> Result<()> {
    let file = File::create(path).map_err(|e| Error::io(path, e))?;
    write_users(BufWriter::new(file), users).map_err(|e| match e {
        Error::Stream(source) => Error::io(path, source),
        other => other,
    })?;
    log::info!("Wrote {} users to {}", users.len(), path.display());
    Ok(())
}

#[cfg(test)]
pub(crate) fn user(id: u32, country: &str) -> UserRecord {
    UserRecord {
        id,
        callsign: format!("CALL{}", id),
        country: country.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let u = UserRecord::parse_line(
            "3100001,N0CALL,John Doe,Springfield,Illinois,Johnny,United States",
            1,
        )
        .unwrap();
        assert_eq!(u.id, 3100001);
        assert_eq!(u.callsign, "N0CALL");
        assert_eq!(u.nick, "Johnny");
        assert_eq!(u.country, "United States");
    }

    #[test]
    fn test_short_line_leaves_blanks() {
        let u = UserRecord::parse_line("1234,AB1CD", 1).unwrap();
        assert_eq!(u.callsign, "AB1CD");
        assert_eq!(u.country, "");
    }

    #[test]
    fn test_country_keeps_extra_commas() {
        let u = UserRecord::parse_line("1,A,B,C,D,E,Korea, Republic of", 1).unwrap();
        assert_eq!(u.country, "Korea, Republic of");
        assert_eq!(u.to_line(), "1,A,B,C,D,E,Korea  Republic of");
    }

    #[test]
    fn test_bad_id_reports_line() {
        let input = "1,A,,,,,US\n\nxyz,B,,,,,CA\n";
        match parse_users(input.as_bytes()) {
            Err(Error::MalformedUsers { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected MalformedUsers, got {:?}", other),
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.csv");
        let users = vec![user(2, "US"), user(1, ""), user(3, "CA")];
        write_users_file(&path, &users).unwrap();
        assert_eq!(read_users_file(&path).unwrap(), users);
    }
}
