//! Country allow-lists

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::{UserRecord, NO_COUNTRY};
use crate::error::{Error, Result};

/// A set of country names users are filtered by
///
/// Names are case-sensitive. The empty string stands for users without a
/// country. An empty filter lets every user through.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    countries: HashSet<String>,
}

impl CountryFilter {
    /// Create an empty filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a country list
    ///
    /// Everything from the first unescaped `#` on a line is a comment. Lines
    /// are trimmed and blank lines skipped. A `<none>` line adds the empty
    /// country; `\<none>` adds a country literally named `<none>`. A
    /// backslash makes the next character literal.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut filter = Self::new();
        for line in reader.lines() {
            if let Some(country) = decode_country_line(&line?) {
                filter.insert(country);
            }
        }
        Ok(filter)
    }

    /// Read a country list file
    pub fn read_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let filter = Self::from_reader(BufReader::new(file)).map_err(|e| match e {
            Error::Stream(source) => Error::io(path, source),
            other => other,
        })?;
        log::debug!("{} countries in {}", filter.len(), path.display());
        Ok(filter)
    }

    /// Add a country
    pub fn insert(&mut self, country: impl Into<String>) {
        self.countries.insert(country.into());
    }

    /// Number of countries
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Whether the filter lets everyone through
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Whether `country` passes
    pub fn accepts(&self, country: &str) -> bool {
        self.is_empty() || self.countries.contains(country)
    }
}

impl<S: Into<String>> FromIterator<S> for CountryFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            countries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Country named by one list line, `None` for blank and comment lines
fn decode_country_line(line: &str) -> Option<String> {
    let mut country = String::with_capacity(line.len());
    let mut escaped = false;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped = true;
                if let Some(next) = chars.next() {
                    country.push(next);
                }
            }
            '#' => break,
            _ => country.push(c),
        }
    }

    let country = country.trim();
    if country.is_empty() {
        None
    } else if country == NO_COUNTRY && !escaped {
        Some(String::new())
    } else {
        Some(country.to_string())
    }
}

/// Users whose country passes `filter`, in input order
pub fn filter_users(users: Vec<UserRecord>, filter: &CountryFilter) -> Vec<UserRecord> {
    if filter.is_empty() {
        return users;
    }
    users
        .into_iter()
        .filter(|u| filter.accepts(&u.country))
        .collect()
}
