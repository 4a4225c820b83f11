//! Country lists and per-country counts

use std::fmt;
use std::io::Write;

use super::{UserRecord, NO_COUNTRY};
use crate::error::Result;

/// Spell `country` as one country list line
///
/// The empty country is written as `<none>`. `\` and `#` are escaped with a
/// backslash, and a real country named `<none>` is written as `\<none>`.
pub(crate) fn encode_country(country: &str) -> String {
    if country.is_empty() {
        return NO_COUNTRY.to_string();
    }
    let mut out = String::with_capacity(country.len());
    if country == NO_COUNTRY {
        out.push('\\');
    }
    for c in country.chars() {
        if matches!(c, '\\' | '#') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Distinct countries of `users` in order of first appearance
pub fn distinct_countries(users: &[UserRecord]) -> Vec<String> {
    let mut countries: Vec<String> = Vec::new();
    for user in users {
        if !countries.iter().any(|c| *c == user.country) {
            countries.push(user.country.clone());
        }
    }
    countries
}

/// Write one country per line, the empty country as `<none>`
///
/// The list reads back with [`CountryFilter::from_reader`](super::CountryFilter::from_reader).
pub fn write_country_list<W: Write>(mut writer: W, countries: &[String]) -> Result<()> {
    for country in countries {
        writeln!(writer, "{}", encode_country(country))?;
    }
    writer.flush()?;
    Ok(())
}

/// Number of users per country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCounts {
    counts: Vec<(String, usize)>,
}

impl CountryCounts {
    /// Count `users` by exact country name, countries in order of first
    /// appearance
    pub fn tally(users: &[UserRecord]) -> Self {
        let counts = distinct_countries(users)
            .into_iter()
            .map(|country| {
                let n = users.iter().filter(|u| u.country == country).count();
                (country, n)
            })
            .collect();
        Self { counts }
    }

    /// `(country, count)` pairs
    pub fn counts(&self) -> &[(String, usize)] {
        &self.counts
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

impl fmt::Display for CountryCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (country, n) in &self.counts {
            writeln!(f, "{:7} {}", n, encode_country(country))?;
        }
        writeln!(f, "{:7} Total Users", self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{user, CountryFilter};

    fn sample() -> Vec<UserRecord> {
        vec![user(1, "US"), user(2, ""), user(3, "CA")]
    }

    #[test]
    fn test_distinct_countries_first_seen_order() {
        let users = vec![user(1, "CA"), user(2, "US"), user(3, "CA"), user(4, "")];
        assert_eq!(distinct_countries(&users), vec!["CA", "US", ""]);
    }

    #[test]
    fn test_country_list_reimports_as_filter() {
        let countries = distinct_countries(&sample());
        let mut out = Vec::new();
        write_country_list(&mut out, &countries).unwrap();
        assert_eq!(String::from_utf8(out.clone()).unwrap(), "US\n<none>\nCA\n");

        let filter = CountryFilter::from_reader(out.as_slice()).unwrap();
        assert_eq!(filter.len(), 3);
        for country in &countries {
            assert!(filter.accepts(country));
        }
        assert!(!filter.accepts("MX"));
    }

    #[test]
    fn test_literal_none_country_stays_distinct() {
        let users = vec![user(1, "<none>"), user(2, "US"), user(3, ""), user(4, "Net#1\\")];
        let countries = distinct_countries(&users);
        let mut out = Vec::new();
        write_country_list(&mut out, &countries).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "\\<none>\nUS\n<none>\nNet\\#1\\\\\n"
        );

        let filter = CountryFilter::from_reader(out.as_slice()).unwrap();
        assert_eq!(filter.len(), 4);
        for country in &countries {
            assert!(filter.accepts(country), "{:?} lost", country);
        }

        let only_literal = CountryFilter::from_reader("\\<none>\n".as_bytes()).unwrap();
        assert!(only_literal.accepts("<none>"));
        assert!(!only_literal.accepts(""));
    }

    #[test]
    fn test_counts_keep_literal_none_apart() {
        let counts = CountryCounts::tally(&[user(1, "<none>"), user(2, "")]);
        assert_eq!(
            counts.to_string(),
            "      1 \\<none>\n      1 <none>\n      2 Total Users\n"
        );
    }

    #[test]
    fn test_counts() {
        let counts = CountryCounts::tally(&sample());
        assert_eq!(
            counts.counts(),
            &[
                ("US".to_string(), 1),
                ("".to_string(), 1),
                ("CA".to_string(), 1)
            ]
        );
        assert_eq!(counts.total(), 3);
        assert_eq!(
            counts.to_string(),
            "      1 US\n      1 <none>\n      1 CA\n      3 Total Users\n"
        );
    }

    #[test]
    fn test_counts_empty() {
        let counts = CountryCounts::tally(&[]);
        assert_eq!(counts.to_string(), "      0 Total Users\n");
    }
}
