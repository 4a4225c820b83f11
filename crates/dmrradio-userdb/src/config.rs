//! User database configuration

use std::path::PathBuf;

use dmrradio_core::users::CountryFilter;

/// RadioID.net user export, CSV
pub const RADIOID_CSV_URL: &str = "https://radioid.net/static/user.csv";

/// RadioID.net user export, JSON
pub const RADIOID_JSON_URL: &str = "https://radioid.net/static/users.json";

/// Where users come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A local md380tools users file
    File(PathBuf),
    /// The curated remote set
    Curated,
    /// Several remote sets merged by radio id
    Merged,
}

/// How to build a [`UserDb`](crate::UserDb)
///
/// ```ignore
/// let config = UserDbConfig::curated()
///     .abbreviate(true)
///     .filter_by_countries(filter);
/// ```
#[derive(Debug, Clone)]
pub struct UserDbConfig {
    pub(crate) source: Source,
    pub(crate) abbreviate: bool,
    pub(crate) countries: CountryFilter,
    pub(crate) remote_sources: Option<Vec<String>>,
}

impl Default for UserDbConfig {
    fn default() -> Self {
        Self::curated()
    }
}

impl UserDbConfig {
    fn with_source(source: Source) -> Self {
        Self {
            source,
            abbreviate: false,
            countries: CountryFilter::new(),
            remote_sources: None,
        }
    }

    /// Load users from a local file
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::with_source(Source::File(path.into()))
    }

    /// Download the curated user set
    pub fn curated() -> Self {
        Self::with_source(Source::Curated)
    }

    /// Download several user sets and merge them
    pub fn merged() -> Self {
        Self::with_source(Source::Merged)
    }

    /// Shorten long country and US state names
    pub fn abbreviate(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }

    /// Keep only users from the given countries. An empty filter keeps
    /// everyone.
    pub fn filter_by_countries(mut self, countries: CountryFilter) -> Self {
        self.countries = countries;
        self
    }

    /// Replace the download locations of a remote set. Entries without an
    /// `http://` or `https://` scheme are read as local files.
    pub fn remote_sources(mut self, sources: Vec<String>) -> Self {
        self.remote_sources = Some(sources);
        self
    }

    /// Configured source
    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Download locations used for a remote source
    pub fn sources(&self) -> Vec<String> {
        if let Some(sources) = &self.remote_sources {
            return sources.clone();
        }
        match self.source {
            Source::File(_) => Vec::new(),
            Source::Curated => vec![RADIOID_CSV_URL.to_string()],
            Source::Merged => vec![RADIOID_CSV_URL.to_string(), RADIOID_JSON_URL.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = UserDbConfig::default();
        assert_eq!(config.source(), &Source::Curated);
        assert!(!config.abbreviate);
        assert!(config.countries.is_empty());
        assert_eq!(config.sources(), vec![RADIOID_CSV_URL]);
        assert_eq!(UserDbConfig::merged().sources().len(), 2);
        assert!(UserDbConfig::from_file("users.csv").sources().is_empty());
    }

    #[test]
    fn test_builder() {
        let filter: CountryFilter = ["Canada"].into_iter().collect();
        let config = UserDbConfig::merged()
            .abbreviate(true)
            .filter_by_countries(filter.clone())
            .remote_sources(vec!["a.csv".into()]);
        assert!(config.abbreviate);
        assert_eq!(config.countries, filter);
        assert_eq!(config.sources(), vec!["a.csv"]);
    }
}
