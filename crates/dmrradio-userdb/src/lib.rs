//! dmrradio-userdb - DMR user database retrieval
//!
//! Builds the user list shown as caller id on the radio, either from a
//! local md380tools users file or by downloading public user exports.
//!
//! # Example
//!
//! ```ignore
//! use dmrradio_core::progress::Silent;
//! use dmrradio_userdb::{UserDb, UserDbConfig};
//!
//! let db = UserDb::load(&UserDbConfig::curated().abbreviate(true), &mut Silent)?;
//! db.write_md380tools_file("users.csv".as_ref())?;
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

mod abbreviate;
mod config;
mod error;
mod remote;

use std::path::Path;

use dmrradio_core::progress::Progress;
use dmrradio_core::users::{self, filter_users, UserRecord};

pub use config::{Source, UserDbConfig, RADIOID_CSV_URL, RADIOID_JSON_URL};
pub use error::{Result, UserDbError};

/// A loaded user database
#[derive(Debug, Clone, Default)]
pub struct UserDb {
    users: Vec<UserRecord>,
}

impl UserDb {
    /// Load users as described by `config`
    ///
    /// Local files are read without progress output. Downloads report one
    /// progress phase covering every source. Country filtering happens
    /// before abbreviation, so filters name countries as the source spells
    /// them.
    pub fn load(config: &UserDbConfig, progress: &mut dyn Progress) -> Result<Self> {
        let users = match config.source() {
            Source::File(path) => users::read_users_file(path)?,
            Source::Curated | Source::Merged => {
                let sets = remote::download_all(&config.sources(), progress)?;
                remote::merge(sets)
            }
        };

        let total = users.len();
        let mut users = filter_users(users, &config.countries);
        if users.len() != total {
            log::info!("Kept {} of {} users", users.len(), total);
        }

        if config.abbreviate {
            users.iter_mut().for_each(abbreviate::abbreviate);
        }

        Ok(Self { users })
    }

    /// Users in database order
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// Distinct countries in order of first appearance
    pub fn all_countries(&self) -> Vec<String> {
        users::distinct_countries(&self.users)
    }

    /// Write the users as an md380tools users file
    pub fn write_md380tools_file(&self, path: &Path) -> Result<()> {
        users::write_users_file(path, &self.users)?;
        Ok(())
    }
}
