//! Subcommand dispatch
//!
//! The set of subcommands is fixed. The subcommand token is matched without
//! regard to case; an unknown or missing token prints the usage summary and
//! exits with status 1 before anything else happens.

use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use dmrradio_core::model::ModelCatalog;

use crate::commands;
use crate::radios::{self, RadioHandle};

/// Result of a command handler
pub type CommandResult = Result<(), Box<dyn Error>>;

/// Process-wide options shared by every handler
pub struct Context {
    /// Program name used in usage messages
    pub prog: String,
    /// Radio spec from `--device` / `DMRRADIO_DEVICE`
    pub device: Option<String>,
    /// Model catalog file replacing the built-in one
    pub models: Option<PathBuf>,
    /// User database download locations replacing the built-in ones
    pub user_sources: Option<Vec<String>>,
}

impl Context {
    /// Load the model catalog
    pub fn catalog(&self) -> Result<ModelCatalog, Box<dyn Error>> {
        let catalog = match &self.models {
            Some(path) => ModelCatalog::load_file(path)?,
            None => ModelCatalog::builtin()?,
        };
        log::debug!("Loaded {} models", catalog.len());
        Ok(catalog)
    }

    /// Open the configured radio
    pub fn open_radio(&self) -> Result<RadioHandle, Box<dyn Error>> {
        let Some(spec) = self.device.as_deref() else {
            let mut msg = String::from("no radio specified (use --device or DMRRADIO_DEVICE)");
            for info in radios::available_radios() {
                msg.push_str(&format!("\n  {:10} {}", info.name, info.description));
            }
            return Err(msg.into());
        };
        radios::open_radio(spec)
    }
}

/// A subcommand's arguments were missing or malformed
///
/// Carries the fully rendered message, including the subcommand's help.
#[derive(Debug)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for UsageError {}

/// One subcommand
pub struct CommandEntry {
    /// Canonical spelling of the token
    pub name: &'static str,
    /// Argument synopsis shown in the usage summary
    pub usage: &'static str,
    /// One-line description shown in the subcommand's help
    pub about: &'static str,
    /// Handler
    pub run: fn(&Context, &Invocation<'_>) -> CommandResult,
}

/// A resolved subcommand with its arguments
pub struct Invocation<'a> {
    /// Table entry that matched the token
    pub entry: &'static CommandEntry,
    /// Arguments after the token
    pub args: &'a [String],
}

/// Every subcommand, in usage order
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "codeplugToJSON",
        usage: "<codeplugFile> <jsonFile>",
        about: "Creates <jsonFile> containing a JSON representation of the codeplug in <codeplugFile>.",
        run: commands::convert::codeplug_to_json,
    },
    CommandEntry {
        name: "codeplugToText",
        usage: "<codeplugFile> <textFile>",
        about: "Creates <textFile> containing a textual representation of the codeplug in <codeplugFile>.",
        run: commands::convert::codeplug_to_text,
    },
    CommandEntry {
        name: "codeplugToXLSX",
        usage: "<codeplugFile> <xlsxFile>",
        about: "Creates <xlsxFile> containing a spreadsheet representation of the codeplug in <codeplugFile>.",
        run: commands::convert::codeplug_to_xlsx,
    },
    CommandEntry {
        name: "countryCounts",
        usage: "<usersFile>",
        about: "Outputs the number of users for each country in <usersFile>.",
        run: commands::users::country_counts,
    },
    CommandEntry {
        name: "filterUsers",
        usage: "<countriesFile> <inUsersFile> <outUsersFile>",
        about: "Writes the users of <inUsersFile> from the countries listed in <countriesFile> to <outUsersFile>.",
        run: commands::users::filter_users,
    },
    CommandEntry {
        name: "getMergedUsers",
        usage: "<usersFile>",
        about: "Downloads the user database from multiple websites and merges them into <usersFile>.",
        run: commands::users::get_merged_users,
    },
    CommandEntry {
        name: "getAbbreviatedUsers",
        usage: "<usersFile>",
        about: "Downloads a curated user database into <usersFile>, abbreviating many state and country names.",
        run: commands::users::get_abbreviated_users,
    },
    CommandEntry {
        name: "getUsers",
        usage: "<usersFile>",
        about: "Downloads a curated user database into <usersFile>.",
        run: commands::users::get_users,
    },
    CommandEntry {
        name: "jsonToCodeplug",
        usage: "<jsonFile> <codeplugFile>",
        about: "Creates a codeplug file, <codeplugFile>, from the JSON representation in <jsonFile>.",
        run: commands::convert::json_to_codeplug,
    },
    CommandEntry {
        name: "newCodeplug",
        usage: "-model <model> -freq <freqRange> <codeplugFile>",
        about: "Creates a new default codeplug for the given radio model.",
        run: commands::codeplug::new_codeplug,
    },
    CommandEntry {
        name: "readCodeplug",
        usage: "-model <model> -freq <freqRange> <codeplugFile>",
        about: "Reads a codeplug from the radio into <codeplugFile>.",
        run: commands::codeplug::read_codeplug,
    },
    CommandEntry {
        name: "readMD380Users",
        usage: "<usersFile>",
        about: "Reads the user database from the radio to <usersFile>.",
        run: commands::users::read_md380_users,
    },
    CommandEntry {
        name: "readSPIFlash",
        usage: "<filename>",
        about: "Reads the contents of the radio's SPI Flash into <filename>.",
        run: commands::flash::read_spi_flash,
    },
    CommandEntry {
        name: "textToCodeplug",
        usage: "<textFile> <codeplugFile>",
        about: "Creates a codeplug file, <codeplugFile>, from the textual representation in <textFile>.",
        run: commands::convert::text_to_codeplug,
    },
    CommandEntry {
        name: "userCountries",
        usage: "<usersFile> <countriesFile>",
        about: "Writes a list of the countries in <usersFile> to <countriesFile>.",
        run: commands::users::user_countries,
    },
    CommandEntry {
        name: "version",
        usage: "",
        about: "Outputs the version number.",
        run: commands::version,
    },
    CommandEntry {
        name: "writeCodeplug",
        usage: "<codeplugFile>",
        about: "Writes the codeplug in <codeplugFile> to the radio.",
        run: commands::codeplug::write_codeplug,
    },
    CommandEntry {
        name: "writeMD380Firmware",
        usage: "<firmwareFile>",
        about: "Writes the contents of <firmwareFile> into the MD380 radio.",
        run: commands::flash::write_md380_firmware,
    },
    CommandEntry {
        name: "writeMD2017Users",
        usage: "<usersFile>",
        about: "Writes the user database in <usersFile> to the radio.",
        run: commands::users::write_uv380_users,
    },
    CommandEntry {
        name: "writeMD380Users",
        usage: "<usersFile>",
        about: "Writes the user database in <usersFile> to the radio.",
        run: commands::users::write_md380_users,
    },
    CommandEntry {
        name: "writeUV380Users",
        usage: "<usersFile>",
        about: "Writes the user database in <usersFile> to the radio.",
        run: commands::users::write_uv380_users,
    },
    CommandEntry {
        name: "xlsxToCodeplug",
        usage: "<xlsxFile> <codeplugFile>",
        about: "Creates a codeplug file, <codeplugFile>, from the spreadsheet in <xlsxFile>.",
        run: commands::convert::xlsx_to_codeplug,
    },
];

/// Find the entry for `token`, ignoring case
pub fn lookup(token: &str) -> Option<&'static CommandEntry> {
    COMMANDS.iter().find(|c| c.name.eq_ignore_ascii_case(token))
}

/// Usage summary listing every subcommand
pub fn usage(prog: &str) -> String {
    let mut out = format!("Usage {} <subCommand> args\n", prog);
    out.push_str("subCommands:\n");
    for entry in COMMANDS {
        if entry.usage.is_empty() {
            out.push_str(&format!("\t{}\n", entry.name));
        } else {
            out.push_str(&format!("\t{} {}\n", entry.name, entry.usage));
        }
    }
    out.push_str(&format!("Use '{} <subCommand> -h' for subCommand help\n", prog));
    out.push_str("\n\tNote that the capitalization of the <subCommand> is ignored.\n");
    out
}

/// Run the subcommand named by `args[0]` and return the process exit status
pub fn dispatch(ctx: &Context, args: &[String]) -> i32 {
    let Some(entry) = args.first().and_then(|token| lookup(token)) else {
        eprint!("{}", usage(&ctx.prog));
        return 1;
    };

    let invocation = Invocation {
        entry,
        args: &args[1..],
    };
    log::debug!("Running {} with {:?}", entry.name, invocation.args);

    match (entry.run)(ctx, &invocation) {
        Ok(()) => 0,
        Err(e) => {
            if let Some(usage) = e.downcast_ref::<UsageError>() {
                eprint!("{}", usage);
            } else {
                eprintln!("{}", e);
            }
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context {
            prog: "dmrradio".to_string(),
            device: None,
            models: None,
            user_sources: None,
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(lookup("codeplugtojson").unwrap().name, "codeplugToJSON");
        assert_eq!(lookup("VERSION").unwrap().name, "version");
        assert_eq!(lookup("WriteMd2017Users").unwrap().name, "writeMD2017Users");
        assert!(lookup("bogus").is_none());
        assert!(lookup("").is_none());
    }

    #[test]
    fn test_table_names_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert!(!a.name.eq_ignore_ascii_case(b.name), "{} listed twice", a.name);
            }
        }
    }

    #[test]
    fn test_usage_lists_every_command() {
        let text = usage("dmrradio");
        assert!(text.starts_with("Usage dmrradio <subCommand> args\nsubCommands:\n"));
        for entry in COMMANDS {
            assert!(text.contains(&format!("\t{}", entry.name)));
        }
        assert!(text.contains("capitalization of the <subCommand> is ignored"));
    }

    #[test]
    fn test_dispatch_unknown_command() {
        assert_eq!(dispatch(&ctx(), &["bogus".to_string()]), 1);
        assert_eq!(dispatch(&ctx(), &[]), 1);
    }

    #[test]
    fn test_missing_device() {
        let err = ctx().open_radio().err().unwrap();
        assert!(err.to_string().contains("no radio specified"));
    }
}
