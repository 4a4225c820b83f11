//! User database commands

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use dmrradio_core::progress::Silent;
use dmrradio_core::radio::UsersLayout;
use dmrradio_core::users::{write_country_list, CountryCounts, CountryFilter};
use dmrradio_userdb::{UserDb, UserDbConfig};

use super::{parse_args, with_progress};
use crate::cli::{FileArgs, FilterUsersArgs, UserCountriesArgs};
use crate::router::{CommandResult, Context, Invocation};

const RETRIEVE_PHASES: &[&str] = &["Retrieving Users file"];

const WRITE_USERS_PHASES: &[&str] = &[
    "Preparing to write users",
    "Erasing flash memory",
    "Writing users",
];

/// Apply the `--users-source` override to a remote configuration
fn remote_config(ctx: &Context, config: UserDbConfig) -> UserDbConfig {
    match &ctx.user_sources {
        Some(sources) => config.remote_sources(sources.clone()),
        None => config,
    }
}

fn load_file(path: &Path) -> Result<UserDb, Box<dyn std::error::Error>> {
    let db = UserDb::load(&UserDbConfig::from_file(path).abbreviate(false), &mut Silent)?;
    log::info!("Loaded {} users from {}", db.users().len(), path.display());
    Ok(db)
}

/// Read the radio's user database into a file
pub fn read_md380_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;
    let phases = [
        "Preparing to read users".to_string(),
        format!("Reading users to {}", args.file.display()),
    ];
    let phases: Vec<&str> = phases.iter().map(String::as_str).collect();

    let mut handle = ctx.open_radio()?;
    let file = File::create(&args.file)
        .map_err(|e| format!("Failed to create {}: {}", args.file.display(), e))?;
    let mut out = BufWriter::new(file);

    with_progress(&phases, |progress| {
        handle.as_radio_mut().read_users(&mut out, progress)
    })?;
    out.flush()?;
    handle.close()
}

fn write_users(ctx: &Context, invocation: &Invocation<'_>, layout: UsersLayout) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;

    let db = load_file(&args.file)?;
    let mut handle = ctx.open_radio()?;
    log::debug!("Writing users with the {} layout", layout);

    with_progress(WRITE_USERS_PHASES, |progress| {
        handle.as_radio_mut().write_users(db.users(), layout, progress)
    })?;
    handle.close()
}

/// Write a users file to an MD-380 class radio
pub fn write_md380_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    write_users(ctx, invocation, UsersLayout::Md380)
}

/// Write a users file to an MD-2017 or MD-UV380 class radio
pub fn write_uv380_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    write_users(ctx, invocation, UsersLayout::Uv380)
}

fn download(ctx: &Context, invocation: &Invocation<'_>, config: UserDbConfig) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;
    let config = remote_config(ctx, config);

    let db = with_progress(RETRIEVE_PHASES, |progress| UserDb::load(&config, progress))?;
    db.write_md380tools_file(&args.file)?;
    Ok(())
}

/// Download the curated users
pub fn get_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    download(ctx, invocation, UserDbConfig::curated().abbreviate(false))
}

/// Download the curated users with abbreviated names
pub fn get_abbreviated_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    download(ctx, invocation, UserDbConfig::curated().abbreviate(true))
}

/// Download and merge several user sets
pub fn get_merged_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    download(ctx, invocation, UserDbConfig::merged().abbreviate(false))
}

/// Write the distinct countries of a users file
pub fn user_countries(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: UserCountriesArgs = parse_args(ctx, invocation)?;
    let db = load_file(&args.users)?;

    let file = File::create(&args.countries)
        .map_err(|e| format!("Failed to create {}: {}", args.countries.display(), e))?;
    let mut out = BufWriter::new(file);
    write_country_list(&mut out, &db.all_countries())?;
    out.flush()?;
    Ok(())
}

/// Print the number of users per country
pub fn country_counts(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FileArgs = parse_args(ctx, invocation)?;
    let db = load_file(&args.file)?;

    print!("{}", CountryCounts::tally(db.users()));
    Ok(())
}

/// Keep only users from the listed countries
///
/// An empty input name downloads the curated users instead of reading a
/// file.
pub fn filter_users(ctx: &Context, invocation: &Invocation<'_>) -> CommandResult {
    let args: FilterUsersArgs = parse_args(ctx, invocation)?;
    let countries = CountryFilter::read_file(&args.countries)?;
    log::debug!("Filtering on {} countries", countries.len());

    let config = if args.in_users.is_empty() {
        remote_config(ctx, UserDbConfig::curated())
    } else {
        UserDbConfig::from_file(&args.in_users)
    };
    let config = config.abbreviate(false).filter_by_countries(countries);

    let db = UserDb::load(&config, &mut Silent)?;
    println!("{} Users", db.users().len());
    db.write_md380tools_file(&args.out_users)?;
    Ok(())
}
