//! Command-line front end for the movie catalog.
//! Usage:
//!   cinedex seed | clear | list
//!   cinedex add-person '<json>' | update-person '<json>' | delete-person <id>
//!   cinedex add-movie '<json>' | update-movie '<json>' | delete-movie <id>
//! Data lives in CINEDEX_DATA_DIR (.env supported).

use anyhow::{bail, Context, Result};
use cinedex::config::Config;
use cinedex::seed;
use cinedex::{Catalog, JsonFileStore, MovieSlots, MovieUpdate, PersonSlots, PersonUpdate};
use dotenvy::dotenv;
use serde::de::DeserializeOwned;
use std::env;
use std::str::FromStr;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Seed,
    Clear,
    List,
    AddPerson,
    UpdatePerson,
    DeletePerson,
    AddMovie,
    UpdateMovie,
    DeleteMovie,
}

impl FromStr for Command {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "seed" => Ok(Command::Seed),
            "clear" => Ok(Command::Clear),
            "list" => Ok(Command::List),
            "add-person" => Ok(Command::AddPerson),
            "update-person" => Ok(Command::UpdatePerson),
            "delete-person" => Ok(Command::DeletePerson),
            "add-movie" => Ok(Command::AddMovie),
            "update-movie" => Ok(Command::UpdateMovie),
            "delete-movie" => Ok(Command::DeleteMovie),
            other => Err(anyhow::anyhow!("unknown command '{}'", other)),
        }
    }
}

impl Command {
    /// Commands whose result does not depend on the loaded records.
    fn replaces_catalog(self) -> bool {
        matches!(self, Command::Seed | Command::Clear)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn main() -> Result<()> {
    let dotenv_result = dotenv();
    init_tracing();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }

    let mut args = env::args().skip(1);
    let command: Command = args
        .next()
        .context("missing command (seed, clear, list, add-person, add-movie, ...)")?
        .parse()?;
    let argument = args.next();

    let config = Config::from_env()?;
    let store = JsonFileStore::new(&config.data_dir);
    let mut catalog = Catalog::with_options(config.catalog_options());
    let report = catalog.load(&store)?;

    let modified = run(command, argument.as_deref(), &mut catalog)?;
    if !modified {
        return Ok(());
    }
    if report.rejected() > 0 && !command.replaces_catalog() {
        bail!(
            "{} stored records failed to load; refusing to save over them",
            report.rejected()
        );
    }
    catalog.save(&store)
}

/// Returns whether the catalog needs saving.
fn run(command: Command, argument: Option<&str>, catalog: &mut Catalog) -> Result<bool> {
    match command {
        Command::Seed => {
            seed::generate_test_data(catalog)?;
            Ok(true)
        }
        Command::Clear => {
            seed::clear_data(catalog);
            Ok(true)
        }
        Command::List => {
            print_catalog(catalog);
            Ok(false)
        }
        Command::AddPerson => {
            let slots: PersonSlots = parse_json(argument)?;
            Ok(catalog.add_person(slots).is_ok())
        }
        Command::UpdatePerson => {
            let update: PersonUpdate = parse_json(argument)?;
            Ok(catalog.update_person(update).is_ok())
        }
        Command::DeletePerson => Ok(catalog.destroy_person(parse_id(argument)?)),
        Command::AddMovie => {
            let slots: MovieSlots = parse_json(argument)?;
            Ok(catalog.add_movie(slots).is_ok())
        }
        Command::UpdateMovie => {
            let update: MovieUpdate = parse_json(argument)?;
            Ok(catalog.update_movie(update).is_ok())
        }
        Command::DeleteMovie => Ok(catalog.destroy_movie(parse_id(argument)?)),
    }
}

fn parse_json<T: DeserializeOwned>(argument: Option<&str>) -> Result<T> {
    let raw = argument.context("missing JSON slot record argument")?;
    serde_json::from_str(raw).context("slot record is not valid JSON")
}

fn parse_id(argument: Option<&str>) -> Result<u32> {
    let raw = argument.context("missing id argument")?;
    raw.trim()
        .parse()
        .with_context(|| format!("'{}' is not a valid id", raw))
}

fn print_catalog(catalog: &Catalog) {
    println!("Persons:");
    for person in catalog.persons().values() {
        println!("  {}", person);
    }
    println!("Movies:");
    for movie in catalog.movies().values() {
        println!("  {}", movie);
        if let Some(genre) = movie.movie_genre() {
            println!("    genre: {}", genre.label());
        }
    }
}
