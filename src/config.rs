use crate::catalog::CatalogOptions;
use anyhow::{bail, Result};
use std::env;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub require_director: bool,
}

impl Config {
    /// Reads `CINEDEX_DATA_DIR` and `CINEDEX_REQUIRE_DIRECTOR`.
    pub fn from_env() -> Result<Self> {
        let data_dir = env::var("CINEDEX_DATA_DIR")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATA_DIR.to_string());
        let require_director = match env::var("CINEDEX_REQUIRE_DIRECTOR") {
            Ok(raw) => parse_flag("CINEDEX_REQUIRE_DIRECTOR", &raw)?,
            Err(_) => false,
        };
        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            require_director,
        })
    }

    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            require_director: self.require_director,
        }
    }
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("{} must be true or false, got '{}'", name, other),
    }
}
