//! Persistence of the registries as plain JSON records.
use crate::catalog::Catalog;
use crate::slots::{MovieSlots, PersonSlots};
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Records of one kind, keyed by entity id.
pub type RecordMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Persons,
    Movies,
}

impl EntityKind {
    pub fn storage_key(self) -> &'static str {
        match self {
            EntityKind::Persons => "persons",
            EntityKind::Movies => "movies",
        }
    }
}

pub trait RecordStore {
    fn load_all(&self, kind: EntityKind) -> Result<RecordMap>;
    fn save_all(&self, kind: EntityKind, records: &RecordMap) -> Result<()>;
}

/// Keeps one JSON object per entity kind in a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, kind: EntityKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.storage_key()))
    }
}

impl RecordStore for JsonFileStore {
    fn load_all(&self, kind: EntityKind) -> Result<RecordMap> {
        let path = self.path(kind);
        if !path.exists() {
            debug!("No {} file at {:?}, starting empty", kind.storage_key(), path);
            return Ok(RecordMap::new());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {:?}", path))?;
        if raw.trim().is_empty() {
            return Ok(RecordMap::new());
        }
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {:?}", path))
    }

    fn save_all(&self, kind: EntityKind, records: &RecordMap) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {:?}", self.dir))?;
        let path = self.path(kind);
        let body = serde_json::to_string_pretty(records)?;
        fs::write(&path, body).with_context(|| format!("Failed to write {:?}", path))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub persons_loaded: usize,
    pub persons_rejected: usize,
    pub movies_loaded: usize,
    pub movies_rejected: usize,
}

impl LoadReport {
    /// Records that could not be loaded; saving afterwards would drop them.
    pub fn rejected(&self) -> usize {
        self.persons_rejected + self.movies_rejected
    }
}

impl Catalog {
    /// Replaces the registries with the stored records. Persons load first so
    /// movie references resolve; invalid records are logged and skipped.
    pub fn load(&mut self, store: &dyn RecordStore) -> Result<LoadReport> {
        let persons = store.load_all(EntityKind::Persons)?;
        let movies = store.load_all(EntityKind::Movies)?;
        self.clear();

        let mut report = LoadReport::default();
        for (key, record) in persons {
            let added = serde_json::from_value::<PersonSlots>(record)
                .map_err(|e| e.to_string())
                .and_then(|slots| self.add_person(slots).map_err(|v| v.to_string()));
            match added {
                Ok(_) => report.persons_loaded += 1,
                Err(e) => {
                    warn!("Skipping person record {}: {}", key, e);
                    report.persons_rejected += 1;
                }
            }
        }
        for (key, record) in movies {
            let added = serde_json::from_value::<MovieSlots>(record)
                .map_err(|e| e.to_string())
                .and_then(|slots| self.restore_movie(slots).map_err(|v| v.to_string()));
            match added {
                Ok(_) => report.movies_loaded += 1,
                Err(e) => {
                    warn!("Skipping movie record {}: {}", key, e);
                    report.movies_rejected += 1;
                }
            }
        }
        info!(
            "{} person records and {} movie records loaded.",
            report.persons_loaded, report.movies_loaded
        );
        Ok(report)
    }

    pub fn save(&self, store: &dyn RecordStore) -> Result<()> {
        let persons = self.records(EntityKind::Persons)?;
        let movies = self.records(EntityKind::Movies)?;
        store
            .save_all(EntityKind::Persons, &persons)
            .context("Failed to save persons")?;
        store
            .save_all(EntityKind::Movies, &movies)
            .context("Failed to save movies")?;
        info!(
            "{} person records and {} movie records saved.",
            persons.len(),
            movies.len()
        );
        Ok(())
    }

    /// Record form of one registry, as written by `save`.
    pub fn records(&self, kind: EntityKind) -> Result<RecordMap> {
        let mut records = RecordMap::new();
        match kind {
            EntityKind::Persons => {
                for (id, person) in &self.persons {
                    records.insert(id.to_string(), serde_json::to_value(person.to_record())?);
                }
            }
            EntityKind::Movies => {
                for (id, movie) in &self.movies {
                    records.insert(id.to_string(), serde_json::to_value(movie.to_record())?);
                }
            }
        }
        Ok(records)
    }
}
