use crate::associations::Credits;
use crate::models::{Movie, MovieId, Person, PersonId};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Movies must name a director when created.
    pub require_director: bool,
}

/// Owns the person and movie registries. Registries start empty and are the
/// only source of truth for existence and uniqueness checks.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub(crate) persons: BTreeMap<PersonId, Person>,
    pub(crate) movies: BTreeMap<MovieId, Movie>,
    pub(crate) credits: Credits,
    options: CatalogOptions,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CatalogOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    pub fn persons(&self) -> &BTreeMap<PersonId, Person> {
        &self.persons
    }

    pub fn movies(&self) -> &BTreeMap<MovieId, Movie> {
        &self.movies
    }

    pub fn person(&self, person_id: PersonId) -> Option<&Person> {
        self.persons.get(&person_id)
    }

    pub fn movie(&self, movie_id: MovieId) -> Option<&Movie> {
        self.movies.get(&movie_id)
    }

    pub fn clear(&mut self) {
        self.persons.clear();
        self.movies.clear();
        self.credits = Credits::default();
        debug!("Registries cleared");
    }

    /// Re-derives a person's role from their current credits.
    pub(crate) fn refresh_role(&mut self, person_id: PersonId) {
        let role = self.credits.role_of(person_id);
        if let Some(person) = self.persons.get_mut(&person_id) {
            person.role = role;
        }
    }
}
