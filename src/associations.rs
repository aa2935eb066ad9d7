//! Actor and director links between movies and persons.
//!
//! Each person's role is derived from back-reference counts kept here, so
//! adding or removing a credit updates the role without rescanning movies.
use crate::catalog::Catalog;
use crate::models::{MovieId, PersonId, PersonRole};
use crate::slots::PersonRef;
use crate::violation::{Check, ConstraintViolation};
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Credits {
    acting: HashMap<PersonId, usize>,
    directing: HashMap<PersonId, usize>,
}

impl Credits {
    pub(crate) fn add_acting(&mut self, person_id: PersonId) {
        *self.acting.entry(person_id).or_insert(0) += 1;
    }

    pub(crate) fn remove_acting(&mut self, person_id: PersonId) {
        decrement(&mut self.acting, person_id);
    }

    pub(crate) fn add_directing(&mut self, person_id: PersonId) {
        *self.directing.entry(person_id).or_insert(0) += 1;
    }

    pub(crate) fn remove_directing(&mut self, person_id: PersonId) {
        decrement(&mut self.directing, person_id);
    }

    pub(crate) fn acting_count(&self, person_id: PersonId) -> usize {
        self.acting.get(&person_id).copied().unwrap_or(0)
    }

    pub(crate) fn directing_count(&self, person_id: PersonId) -> usize {
        self.directing.get(&person_id).copied().unwrap_or(0)
    }

    pub(crate) fn role_of(&self, person_id: PersonId) -> Option<PersonRole> {
        PersonRole::from_credits(
            self.acting_count(person_id) > 0,
            self.directing_count(person_id) > 0,
        )
    }

    pub(crate) fn forget(&mut self, person_id: PersonId) {
        self.acting.remove(&person_id);
        self.directing.remove(&person_id);
    }

    pub(crate) fn people(&self) -> impl Iterator<Item = PersonId> + '_ {
        self.acting.keys().chain(self.directing.keys()).copied()
    }
}

fn decrement(counts: &mut HashMap<PersonId, usize>, person_id: PersonId) {
    if let Some(count) = counts.get_mut(&person_id) {
        *count = count.saturating_sub(1);
        if *count == 0 {
            counts.remove(&person_id);
        }
    }
}

impl Catalog {
    /// Adds a person to a movie's cast. Adding a cast member twice is a no-op;
    /// returns whether the cast changed.
    pub fn add_actor(&mut self, movie_id: MovieId, person: impl Into<PersonRef>) -> Check<bool> {
        self.ensure_movie(movie_id)?;
        let person_id = self.resolve_actor(&person.into())?;
        let inserted = self
            .movies
            .get_mut(&movie_id)
            .map(|movie| movie.actors.insert(person_id))
            .unwrap_or(false);
        if inserted {
            self.credits.add_acting(person_id);
            self.refresh_role(person_id);
            debug!(movie_id, person_id, "Actor added");
        }
        Ok(inserted)
    }

    /// Removes a person from a movie's cast, demoting their role once they act
    /// in no movie at all. Returns whether the cast changed.
    pub fn remove_actor(
        &mut self,
        movie_id: MovieId,
        person: impl Into<PersonRef>,
    ) -> Check<bool> {
        self.ensure_movie(movie_id)?;
        let person_id = self.resolve_actor(&person.into())?;
        let removed = self
            .movies
            .get_mut(&movie_id)
            .map(|movie| movie.actors.remove(&person_id))
            .unwrap_or(false);
        if removed {
            self.credits.remove_acting(person_id);
            self.refresh_role(person_id);
            debug!(movie_id, person_id, "Actor removed");
        }
        Ok(removed)
    }

    /// Sets or, given `None` or an empty reference, unsets a movie's director.
    pub fn set_director(&mut self, movie_id: MovieId, director: Option<PersonRef>) -> Check<()> {
        self.ensure_movie(movie_id)?;
        let raw = director
            .as_ref()
            .map(PersonRef::to_value)
            .unwrap_or(serde_json::Value::Null);
        let director_id = self.validate_director(&raw, self.options().require_director)?;
        self.link_director(movie_id, director_id);
        Ok(())
    }

    pub(crate) fn link_director(&mut self, movie_id: MovieId, director_id: Option<PersonId>) {
        let Some(movie) = self.movies.get_mut(&movie_id) else {
            return;
        };
        let previous = movie.director_id;
        if previous == director_id {
            return;
        }
        movie.director_id = director_id;
        if let Some(old) = previous {
            self.credits.remove_directing(old);
            self.refresh_role(old);
        }
        if let Some(new) = director_id {
            self.credits.add_directing(new);
            self.refresh_role(new);
        }
        debug!(movie_id, ?previous, ?director_id, "Director changed");
    }

    /// Registers the credits of a movie that was just inserted.
    pub(crate) fn credit_movie(&mut self, movie_id: MovieId) {
        let Some(movie) = self.movies.get(&movie_id) else {
            return;
        };
        let actors: Vec<PersonId> = movie.actors.iter().copied().collect();
        let director = movie.director_id;
        for person_id in actors {
            self.credits.add_acting(person_id);
            self.refresh_role(person_id);
        }
        if let Some(person_id) = director {
            self.credits.add_directing(person_id);
            self.refresh_role(person_id);
        }
    }

    /// Releases the credits of a movie that was just removed.
    pub(crate) fn uncredit_movie(&mut self, actors: &[PersonId], director: Option<PersonId>) {
        for person_id in actors {
            self.credits.remove_acting(*person_id);
            self.refresh_role(*person_id);
        }
        if let Some(person_id) = director {
            self.credits.remove_directing(person_id);
            self.refresh_role(person_id);
        }
    }

    pub(crate) fn resolve_actor(&self, person: &PersonRef) -> Check<PersonId> {
        self.check_person_id_as_id_ref(&person.to_value())?
            .ok_or_else(|| {
                ConstraintViolation::MandatoryValue(
                    "An actor reference must be provided!".to_string(),
                )
            })
    }

    fn ensure_movie(&self, movie_id: MovieId) -> Check<()> {
        if self.movies.contains_key(&movie_id) {
            Ok(())
        } else {
            Err(ConstraintViolation::ReferentialIntegrity(format!(
                "There is no movie with ID {} in the database!",
                movie_id
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::{MovieSlots, PersonSlots};
    use crate::violation::ViolationKind;
    use serde_json::json;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::new();
        for (id, name) in [(1, "Stephen Frears"), (2, "George Lucas"), (3, "Uma Thurman")] {
            catalog
                .add_person(PersonSlots {
                    person_id: json!(id),
                    name: json!(name),
                })
                .expect("person");
        }
        for (id, title) in [(10, "The Queen"), (11, "Star Wars")] {
            catalog
                .add_movie(MovieSlots {
                    movie_id: json!(id),
                    title: json!(title),
                    release_date: json!("2006-09-15"),
                    ..MovieSlots::default()
                })
                .expect("movie");
        }
        catalog
    }

    fn role(catalog: &Catalog, id: PersonId) -> Option<PersonRole> {
        catalog.role_of(id).expect("person exists")
    }

    #[test]
    fn credits_count_down_to_removal() {
        let mut credits = Credits::default();
        credits.add_acting(4);
        credits.add_acting(4);
        credits.add_directing(4);
        assert_eq!(credits.role_of(4), Some(PersonRole::ActorAndDirector));
        credits.remove_acting(4);
        assert_eq!(credits.acting_count(4), 1);
        credits.remove_acting(4);
        credits.remove_acting(4);
        assert_eq!(credits.acting_count(4), 0);
        assert_eq!(credits.role_of(4), Some(PersonRole::Director));
        credits.forget(4);
        assert_eq!(credits.role_of(4), None);
    }

    #[test]
    fn adding_actor_promotes_role() {
        let mut catalog = catalog();
        catalog.add_actor(10, 3).expect("add actor");
        assert_eq!(role(&catalog, 3), Some(PersonRole::Actor));

        catalog.set_director(11, Some(PersonRef::Id(1))).expect("director");
        assert_eq!(role(&catalog, 1), Some(PersonRole::Director));
        catalog.add_actor(10, PersonRef::Text("1".to_string())).expect("add actor");
        assert_eq!(role(&catalog, 1), Some(PersonRole::ActorAndDirector));
    }

    #[test]
    fn adding_same_actor_twice_keeps_one_credit() {
        let mut catalog = catalog();
        assert_eq!(catalog.add_actor(10, 3), Ok(true));
        assert_eq!(catalog.add_actor(10, 3), Ok(false));
        assert_eq!(catalog.movie(10).map(|m| m.actors().len()), Some(1));
        catalog.remove_actor(10, 3).expect("remove");
        assert_eq!(role(&catalog, 3), None);
    }

    #[test]
    fn unknown_actor_leaves_cast_unchanged() {
        let mut catalog = catalog();
        catalog.add_actor(10, 1).expect("add");
        catalog.add_actor(10, 2).expect("add");
        let err = catalog.add_actor(10, 999).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::ReferentialIntegrity);
        let cast: Vec<PersonId> =
            catalog.movie(10).expect("movie").actors().iter().copied().collect();
        assert_eq!(cast, vec![1, 2]);
    }

    #[test]
    fn empty_actor_reference_is_mandatory() {
        let mut catalog = catalog();
        let err = catalog.add_actor(10, "").unwrap_err();
        assert_eq!(err.kind(), ViolationKind::MandatoryValue);
    }

    #[test]
    fn actor_on_unknown_movie_is_rejected() {
        let mut catalog = catalog();
        let err = catalog.add_actor(99, 1).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::ReferentialIntegrity);
    }

    #[test]
    fn removing_last_acting_credit_resets_role() {
        let mut catalog = catalog();
        catalog.add_actor(10, 3).expect("add");
        catalog.add_actor(11, 3).expect("add");

        catalog.remove_actor(10, 3).expect("remove");
        assert_eq!(role(&catalog, 3), Some(PersonRole::Actor));

        catalog.remove_actor(11, 3).expect("remove");
        assert_eq!(role(&catalog, 3), None);
    }

    #[test]
    fn removing_acting_credit_of_director_keeps_director() {
        let mut catalog = catalog();
        catalog.set_director(11, Some(PersonRef::Id(2))).expect("director");
        catalog.add_actor(10, 2).expect("add");
        assert_eq!(role(&catalog, 2), Some(PersonRole::ActorAndDirector));
        catalog.remove_actor(10, 2).expect("remove");
        assert_eq!(role(&catalog, 2), Some(PersonRole::Director));
    }

    #[test]
    fn unsetting_director_demotes() {
        let mut catalog = catalog();
        catalog.set_director(10, Some(PersonRef::Id(1))).expect("director");
        assert_eq!(catalog.movie(10).and_then(|m| m.director_id()), Some(1));
        catalog.set_director(10, Some(PersonRef::Text(String::new()))).expect("unset");
        assert_eq!(catalog.movie(10).and_then(|m| m.director_id()), None);
        assert_eq!(role(&catalog, 1), None);

        catalog.set_director(10, Some(PersonRef::Id(1))).expect("director");
        catalog.set_director(10, None).expect("unset");
        assert_eq!(role(&catalog, 1), None);
    }

    #[test]
    fn replacing_director_moves_credit() {
        let mut catalog = catalog();
        catalog.set_director(10, Some(PersonRef::Id(1))).expect("director");
        catalog.set_director(10, Some(PersonRef::Id(2))).expect("director");
        assert_eq!(role(&catalog, 1), None);
        assert_eq!(role(&catalog, 2), Some(PersonRole::Director));
    }

    #[test]
    fn unknown_director_is_rejected() {
        let mut catalog = catalog();
        let err = catalog.set_director(10, Some(PersonRef::Id(42))).unwrap_err();
        assert_eq!(err.kind(), ViolationKind::ReferentialIntegrity);
        assert_eq!(catalog.movie(10).and_then(|m| m.director_id()), None);
    }
}
