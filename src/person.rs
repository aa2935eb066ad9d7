//! Person registry: id checks, create/update/destroy and role lookup.
use crate::catalog::Catalog;
use crate::models::{GenreFields, Person, PersonId, PersonRole};
use crate::slots::{PersonSlots, PersonUpdate};
use crate::utils::{describe_changes, integer_value, is_empty, positive_id};
use crate::violation::{Check, ConstraintViolation};
use serde_json::Value;
use tracing::{debug, info, warn};

/// Empty ids pass, since a person id may be an optional reference.
pub fn check_person_id(raw: &Value) -> Check<Option<PersonId>> {
    if is_empty(raw) {
        return Ok(None);
    }
    positive_id(raw).map(Some).ok_or_else(|| {
        ConstraintViolation::Range(format!(
            "The person ID must be a positive integer (got {})!",
            raw
        ))
    })
}

pub fn check_name(raw: &Value) -> Check<String> {
    match raw {
        Value::Null => Err(ConstraintViolation::MandatoryValue(
            "A name must be provided!".to_string(),
        )),
        Value::String(s) if s.trim().is_empty() => Err(ConstraintViolation::MandatoryValue(
            "A name must be provided!".to_string(),
        )),
        Value::String(s) => Ok(s.clone()),
        _ => Err(ConstraintViolation::Range(
            "The name must be a non-empty string!".to_string(),
        )),
    }
}

pub fn check_role(raw: &Value) -> Check<Option<PersonRole>> {
    if is_empty(raw) {
        return Ok(None);
    }
    integer_value(raw)
        .filter(|code| (1..=PersonRole::MAX_CODE).contains(code))
        .and_then(PersonRole::from_code)
        .map(Some)
        .ok_or_else(|| ConstraintViolation::Range(format!("Invalid value for role: {}", raw)))
}

impl Catalog {
    pub fn check_person_id_as_id(&self, raw: &Value) -> Check<PersonId> {
        let Some(id) = check_person_id(raw)? else {
            return Err(ConstraintViolation::MandatoryValue(
                "A positive integer value for the person ID is required!".to_string(),
            ));
        };
        if self.persons.contains_key(&id) {
            return Err(ConstraintViolation::Uniqueness(format!(
                "There is already a person record with person ID {}!",
                id
            )));
        }
        Ok(id)
    }

    pub fn check_person_id_as_id_ref(&self, raw: &Value) -> Check<Option<PersonId>> {
        match check_person_id(raw)? {
            Some(id) if !self.persons.contains_key(&id) => {
                Err(ConstraintViolation::ReferentialIntegrity(format!(
                    "There is no person record with person ID {}!",
                    id
                )))
            }
            checked => Ok(checked),
        }
    }

    pub fn role_of(&self, person_id: PersonId) -> Check<Option<PersonRole>> {
        self.persons
            .get(&person_id)
            .map(Person::role)
            .ok_or_else(|| {
                ConstraintViolation::ReferentialIntegrity(format!(
                    "There is no person record with person ID {}!",
                    person_id
                ))
            })
    }

    pub fn add_person(&mut self, slots: PersonSlots) -> Check<PersonId> {
        let person = match self.build_person(&slots) {
            Ok(person) => person,
            Err(violation) => {
                warn!("{}: {}", violation.kind(), violation);
                return Err(violation);
            }
        };
        let person_id = person.person_id;
        info!("Saved: {}", person);
        self.persons.insert(person_id, person);
        Ok(person_id)
    }

    fn build_person(&self, slots: &PersonSlots) -> Check<Person> {
        let person_id = self.check_person_id_as_id(&slots.person_id)?;
        let name = check_name(&slots.name)?;
        Ok(Person {
            person_id,
            name,
            role: self.credits.role_of(person_id),
        })
    }

    /// Applies the provided fields. On a violation the person is restored to
    /// its state before the call.
    pub fn update_person(&mut self, update: PersonUpdate) -> Check<Vec<&'static str>> {
        let person_id = self.existing_person_id(&update.person_id)?;
        let Some(before) = self.persons.get(&person_id).cloned() else {
            return Err(missing_person(person_id));
        };
        match self.apply_person_update(person_id, &update) {
            Ok(changed) => {
                if changed.is_empty() {
                    info!("No property value changed for person {}!", person_id);
                } else {
                    info!(
                        "{} modified for person {}",
                        describe_changes(&changed),
                        person_id
                    );
                }
                Ok(changed)
            }
            Err(violation) => {
                warn!("{}: {}", violation.kind(), violation);
                self.persons.insert(person_id, before);
                Err(violation)
            }
        }
    }

    fn apply_person_update(
        &mut self,
        person_id: PersonId,
        update: &PersonUpdate,
    ) -> Check<Vec<&'static str>> {
        let mut changed = Vec::new();
        if !update.name.is_null() {
            let name = check_name(&update.name)?;
            let person = self
                .persons
                .get_mut(&person_id)
                .ok_or_else(|| missing_person(person_id))?;
            if person.name != name {
                person.name = name;
                changed.push("name");
            }
        }
        if !update.role.is_null() {
            let role = check_role(&update.role)?;
            let derived = self.credits.role_of(person_id);
            if role != derived {
                return Err(ConstraintViolation::Constraint(format!(
                    "The role of person {} follows from their movies ({})!",
                    person_id,
                    derived.map(PersonRole::label).unwrap_or("none")
                )));
            }
        }
        Ok(changed)
    }

    /// Deletes a person who directs no movie and is no biography's subject,
    /// pruning them from every cast. Returns false when the person is missing
    /// or still referenced.
    pub fn destroy_person(&mut self, person_id: PersonId) -> bool {
        let Some(person) = self.persons.get(&person_id) else {
            warn!("There is no person with ID {} in the database!", person_id);
            return false;
        };
        if let Some(movie) = self
            .movies
            .values()
            .find(|m| m.director_id == Some(person_id))
        {
            warn!(
                "Person {} cannot be deleted as they direct the movie {}.",
                person.name, movie.title
            );
            return false;
        }
        if let Some(movie) = self
            .movies
            .values()
            .find(|m| matches!(m.genre, GenreFields::Biography { about } if about == person_id))
        {
            warn!(
                "Person {} cannot be deleted as the biography {} is about them.",
                person.name, movie.title
            );
            return false;
        }

        for movie in self.movies.values_mut() {
            if movie.actors.remove(&person_id) {
                debug!(movie_id = movie.movie_id, person_id, "Pruned actor");
            }
        }
        self.credits.forget(person_id);
        if let Some(person) = self.persons.remove(&person_id) {
            info!("Person {} deleted.", person.name);
        }
        true
    }

    fn existing_person_id(&self, raw: &Value) -> Check<PersonId> {
        match check_person_id(raw)? {
            Some(id) if self.persons.contains_key(&id) => Ok(id),
            Some(id) => Err(missing_person(id)),
            None => Err(ConstraintViolation::MandatoryValue(
                "A person ID must be provided!".to_string(),
            )),
        }
    }
}

fn missing_person(person_id: PersonId) -> ConstraintViolation {
    ConstraintViolation::ReferentialIntegrity(format!(
        "There is no person with ID {} in the database!",
        person_id
    ))
}
