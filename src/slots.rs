//! Slot records: unvalidated input for create/update operations.
//!
//! Slot fields hold raw JSON values so forms, stored records and tests can all
//! feed the same validators. `Value::Null` means "not provided"; an empty
//! string on an update means "unset".
use crate::models::{Person, PersonId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A reference to a person, as an id, as numeric text, or as an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
    Id(i64),
    Text(String),
    Entity {
        #[serde(rename = "personId")]
        person_id: PersonId,
    },
}

impl PersonRef {
    /// Normalizes the reference to the raw id value the person checks take.
    pub fn to_value(&self) -> Value {
        match self {
            PersonRef::Id(id) => Value::from(*id),
            PersonRef::Text(text) => Value::from(text.as_str()),
            PersonRef::Entity { person_id } => Value::from(*person_id),
        }
    }
}

impl From<PersonId> for PersonRef {
    fn from(id: PersonId) -> Self {
        PersonRef::Id(i64::from(id))
    }
}

impl From<i32> for PersonRef {
    fn from(id: i32) -> Self {
        PersonRef::Id(i64::from(id))
    }
}

impl From<&str> for PersonRef {
    fn from(text: &str) -> Self {
        PersonRef::Text(text.to_string())
    }
}

impl From<&Person> for PersonRef {
    fn from(person: &Person) -> Self {
        PersonRef::Entity {
            person_id: person.person_id(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonSlots {
    pub person_id: Value,
    pub name: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonUpdate {
    pub person_id: Value,
    pub name: Value,
    pub role: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieSlots {
    pub movie_id: Value,
    pub title: Value,
    pub release_date: Value,
    pub director_id: Value,
    pub actors: Vec<PersonRef>,
    pub movie_genre: Value,
    pub about: Value,
    pub episode_title: Value,
    pub episode_no: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MovieUpdate {
    pub movie_id: Value,
    pub title: Value,
    pub release_date: Value,
    pub actor_id_refs_to_add: Vec<PersonRef>,
    pub actor_id_refs_to_remove: Vec<PersonRef>,
    pub director_id: Value,
    pub movie_genre: Value,
    pub about: Value,
    pub episode_title: Value,
    pub episode_no: Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn person_ref_accepts_id_text_and_entity() {
        let refs: Vec<PersonRef> =
            serde_json::from_value(json!([5, "6", { "personId": 7, "name": "Ewan" }]))
                .expect("refs");
        assert_eq!(
            refs,
            vec![
                PersonRef::Id(5),
                PersonRef::Text("6".to_string()),
                PersonRef::Entity { person_id: 7 }
            ]
        );
        let values: Vec<Value> = refs.iter().map(PersonRef::to_value).collect();
        assert_eq!(values, vec![json!(5), json!("6"), json!(7)]);
    }

    #[test]
    fn movie_slots_default_missing_fields_to_null() {
        let slots: MovieSlots = serde_json::from_value(json!({
            "movieId": 1,
            "title": "Pulp Fiction",
            "releaseDate": "1994-05-12"
        }))
        .expect("slots");
        assert_eq!(slots.movie_id, json!(1));
        assert!(slots.director_id.is_null());
        assert!(slots.actors.is_empty());
        assert!(slots.movie_genre.is_null());
    }

    #[test]
    fn update_reads_actor_change_lists() {
        let update: MovieUpdate = serde_json::from_value(json!({
            "movieId": 1,
            "actorIdRefsToAdd": [4],
            "actorIdRefsToRemove": ["5"],
            "directorId": ""
        }))
        .expect("update");
        assert_eq!(update.actor_id_refs_to_add, vec![PersonRef::Id(4)]);
        assert_eq!(
            update.actor_id_refs_to_remove,
            vec![PersonRef::Text("5".to_string())]
        );
        assert_eq!(update.director_id, json!(""));
    }
}
