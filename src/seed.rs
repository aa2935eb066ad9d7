//! Sample data for trying out the catalog.
use crate::catalog::Catalog;
use crate::slots::{MovieSlots, PersonRef, PersonSlots};
use crate::violation::Check;
use serde_json::json;
use tracing::info;

const PERSONS: &[(u32, &str)] = &[
    (1, "Stephen Frears"),
    (2, "George Lucas"),
    (3, "Quentin Tarantino"),
    (5, "Uma Thurman"),
    (6, "John Travolta"),
    (7, "Ewan McGregor"),
    (8, "Natalie Portman"),
    (9, "Keanu Reeves"),
];

const MOVIES: &[(u32, &str, &str, u32, &[u32])] = &[
    (1, "Pulp Fiction", "1994-05-12", 3, &[3, 5, 6]),
    (2, "Star Wars", "1977-05-25", 2, &[7, 8]),
    (3, "Dangerous Liaisons", "1988-12-16", 1, &[9, 5]),
];

/// Replaces the catalog contents with the sample persons and movies.
pub fn generate_test_data(catalog: &mut Catalog) -> Check<()> {
    catalog.clear();
    for (person_id, name) in PERSONS {
        catalog.add_person(PersonSlots {
            person_id: json!(person_id),
            name: json!(name),
        })?;
    }
    for (movie_id, title, release_date, director_id, actors) in MOVIES {
        catalog.add_movie(MovieSlots {
            movie_id: json!(movie_id),
            title: json!(title),
            release_date: json!(release_date),
            director_id: json!(director_id),
            actors: actors.iter().map(|id| PersonRef::from(*id)).collect(),
            ..MovieSlots::default()
        })?;
    }
    info!(
        "Generated {} persons and {} movies",
        catalog.persons().len(),
        catalog.movies().len()
    );
    Ok(())
}

pub fn clear_data(catalog: &mut Catalog) {
    catalog.clear();
    info!("All data cleared.");
}
