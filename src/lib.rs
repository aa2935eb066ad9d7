pub mod associations;
pub mod catalog;
pub mod config;
pub mod models;
pub mod movie;
pub mod person;
pub mod seed;
pub mod slots;
pub mod store;
pub mod utils;
pub mod violation;

pub use catalog::{Catalog, CatalogOptions};
pub use models::{GenreFields, Movie, MovieGenre, MovieId, Person, PersonId, PersonRole};
pub use slots::{MovieSlots, MovieUpdate, PersonRef, PersonSlots, PersonUpdate};
pub use store::{EntityKind, JsonFileStore, LoadReport, RecordMap, RecordStore};
pub use violation::{Check, ConstraintViolation, ViolationKind};
