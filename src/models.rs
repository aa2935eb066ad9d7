use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub type PersonId = u32;
pub type MovieId = u32;

/// A person's role is never stored by callers; it follows from the movies
/// that credit them as actor or director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonRole {
    Director,
    Actor,
    ActorAndDirector,
}

impl PersonRole {
    pub const MAX_CODE: i64 = 3;

    pub fn code(self) -> u8 {
        match self {
            PersonRole::Director => 1,
            PersonRole::Actor => 2,
            PersonRole::ActorAndDirector => 3,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(PersonRole::Director),
            2 => Some(PersonRole::Actor),
            3 => Some(PersonRole::ActorAndDirector),
            _ => None,
        }
    }

    pub fn from_credits(acts: bool, directs: bool) -> Option<Self> {
        match (acts, directs) {
            (true, true) => Some(PersonRole::ActorAndDirector),
            (true, false) => Some(PersonRole::Actor),
            (false, true) => Some(PersonRole::Director),
            (false, false) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PersonRole::Director => "Director",
            PersonRole::Actor => "Actor",
            PersonRole::ActorAndDirector => "Actor_and_Director",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovieGenre {
    Biography,
    TvSeriesEpisode,
}

impl MovieGenre {
    pub const MAX_CODE: i64 = 2;

    pub fn code(self) -> u8 {
        match self {
            MovieGenre::Biography => 1,
            MovieGenre::TvSeriesEpisode => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(MovieGenre::Biography),
            2 => Some(MovieGenre::TvSeriesEpisode),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MovieGenre::Biography => "Biography",
            MovieGenre::TvSeriesEpisode => "TvSeriesEpisode",
        }
    }
}

/// Genre-dependent movie fields. Only the fields of the active genre exist.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenreFields {
    #[default]
    NoGenre,
    Biography {
        about: PersonId,
    },
    TvSeriesEpisode {
        episode_title: String,
        episode_no: u32,
    },
}

impl GenreFields {
    pub fn genre(&self) -> Option<MovieGenre> {
        match self {
            GenreFields::NoGenre => None,
            GenreFields::Biography { .. } => Some(MovieGenre::Biography),
            GenreFields::TvSeriesEpisode { .. } => Some(MovieGenre::TvSeriesEpisode),
        }
    }

    pub fn about(&self) -> Option<PersonId> {
        match self {
            GenreFields::Biography { about } => Some(*about),
            _ => None,
        }
    }

    pub fn episode_title(&self) -> Option<&str> {
        match self {
            GenreFields::TvSeriesEpisode { episode_title, .. } => Some(episode_title),
            _ => None,
        }
    }

    pub fn episode_no(&self) -> Option<u32> {
        match self {
            GenreFields::TvSeriesEpisode { episode_no, .. } => Some(*episode_no),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub(crate) person_id: PersonId,
    pub(crate) name: String,
    pub(crate) role: Option<PersonRole>,
}

impl Person {
    pub fn person_id(&self) -> PersonId {
        self.person_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> Option<PersonRole> {
        self.role
    }

    pub fn to_record(&self) -> PersonRecord {
        PersonRecord {
            person_id: self.person_id,
            name: self.name.clone(),
            role: self.role.map(PersonRole::code),
        }
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Person{{ ID: {}, name: {}", self.person_id, self.name)?;
        if let Some(role) = self.role {
            write!(f, ", role: {}", role.label())?;
        }
        f.write_str(" }")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub(crate) movie_id: MovieId,
    pub(crate) title: String,
    pub(crate) release_date: NaiveDate,
    pub(crate) director_id: Option<PersonId>,
    pub(crate) actors: BTreeSet<PersonId>,
    pub(crate) genre: GenreFields,
}

impl Movie {
    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn release_date(&self) -> NaiveDate {
        self.release_date
    }

    pub fn director_id(&self) -> Option<PersonId> {
        self.director_id
    }

    pub fn actors(&self) -> &BTreeSet<PersonId> {
        &self.actors
    }

    pub fn genre_fields(&self) -> &GenreFields {
        &self.genre
    }

    pub fn movie_genre(&self) -> Option<MovieGenre> {
        self.genre.genre()
    }

    pub fn about(&self) -> Option<PersonId> {
        self.genre.about()
    }

    pub fn episode_title(&self) -> Option<&str> {
        self.genre.episode_title()
    }

    pub fn episode_no(&self) -> Option<u32> {
        self.genre.episode_no()
    }

    /// Record form: references flattened to ids, inactive genre fields omitted.
    pub fn to_record(&self) -> MovieRecord {
        MovieRecord {
            movie_id: self.movie_id,
            title: self.title.clone(),
            release_date: self.release_date.to_string(),
            director_id: self.director_id,
            actors: self.actors.iter().copied().collect(),
            movie_genre: self.movie_genre().map(MovieGenre::code),
            about: self.about(),
            episode_title: self.episode_title().map(str::to_string),
            episode_no: self.episode_no(),
        }
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Movie{{ ID: {}, title: {}, date: {}",
            self.movie_id, self.title, self.release_date
        )?;
        if let Some(director) = self.director_id {
            write!(f, ", director: {}", director)?;
        }
        let actors = self
            .actors
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>();
        write!(f, ", actors: {} }}", actors.join(","))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    pub person_id: PersonId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub movie_id: MovieId,
    pub title: String,
    pub release_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_id: Option<PersonId>,
    pub actors: Vec<PersonId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movie_genre: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about: Option<PersonId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode_no: Option<u32>,
}
