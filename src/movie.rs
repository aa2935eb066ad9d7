//! Movie field validators and the movie registry operations.
use crate::catalog::Catalog;
use crate::models::{GenreFields, Movie, MovieGenre, MovieId, PersonId};
use crate::slots::{MovieSlots, MovieUpdate};
use crate::utils::{describe_changes, integer_value, is_empty};
use crate::violation::{Check, ConstraintViolation};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{info, warn};

pub const TITLE_MAX_LEN: usize = 120;

/// Date of the first public film screening.
fn first_screening() -> NaiveDate {
    NaiveDate::from_ymd_opt(1895, 12, 28).expect("valid calendar date")
}

pub fn validate_title(raw: &Value) -> Check<String> {
    check_text(raw, "title")
}

fn check_text(raw: &Value, label: &str) -> Check<String> {
    match raw {
        Value::Null => Err(ConstraintViolation::MandatoryValue(format!(
            "A {} must be provided!",
            label
        ))),
        Value::String(s) if s.trim().is_empty() => Err(ConstraintViolation::MandatoryValue(
            format!("A {} must be provided!", label),
        )),
        Value::String(s) if s.chars().count() > TITLE_MAX_LEN => {
            Err(ConstraintViolation::StringLength(format!(
                "The {} must not be longer than {} characters!",
                label, TITLE_MAX_LEN
            )))
        }
        Value::String(s) => Ok(s.clone()),
        _ => Err(ConstraintViolation::Range(format!(
            "The {} must be a non-empty string!",
            label
        ))),
    }
}

/// Validates a release date against today's date.
pub fn validate_date(raw: &Value) -> Check<NaiveDate> {
    validate_date_at(raw, Local::now().date_naive())
}

/// Accepts `YYYY-MM-DD` and `YYYY-MM-DDTHH:MM:SS.mmmZ`. The date must not
/// precede the first film screening nor fall after next year.
pub fn validate_date_at(raw: &Value, today: NaiveDate) -> Check<NaiveDate> {
    let text = match raw {
        Value::Null => {
            return Err(ConstraintViolation::MandatoryValue(
                "A release date must be provided!".to_string(),
            ))
        }
        Value::String(s) if s.trim().is_empty() => {
            return Err(ConstraintViolation::MandatoryValue(
                "A release date must be provided!".to_string(),
            ))
        }
        Value::String(s) => s,
        _ => {
            return Err(ConstraintViolation::Range(
                "The release date must be a non-empty string!".to_string(),
            ))
        }
    };
    let date = parse_release_date(text).ok_or_else(|| {
        ConstraintViolation::Pattern(format!(
            "The release date {} must have format YYYY-MM-DD!",
            text
        ))
    })?;
    let earliest = first_screening();
    if date < earliest {
        return Err(ConstraintViolation::Interval(format!(
            "The release date must not be earlier than {}!",
            earliest
        )));
    }
    let latest_year = today.year() + 1;
    if date.year() > latest_year {
        return Err(ConstraintViolation::Interval(format!(
            "The release date must not be later than the year {}!",
            latest_year
        )));
    }
    Ok(date)
}

fn parse_release_date(text: &str) -> Option<NaiveDate> {
    if has_shape(text, "dddd-dd-dd") {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
    } else if has_shape(text, "dddd-dd-ddTdd:dd:dd.dddZ") {
        NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.3fZ")
            .ok()
            .map(|dt| dt.date())
    } else {
        None
    }
}

/// `d` in the shape matches one ASCII digit, every other byte matches itself.
fn has_shape(text: &str, shape: &str) -> bool {
    text.len() == shape.len()
        && text.bytes().zip(shape.bytes()).all(|(c, s)| match s {
            b'd' => c.is_ascii_digit(),
            _ => c == s,
        })
}

pub fn check_movie_genre(raw: &Value) -> Check<Option<MovieGenre>> {
    if is_empty(raw) {
        return Ok(None);
    }
    integer_value(raw)
        .filter(|code| (1..=MovieGenre::MAX_CODE).contains(code))
        .and_then(MovieGenre::from_code)
        .map(Some)
        .ok_or_else(|| ConstraintViolation::Range(format!("Invalid value for genre: {}", raw)))
}

fn check_episode_no(raw: &Value) -> Check<u32> {
    if is_empty(raw) {
        return Err(ConstraintViolation::MandatoryValue(
            "A value for the episode number must be provided!".to_string(),
        ));
    }
    let Some(number) = integer_value(raw) else {
        return Err(ConstraintViolation::Range(format!(
            "Episode number {} is not a number!",
            raw
        )));
    };
    if number < 1 {
        return Err(ConstraintViolation::Range(
            "The episode number must be positive!".to_string(),
        ));
    }
    u32::try_from(number).map_err(|_| {
        ConstraintViolation::Range(format!("Episode number {} is out of range!", number))
    })
}

/// Episode title and number are required for TV series episodes and
/// forbidden for every other genre.
pub fn check_tv_series_fields(
    title: &Value,
    episode_no: &Value,
    genre: Option<MovieGenre>,
) -> Check<Option<(String, u32)>> {
    if genre != Some(MovieGenre::TvSeriesEpisode) {
        if !is_empty(title) || !is_empty(episode_no) {
            return Err(ConstraintViolation::Constraint(
                "Episode fields must not be provided unless the movie is a TV series episode!"
                    .to_string(),
            ));
        }
        return Ok(None);
    }
    if is_empty(title) {
        return Err(ConstraintViolation::MandatoryValue(
            "A TV series episode must have an episode title!".to_string(),
        ));
    }
    let title = check_text(title, "episode title")?;
    let number = check_episode_no(episode_no)?;
    Ok(Some((title, number)))
}

impl Catalog {
    pub fn validate_movie_id(&self, raw: &Value) -> Check<MovieId> {
        if is_empty(raw) {
            return Err(ConstraintViolation::MandatoryValue(
                "A value for the movie ID must be provided!".to_string(),
            ));
        }
        let Some(number) = integer_value(raw) else {
            return Err(ConstraintViolation::Range(format!(
                "Movie ID {} is not a number!",
                raw
            )));
        };
        if number < 1 {
            return Err(ConstraintViolation::Range(
                "The movie ID must be positive!".to_string(),
            ));
        }
        let movie_id = MovieId::try_from(number).map_err(|_| {
            ConstraintViolation::Range(format!("Movie ID {} is out of range!", number))
        })?;
        if self.movies.contains_key(&movie_id) {
            return Err(ConstraintViolation::Uniqueness(format!(
                "There is already a movie record with movie ID {}!",
                movie_id
            )));
        }
        Ok(movie_id)
    }

    pub fn validate_director(&self, raw: &Value, required: bool) -> Check<Option<PersonId>> {
        if is_empty(raw) {
            if required {
                return Err(ConstraintViolation::MandatoryValue(
                    "Setting a director is mandatory!".to_string(),
                ));
            }
            return Ok(None);
        }
        self.check_person_id_as_id_ref(raw)
    }

    /// The subject of a biography is mandatory for biographies and forbidden
    /// for every other genre.
    pub fn check_about(&self, raw: &Value, genre: Option<MovieGenre>) -> Check<Option<PersonId>> {
        let biography = genre == Some(MovieGenre::Biography);
        if biography && is_empty(raw) {
            return Err(ConstraintViolation::MandatoryValue(
                "A biography must name the person it is about!".to_string(),
            ));
        }
        if !biography && !is_empty(raw) {
            return Err(ConstraintViolation::Constraint(
                "An 'about' value must not be provided unless the movie is a biography!"
                    .to_string(),
            ));
        }
        self.check_person_id_as_id_ref(raw)
    }

    fn resolve_genre_fields(
        &self,
        genre: Option<MovieGenre>,
        about: &Value,
        episode_title: &Value,
        episode_no: &Value,
    ) -> Check<GenreFields> {
        let about = self.check_about(about, genre)?;
        let episode = check_tv_series_fields(episode_title, episode_no, genre)?;
        match (genre, about, episode) {
            (None, _, _) => Ok(GenreFields::NoGenre),
            (Some(MovieGenre::Biography), Some(about), _) => Ok(GenreFields::Biography { about }),
            (Some(MovieGenre::TvSeriesEpisode), _, Some((episode_title, episode_no))) => {
                Ok(GenreFields::TvSeriesEpisode {
                    episode_title,
                    episode_no,
                })
            }
            (Some(genre), _, _) => Err(ConstraintViolation::MandatoryValue(format!(
                "The fields of genre {} are incomplete!",
                genre.label()
            ))),
        }
    }

    pub fn add_movie(&mut self, slots: MovieSlots) -> Check<MovieId> {
        let require_director = self.options().require_director;
        self.insert_movie(slots, require_director)
    }

    /// Adds a stored movie record. The director requirement only applies to
    /// movies created through `add_movie`.
    pub(crate) fn restore_movie(&mut self, slots: MovieSlots) -> Check<MovieId> {
        self.insert_movie(slots, false)
    }

    fn insert_movie(&mut self, slots: MovieSlots, require_director: bool) -> Check<MovieId> {
        let movie = match self.build_movie(&slots, require_director) {
            Ok(movie) => movie,
            Err(violation) => {
                warn!("{}: {}", violation.kind(), violation);
                return Err(violation);
            }
        };
        let movie_id = movie.movie_id;
        info!("{} created!", movie);
        self.movies.insert(movie_id, movie);
        self.credit_movie(movie_id);
        Ok(movie_id)
    }

    /// Validates every field left to right; the first violation wins.
    fn build_movie(&self, slots: &MovieSlots, require_director: bool) -> Check<Movie> {
        let movie_id = self.validate_movie_id(&slots.movie_id)?;
        let title = validate_title(&slots.title)?;
        let release_date = validate_date(&slots.release_date)?;
        let director_id = self.validate_director(&slots.director_id, require_director)?;
        let mut actors = BTreeSet::new();
        for actor in &slots.actors {
            actors.insert(self.resolve_actor(actor)?);
        }
        let genre = check_movie_genre(&slots.movie_genre)?;
        let genre = self.resolve_genre_fields(
            genre,
            &slots.about,
            &slots.episode_title,
            &slots.episode_no,
        )?;
        Ok(Movie {
            movie_id,
            title,
            release_date,
            director_id,
            actors,
            genre,
        })
    }

    /// Applies the provided fields in order. On a violation the movie and
    /// every role it touched are restored to their state before the call.
    pub fn update_movie(&mut self, update: MovieUpdate) -> Check<Vec<&'static str>> {
        let movie_id = match self.existing_movie_id(&update.movie_id) {
            Ok(id) => id,
            Err(violation) => {
                warn!("{}: {}", violation.kind(), violation);
                return Err(violation);
            }
        };
        let Some(before) = self.movies.get(&movie_id).cloned() else {
            return Err(missing_movie(movie_id));
        };
        let credits_before = self.credits.clone();

        match self.apply_movie_update(movie_id, &update) {
            Ok(changed) => {
                if changed.is_empty() {
                    info!("No property value changed for movie {}!", movie_id);
                } else {
                    info!("{} modified for movie {}", describe_changes(&changed), movie_id);
                }
                Ok(changed)
            }
            Err(violation) => {
                warn!("{}: {}", violation.kind(), violation);
                let touched: BTreeSet<PersonId> = self
                    .credits
                    .people()
                    .chain(credits_before.people())
                    .collect();
                self.movies.insert(movie_id, before);
                self.credits = credits_before;
                for person_id in touched {
                    self.refresh_role(person_id);
                }
                Err(violation)
            }
        }
    }

    fn apply_movie_update(
        &mut self,
        movie_id: MovieId,
        update: &MovieUpdate,
    ) -> Check<Vec<&'static str>> {
        let mut changed = Vec::new();

        if !update.title.is_null() {
            let title = validate_title(&update.title)?;
            let movie = self.movie_mut(movie_id)?;
            if movie.title != title {
                movie.title = title;
                changed.push("title");
            }
        }

        if !update.release_date.is_null() {
            let release_date = validate_date(&update.release_date)?;
            let movie = self.movie_mut(movie_id)?;
            if movie.release_date != release_date {
                movie.release_date = release_date;
                changed.push("releaseDate");
            }
        }

        let mut added = false;
        for person in &update.actor_id_refs_to_add {
            added |= self.add_actor(movie_id, person.clone())?;
        }
        if added {
            changed.push("actors(added)");
        }

        let mut removed = false;
        for person in &update.actor_id_refs_to_remove {
            removed |= self.remove_actor(movie_id, person.clone())?;
        }
        if removed {
            changed.push("actors(removed)");
        }

        // An empty string unsets the director.
        if !update.director_id.is_null() {
            let director_id =
                self.validate_director(&update.director_id, self.options().require_director)?;
            if self.movie_ref(movie_id)?.director_id != director_id {
                self.link_director(movie_id, director_id);
                changed.push("directorId");
            }
        }

        let current = self.movie_ref(movie_id)?.genre.clone();
        let genre = if update.movie_genre.is_null() {
            current.genre()
        } else {
            check_movie_genre(&update.movie_genre)?
        };
        // Keeping the genre merges the stored fields with the provided ones;
        // switching genre drops the old fields entirely.
        let (about, episode_title, episode_no) = if genre == current.genre() {
            (
                provided_or(&update.about, current.about().map(Value::from)),
                provided_or(
                    &update.episode_title,
                    current.episode_title().map(Value::from),
                ),
                provided_or(&update.episode_no, current.episode_no().map(Value::from)),
            )
        } else {
            (
                update.about.clone(),
                update.episode_title.clone(),
                update.episode_no.clone(),
            )
        };
        let fields = self.resolve_genre_fields(genre, &about, &episode_title, &episode_no)?;
        if fields != current {
            changed.extend(genre_changes(&current, &fields));
            self.movie_mut(movie_id)?.genre = fields;
        }

        Ok(changed)
    }

    /// Removes a movie and releases the credits it gave its cast and director.
    pub fn destroy_movie(&mut self, movie_id: MovieId) -> bool {
        let Some(movie) = self.movies.remove(&movie_id) else {
            warn!("There is no movie with ID {} in the database!", movie_id);
            return false;
        };
        let actors: Vec<PersonId> = movie.actors.iter().copied().collect();
        self.uncredit_movie(&actors, movie.director_id);
        info!("{} deleted!", movie);
        true
    }

    fn existing_movie_id(&self, raw: &Value) -> Check<MovieId> {
        if is_empty(raw) {
            return Err(ConstraintViolation::MandatoryValue(
                "A value for the movie ID must be provided!".to_string(),
            ));
        }
        let movie_id = integer_value(raw)
            .and_then(|n| MovieId::try_from(n).ok())
            .filter(|id| *id >= 1)
            .ok_or_else(|| {
                ConstraintViolation::Range(format!("Movie ID {} is not a positive number!", raw))
            })?;
        self.movie_ref(movie_id).map(|_| movie_id)
    }

    fn movie_ref(&self, movie_id: MovieId) -> Check<&Movie> {
        self.movies
            .get(&movie_id)
            .ok_or_else(|| missing_movie(movie_id))
    }

    fn movie_mut(&mut self, movie_id: MovieId) -> Check<&mut Movie> {
        self.movies
            .get_mut(&movie_id)
            .ok_or_else(|| missing_movie(movie_id))
    }
}

fn provided_or(raw: &Value, current: Option<Value>) -> Value {
    if raw.is_null() {
        current.unwrap_or(Value::Null)
    } else {
        raw.clone()
    }
}

fn genre_changes(before: &GenreFields, after: &GenreFields) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if before.genre() != after.genre() {
        changed.push("movieGenre");
    }
    if before.about() != after.about() {
        changed.push("about");
    }
    if before.episode_title() != after.episode_title() {
        changed.push("episodeTitle");
    }
    if before.episode_no() != after.episode_no() {
        changed.push("episodeNo");
    }
    changed
}

fn missing_movie(movie_id: MovieId) -> ConstraintViolation {
    ConstraintViolation::ReferentialIntegrity(format!(
        "There is no movie with ID {} in the database!",
        movie_id
    ))
}
