//! Core type definitions for search results, details and component state

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Number of results the provider returns per search page
pub const PAGE_SIZE: u32 = 10;

/// A title as listed in search results and in the favorites slot.
///
/// The object a summary was decoded from is kept, so re-encoding it writes
/// the same keys in the same order, including fields this crate does not
/// model. Summaries built with [`MovieSummary::new`] encode as
/// `Title, Year, imdbID, [Type,] Poster`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovieSummary {
    pub title: String,
    pub year: String,
    pub imdb_id: String,
    pub kind: Option<String>,
    pub poster: String,
    source: Map<String, Value>,
}

/// The modelled keys of a summary object
#[derive(Deserialize)]
struct SummaryFields {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type", default)]
    kind: Option<String>,
    #[serde(rename = "Poster")]
    poster: String,
}

impl MovieSummary {
    pub fn new(
        imdb_id: impl Into<String>,
        title: impl Into<String>,
        year: impl Into<String>,
        poster: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            year: year.into(),
            imdb_id: imdb_id.into(),
            kind: None,
            poster: poster.into(),
            source: Map::new(),
        }
    }

    /// Value of a key this type does not model, such as `imdbRating`
    pub fn extra(&self, key: &str) -> Option<&Value> {
        match key {
            "Title" | "Year" | "imdbID" | "Type" | "Poster" => None,
            _ => self.source.get(key),
        }
    }

    fn modelled(&self, key: &str) -> Option<Option<Value>> {
        let text = |s: &String| Some(Value::String(s.clone()));
        match key {
            "Title" => Some(text(&self.title)),
            "Year" => Some(text(&self.year)),
            "imdbID" => Some(text(&self.imdb_id)),
            "Type" => Some(self.kind.as_ref().and_then(text)),
            "Poster" => Some(text(&self.poster)),
            _ => None,
        }
    }

    /// The source object with modelled keys replaced by the current field
    /// values in place; modelled keys it lacked follow in default order
    fn to_object(&self) -> Map<String, Value> {
        let mut object = Map::new();
        for (key, value) in &self.source {
            match self.modelled(key) {
                Some(Some(current)) => {
                    object.insert(key.clone(), current);
                }
                Some(None) => {}
                None => {
                    object.insert(key.clone(), value.clone());
                }
            }
        }
        for key in ["Title", "Year", "imdbID", "Type", "Poster"] {
            if object.contains_key(key) {
                continue;
            }
            if let Some(Some(current)) = self.modelled(key) {
                object.insert(key.to_string(), current);
            }
        }
        object
    }
}

impl Serialize for MovieSummary {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_object().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MovieSummary {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let source = Map::<String, Value>::deserialize(deserializer)?;
        let fields: SummaryFields = serde_json::from_value(Value::Object(source.clone()))
            .map_err(serde::de::Error::custom)?;
        Ok(Self {
            title: fields.title,
            year: fields.year,
            imdb_id: fields.imdb_id,
            kind: fields.kind,
            poster: fields.poster,
            source,
        })
    }
}

/// A single rating source listed on a detail record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "Source")]
    pub source: String,
    #[serde(rename = "Value")]
    pub value: String,
}

/// Full record for one title, fetched when it is opened
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(rename = "imdbID")]
    pub imdb_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "Year", default)]
    pub year: String,
    #[serde(rename = "Poster", default)]
    pub poster: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Actors", default)]
    pub actors: String,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Plot", default)]
    pub plot: String,
    #[serde(rename = "imdbRating", default)]
    pub imdb_rating: String,
    #[serde(rename = "Rated", default)]
    pub rated: Option<String>,
    #[serde(rename = "Released", default)]
    pub released: Option<String>,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
    #[serde(rename = "Writer", default)]
    pub writer: Option<String>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
    #[serde(rename = "Country", default)]
    pub country: Option<String>,
    #[serde(rename = "Awards", default)]
    pub awards: Option<String>,
    #[serde(rename = "Metascore", default)]
    pub metascore: Option<String>,
    #[serde(rename = "imdbVotes", default)]
    pub imdb_votes: Option<String>,
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "BoxOffice", default)]
    pub box_office: Option<String>,
    #[serde(rename = "Ratings", default)]
    pub ratings: Vec<Rating>,
}

impl MovieDetail {
    /// The summary part of this record, suitable for toggling a favorite
    pub fn summary(&self) -> MovieSummary {
        let mut summary = MovieSummary::new(
            self.imdb_id.clone(),
            self.title.clone(),
            self.year.clone(),
            self.poster.clone(),
        );
        summary.kind = self.kind.clone();
        summary
    }
}

/// One page of search results as returned by the metadata client
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<MovieSummary>,
    pub total_count: u32,
}

impl SearchPage {
    /// `ceil(total_count / PAGE_SIZE)`, never less than 1
    pub fn total_pages(&self) -> u32 {
        total_pages(self.total_count)
    }
}

pub fn total_pages(total_count: u32) -> u32 {
    total_count.div_ceil(PAGE_SIZE).max(1)
}

/// Coarse state of a component, derived from its flags
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Error,
}

/// State owned by the search session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchState {
    pub query: String,
    pub page: u32,
    pub total_pages: u32,
    pub results: Vec<MovieSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            total_pages: 1,
            results: Vec::new(),
            loading: false,
            error: None,
        }
    }
}

impl SearchState {
    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else if self.query.trim().is_empty() {
            Status::Idle
        } else {
            Status::Ready
        }
    }
}

/// State owned by the detail viewer
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DetailState {
    /// Id of the most recent `open` request
    pub requested_id: Option<String>,
    pub selection: Option<MovieDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl DetailState {
    pub fn status(&self) -> Status {
        if self.loading {
            Status::Loading
        } else if self.error.is_some() {
            Status::Error
        } else if self.selection.is_some() {
            Status::Ready
        } else {
            Status::Idle
        }
    }
}
