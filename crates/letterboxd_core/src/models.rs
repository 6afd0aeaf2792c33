use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilmResult {
    pub slug: String,
    pub film_id: String,
}

impl FilmResult {
    pub fn new(slug: impl Into<String>, film_id: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            film_id: film_id.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiaryEntry {
    pub film_id: String,
    pub date: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub liked: bool,
}

impl DiaryEntry {
    pub fn new(film_id: impl Into<String>) -> Self {
        Self {
            film_id: film_id.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    pub success: bool,
    pub message: String,
}
