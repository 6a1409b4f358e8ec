//! Metadata provider abstraction. The concrete clients talk to TheTVDB and
//! TMDB; everything above this module only sees the traits.

pub mod tmdb;
pub mod tvdb;

use chrono::NaiveDate;

use crate::error::Result;

/// A search result: a series or a movie, depending on which provider
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: u64,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: Option<f32>,
}

impl Candidate {
    /// Pretty form for prompts: title plus year when known.
    pub fn display(&self) -> String {
        match self.year {
            Some(year) => format!("{} ({year})", self.title),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeMeta {
    pub season: u32,
    pub number: u32,
    pub absolute_number: Option<u32>,
    pub name: Option<String>,
    pub aired: Option<NaiveDate>,
}

/// Why a season/episode lookup came back empty, so callers can report the
/// missing season and the missing episode differently.
#[derive(Debug, Clone, PartialEq)]
pub enum EpisodeLookup {
    Found(EpisodeMeta),
    NoSuchSeason,
    NoSuchEpisode,
}

pub trait MetadataProvider {
    fn search_by_name(&self, query: &str, language: &str) -> Result<Vec<Candidate>>;
    fn fetch_by_id(&self, id: u64) -> Result<Candidate>;
}

pub trait EpisodeProvider: MetadataProvider {
    fn episode(&self, series_id: u64, season: u32, number: u32) -> Result<EpisodeLookup>;

    /// Episodes whose absolute number contains `number`'s decimal form as a
    /// substring. Callers are expected to narrow multiple hits themselves.
    fn episodes_by_absolute_number(&self, series_id: u64, number: u32) -> Result<Vec<EpisodeMeta>>;

    fn episodes_aired_on(&self, series_id: u64, date: NaiveDate) -> Result<Vec<EpisodeMeta>>;
}
