//! TMDB v3 client for movies. The search payload is shallow, so genres and
//! rating come from a per-movie details fetch.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::metadata::{Candidate, MetadataProvider};

const TMDB_API_BASE: &str = "https://api.themoviedb.org/3";

pub struct TmdbClient {
    api_key: String,
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    id: u64,
    title: String,
    release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MovieDetails {
    id: u64,
    title: String,
    release_date: Option<String>,
    genres: Vec<Genre>,
    vote_average: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct Genre {
    name: String,
}

fn net_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::DataUnavailable(format!("{context}: {e}"))
}

fn release_year(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse().ok()
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl MetadataProvider for TmdbClient {
    fn search_by_name(&self, query: &str, language: &str) -> Result<Vec<Candidate>> {
        let response = self
            .client
            .get(format!("{TMDB_API_BASE}/search/movie"))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("language", language),
            ])
            .send()
            .map_err(|e| net_err("TMDB search", e))?;
        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "TMDB search failed: HTTP {}",
                response.status()
            )));
        }
        let search_resp: SearchResponse =
            serde_json::from_str(&response.text().map_err(|e| net_err("TMDB search", e))?)
                .map_err(|e| net_err("TMDB search response", e))?;
        Ok(search_resp
            .results
            .into_iter()
            .map(|r| Candidate {
                id: r.id,
                title: r.title,
                year: release_year(r.release_date.as_deref()),
                genres: Vec::new(),
                rating: None,
            })
            .collect())
    }

    fn fetch_by_id(&self, id: u64) -> Result<Candidate> {
        let response = self
            .client
            .get(format!("{TMDB_API_BASE}/movie/{id}"))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .map_err(|e| net_err("TMDB movie", e))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::MovieNotFound(format!("movie id {id}")));
        }
        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "TMDB movie lookup failed: HTTP {}",
                response.status()
            )));
        }
        let details: MovieDetails =
            serde_json::from_str(&response.text().map_err(|e| net_err("TMDB movie", e))?)
                .map_err(|e| net_err("TMDB movie response", e))?;
        Ok(Candidate {
            id: details.id,
            title: details.title,
            year: release_year(details.release_date.as_deref()),
            genres: details.genres.into_iter().map(|g| g.name).collect(),
            rating: details.vote_average,
        })
    }
}
