//! TheTVDB v4 client. Authentication is lazy (first call logs in), and the
//! full episode list of a series is fetched once and cached for the rest of
//! the run, since a batch of files usually hammers the same series.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::{Candidate, EpisodeLookup, EpisodeMeta, EpisodeProvider, MetadataProvider};

const TVDB_API_BASE: &str = "https://api4.thetvdb.com/v4";

pub struct TvdbClient {
    api_key: String,
    client: reqwest::blocking::Client,
    token: RefCell<Option<String>>,
    episodes: RefCell<HashMap<u64, Vec<EpisodeMeta>>>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    data: LoginData,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    tvdb_id: String,
    name: String,
    year: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    data: SeriesData,
}

#[derive(Debug, Deserialize)]
struct SeriesData {
    id: u64,
    name: String,
    #[serde(rename = "firstAired")]
    first_aired: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EpisodesResponse {
    data: EpisodesData,
}

#[derive(Debug, Deserialize)]
struct EpisodesData {
    episodes: Vec<EpisodePayload>,
}

#[derive(Debug, Deserialize)]
struct EpisodePayload {
    #[serde(rename = "seasonNumber")]
    season_number: u32,
    #[serde(rename = "number")]
    episode_number: u32,
    #[serde(rename = "absoluteNumber")]
    absolute_number: Option<u32>,
    name: Option<String>,
    aired: Option<String>,
}

fn net_err(context: &str, e: impl std::fmt::Display) -> Error {
    Error::DataUnavailable(format!("{context}: {e}"))
}

fn year_prefix(value: Option<&str>) -> Option<i32> {
    value?.get(..4)?.parse().ok()
}

impl TvdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            client: reqwest::blocking::Client::new(),
            token: RefCell::new(None),
            episodes: RefCell::new(HashMap::new()),
        }
    }

    fn login(&self) -> Result<String> {
        let body = serde_json::json!({ "apikey": self.api_key });
        let response = self
            .client
            .post(format!("{TVDB_API_BASE}/login"))
            .header("Content-Type", "application/json")
            .body(body.to_string())
            .send()
            .map_err(|e| net_err("TVDB login", e))?;
        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "TVDB login failed: HTTP {}",
                response.status()
            )));
        }
        let login_resp: LoginResponse =
            serde_json::from_str(&response.text().map_err(|e| net_err("TVDB login", e))?)
                .map_err(|e| net_err("TVDB login response", e))?;
        Ok(login_resp.data.token)
    }

    fn bearer(&self) -> Result<String> {
        let mut token = self.token.borrow_mut();
        if token.is_none() {
            *token = Some(self.login()?);
        }
        Ok(format!("Bearer {}", token.as_ref().unwrap()))
    }

    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<reqwest::blocking::Response> {
        self.client
            .get(url)
            .header("Authorization", self.bearer()?)
            .query(query)
            .send()
            .map_err(|e| net_err("TVDB request", e))
    }

    fn all_episodes(&self, series_id: u64) -> Result<Vec<EpisodeMeta>> {
        if let Some(cached) = self.episodes.borrow().get(&series_id) {
            return Ok(cached.clone());
        }

        let mut page = 0u32;
        let mut collected = Vec::new();
        loop {
            let url = format!("{TVDB_API_BASE}/series/{series_id}/episodes/default");
            let response = self.get(&url, &[("page", page.to_string())])?;
            let status = response.status();
            if status == reqwest::StatusCode::NOT_FOUND {
                break;
            }
            if !status.is_success() {
                return Err(Error::DataUnavailable(format!(
                    "TVDB episodes lookup failed: HTTP {status}"
                )));
            }
            let text = response.text().map_err(|e| net_err("TVDB episodes", e))?;
            let page_resp: EpisodesResponse =
                serde_json::from_str(&text).map_err(|e| net_err("TVDB episodes response", e))?;
            if page_resp.data.episodes.is_empty() {
                break;
            }
            for ep in page_resp.data.episodes {
                collected.push(EpisodeMeta {
                    season: ep.season_number,
                    number: ep.episode_number,
                    absolute_number: ep.absolute_number,
                    name: ep.name,
                    aired: ep
                        .aired
                        .as_deref()
                        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
                });
            }
            page += 1;
        }

        debug!(series_id, count = collected.len(), "cached series episodes");
        self.episodes
            .borrow_mut()
            .insert(series_id, collected.clone());
        Ok(collected)
    }
}

impl MetadataProvider for TvdbClient {
    fn search_by_name(&self, query: &str, _language: &str) -> Result<Vec<Candidate>> {
        let response = self.get(
            &format!("{TVDB_API_BASE}/search"),
            &[("query", query.to_string()), ("type", "series".to_string())],
        )?;
        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "TVDB search failed: HTTP {}",
                response.status()
            )));
        }
        let search_resp: SearchResponse =
            serde_json::from_str(&response.text().map_err(|e| net_err("TVDB search", e))?)
                .map_err(|e| net_err("TVDB search response", e))?;
        Ok(search_resp
            .data
            .into_iter()
            .filter_map(|r| {
                let id = r.tvdb_id.parse().ok()?;
                Some(Candidate {
                    id,
                    title: r.name,
                    year: year_prefix(r.year.as_deref()),
                    genres: Vec::new(),
                    rating: None,
                })
            })
            .collect())
    }

    fn fetch_by_id(&self, id: u64) -> Result<Candidate> {
        let response = self.get(&format!("{TVDB_API_BASE}/series/{id}"), &[])?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::ShowNotFound(format!("series id {id}")));
        }
        if !response.status().is_success() {
            return Err(Error::DataUnavailable(format!(
                "TVDB series lookup failed: HTTP {}",
                response.status()
            )));
        }
        let series_resp: SeriesResponse =
            serde_json::from_str(&response.text().map_err(|e| net_err("TVDB series", e))?)
                .map_err(|e| net_err("TVDB series response", e))?;
        Ok(Candidate {
            id: series_resp.data.id,
            title: series_resp.data.name,
            year: year_prefix(series_resp.data.first_aired.as_deref()),
            genres: Vec::new(),
            rating: None,
        })
    }
}

impl EpisodeProvider for TvdbClient {
    fn episode(&self, series_id: u64, season: u32, number: u32) -> Result<EpisodeLookup> {
        let episodes = self.all_episodes(series_id)?;
        if !episodes.iter().any(|e| e.season == season) {
            return Ok(EpisodeLookup::NoSuchSeason);
        }
        Ok(episodes
            .iter()
            .find(|e| e.season == season && e.number == number)
            .map(|e| EpisodeLookup::Found(e.clone()))
            .unwrap_or(EpisodeLookup::NoSuchEpisode))
    }

    fn episodes_by_absolute_number(&self, series_id: u64, number: u32) -> Result<Vec<EpisodeMeta>> {
        let needle = number.to_string();
        Ok(self
            .all_episodes(series_id)?
            .into_iter()
            .filter(|e| {
                e.absolute_number
                    .map(|n| n.to_string().contains(&needle))
                    .unwrap_or(false)
            })
            .collect())
    }

    fn episodes_aired_on(&self, series_id: u64, date: NaiveDate) -> Result<Vec<EpisodeMeta>> {
        Ok(self
            .all_episodes(series_id)?
            .into_iter()
            .filter(|e| e.aired == Some(date))
            .collect())
    }
}
