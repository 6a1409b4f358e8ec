//! TV episode records: building them from parsed filename fields and
//! filling in canonical names from a metadata provider.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::{EpisodeLookup, EpisodeProvider};
use crate::parser::ParsedFields;
use crate::selector::CandidateSelector;
use crate::text::{clean_regexed_name, format_episode_name, handle_year, replace_input_name};

/// Episode identity within a series. Date-based shows (daily talk shows and
/// the like) have no meaningful season/episode numbering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeNumbers {
    Numbered(Vec<u32>),
    Aired(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct EpisodeRecord {
    pub series_name: String,
    pub season_number: Option<u32>,
    pub year: Option<i32>,
    pub numbers: EpisodeNumbers,
    /// One title per episode number until `populate` joins them.
    pub episode_titles: Vec<String>,
    pub group: Option<String>,
    pub crc: Option<String>,
}

impl EpisodeRecord {
    pub fn is_date_based(&self) -> bool {
        matches!(self.numbers, EpisodeNumbers::Aired(_))
    }

    pub fn episode_numbers(&self) -> &[u32] {
        match &self.numbers {
            EpisodeNumbers::Numbered(ns) => ns,
            EpisodeNumbers::Aired(_) => &[],
        }
    }

    /// Builds a record from one pattern's captures. Multi-episode spans are
    /// expanded to the full inclusive list, and a reversed span is swapped
    /// rather than rejected.
    pub fn from_match(
        fields: &ParsedFields,
        name_replacements: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let series_raw = fields.get("seriesname").unwrap_or("");
        let series_name = replace_input_name(&clean_regexed_name(series_raw), name_replacements);

        let season_number = parse_group(fields, "seasonnumber")?;
        let year = match fields.get("year") {
            Some(y) if !fields.contains("month") => Some(handle_year(parse_num::<i32>(y, "year")?)),
            _ => None,
        };

        let numbers = derive_numbers(fields)?;

        Ok(Self {
            series_name,
            season_number,
            year,
            numbers,
            episode_titles: Vec::new(),
            group: fields.get("group").map(str::to_string),
            crc: fields.get("crc").map(str::to_string),
        })
    }
}

fn parse_num<T: std::str::FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| Error::InvalidPattern(format!("{what} {value:?} is not a number")))
}

fn parse_group(fields: &ParsedFields, name: &str) -> Result<Option<u32>> {
    fields.get(name).map(|v| parse_num(v, name)).transpose()
}

fn derive_numbers(fields: &ParsedFields) -> Result<EpisodeNumbers> {
    // Enumerated groups (episodenumber1, episodenumber2, ...) win over
    // start/end spans, which win over the single-number form. The numbers
    // themselves sort ascending regardless of which group held them.
    if fields.contains("episodenumber1") {
        let suffix = Regex::new(r"^episodenumber\d+$").unwrap();
        let mut numbers: Vec<u32> = Vec::new();
        for name in fields.names() {
            if suffix.is_match(name) {
                numbers.push(parse_num(fields.get(name).unwrap_or(""), name)?);
            }
        }
        numbers.sort_unstable();
        return Ok(EpisodeNumbers::Numbered(numbers));
    }

    if let (Some(start), Some(end)) = (
        parse_group(fields, "episodenumberstart")?,
        parse_group(fields, "episodenumberend")?,
    ) {
        let (lo, hi) = if start > end { (end, start) } else { (start, end) };
        return Ok(EpisodeNumbers::Numbered((lo..=hi).collect()));
    }

    if let Some(number) = parse_group(fields, "episodenumber")? {
        return Ok(EpisodeNumbers::Numbered(vec![number]));
    }

    if let (Some(year), Some(month), Some(day)) = (
        fields.get("year"),
        fields.get("month"),
        fields.get("day"),
    ) {
        let year = handle_year(parse_num(year, "year")?);
        let month: u32 = parse_num(month, "month")?;
        let day: u32 = parse_num(day, "day")?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            Error::InvalidPattern(format!("{year}-{month:02}-{day:02} is not a real date"))
        })?;
        return Ok(EpisodeNumbers::Aired(date));
    }

    Err(Error::InvalidPattern(
        "pattern has no episode number or air date groups".into(),
    ))
}

pub struct PopulateOptions<'a> {
    pub forced_name: Option<&'a str>,
    pub forced_id: Option<u64>,
    pub language: &'a str,
    pub multiep_join: &'a str,
}

/// Resolves the series against the provider and fills in canonical series
/// and episode names. The record's own series name becomes the provider's
/// canonical spelling on success.
pub fn populate<P: EpisodeProvider>(
    record: &mut EpisodeRecord,
    provider: &P,
    selector: &mut CandidateSelector<crate::metadata::Candidate>,
    opts: &PopulateOptions<'_>,
) -> Result<()> {
    let lookup_name = opts.forced_name.unwrap_or(&record.series_name);

    let series = if let Some(id) = opts.forced_id {
        provider.fetch_by_id(id)?
    } else {
        let mut search = |query: &str| -> Result<crate::metadata::Candidate> {
            let candidates = provider.search_by_name(query, opts.language)?;
            selector
                .select(lookup_name, candidates, &|c| c.title.clone())
                .map_err(|e| match e {
                    Error::NoCandidates { .. } | Error::AmbiguousSelection { .. } => {
                        Error::ShowNotFound(query.to_string())
                    }
                    other => other,
                })
        };
        // A year parsed from the filename narrows the query first; if that
        // finds nothing we retry with the bare name.
        match (record.year, record.is_date_based()) {
            (Some(year), false) => {
                let qualified = format!("{lookup_name} ({year})");
                match search(&qualified) {
                    Err(Error::ShowNotFound(_)) => search(lookup_name)?,
                    other => other?,
                }
            }
            _ => search(lookup_name)?,
        }
    };
    debug!(series = %series.title, id = series.id, "resolved series");
    record.series_name = series.title.clone();

    record.episode_titles = match &record.numbers {
        EpisodeNumbers::Aired(date) => {
            let found = provider.episodes_aired_on(series.id, *date)?;
            match found.len() {
                1 => found[0]
                    .name
                    .clone()
                    .map(|n| vec![n])
                    .ok_or_else(|| Error::EpisodeNameNotFound(format!("aired {date}")))?,
                0 => {
                    return Err(Error::EpisodeNotFound(format!(
                        "no episode of {} aired on {date}",
                        series.title
                    )))
                }
                n => {
                    return Err(Error::EpisodeNotFound(format!(
                        "{n} episodes of {} aired on {date}",
                        series.title
                    )))
                }
            }
        }
        EpisodeNumbers::Numbered(numbers) => {
            let season = record.season_number.unwrap_or(1);
            let mut titles = Vec::with_capacity(numbers.len());
            for &epno in numbers {
                titles.push(episode_title(provider, &series, season, epno)?);
            }
            titles
        }
    };
    Ok(())
}

fn episode_title<P: EpisodeProvider>(
    provider: &P,
    series: &crate::metadata::Candidate,
    season: u32,
    epno: u32,
) -> Result<String> {
    match provider.episode(series.id, season, epno)? {
        EpisodeLookup::Found(meta) => meta
            .name
            .ok_or_else(|| Error::EpisodeNameNotFound(format!("s{season:02}e{epno:02}"))),
        EpisodeLookup::NoSuchSeason => Err(Error::SeasonNotFound {
            season,
            series: series.title.clone(),
        }),
        // The season/episode pair may really be an absolute number, common
        // in anime releases. Only an unambiguous exact match is accepted.
        EpisodeLookup::NoSuchEpisode => {
            let matches = provider.episodes_by_absolute_number(series.id, epno)?;
            match matches.len() {
                0 => Err(Error::EpisodeNotFound(format!(
                    "episode {epno} of {}",
                    series.title
                ))),
                1 => matches[0]
                    .name
                    .clone()
                    .ok_or_else(|| Error::EpisodeNameNotFound(format!("absolute {epno}"))),
                n => {
                    let exact: Vec<_> = matches
                        .iter()
                        .filter(|m| m.absolute_number == Some(epno))
                        .collect();
                    match exact.as_slice() {
                        [only] => only
                            .name
                            .clone()
                            .ok_or_else(|| Error::EpisodeNameNotFound(format!("absolute {epno}"))),
                        _ => Err(Error::EpisodeNotFound(format!(
                            "no episode actually matches {epno}, found {n} results instead"
                        ))),
                    }
                }
            }
        }
    }
}

/// Joins the per-episode titles into one display name, collapsing
/// "Foo (1)" / "Foo (2)" style continuations.
pub fn joined_title(record: &EpisodeRecord, join_with: &str) -> Option<String> {
    if record.episode_titles.is_empty() {
        None
    } else {
        Some(format_episode_name(&record.episode_titles, join_with))
    }
}
