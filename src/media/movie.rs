//! Movie records: parsed filename fields plus whatever the release name
//! gives away (resolution, part number, rip tags), later completed from a
//! metadata provider.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::metadata::MetadataProvider;
use crate::parser::ParsedFields;
use crate::selector::CandidateSelector;
use crate::text::{
    clean_regexed_name, handle_year, number_word_pattern, replace_input_name, replace_output_name,
    words_to_number,
};

#[derive(Debug, Clone)]
pub struct MovieRecord {
    pub title: String,
    pub release_year: Option<i32>,
    pub resolution: Option<String>,
    /// "Part 2" style multi-file marker, normalized from part/disc/cd tokens.
    pub part: Option<String>,
    pub tags: BTreeSet<String>,
    pub genres: Option<String>,
    pub rating: Option<f32>,
}

fn part_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let words = number_word_pattern();
        Regex::new(&format!(
            r"(?i)(?:part|disc|cd|dvd)[ .+_-]?(?P<digits>[0-9]+|(?P<words>(?:{words})(?:[ .+_-]?(?:{words}))*))"
        ))
        .unwrap()
    })
}

fn ripsource_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b(b[rd]rip|bluray|dvd[ .+_-]?(?:rip)?)\b").unwrap())
}

fn vcodec_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\b([hx]264|xvid|divx|theora|webm)\b").unwrap())
}

impl MovieRecord {
    pub fn from_match(
        fields: &ParsedFields,
        name_replacements: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let raw_title = fields
            .get("movietitle")
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| Error::InvalidPattern("pattern captured no movie title".into()))?;
        let title = replace_input_name(&clean_regexed_name(raw_title), name_replacements);

        let release_year = fields
            .get("releasedate")
            .map(|y| {
                y.parse::<i32>()
                    .map(handle_year)
                    .map_err(|_| Error::InvalidPattern(format!("release year {y:?}")))
            })
            .transpose()?;

        let extra = fields.get("extra").unwrap_or("");
        let mut resolution = fields.get("resolution").map(str::to_lowercase);
        if resolution.is_none() {
            resolution = guess_resolution(extra);
        }

        let mut tags: BTreeSet<String> = extra
            .split(|c: char| " .+_-{}()[]".contains(c))
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();
        if let Some(res) = &resolution {
            tags.insert(res.clone());
        }
        if let Some(release) = fields.get("releasetype") {
            tags.insert(clean_regexed_name(release).to_lowercase());
        }

        Ok(Self {
            title,
            release_year,
            resolution,
            part: find_part(extra),
            tags,
            genres: None,
            rating: None,
        })
    }
}

/// Infers a resolution from rip source and codec tokens when the name never
/// states one outright: a full BluRay with an HD codec is assumed 1080p, a
/// BR/BD rip 720p.
fn guess_resolution(extra: &str) -> Option<String> {
    let source = ripsource_regex().captures(extra)?[1].to_lowercase();
    let hd_codec = vcodec_regex()
        .captures(extra)
        .map(|c| {
            let codec = c[1].to_lowercase();
            codec == "h264" || codec == "x264"
        })
        .unwrap_or(false);
    if !hd_codec {
        return None;
    }
    match source.as_str() {
        "bluray" => Some("1080p".into()),
        "brrip" | "bdrip" => Some("720p".into()),
        _ => None,
    }
}

fn find_part(extra: &str) -> Option<String> {
    let caps = part_regex().captures(extra)?;
    let number = if let Some(digits) = caps.name("digits").filter(|m| {
        m.as_str().chars().next().map(|c| c.is_ascii_digit()) == Some(true)
    }) {
        digits.as_str().parse::<u64>().ok()?
    } else {
        let words: Vec<&str> = caps
            .name("words")?
            .as_str()
            .split(|c: char| " .+_-".contains(c))
            .filter(|w| !w.is_empty())
            .collect();
        words_to_number(&words)?
    };
    Some(format!("Part {number}"))
}

pub struct PopulateOptions<'a> {
    pub forced_name: Option<&'a str>,
    pub forced_id: Option<u64>,
    pub language: &'a str,
    pub genre_separator: &'a str,
}

/// Resolves the movie against the provider and replaces the guessed title
/// with the canonical one, pulling in release year, genres and rating.
pub fn populate<P: MetadataProvider>(
    record: &mut MovieRecord,
    provider: &P,
    selector: &mut CandidateSelector<crate::metadata::Candidate>,
    output_replacements: &BTreeMap<String, String>,
    opts: &PopulateOptions<'_>,
) -> Result<()> {
    let lookup_name = opts.forced_name.unwrap_or(&record.title);

    let chosen = if let Some(id) = opts.forced_id {
        provider.fetch_by_id(id)?
    } else {
        let query = match record.release_year {
            Some(year) => format!("{lookup_name} {year}"),
            None => lookup_name.to_string(),
        };
        let candidates = provider.search_by_name(&query, opts.language)?;
        let selected = selector
            .select(lookup_name, candidates, &|c| c.display())
            .map_err(|e| match e {
                Error::NoCandidates { .. } | Error::AmbiguousSelection { .. } => {
                    Error::MovieNotFound(query.clone())
                }
                other => other,
            })?;
        // The search payload is shallow; a follow-up fetch carries genres
        // and rating.
        provider.fetch_by_id(selected.id)?
    };
    debug!(title = %chosen.title, id = chosen.id, "resolved movie");

    record.title = replace_output_name(&chosen.title, output_replacements);
    if chosen.year.is_some() {
        record.release_year = chosen.year;
    }
    if !chosen.genres.is_empty() {
        record.genres = Some(chosen.genres.join(opts.genre_separator));
    }
    record.rating = chosen.rating;
    Ok(())
}
