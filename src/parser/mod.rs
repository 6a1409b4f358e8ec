//! Filename parsing: an ordered cascade of regexes with named captures.
//!
//! The input name is normalized with the configured input replacements, then
//! each pattern is tried in order; the first full match wins and its named
//! groups become the parsed fields. No scoring happens across patterns,
//! specificity is encoded purely by list order.

pub mod patterns;

use std::collections::HashMap;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::text::{apply_replacements, Replacement};

/// Named capture values from exactly one pattern. Groups that did not
/// participate in the match are absent, which is distinct from a group that
/// matched the empty string.
#[derive(Debug, Clone, Default)]
pub struct ParsedFields {
    values: HashMap<String, String>,
}

impl ParsedFields {
    fn from_captures(re: &Regex, caps: &Captures) -> Self {
        let mut values = HashMap::new();
        for name in re.capture_names().flatten() {
            if let Some(m) = caps.name(name) {
                values.insert(name.to_string(), m.as_str().to_string());
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
impl ParsedFields {
    /// Test helper for building fields without going through a pattern.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            values: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// One compiled pattern cascade, built once per media type and passed by
/// reference wherever parsing happens.
#[derive(Debug)]
pub struct PatternParser {
    patterns: Vec<Regex>,
    input_replacements: Vec<Replacement>,
}

impl PatternParser {
    /// Compiles the pattern list, skipping (with a warning) any entry that
    /// fails to compile so one bad custom pattern doesn't take out the rest.
    pub fn new(patterns: &[&str], input_replacements: &[Replacement]) -> Self {
        let compiled = patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "skipping invalid filename pattern");
                    None
                }
            })
            .collect();
        Self {
            patterns: compiled,
            input_replacements: input_replacements.to_vec(),
        }
    }

    pub fn tv(input_replacements: &[Replacement]) -> Self {
        Self::new(patterns::TV_PATTERNS, input_replacements)
    }

    pub fn movie(input_replacements: &[Replacement]) -> Self {
        Self::new(patterns::MOVIE_PATTERNS, input_replacements)
    }

    /// Normalizes the name and runs it through the cascade, returning the
    /// named groups of the first pattern that matches in full.
    pub fn parse(&self, filename: &str) -> Result<ParsedFields> {
        let name = apply_replacements(filename, &self.input_replacements);
        for re in &self.patterns {
            if let Some(caps) = re.captures(&name) {
                debug!(filename = %name, pattern = %re.as_str(), "filename matched");
                return Ok(ParsedFields::from_captures(re, &caps));
            }
        }
        Err(Error::NoPatternMatched {
            original: (name != filename).then(|| filename.to_string()),
            normalized: name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tv() -> PatternParser {
        PatternParser::tv(&[])
    }

    #[test]
    fn parses_sxxexx() {
        let fields = tv().parse("Show.Name.S02E05.Episode.Title").unwrap();
        assert_eq!(fields.get("seriesname"), Some("Show.Name"));
        assert_eq!(fields.get("seasonnumber"), Some("02"));
        assert_eq!(fields.get("episodenumber"), Some("05"));
    }

    #[test]
    fn parses_season_x_episode() {
        let fields = tv().parse("Show Name - 2x05 - Title").unwrap();
        assert_eq!(fields.get("seasonnumber"), Some("2"));
        assert_eq!(fields.get("episodenumber"), Some("05"));
    }

    #[test]
    fn parses_episode_span() {
        let fields = tv().parse("Show.S01E01-03.720p").unwrap();
        assert_eq!(fields.get("episodenumberstart"), Some("01"));
        assert_eq!(fields.get("episodenumberend"), Some("03"));
    }

    #[test]
    fn span_requires_trailing_separator() {
        // s01e01-720p must not become a 719-episode span
        let fields = tv().parse("Show.S01E01-720p").unwrap();
        assert_eq!(fields.get("episodenumber"), Some("01"));
        assert!(!fields.contains("episodenumberend"));
    }

    #[test]
    fn parses_date_based() {
        let fields = tv().parse("The.Daily.Show.2010.01.02.Some.Guest").unwrap();
        assert_eq!(fields.get("seriesname"), Some("The.Daily.Show"));
        assert_eq!(fields.get("year"), Some("2010"));
        assert_eq!(fields.get("month"), Some("01"));
        assert_eq!(fields.get("day"), Some("02"));
    }

    #[test]
    fn parses_anime_release() {
        let fields = tv().parse("[SomeGroup] Show Name - 07 [ABCD1234]").unwrap();
        assert_eq!(fields.get("group"), Some("SomeGroup"));
        assert_eq!(fields.get("episodenumber"), Some("07"));
        assert_eq!(fields.get("crc"), Some("ABCD1234"));
    }

    #[test]
    fn parses_bracketed_multi_episode() {
        let fields = tv().parse("show_[s01]_[e01]_[e02]").unwrap();
        assert_eq!(fields.get("episodenumber1"), Some("01"));
        assert_eq!(fields.get("episodenumber2"), Some("02"));
    }

    #[test]
    fn missing_optional_group_is_absent_not_empty() {
        let fields = tv().parse("show_[s01]_[e01]").unwrap();
        assert_eq!(fields.get("episodenumber1"), Some("01"));
        assert!(fields.get("episodenumber2").is_none());
    }

    #[test]
    fn unparseable_name_reports_both_forms() {
        let reps = vec![Replacement {
            find: "&".into(),
            replacement: "and".into(),
            is_regex: false,
        }];
        let parser = PatternParser::new(&[r"^never(?P<seriesname>matches)$"], &reps);
        let err = parser.parse("junk&name").unwrap_err();
        match err {
            Error::NoPatternMatched { normalized, original } => {
                assert_eq!(normalized, "junkandname");
                assert_eq!(original.as_deref(), Some("junk&name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn movie_with_year_and_resolution() {
        let parser = PatternParser::movie(&[]);
        let fields = parser.parse("Movie.Title.2010.720p.BluRay.x264-GROUP").unwrap();
        assert_eq!(fields.get("movietitle"), Some("Movie.Title"));
        assert_eq!(fields.get("releasedate"), Some("2010"));
        assert_eq!(fields.get("resolution"), Some("720p"));
        assert_eq!(fields.get("extra"), Some("BluRay.x264-GROUP"));
    }
}
