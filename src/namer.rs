//! Builds output file and directory names from populated records, and makes
//! them safe for the filesystem.

use std::collections::BTreeMap;
use std::path::PathBuf;

use regex::Regex;

use crate::media::movie::MovieRecord;
use crate::media::tv::{joined_title, EpisodeNumbers, EpisodeRecord};
use crate::text::{format_episode_numbers, replace_output_name};

#[derive(Debug, Clone)]
pub struct SanitizeOptions {
    /// Also honor Windows filename rules on other platforms.
    pub windows_safe: bool,
    pub custom_blacklist: String,
    pub replace_with: String,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            windows_safe: false,
            custom_blacklist: String::new(),
            replace_with: "_".into(),
        }
    }
}

const WINDOWS_RESERVED: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

// Linux filenames are capped at 255 bytes; one is reserved so a ".partial"
// style suffix can still be appended by downstream tools.
const MAX_LEN: usize = 254;

fn platform_blacklist(windows_safe: bool, directory: bool) -> &'static str {
    if cfg!(windows) || windows_safe {
        if directory {
            ":*?\"<>|"
        } else {
            "\\/:*?\"<>|"
        }
    } else if cfg!(target_os = "macos") {
        if directory {
            ":"
        } else {
            "/:"
        }
    } else if directory {
        ""
    } else {
        "/"
    }
}

/// Makes one path component safe: hides a leading dot, strips nulls,
/// replaces blacklisted characters, dodges Windows reserved names and
/// truncates to the filesystem limit while keeping the extension.
/// Running the result through again changes nothing.
pub fn make_valid_filename(value: &str, directory: bool, opts: &SanitizeOptions) -> String {
    let mut value = value.replace('\0', "");

    let hidden = value.starts_with('.');
    if hidden {
        value = format!("_{}", &value[1..]);
    }

    let (mut stem, extension) = match value.rfind('.') {
        Some(idx) if !directory && idx > 0 => {
            (value[..idx].to_string(), value[idx..].to_string())
        }
        _ => (value, String::new()),
    };

    let blacklist = platform_blacklist(opts.windows_safe, directory);
    stem = stem
        .chars()
        .map(|c| {
            if blacklist.contains(c) || opts.custom_blacklist.contains(c) {
                opts.replace_with.clone()
            } else {
                c.to_string()
            }
        })
        .collect();
    stem = stem.trim().to_string();

    if (cfg!(windows) || opts.windows_safe)
        && WINDOWS_RESERVED.contains(&stem.to_uppercase().as_str())
    {
        stem.push('_');
    }

    let budget = MAX_LEN.saturating_sub(extension.len());
    if stem.len() > budget {
        let mut cut = budget;
        while !stem.is_char_boundary(cut) {
            cut -= 1;
        }
        stem.truncate(cut);
    }

    let mut out = format!("{stem}{extension}");
    // A pathologically long extension can exceed the limit on its own; the
    // extension loses then.
    if out.len() > MAX_LEN {
        let mut cut = MAX_LEN;
        while !out.is_char_boundary(cut) {
            cut -= 1;
        }
        out.truncate(cut);
    }
    out
}

#[derive(Debug, Clone, Default)]
pub struct NamerConfig {
    pub lowercase: bool,
    pub multiep_format: MultiEpFormat,
    pub episode_separator: String,
    pub multiep_join: String,
    pub output_replacements: BTreeMap<String, String>,
    pub sanitize: SanitizeOptions,
}

/// How a span of episode numbers renders in the filename.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MultiEpFormat {
    /// `[02x05,06]`
    #[default]
    Joined,
    /// `[02x05-06]`
    Range,
}

fn episode_number_text(numbers: &[u32], cfg: &NamerConfig) -> String {
    match (cfg.multiep_format, numbers) {
        (MultiEpFormat::Range, [first, .., last]) => {
            format!("{first:02}-{last:02}")
        }
        _ => format_episode_numbers(numbers, &cfg.episode_separator),
    }
}

fn finish(name: String, cfg: &NamerConfig, extension: Option<&str>) -> String {
    let name = replace_output_name(&name, &cfg.output_replacements);
    let mut name = match extension {
        Some(ext) if !ext.is_empty() => format!("{name}.{ext}"),
        _ => name,
    };
    if cfg.lowercase {
        name = name.to_lowercase();
    }
    make_valid_filename(&name, false, &cfg.sanitize)
}

/// Output filename for an episode, e.g. `Scrubs - [01x04] - My Old Lady.avi`.
/// Date-based shows use the air date, anime releases keep group and CRC.
pub fn tv_filename(record: &EpisodeRecord, extension: Option<&str>, cfg: &NamerConfig) -> String {
    let title = joined_title(record, &cfg.multiep_join);
    let name = match (&record.numbers, &record.group) {
        (EpisodeNumbers::Aired(date), _) => {
            let mut name = format!("{} - [{}]", record.series_name, date.format("%Y-%m-%d"));
            if let Some(title) = title {
                name.push_str(&format!(" - {title}"));
            }
            name
        }
        (EpisodeNumbers::Numbered(numbers), Some(group)) => {
            let mut name = format!(
                "[{group}] {} - {}",
                record.series_name,
                episode_number_text(numbers, cfg)
            );
            if let Some(title) = title {
                name.push_str(&format!(" - {title}"));
            }
            if let Some(crc) = &record.crc {
                name.push_str(&format!(" [{crc}]"));
            }
            name
        }
        (EpisodeNumbers::Numbered(numbers), None) => {
            let episodes = episode_number_text(numbers, cfg);
            let mut name = match record.season_number {
                Some(season) => {
                    format!("{} - [{season:02}x{episodes}]", record.series_name)
                }
                None => format!("{} - [{episodes}]", record.series_name),
            };
            if let Some(title) = title {
                name.push_str(&format!(" - {title}"));
            }
            name
        }
    };
    finish(name, cfg, extension)
}

/// Output filename for a movie, e.g. `Inception (2010) [720p] Part 1.mkv`,
/// omitting whatever was never parsed or fetched.
pub fn movie_filename(record: &MovieRecord, extension: Option<&str>, cfg: &NamerConfig) -> String {
    let mut name = record.title.clone();
    if let Some(year) = record.release_year {
        name.push_str(&format!(" ({year})"));
    }
    if let Some(res) = &record.resolution {
        name.push_str(&format!(" [{res}]"));
    }
    if let Some(part) = &record.part {
        name.push_str(&format!(" {part}"));
    }
    finish(name, cfg, extension)
}

/// Destination directory for an episode: `Series/Season 2`, or `Series/2010`
/// for date-based shows.
pub fn tv_dirname(record: &EpisodeRecord, cfg: &NamerConfig) -> PathBuf {
    let series = make_valid_filename(&record.series_name, true, &cfg.sanitize);
    let leaf = match &record.numbers {
        EpisodeNumbers::Aired(date) => date.format("%Y").to_string(),
        EpisodeNumbers::Numbered(_) => match record.season_number {
            Some(season) => format!("Season {season}"),
            None => String::new(),
        },
    };
    let mut path = PathBuf::from(series);
    if !leaf.is_empty() {
        path.push(make_valid_filename(&leaf, true, &cfg.sanitize));
    }
    path
}

/// Destination directory for a movie: `Title (year)`.
pub fn movie_dirname(record: &MovieRecord, cfg: &NamerConfig) -> PathBuf {
    let name = match record.release_year {
        Some(year) => format!("{} ({year})", record.title),
        None => record.title.clone(),
    };
    PathBuf::from(make_valid_filename(&name, true, &cfg.sanitize))
}

/// Regex rewrites applied to a full destination path before the move.
pub fn apply_fullpath_replacements(path: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut out = path.to_string();
    for (pattern, replacement) in replacements {
        if let Ok(re) = Regex::new(pattern) {
            out = re.replace_all(&out, replacement.as_str()).into_owned();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;

    fn cfg() -> NamerConfig {
        NamerConfig {
            lowercase: false,
            multiep_format: MultiEpFormat::Joined,
            episode_separator: ",".into(),
            multiep_join: ", ".into(),
            output_replacements: BTreeMap::new(),
            sanitize: SanitizeOptions::default(),
        }
    }

    fn episode(season: Option<u32>, numbers: Vec<u32>, titles: &[&str]) -> EpisodeRecord {
        EpisodeRecord {
            series_name: "Scrubs".into(),
            season_number: season,
            year: None,
            numbers: EpisodeNumbers::Numbered(numbers),
            episode_titles: titles.iter().map(|t| t.to_string()).collect(),
            group: None,
            crc: None,
        }
    }

    #[test]
    fn season_episode_filename() {
        let record = episode(Some(1), vec![4], &["My Old Lady"]);
        assert_eq!(
            tv_filename(&record, Some("avi"), &cfg()),
            "Scrubs - [01x04] - My Old Lady.avi"
        );
    }

    #[test]
    fn multi_episode_filename_joins_numbers_and_titles() {
        let record = episode(Some(1), vec![4, 5], &["My Old Lady", "My Two Dads"]);
        assert_eq!(
            tv_filename(&record, Some("avi"), &cfg()),
            "Scrubs - [01x04,05] - My Old Lady, My Two Dads.avi"
        );
        let ranged = NamerConfig {
            multiep_format: MultiEpFormat::Range,
            ..cfg()
        };
        assert_eq!(
            tv_filename(&record, Some("avi"), &ranged),
            "Scrubs - [01x04-05] - My Old Lady, My Two Dads.avi"
        );
    }

    #[test]
    fn date_based_filename() {
        let mut record = episode(None, vec![], &["Some Guest"]);
        record.series_name = "The Daily Show".into();
        record.numbers =
            EpisodeNumbers::Aired(NaiveDate::from_ymd_opt(2010, 1, 2).unwrap());
        assert_eq!(
            tv_filename(&record, Some("avi"), &cfg()),
            "The Daily Show - [2010-01-02] - Some Guest.avi"
        );
    }

    #[test]
    fn anime_filename_keeps_group_and_crc() {
        let mut record = episode(None, vec![7], &["Title"]);
        record.series_name = "Show".into();
        record.group = Some("Coalgirls".into());
        record.crc = Some("ABCD1234".into());
        assert_eq!(
            tv_filename(&record, Some("mkv"), &cfg()),
            "[Coalgirls] Show - 07 - Title [ABCD1234].mkv"
        );
    }

    #[test]
    fn movie_filename_omits_missing_pieces() {
        let mut record = MovieRecord {
            title: "Inception".into(),
            release_year: Some(2010),
            resolution: Some("720p".into()),
            part: None,
            tags: BTreeSet::new(),
            genres: None,
            rating: None,
        };
        assert_eq!(
            movie_filename(&record, Some("mkv"), &cfg()),
            "Inception (2010) [720p].mkv"
        );
        record.resolution = None;
        record.part = Some("Part 2".into());
        assert_eq!(
            movie_filename(&record, Some("mkv"), &cfg()),
            "Inception (2010) Part 2.mkv"
        );
    }

    #[test]
    fn destination_directories() {
        let record = episode(Some(2), vec![5], &[]);
        assert_eq!(tv_dirname(&record, &cfg()), PathBuf::from("Scrubs/Season 2"));

        let mut dated = episode(None, vec![], &[]);
        dated.numbers = EpisodeNumbers::Aired(NaiveDate::from_ymd_opt(2010, 1, 2).unwrap());
        assert_eq!(tv_dirname(&dated, &cfg()), PathBuf::from("Scrubs/2010"));

        let movie = MovieRecord {
            title: "Inception".into(),
            release_year: Some(2010),
            resolution: None,
            part: None,
            tags: BTreeSet::new(),
            genres: None,
            rating: None,
        };
        assert_eq!(movie_dirname(&movie, &cfg()), PathBuf::from("Inception (2010)"));
    }

    #[test]
    fn sanitize_hides_leading_dot_and_keeps_extension() {
        let opts = SanitizeOptions::default();
        assert_eq!(make_valid_filename(".hidden.mkv", false, &opts), "_hidden.mkv");
        assert_eq!(make_valid_filename("a/b.mkv", false, &opts), "a_b.mkv");
    }

    #[test]
    fn sanitize_is_idempotent() {
        let opts = SanitizeOptions {
            windows_safe: true,
            custom_blacklist: "&".into(),
            replace_with: "_".into(),
        };
        let once = make_valid_filename("What? A & B: c.mkv", false, &opts);
        assert_eq!(make_valid_filename(&once, false, &opts), once);
        assert_eq!(once, "What_ A _ B_ c.mkv");
    }

    #[test]
    fn sanitize_dodges_windows_reserved_names() {
        let opts = SanitizeOptions {
            windows_safe: true,
            ..SanitizeOptions::default()
        };
        assert_eq!(make_valid_filename("con.mkv", false, &opts), "con_.mkv");
    }

    #[test]
    fn sanitize_truncates_keeping_extension() {
        let opts = SanitizeOptions::default();
        let long = format!("{}.mkv", "x".repeat(300));
        let out = make_valid_filename(&long, false, &opts);
        assert_eq!(out.len(), 254);
        assert!(out.ends_with(".mkv"));
    }

    #[test]
    fn sanitize_clamps_oversized_extension() {
        let opts = SanitizeOptions::default();
        let long = format!("x.{}", "e".repeat(300));
        let out = make_valid_filename(&long, false, &opts);
        assert_eq!(out.len(), 254);
    }

    #[test]
    fn lowercase_option_applies_to_whole_name() {
        let record = episode(Some(1), vec![4], &["My Old Lady"]);
        let lower = NamerConfig { lowercase: true, ..cfg() };
        assert_eq!(
            tv_filename(&record, Some("AVI"), &lower),
            "scrubs - [01x04] - my old lady.avi"
        );
    }
}
