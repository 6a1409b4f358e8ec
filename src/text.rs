//! Small text helpers: name cleanup, year heuristics, spelled-out numbers,
//! episode-name joining, and configured find/replace lists.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A configured substitution, either plain or regex-based.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Replacement {
    #[serde(rename = "match")]
    pub find: String,
    pub replacement: String,
    #[serde(default)]
    pub is_regex: bool,
}

/// Applies an ordered substitution list to a string.
pub fn apply_replacements(input: &str, replacements: &[Replacement]) -> String {
    let mut out = input.to_string();
    for rep in replacements {
        if rep.is_regex {
            match Regex::new(&rep.find) {
                Ok(re) => out = re.replace_all(&out, rep.replacement.as_str()).into_owned(),
                Err(e) => warn!(pattern = %rep.find, error = %e, "skipping invalid replacement regex"),
            }
        } else {
            out = out.replace(&rep.find, &rep.replacement);
        }
    }
    out
}

/// Regex substitutions applied to a parsed name before it is sent to the
/// metadata provider (e.g. expanding abbreviations the catalog won't know).
pub fn replace_input_name(name: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut out = name.to_string();
    for (pattern, replacement) in replacements {
        match Regex::new(pattern) {
            Ok(re) => out = re.replace_all(&out, replacement.as_str()).into_owned(),
            Err(e) => warn!(pattern = %pattern, error = %e, "skipping invalid name replacement"),
        }
    }
    out
}

/// Exact-match rewrites of canonical provider names (these are perfectly
/// predictable, so plain strings rather than regexes).
pub fn replace_output_name(name: &str, replacements: &BTreeMap<String, String>) -> String {
    replacements.get(name).cloned().unwrap_or_else(|| name.to_string())
}

/// Cleans a regex-captured name by turning `.` and `_` separators into
/// spaces while leaving decimal numbers intact, and stripping trailing
/// hyphens and whitespace.
///
/// "an.example.1.0.test" becomes "an example 1.0 test".
pub fn clean_regexed_name(name: &str) -> String {
    let name = Regex::new(r"(\D)[.](\D)").unwrap().replace_all(name, "$1 $2");
    let name = Regex::new(r"(\D)[.]").unwrap().replace_all(&name, "$1 ");
    let name = Regex::new(r"[.](\D)").unwrap().replace_all(&name, " $1");
    let name = name.replace('_', " ");
    let name = name.trim();
    let name = name.strip_suffix('-').unwrap_or(name);
    name.trim().to_string()
}

/// Two-digit year heuristic: 0-49 maps to 2000-2049, 50-99 to 1950-1999,
/// four-digit years pass through.
pub fn handle_year(year: i32) -> i32 {
    if year >= 1000 {
        year
    } else if year < 50 {
        2000 + year
    } else {
        1900 + year
    }
}

const UNIT_WORDS: &[(&str, u64)] = &[
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fourty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

const MULTIPLIER_WORDS: &[(&str, u64)] = &[
    ("hundred", 100),
    ("thousand", 1_000),
    ("million", 1_000_000),
    ("billion", 1_000_000_000),
    ("trillion", 1_000_000_000_000),
];

/// Alternation of every recognized number word, for embedding in patterns.
pub fn number_word_pattern() -> String {
    UNIT_WORDS
        .iter()
        .chain(MULTIPLIER_WORDS.iter())
        .map(|(w, _)| *w)
        .collect::<Vec<_>>()
        .join("|")
}

/// Parses spelled-out numbers: plain words below one hundred add into the
/// running value, hundred/thousand/... multiply it and flush into the total.
/// Returns None on any unrecognized word.
pub fn words_to_number(words: &[&str]) -> Option<u64> {
    let mut total = 0u64;
    let mut current = 0u64;
    for word in words {
        let word = word.to_lowercase();
        if let Some((_, v)) = UNIT_WORDS.iter().find(|(w, _)| *w == word) {
            current += v;
        } else if let Some((_, m)) = MULTIPLIER_WORDS.iter().find(|(w, _)| *w == word) {
            current = if current == 0 { *m } else { current * m };
            total += current;
            current = 0;
        } else {
            return None;
        }
    }
    Some(total + current)
}

/// Joins episode titles. "Pilot (1)" and "Pilot (2)" collapse to
/// "Pilot (1-2)"; anything else joins verbatim with the separator.
pub fn format_episode_name(names: &[String], join_with: &str) -> String {
    match names.len() {
        0 => return String::new(),
        1 => return names[0].clone(),
        _ => {}
    }

    let numbered = Regex::new(r"(.*) \(([0-9]+)\)$").unwrap();
    let mut prefix: Option<&str> = None;
    let mut numbers = Vec::new();
    for name in names {
        let Some(caps) = numbered.captures(name) else {
            return names.join(join_with);
        };
        let base = caps.get(1).unwrap().as_str();
        let Ok(number) = caps[2].parse::<u32>() else {
            return names.join(join_with);
        };
        if let Some(prev) = prefix {
            if prev != base {
                return names.join(join_with);
            }
        }
        prefix = Some(base);
        numbers.push(number);
    }

    let start = numbers.iter().min().unwrap();
    let end = numbers.iter().max().unwrap();
    format!("{} ({}-{})", prefix.unwrap(), start, end)
}

/// Formats episode numbers zero-padded to two digits, joined with the
/// configured separator.
pub fn format_episode_numbers(numbers: &[u32], separator: &str) -> String {
    numbers
        .iter()
        .map(|n| format!("{n:02}"))
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_name_preserves_decimal_numbers() {
        assert_eq!(clean_regexed_name("an.example.1.0.test"), "an example 1.0 test");
        assert_eq!(clean_regexed_name("an_example_1.0_test"), "an example 1.0 test");
        assert_eq!(clean_regexed_name("Show.Name"), "Show Name");
    }

    #[test]
    fn clean_name_strips_trailing_hyphen() {
        assert_eq!(clean_regexed_name("Show Name -"), "Show Name");
        assert_eq!(clean_regexed_name("Show Name-"), "Show Name");
    }

    #[test]
    fn handle_year_is_idempotent() {
        assert_eq!(handle_year(2005), 2005);
        assert_eq!(handle_year(handle_year(5)), 2005);
        assert_eq!(handle_year(5), 2005);
        assert_eq!(handle_year(85), 1985);
        assert_eq!(handle_year(49), 2049);
        assert_eq!(handle_year(50), 1950);
    }

    #[test]
    fn spelled_numbers() {
        assert_eq!(words_to_number(&["three"]), Some(3));
        assert_eq!(words_to_number(&["twenty", "one"]), Some(21));
        assert_eq!(words_to_number(&["one", "hundred", "five"]), Some(105));
        assert_eq!(words_to_number(&["two", "thousand"]), Some(2000));
        assert_eq!(words_to_number(&["bogus"]), None);
    }

    #[test]
    fn joins_numbered_episode_names() {
        let names = vec!["Pilot (1)".to_string(), "Pilot (2)".to_string()];
        assert_eq!(format_episode_name(&names, ", "), "Pilot (1-2)");
    }

    #[test]
    fn joins_distinct_names_verbatim() {
        let names = vec!["The First".to_string(), "Something Else".to_string()];
        assert_eq!(format_episode_name(&names, ", "), "The First, Something Else");
    }

    #[test]
    fn formats_episode_numbers() {
        assert_eq!(format_episode_numbers(&[5], ","), "05");
        assert_eq!(format_episode_numbers(&[1, 2, 3], ","), "01,02,03");
    }

    #[test]
    fn replacements_plain_and_regex() {
        let reps = vec![
            Replacement {
                find: "with space".into(),
                replacement: "with.space".into(),
                is_regex: false,
            },
            Replacement {
                find: r"\[[^\]]*\]".into(),
                replacement: "".into(),
                is_regex: true,
            },
        ];
        assert_eq!(apply_replacements("a with space [junk] b", &reps), "a with.space  b");
    }
}
