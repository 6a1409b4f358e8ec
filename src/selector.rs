//! Fuzzy candidate selection with per-run memoization.
//!
//! Candidates are ranked by a character-multiset similarity against the
//! query, low scorers are cut off relative to the best score, and whatever
//! ambiguity remains is handed to a pluggable resolver (interactive prompt,
//! best-match, or hard reject). A chosen candidate is remembered per query
//! so a season's worth of files asks the user at most once.

use std::collections::HashMap;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::error::{Error, Result};

const JUNK_CHARS: &str = " \t:-=_\\/,.'\"?";

/// Ratio of shared characters (as multisets, junk and case ignored) to total
/// length, in 0.0..=1.0. Two empty strings are identical.
pub fn similarity(a: &str, b: &str) -> f64 {
    let clean = |s: &str| -> Vec<char> {
        s.chars()
            .filter(|c| !JUNK_CHARS.contains(*c))
            .flat_map(|c| c.to_lowercase())
            .collect()
    };
    let a = clean(a);
    let b = clean(b);
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let mut counts: HashMap<char, i64> = HashMap::new();
    for c in &a {
        *counts.entry(*c).or_insert(0) += 1;
    }
    let mut matches = 0i64;
    for c in &b {
        let n = counts.entry(*c).or_insert(0);
        if *n > 0 {
            matches += 1;
        }
        *n -= 1;
    }
    2.0 * matches as f64 / (a.len() + b.len()) as f64
}

/// Decides between candidates that survived the similarity cutoff.
pub trait ResolveAmbiguous<T> {
    fn resolve(
        &self,
        query: &str,
        ranked: &[(T, f64)],
        name_of: &dyn Fn(&T) -> String,
    ) -> Result<T>;
}

/// Prompts on the terminal with the ranked list and match percentages.
pub struct ConsoleResolver;

impl<T: Clone> ResolveAmbiguous<T> for ConsoleResolver {
    fn resolve(
        &self,
        query: &str,
        ranked: &[(T, f64)],
        name_of: &dyn Fn(&T) -> String,
    ) -> Result<T> {
        println!("Multiple matches for {query:?}:");
        for (i, (candidate, score)) in ranked.iter().enumerate() {
            println!("  {}) {} ({:.0}% match)", i + 1, name_of(candidate), score * 100.0);
        }
        let mut editor = DefaultEditor::new()
            .map_err(|e| Error::DataUnavailable(format!("cannot read from terminal: {e}")))?;
        loop {
            let line = match editor.readline(&format!("Select [1-{}, q to skip]: ", ranked.len())) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    return Err(Error::UserAbort("selection cancelled".into()))
                }
                Err(e) => return Err(Error::DataUnavailable(format!("terminal error: {e}"))),
            };
            match line.trim() {
                "q" | "Q" => return Err(Error::UserAbort("quit at candidate selection".into())),
                "?" => {
                    for (i, (candidate, score)) in ranked.iter().enumerate() {
                        println!("  {}) {} ({:.0}% match)", i + 1, name_of(candidate), score * 100.0);
                    }
                }
                choice => match choice.parse::<usize>() {
                    Ok(n) if (1..=ranked.len()).contains(&n) => {
                        return Ok(ranked[n - 1].0.clone())
                    }
                    _ => println!("Enter a number between 1 and {}, or q.", ranked.len()),
                },
            }
        }
    }
}

/// Takes the top-ranked candidate without asking.
pub struct BestMatchResolver;

impl<T: Clone> ResolveAmbiguous<T> for BestMatchResolver {
    fn resolve(&self, _query: &str, ranked: &[(T, f64)], _name_of: &dyn Fn(&T) -> String) -> Result<T> {
        Ok(ranked[0].0.clone())
    }
}

/// Refuses to guess; ambiguity becomes an error the caller can skip on.
pub struct RejectResolver;

impl<T> ResolveAmbiguous<T> for RejectResolver {
    fn resolve(&self, query: &str, _ranked: &[(T, f64)], _name_of: &dyn Fn(&T) -> String) -> Result<T> {
        Err(Error::AmbiguousSelection {
            query: query.to_string(),
        })
    }
}

pub struct CandidateSelector<T> {
    history: HashMap<String, T>,
    fuzz_factor: f64,
    min_ratio: f64,
    select_first: bool,
    resolver: Box<dyn ResolveAmbiguous<T>>,
}

impl<T: Clone + PartialEq> CandidateSelector<T> {
    pub fn new(
        fuzz_factor: f64,
        min_ratio: f64,
        select_first: bool,
        resolver: Box<dyn ResolveAmbiguous<T>>,
    ) -> Self {
        Self {
            history: HashMap::new(),
            fuzz_factor,
            min_ratio,
            select_first,
            resolver,
        }
    }

    /// Non-interactive selector that always takes the best match.
    pub fn auto(fuzz_factor: f64, min_ratio: f64) -> Self {
        Self::new(fuzz_factor, min_ratio, false, Box::new(BestMatchResolver))
    }

    /// Picks one candidate for `query`, consulting the memo first. The memo
    /// only short-circuits when the remembered choice is still among the
    /// offered candidates.
    pub fn select(
        &mut self,
        query: &str,
        candidates: Vec<T>,
        name_of: &dyn Fn(&T) -> String,
    ) -> Result<T> {
        if candidates.is_empty() {
            return Err(Error::NoCandidates {
                query: query.to_string(),
            });
        }

        if let Some(previous) = self.history.get(query) {
            if candidates.contains(previous) {
                debug!(query, "reusing remembered selection");
                return Ok(previous.clone());
            }
        }

        let mut ranked: Vec<(T, f64)> = candidates
            .into_iter()
            .map(|c| {
                let score = similarity(query, &name_of(&c));
                (c, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let best = ranked[0].1;
        let cutoff = (best - self.fuzz_factor).max(self.min_ratio);
        ranked.retain(|(_, score)| *score > cutoff);

        let chosen = if ranked.is_empty() {
            return Err(Error::AmbiguousSelection {
                query: query.to_string(),
            });
        } else if ranked.len() == 1 || self.select_first {
            ranked[0].0.clone()
        } else {
            self.resolver.resolve(query, &ranked, name_of)?
        };

        self.history.insert(query.to_string(), chosen.clone());
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn similarity_ignores_junk_and_case() {
        assert_eq!(similarity("Show Name", "show.name"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert!(similarity("scrubs", "scrubs (2001)") > 0.65);
        assert!(similarity("abc", "xyz") < 0.01);
    }

    #[test]
    fn similarity_is_symmetric() {
        let a = similarity("the office", "The Office (US)");
        let b = similarity("The Office (US)", "the office");
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        let mut sel: CandidateSelector<String> = CandidateSelector::auto(0.25, 0.65);
        let err = sel.select("x", vec![], &|s| s.clone()).unwrap_err();
        assert!(matches!(err, Error::NoCandidates { .. }));
    }

    #[test]
    fn everything_below_min_ratio_is_ambiguous() {
        let mut sel = CandidateSelector::auto(0.25, 0.65);
        let err = sel
            .select("zzzzzz", vec!["aaaa".to_string(), "bbbb".to_string()], &|s| s.clone())
            .unwrap_err();
        assert!(matches!(err, Error::AmbiguousSelection { .. }));
    }

    #[test]
    fn single_survivor_needs_no_resolver() {
        let mut sel = CandidateSelector::new(0.25, 0.65, false, Box::new(RejectResolver));
        let picked = sel
            .select(
                "scrubs",
                vec!["Scrubs".to_string(), "Totally Unrelated".to_string()],
                &|s| s.clone(),
            )
            .unwrap();
        assert_eq!(picked, "Scrubs");
    }

    struct CountingResolver(Rc<Cell<usize>>);

    impl ResolveAmbiguous<String> for CountingResolver {
        fn resolve(
            &self,
            _query: &str,
            ranked: &[(String, f64)],
            _name_of: &dyn Fn(&String) -> String,
        ) -> Result<String> {
            self.0.set(self.0.get() + 1);
            Ok(ranked[1].0.clone())
        }
    }

    #[test]
    fn memo_prevents_a_second_prompt() {
        let calls = Rc::new(Cell::new(0));
        let mut sel = CandidateSelector::new(
            0.5,
            0.1,
            false,
            Box::new(CountingResolver(calls.clone())),
        );
        let candidates = vec!["show one".to_string(), "show two".to_string()];
        let first = sel.select("show", candidates.clone(), &|s| s.clone()).unwrap();
        let second = sel.select("show", candidates, &|s| s.clone()).unwrap();
        assert_eq!(first, "show two");
        assert_eq!(second, "show two");
        assert_eq!(calls.get(), 1);
    }

    struct AbortingResolver;

    impl ResolveAmbiguous<String> for AbortingResolver {
        fn resolve(
            &self,
            _query: &str,
            _ranked: &[(String, f64)],
            _name_of: &dyn Fn(&String) -> String,
        ) -> Result<String> {
            Err(Error::UserAbort("quit at candidate selection".into()))
        }
    }

    #[test]
    fn resolver_abort_propagates_and_is_not_memoized() {
        let mut sel = CandidateSelector::new(0.5, 0.1, false, Box::new(AbortingResolver));
        let candidates = vec!["show one".to_string(), "show two".to_string()];
        let err = sel.select("show", candidates.clone(), &|s| s.clone()).unwrap_err();
        assert!(matches!(err, Error::UserAbort(_)));
        // A second attempt must not find a remembered choice.
        let err = sel.select("show", candidates, &|s| s.clone()).unwrap_err();
        assert!(matches!(err, Error::UserAbort(_)));
    }

    #[test]
    fn memo_ignored_when_choice_not_offered() {
        let calls = Rc::new(Cell::new(0));
        let mut sel = CandidateSelector::new(
            0.5,
            0.1,
            false,
            Box::new(CountingResolver(calls.clone())),
        );
        sel.select(
            "show",
            vec!["show one".to_string(), "show two".to_string()],
            &|s| s.clone(),
        )
        .unwrap();
        sel.select(
            "show",
            vec!["show three".to_string(), "show four".to_string()],
            &|s| s.clone(),
        )
        .unwrap();
        assert_eq!(calls.get(), 2);
    }
}
