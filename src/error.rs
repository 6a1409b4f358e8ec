//! Error types shared across the pipeline.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot parse {normalized:?}{}", original_suffix(.original))]
    NoPatternMatched {
        normalized: String,
        /// Set only when input replacements changed the name before matching.
        original: Option<String>,
    },

    #[error("invalid pattern match: {0}")]
    InvalidPattern(String),

    #[error("show {0:?} not found")]
    ShowNotFound(String),

    #[error("movie {0:?} not found")]
    MovieNotFound(String),

    #[error("season {season} of show {series:?} could not be found")]
    SeasonNotFound { season: u32, series: String },

    #[error("{0}")]
    EpisodeNotFound(String),

    #[error("could not find episode name for {0}")]
    EpisodeNameNotFound(String),

    #[error("error contacting metadata provider: {0}")]
    DataUnavailable(String),

    #[error("no search result is a good enough match for {query:?}")]
    AmbiguousSelection { query: String },

    #[error("no candidates found for {query:?}")]
    NoCandidates { query: String },

    #[error("destination {path:?} already exists, not overwriting")]
    DestinationExists { path: PathBuf },

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error("user aborted ({0})")]
    UserAbort(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn original_suffix(original: &Option<String>) -> String {
    match original {
        Some(name) => format!(" (originally: {name:?})"),
        None => String::new(),
    }
}

impl Error {
    /// Failures that mean "this file is not that kind of media, or the
    /// catalog has nothing for it"; the driving loop tries the next media
    /// type and then skips the file.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NoPatternMatched { .. }
                | Error::InvalidPattern(_)
                | Error::ShowNotFound(_)
                | Error::MovieNotFound(_)
                | Error::SeasonNotFound { .. }
                | Error::EpisodeNotFound(_)
                | Error::EpisodeNameNotFound(_)
        )
    }
}
