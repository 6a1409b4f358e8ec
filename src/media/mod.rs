pub mod movie;
pub mod tv;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What a filename is assumed to contain. `Auto` tries TV first and falls
/// back to movie when the TV side comes up empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Tv,
    Movie,
    Auto,
}

impl MediaType {
    /// The concrete kinds to attempt, in order.
    pub fn kinds(self) -> &'static [MediaKind] {
        match self {
            MediaType::Tv => &[MediaKind::Tv],
            MediaType::Movie => &[MediaKind::Movie],
            MediaType::Auto => &[MediaKind::Tv, MediaKind::Movie],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Tv,
    Movie,
}
