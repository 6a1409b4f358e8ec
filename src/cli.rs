use std::path::PathBuf;

use clap::Parser;

use crate::media::MediaType;

#[derive(Debug, Parser)]
#[command(name = "videonamer")]
#[command(about = "Rename and sort TV episodes and movies using metadata from TheTVDB and TMDB")]
pub struct Cli {
    /// Input files or directories to process
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// What the files contain: tv, movie, or auto to try both
    #[arg(short = 't', long = "type", value_enum)]
    pub media_type: Option<MediaType>,

    /// Path to a config file (default: $XDG_CONFIG_HOME/videonamer/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Never prompt: take the best match and rename without asking
    #[arg(short, long)]
    pub batch: bool,

    /// Always take the best-matching search result
    #[arg(long)]
    pub select_first: bool,

    /// Rename without the per-file confirmation prompt
    #[arg(long)]
    pub always_rename: bool,

    /// Show what would happen without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Recursively scan directories
    #[arg(short, long)]
    pub recursive: bool,

    /// Use this series or movie name instead of the parsed one
    #[arg(long)]
    pub force_name: Option<String>,

    /// Skip the search and use this provider ID directly
    #[arg(long)]
    pub force_id: Option<u64>,

    /// Move files to their destination directory after renaming
    #[arg(long)]
    pub move_files: bool,

    /// Overwrite existing destination files
    #[arg(long)]
    pub overwrite: bool,

    /// Log debug detail to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requires_at_least_one_input() {
        assert!(Cli::try_parse_from(["videonamer"]).is_err());
        assert!(Cli::try_parse_from(["videonamer", "file.avi"]).is_ok());
    }

    #[test]
    fn media_type_flag_parses() {
        let cli = Cli::try_parse_from(["videonamer", "-t", "movie", "file.avi"]).unwrap();
        assert_eq!(cli.media_type, Some(MediaType::Movie));
    }
}
