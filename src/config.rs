//! Configuration: built-in defaults, overridden by an optional TOML file,
//! overridden by command-line flags. API keys additionally fall back to
//! environment variables.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::finder::FinderConfig;
use crate::media::MediaType;
use crate::namer::{MultiEpFormat, NamerConfig, SanitizeOptions};
use crate::renamer::MoveOptions;
use crate::text::Replacement;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub media_type: MediaType,
    pub language: String,

    // Selection behavior
    pub select_first: bool,
    pub always_rename: bool,
    pub batch: bool,
    pub dry_run: bool,
    pub skip_file_on_error: bool,
    pub fail_on_data_unavailable: bool,
    pub fuzz_factor: f64,
    pub min_ratio: f64,
    pub force_name: Option<String>,
    pub force_id: Option<u64>,

    // File discovery
    pub recursive: bool,
    pub valid_extensions: Vec<String>,
    pub filename_blacklist: Vec<String>,

    // Output names
    pub lowercase_filename: bool,
    pub windows_safe_filenames: bool,
    pub custom_filename_character_blacklist: String,
    pub replace_invalid_characters_with: String,
    pub multiep_range_format: bool,
    pub multiep_join_name_with: String,
    pub episode_separator: String,
    pub genre_separator: String,
    pub input_filename_replacements: Vec<Replacement>,
    pub input_name_replacements: BTreeMap<String, String>,
    pub output_name_replacements: BTreeMap<String, String>,

    // Renaming and moving
    pub overwrite_destination_on_rename: bool,
    pub overwrite_destination_on_move: bool,
    pub move_files_enable: bool,
    pub move_files_only: bool,
    pub move_files_lowercase_destination: bool,
    pub move_files_fullpath_replacements: BTreeMap<String, String>,
    pub always_move: bool,
    pub always_copy: bool,
    pub tv_destination: PathBuf,
    pub movie_destination: PathBuf,

    // Providers
    pub tvdb_api_key: Option<String>,
    pub tmdb_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media_type: MediaType::Auto,
            language: "en".into(),
            select_first: false,
            always_rename: false,
            batch: false,
            dry_run: false,
            skip_file_on_error: true,
            fail_on_data_unavailable: false,
            fuzz_factor: 0.25,
            min_ratio: 0.65,
            force_name: None,
            force_id: None,
            recursive: false,
            valid_extensions: ["avi", "mkv", "mp4", "m4v", "mpg", "mpeg", "mov", "wmv", "ts"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            filename_blacklist: Vec::new(),
            lowercase_filename: false,
            windows_safe_filenames: false,
            custom_filename_character_blacklist: String::new(),
            replace_invalid_characters_with: "_".into(),
            multiep_range_format: false,
            multiep_join_name_with: ", ".into(),
            episode_separator: ",".into(),
            genre_separator: ", ".into(),
            input_filename_replacements: Vec::new(),
            input_name_replacements: BTreeMap::new(),
            output_name_replacements: BTreeMap::new(),
            overwrite_destination_on_rename: false,
            overwrite_destination_on_move: false,
            move_files_enable: false,
            move_files_only: false,
            move_files_lowercase_destination: false,
            move_files_fullpath_replacements: BTreeMap::new(),
            always_move: false,
            always_copy: false,
            tv_destination: PathBuf::from("."),
            movie_destination: PathBuf::from("."),
            tvdb_api_key: None,
            tmdb_api_key: None,
        }
    }
}

fn default_config_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("videonamer"))
        // If the standard path could not be found (e.g. `$HOME` is not
        // set), default to the current directory.
        .unwrap_or_default()
        .join("config.toml")
}

impl Config {
    /// Loads the config file (explicit path, or the default location if it
    /// exists), then layers the command-line flags on top.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::from_file(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::InvalidArguments(format!("{}: {e}", path.display())))
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(media_type) = cli.media_type {
            self.media_type = media_type;
        }
        self.batch |= cli.batch;
        self.select_first |= cli.select_first;
        self.always_rename |= cli.always_rename;
        self.dry_run |= cli.dry_run;
        self.recursive |= cli.recursive;
        self.move_files_enable |= cli.move_files;
        if cli.overwrite {
            self.overwrite_destination_on_rename = true;
            self.overwrite_destination_on_move = true;
        }
        if cli.force_name.is_some() {
            self.force_name = cli.force_name.clone();
        }
        if cli.force_id.is_some() {
            self.force_id = cli.force_id;
        }
        // Batch mode is exactly "never stop to ask".
        if self.batch {
            self.select_first = true;
            self.always_rename = true;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.move_files_only && !self.move_files_enable {
            return Err(Error::InvalidArguments(
                "move_files_only requires move_files_enable".into(),
            ));
        }
        if self.always_copy && self.always_move {
            return Err(Error::InvalidArguments(
                "always_copy and always_move are mutually exclusive".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.fuzz_factor) || !(0.0..=1.0).contains(&self.min_ratio) {
            return Err(Error::InvalidArguments(
                "fuzz_factor and min_ratio must be between 0 and 1".into(),
            ));
        }
        Ok(())
    }

    pub fn tvdb_api_key(&self) -> Result<String> {
        self.tvdb_api_key
            .clone()
            .or_else(|| env::var("TVDB_API_KEY").ok())
            .ok_or_else(|| {
                Error::InvalidArguments(
                    "TVDB API key not found. Set TVDB_API_KEY or put tvdb_api_key in the config file"
                        .into(),
                )
            })
    }

    pub fn tmdb_api_key(&self) -> Result<String> {
        self.tmdb_api_key
            .clone()
            .or_else(|| env::var("TMDB_API_KEY").ok())
            .ok_or_else(|| {
                Error::InvalidArguments(
                    "TMDB API key not found. Set TMDB_API_KEY or put tmdb_api_key in the config file"
                        .into(),
                )
            })
    }

    pub fn finder_config(&self) -> FinderConfig {
        FinderConfig {
            recursive: self.recursive,
            valid_extensions: self.valid_extensions.iter().map(|e| e.to_lowercase()).collect(),
            filename_blacklist: self.filename_blacklist.clone(),
        }
    }

    pub fn sanitize_options(&self) -> SanitizeOptions {
        SanitizeOptions {
            windows_safe: self.windows_safe_filenames,
            custom_blacklist: self.custom_filename_character_blacklist.clone(),
            replace_with: self.replace_invalid_characters_with.clone(),
        }
    }

    pub fn namer_config(&self) -> NamerConfig {
        NamerConfig {
            lowercase: self.lowercase_filename,
            multiep_format: if self.multiep_range_format {
                MultiEpFormat::Range
            } else {
                MultiEpFormat::Joined
            },
            episode_separator: self.episode_separator.clone(),
            multiep_join: self.multiep_join_name_with.clone(),
            output_replacements: self.output_name_replacements.clone(),
            sanitize: self.sanitize_options(),
        }
    }

    pub fn move_options(&self) -> MoveOptions {
        MoveOptions {
            force: self.overwrite_destination_on_move,
            always_copy: self.always_copy,
            always_move: self.always_move,
            create_dirs: true,
            dry_run: self.dry_run,
        }
    }
}
