//! The per-file pipeline: parse the name, resolve it against the right
//! provider, build the new name, confirm, then rename or move.

use std::path::{Path, PathBuf};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::media::movie::{self, MovieRecord};
use crate::media::tv::{self, EpisodeRecord};
use crate::media::MediaKind;
use crate::metadata::tmdb::TmdbClient;
use crate::metadata::tvdb::TvdbClient;
use crate::metadata::Candidate;
use crate::namer::{self, NamerConfig};
use crate::parser::PatternParser;
use crate::renamer::{self, Destination};
use crate::selector::{
    BestMatchResolver, CandidateSelector, ConsoleResolver, ResolveAmbiguous,
};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Renamed(PathBuf),
    Skipped,
    Unchanged,
}

pub struct Workflow {
    config: Config,
    namer_config: NamerConfig,
    tv_parser: PatternParser,
    movie_parser: PatternParser,
    tvdb: Option<TvdbClient>,
    tmdb: Option<TmdbClient>,
    tv_selector: CandidateSelector<Candidate>,
    movie_selector: CandidateSelector<Candidate>,
    /// Set for the rest of the run when the user answers 'a'.
    rename_all: bool,
}

fn make_selector(config: &Config) -> CandidateSelector<Candidate> {
    let resolver: Box<dyn ResolveAmbiguous<Candidate>> = if config.select_first {
        Box::new(BestMatchResolver)
    } else {
        Box::new(ConsoleResolver)
    };
    CandidateSelector::new(
        config.fuzz_factor,
        config.min_ratio,
        config.select_first,
        resolver,
    )
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        let tv_parser = PatternParser::tv(&config.input_filename_replacements);
        let movie_parser = PatternParser::movie(&config.input_filename_replacements);
        Self {
            namer_config: config.namer_config(),
            tv_selector: make_selector(&config),
            movie_selector: make_selector(&config),
            tv_parser,
            movie_parser,
            tvdb: None,
            tmdb: None,
            rename_all: false,
            config,
        }
    }

    /// Processes one file, trying each media kind in configured order. A
    /// not-found error from one kind falls through to the next; the last
    /// one is reported when every kind fails.
    pub fn process(&mut self, path: &Path) -> Result<Outcome> {
        let kinds = self.config.media_type.kinds();
        let mut last_err = None;
        for &kind in kinds {
            match self.process_as(path, kind) {
                Err(e) if e.is_not_found() => {
                    debug!(path = %path.display(), ?kind, error = %e, "no match for kind");
                    last_err = Some(e);
                }
                other => return other,
            }
        }
        Err(last_err.unwrap_or_else(|| {
            Error::InvalidArguments("no media types configured".into())
        }))
    }

    fn process_as(&mut self, path: &Path, kind: MediaKind) -> Result<Outcome> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::InvalidArguments(format!("unreadable path {path:?}")))?;
        let extension = path.extension().and_then(|e| e.to_str());

        let (new_name, dest_dir) = match kind {
            MediaKind::Tv => {
                let record = self.resolve_tv(stem)?;
                let name = namer::tv_filename(&record, extension, &self.namer_config);
                let dir = self
                    .config
                    .tv_destination
                    .join(namer::tv_dirname(&record, &self.namer_config));
                (name, dir)
            }
            MediaKind::Movie => {
                let record = self.resolve_movie(stem)?;
                let name = namer::movie_filename(&record, extension, &self.namer_config);
                let dir = self
                    .config
                    .movie_destination
                    .join(namer::movie_dirname(&record, &self.namer_config));
                (name, dir)
            }
        };

        // Sorting without renaming keeps the original file name.
        let new_name = if self.config.move_files_only {
            path.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(&new_name)
                .to_string()
        } else {
            new_name
        };

        let current_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if !self.config.move_files_enable && new_name == current_name {
            println!("{current_name:?} is already named correctly");
            return Ok(Outcome::Unchanged);
        }

        if self.config.move_files_enable {
            self.move_file(path, &dest_dir, &new_name)
        } else {
            self.rename_file(path, &new_name)
        }
    }

    fn resolve_tv(&mut self, stem: &str) -> Result<EpisodeRecord> {
        let fields = self.tv_parser.parse(stem)?;
        let mut record = EpisodeRecord::from_match(&fields, &self.config.input_name_replacements)?;
        if self.tvdb.is_none() {
            self.tvdb = Some(TvdbClient::new(self.config.tvdb_api_key()?));
        }
        let opts = tv::PopulateOptions {
            forced_name: self.config.force_name.as_deref(),
            forced_id: self.config.force_id,
            language: &self.config.language,
            multiep_join: &self.config.multiep_join_name_with,
        };
        tv::populate(
            &mut record,
            self.tvdb.as_ref().unwrap(),
            &mut self.tv_selector,
            &opts,
        )?;
        Ok(record)
    }

    fn resolve_movie(&mut self, stem: &str) -> Result<MovieRecord> {
        let fields = self.movie_parser.parse(stem)?;
        let mut record = MovieRecord::from_match(&fields, &self.config.input_name_replacements)?;
        if self.tmdb.is_none() {
            self.tmdb = Some(TmdbClient::new(self.config.tmdb_api_key()?));
        }
        let opts = movie::PopulateOptions {
            forced_name: self.config.force_name.as_deref(),
            forced_id: self.config.force_id,
            language: &self.config.language,
            genre_separator: &self.config.genre_separator,
        };
        movie::populate(
            &mut record,
            self.tmdb.as_ref().unwrap(),
            &mut self.movie_selector,
            &self.config.output_name_replacements,
            &opts,
        )?;
        Ok(record)
    }

    fn rename_file(&mut self, path: &Path, new_name: &str) -> Result<Outcome> {
        println!("Renaming {} to {new_name:?}", path.display());
        if !self.confirm()? {
            println!("Skipping {}", path.display());
            return Ok(Outcome::Skipped);
        }
        let new_path = renamer::rename_in_place(
            path,
            new_name,
            self.config.overwrite_destination_on_rename,
            self.config.dry_run,
        )?;
        Ok(Outcome::Renamed(new_path))
    }

    fn move_file(&mut self, path: &Path, dest_dir: &Path, new_name: &str) -> Result<Outcome> {
        let mut dest_dir = dest_dir.to_path_buf();
        if self.config.move_files_lowercase_destination {
            dest_dir = PathBuf::from(dest_dir.to_string_lossy().to_lowercase());
        }
        let full = dest_dir.join(new_name);
        let full = PathBuf::from(namer::apply_fullpath_replacements(
            &full.to_string_lossy(),
            &self.config.move_files_fullpath_replacements,
        ));

        println!("Moving {} to {}", path.display(), full.display());
        if !self.confirm()? {
            println!("Skipping {}", path.display());
            return Ok(Outcome::Skipped);
        }
        let new_path = renamer::relocate(
            path,
            Destination::FullPath(&full),
            &self.config.move_options(),
        )?;
        Ok(Outcome::Renamed(new_path))
    }

    /// Per-file y/n/a/q confirmation. 'a' stops asking for the rest of the
    /// run, 'q' aborts it. Dry runs never prompt.
    fn confirm(&mut self) -> Result<bool> {
        if self.config.always_rename || self.rename_all || self.config.dry_run {
            return Ok(true);
        }
        let mut editor = DefaultEditor::new()
            .map_err(|e| Error::DataUnavailable(format!("cannot read from terminal: {e}")))?;
        loop {
            let line = match editor.readline("Proceed? ([y]/n/a/q): ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                    return Err(Error::UserAbort("cancelled".into()))
                }
                Err(e) => return Err(Error::DataUnavailable(format!("terminal error: {e}"))),
            };
            match line.trim() {
                "" | "y" | "Y" => return Ok(true),
                "n" | "N" => return Ok(false),
                "a" | "A" => {
                    self.rename_all = true;
                    return Ok(true);
                }
                "q" | "Q" => return Err(Error::UserAbort("quit at prompt".into())),
                _ => println!("Answer y, n, a (always), or q (quit)."),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn workflow(config: Config) -> Workflow {
        Workflow::new(config)
    }

    #[test]
    fn unparseable_file_surfaces_as_not_found() {
        let mut wf = workflow(Config {
            media_type: crate::media::MediaType::Tv,
            always_rename: true,
            ..Config::default()
        });
        let err = wf.process(Path::new("]][[.mkv")).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, Error::NoPatternMatched { .. }));
    }

    #[test]
    fn move_files_only_keeps_original_name() {
        let config = Config {
            move_files_enable: true,
            move_files_only: true,
            ..Config::default()
        };
        let wf = workflow(config);
        assert!(wf.config.move_files_only);
    }

    #[test]
    fn dry_run_never_touches_the_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("already.mkv");
        fs::write(&src, b"x").unwrap();
        let mut wf = workflow(Config {
            dry_run: true,
            always_rename: true,
            ..Config::default()
        });
        let outcome = wf.rename_file(&src, "other.mkv").unwrap();
        assert_eq!(outcome, Outcome::Renamed(dir.path().join("other.mkv")));
        assert!(src.exists());
        assert!(!dir.path().join("other.mkv").exists());
    }
}
