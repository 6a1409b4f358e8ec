//! Collects the files to process from the command-line paths: plain files
//! pass through, directories are scanned (optionally recursively), and the
//! extension whitelist and filename blacklist are applied to everything.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, warn};

use crate::error::Result;

#[derive(Debug, Clone, Default)]
pub struct FinderConfig {
    pub recursive: bool,
    /// Lowercase extensions without the dot; empty means accept everything.
    pub valid_extensions: Vec<String>,
    /// Plain substrings or `regex:`-prefixed patterns matched against the
    /// file stem (extension stripped); regexes are anchored to the start.
    pub filename_blacklist: Vec<String>,
}

impl FinderConfig {
    fn extension_ok(&self, path: &Path) -> bool {
        if self.valid_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| {
                let e = e.to_lowercase();
                self.valid_extensions.iter().any(|v| *v == e)
            })
            .unwrap_or(false)
    }

    fn blacklisted(&self, path: &Path) -> bool {
        let Some(stem) = path.file_stem().and_then(|n| n.to_str()) else {
            return true;
        };
        self.filename_blacklist.iter().any(|entry| {
            match entry.strip_prefix("regex:") {
                Some(pattern) => match Regex::new(&format!("^(?:{pattern})")) {
                    Ok(re) => re.is_match(stem),
                    Err(e) => {
                        warn!(pattern, error = %e, "skipping invalid blacklist regex");
                        false
                    }
                },
                None => stem.contains(entry.as_str()),
            }
        })
    }

    fn accepts(&self, path: &Path) -> bool {
        self.extension_ok(path) && !self.blacklisted(path)
    }
}

/// Expands the input paths into the sorted, deduplicated list of files to
/// process. The extension and blacklist filters apply to explicitly named
/// files and scanned directory entries alike.
pub fn find_files(paths: &[PathBuf], config: &FinderConfig) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    let mut push = |path: PathBuf| -> Result<()> {
        let abs = std::path::absolute(&path)?;
        if seen.insert(abs.clone()) {
            found.push(abs);
        }
        Ok(())
    };

    for path in paths {
        if path.is_dir() {
            collect_dir(path, config, &mut |p| push(p))?;
        } else if path.is_file() {
            if config.accepts(path) {
                push(path.clone())?;
            }
        } else {
            warn!(path = %path.display(), "no such file or directory, skipping");
        }
    }

    found.sort();
    debug!(count = found.len(), "files to process");
    Ok(found)
}

fn collect_dir(
    dir: &Path,
    config: &FinderConfig,
    push: &mut dyn FnMut(PathBuf) -> Result<()>,
) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if config.recursive {
                collect_dir(&path, config, push)?;
            }
        } else if config.accepts(&path) {
            push(path)?;
        }
    }
    Ok(())
}
