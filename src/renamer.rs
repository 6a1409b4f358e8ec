//! Filesystem side of the job: renaming a file in place, or relocating it
//! to a destination directory or exact path, falling back to copy when the
//! destination is on another volume.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default)]
pub struct MoveOptions {
    /// Overwrite an existing destination.
    pub force: bool,
    /// Copy even within the same volume, leaving the source behind.
    pub always_copy: bool,
    /// Delete the source after a cross-volume copy.
    pub always_move: bool,
    pub create_dirs: bool,
    pub dry_run: bool,
}

/// Where a relocation ends up: a directory keeping the current file name,
/// or a complete target path.
#[derive(Debug, Clone, Copy)]
pub enum Destination<'a> {
    Dir(&'a Path),
    FullPath(&'a Path),
}

/// Renames `path` within its own directory. Returns the new path; in dry-run
/// mode nothing is touched but the existing-destination check still applies.
pub fn rename_in_place(path: &Path, new_name: &str, force: bool, dry_run: bool) -> Result<PathBuf> {
    let path = std::path::absolute(path)?;
    let new_path = path.with_file_name(new_name);

    if new_path != path && new_path.exists() && !force {
        return Err(Error::DestinationExists { path: new_path });
    }
    if dry_run {
        info!(from = %path.display(), to = %new_path.display(), "dry run, not renaming");
        return Ok(new_path);
    }

    fs::rename(&path, &new_path)?;
    debug!(from = %path.display(), to = %new_path.display(), "renamed");
    Ok(new_path)
}

/// Moves `path` to `dest`. A relative destination is resolved against the
/// source file's directory. Within one volume this is a rename; across
/// volumes the file is copied and the source only removed when
/// `always_move` is set.
pub fn relocate(path: &Path, dest: Destination<'_>, opts: &MoveOptions) -> Result<PathBuf> {
    if opts.always_copy && opts.always_move {
        return Err(Error::InvalidArguments(
            "always_copy and always_move are mutually exclusive".into(),
        ));
    }

    let path = std::path::absolute(path)?;
    let old_dir = path.parent().unwrap_or(Path::new("/"));
    let new_path = match dest {
        // Path::join replaces entirely when the argument is absolute, which
        // is exactly the resolution we want for both destination kinds.
        Dir(dir) => old_dir.join(dir).join(path.file_name().unwrap_or_default()),
        FullPath(full) => old_dir.join(full),
    };

    if opts.dry_run {
        info!(from = %path.display(), to = %new_path.display(), "dry run, not moving");
        return Ok(new_path);
    }

    if let Some(parent) = new_path.parent() {
        if opts.create_dirs && !parent.is_dir() {
            debug!(dir = %parent.display(), "creating destination directory");
            fs::create_dir_all(parent)?;
        }
    }

    if new_path != path && new_path.exists() && !opts.force {
        return Err(Error::DestinationExists { path: new_path });
    }

    if same_volume(&path, &new_path)? && !opts.always_copy {
        fs::rename(&path, &new_path)?;
        debug!(from = %path.display(), to = %new_path.display(), "moved");
    } else {
        fs::copy(&path, &new_path)?;
        debug!(from = %path.display(), to = %new_path.display(), "copied");
        if opts.always_move {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "removed source after copy");
        }
    }
    Ok(new_path)
}

use Destination::{Dir, FullPath};

#[cfg(unix)]
fn same_volume(a: &Path, b: &Path) -> Result<bool> {
    use std::os::unix::fs::MetadataExt;
    let dev_of = |p: &Path| -> Result<u64> {
        // The target itself may not exist yet; its parent must.
        let probe = if p.exists() {
            p.to_path_buf()
        } else {
            p.parent().map(Path::to_path_buf).unwrap_or_default()
        };
        Ok(fs::metadata(probe)?.dev())
    };
    Ok(dev_of(a)? == dev_of(b)?)
}

#[cfg(not(unix))]
fn same_volume(a: &Path, b: &Path) -> Result<bool> {
    // Best effort off unix: compare the drive prefix.
    let root = |p: &Path| p.components().next().map(|c| c.as_os_str().to_owned());
    Ok(root(a) == root(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"contents").unwrap();
        path
    }

    #[test]
    fn renames_within_directory() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "old.mkv");
        let new = rename_in_place(&src, "new.mkv", false, false).unwrap();
        assert!(!src.exists());
        assert_eq!(new, dir.path().join("new.mkv"));
        assert!(new.exists());
    }

    #[test]
    fn rename_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "old.mkv");
        touch(&dir, "taken.mkv");
        let err = rename_in_place(&src, "taken.mkv", false, false).unwrap_err();
        assert!(matches!(err, Error::DestinationExists { .. }));
        assert!(src.exists(), "source must survive a refused rename");
    }

    #[test]
    fn rename_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "old.mkv");
        touch(&dir, "taken.mkv");
        rename_in_place(&src, "taken.mkv", true, false).unwrap();
        assert!(!src.exists());
    }

    #[test]
    fn dry_run_checks_but_does_not_rename() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "old.mkv");
        touch(&dir, "taken.mkv");
        let err = rename_in_place(&src, "taken.mkv", false, true).unwrap_err();
        assert!(matches!(err, Error::DestinationExists { .. }));
        let new = rename_in_place(&src, "fresh.mkv", false, true).unwrap();
        assert!(src.exists());
        assert!(!new.exists());
    }

    #[test]
    fn relocates_into_subdirectory() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let dest = dir.path().join("Show/Season 1");
        let opts = MoveOptions {
            create_dirs: true,
            ..MoveOptions::default()
        };
        let new = relocate(&src, Destination::Dir(&dest), &opts).unwrap();
        assert_eq!(new, dest.join("file.mkv"));
        assert!(new.exists());
        assert!(!src.exists());
    }

    #[test]
    fn relative_destination_resolves_against_source_dir() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let opts = MoveOptions {
            create_dirs: true,
            ..MoveOptions::default()
        };
        let new = relocate(&src, Destination::Dir(Path::new("sorted")), &opts).unwrap();
        assert_eq!(new, dir.path().join("sorted/file.mkv"));
        assert!(new.exists());
    }

    #[test]
    fn full_path_destination_renames_too() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let opts = MoveOptions {
            create_dirs: true,
            ..MoveOptions::default()
        };
        let new = relocate(
            &src,
            Destination::FullPath(Path::new("out/renamed.mkv")),
            &opts,
        )
        .unwrap();
        assert_eq!(new, dir.path().join("out/renamed.mkv"));
        assert!(new.exists());
    }

    #[test]
    fn always_copy_keeps_the_source() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let opts = MoveOptions {
            always_copy: true,
            create_dirs: true,
            ..MoveOptions::default()
        };
        let new = relocate(&src, Destination::Dir(Path::new("copies")), &opts).unwrap();
        assert!(src.exists());
        assert!(new.exists());
        assert_eq!(fs::read(&src).unwrap(), fs::read(&new).unwrap());
    }

    #[test]
    fn copy_and_move_together_are_rejected() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let opts = MoveOptions {
            always_copy: true,
            always_move: true,
            ..MoveOptions::default()
        };
        let err = relocate(&src, Destination::Dir(dir.path()), &opts).unwrap_err();
        assert!(matches!(err, Error::InvalidArguments(_)));
    }

    #[test]
    fn relocate_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let sub = dir.path().join("dest");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("file.mkv"), b"other").unwrap();
        let err = relocate(&src, Destination::Dir(&sub), &MoveOptions::default()).unwrap_err();
        assert!(matches!(err, Error::DestinationExists { .. }));
        assert!(src.exists());
    }

    #[test]
    fn dry_run_returns_computed_path_without_moving() {
        let dir = TempDir::new().unwrap();
        let src = touch(&dir, "file.mkv");
        let opts = MoveOptions {
            dry_run: true,
            create_dirs: true,
            ..MoveOptions::default()
        };
        let new = relocate(&src, Destination::Dir(Path::new("nowhere")), &opts).unwrap();
        assert_eq!(new, dir.path().join("nowhere/file.mkv"));
        assert!(src.exists());
        assert!(!dir.path().join("nowhere").exists());
    }
}
