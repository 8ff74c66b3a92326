use super::{is_complete, Classifier, FileKind};
use crate::config::fallback_home_path;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One row of a directory listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirEntry {
    pub path: PathBuf,
    pub name: String,
    pub is_dir: bool,
    /// Part/laser classification, `None` for directories and unrecognized files
    pub kind: Option<FileKind>,
    /// A marker with this name exists in the directory's `.complete` folder
    pub completed: bool,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

impl DirEntry {
    pub fn from_path(path: &Path, classifier: &Classifier) -> io::Result<Self> {
        // Broken symlinks still get an entry
        let metadata = fs::metadata(path).or_else(|_| fs::symlink_metadata(path))?;
        let file_name = path.file_name().unwrap_or(path.as_os_str());
        let name = file_name.to_string_lossy().into_owned();
        let is_dir = metadata.is_dir();
        let kind = if is_dir {
            None
        } else {
            classifier.classify(&name)
        };
        let completed = path
            .parent()
            .map(|parent| is_complete(parent, file_name))
            .unwrap_or(false);

        Ok(DirEntry {
            path: path.to_path_buf(),
            name,
            is_dir,
            kind,
            completed,
            size: metadata.len(),
            modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }
}

/// Options controlling which entries a listing keeps
#[derive(Debug, Clone)]
pub struct ListOptions {
    /// Keep dotfiles, backups, unrecognized and completed entries
    pub show_hidden: bool,
    /// Listed instead when the requested directory does not exist
    pub fallback_dir: PathBuf,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            show_hidden: false,
            fallback_dir: fallback_home_path(),
        }
    }
}

/// Result of listing a directory
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    /// The directory that was actually read
    pub directory: PathBuf,
    /// True when the requested directory was missing and the fallback was used
    pub fell_back: bool,
    pub entries: Vec<DirEntry>,
}

/// Dotfiles and editor backups ending in `~`
pub fn is_special(name: &str) -> bool {
    name.starts_with('.') || name.ends_with('~')
}

/// Lists `dir` in filesystem order, dropping (unless `show_hidden`) completed
/// entries, special names and non-directories that are not whitelisted.
///
/// A missing directory is replaced by `options.fallback_dir`; if that also
/// cannot be read the error is returned.
pub fn list_directory(
    dir: &Path,
    classifier: &Classifier,
    options: &ListOptions,
) -> io::Result<Listing> {
    let (directory, read_dir, fell_back) = match fs::read_dir(dir) {
        Ok(entries) => (dir.to_path_buf(), entries, false),
        Err(e)
            if matches!(
                e.kind(),
                io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
            ) || dir.is_file() =>
        {
            warn!(
                requested = %dir.display(),
                fallback = %options.fallback_dir.display(),
                "directory unavailable, using fallback"
            );
            let entries = fs::read_dir(&options.fallback_dir)?;
            (options.fallback_dir.clone(), entries, true)
        }
        Err(e) => return Err(e),
    };

    let mut entries = Vec::new();

    for entry_result in read_dir {
        // Skip entries that cannot be read (permission errors, etc.)
        let entry = match entry_result {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        let dir_entry = match DirEntry::from_path(&path, classifier) {
            Ok(de) => de,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if !options.show_hidden {
            if dir_entry.completed {
                continue;
            }
            if is_special(&dir_entry.name) {
                continue;
            }
            if !dir_entry.is_dir && !classifier.is_whitelisted(&dir_entry.name) {
                continue;
            }
        }

        entries.push(dir_entry);
    }

    debug!(directory = %directory.display(), count = entries.len(), "listed directory");

    Ok(Listing {
        directory,
        fell_back,
        entries,
    })
}
