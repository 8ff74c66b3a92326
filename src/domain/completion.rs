use super::Classifier;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the hidden folder holding completion markers
pub const COMPLETE_DIR: &str = ".complete";

/// Copies `path` into `<parent>/.complete/`, creating the folder if needed.
///
/// An existing marker with the same name is overwritten. The copy is not
/// atomic. Returns the path of the marker.
pub fn mark_complete(path: &Path) -> io::Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Not a file path: {:?}", path),
        )
    })?;

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let complete_dir = parent.join(COMPLETE_DIR);
    if !complete_dir.exists() {
        fs::create_dir(&complete_dir)?;
    }

    let marker = complete_dir.join(file_name);
    fs::copy(path, &marker)?;

    info!(file = %path.display(), "marked complete");
    Ok(marker)
}

/// True if a same-named entry exists in `<directory>/.complete/`
pub fn is_complete(directory: &Path, file_name: impl AsRef<Path>) -> bool {
    fs::symlink_metadata(directory.join(COMPLETE_DIR).join(file_name)).is_ok()
}

/// Marks `path` complete only when its name contains a tracked format.
/// Returns whether a marker was written.
pub fn mark_if_tracked(path: &Path, classifier: &Classifier) -> io::Result<bool> {
    let name = path.to_string_lossy();
    if !classifier.is_tracked(&name) {
        return Ok(false);
    }
    mark_complete(path)?;
    Ok(true)
}

/// Names of every marker in `<directory>/.complete/`, empty if the folder is absent
pub fn completed_names(directory: &Path) -> io::Result<Vec<String>> {
    let entries = match fs::read_dir(directory.join(COMPLETE_DIR)) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    names.sort();
    Ok(names)
}
