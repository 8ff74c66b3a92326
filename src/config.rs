//! Flat-file configuration store
//!
//! Every setting lives in its own small text file inside the config directory.
//! Lists are comma-separated, app associations are one `type,name,executable`
//! triple per line.

use crate::domain::{Classifier, FileKind};
use crate::error::{QueueError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "PRINT_QUEUE_CONFIG_DIR";

/// The individual files making up the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    TrackedFormats,
    PartFormats,
    LaserFormats,
    Applications,
    HomePath,
    FileManagerCommand,
}

impl ConfigFile {
    pub const ALL: [ConfigFile; 6] = [
        ConfigFile::TrackedFormats,
        ConfigFile::PartFormats,
        ConfigFile::LaserFormats,
        ConfigFile::Applications,
        ConfigFile::HomePath,
        ConfigFile::FileManagerCommand,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            ConfigFile::TrackedFormats => "formats-to-track.txt",
            ConfigFile::PartFormats => "part-file-formats.txt",
            ConfigFile::LaserFormats => "laser-file-formats.txt",
            ConfigFile::Applications => "application-lists.txt",
            ConfigFile::HomePath => "home-path.txt",
            ConfigFile::FileManagerCommand => "file-manager-command.txt",
        }
    }

    /// Starter contents written by [`ConfigStore::init_defaults`].
    /// `None` means the file is left absent so the built-in fallback applies.
    fn default_contents(self) -> Option<&'static str> {
        match self {
            ConfigFile::TrackedFormats => Some(".stl,.3mf,.svg,.xcs"),
            ConfigFile::PartFormats => Some(".stl,.3mf"),
            ConfigFile::LaserFormats => Some(".svg,.xcs"),
            ConfigFile::Applications => Some(
                "part-file,PrusaSlicer,prusa-slicer\n\
                 part-file,Cura,cura\n\
                 laser-file,Inkscape,inkscape\n\
                 laser-file,LightBurn,lightburn",
            ),
            ConfigFile::HomePath => None,
            ConfigFile::FileManagerCommand => Some(default_file_manager()),
        }
    }
}

fn default_file_manager() -> &'static str {
    if cfg!(target_os = "windows") {
        "explorer"
    } else if cfg!(target_os = "macos") {
        "open"
    } else {
        "xdg-open"
    }
}

/// Strips the trailing line ending left by editors
pub fn clean_newline(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}

/// An ordered list of format tokens such as `.stl` or `.svg`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormatList(Vec<String>);

impl FormatList {
    /// Parses a comma-separated blob. Duplicates and empty tokens are kept as written.
    pub fn parse(text: &str) -> Self {
        let cleaned = clean_newline(text);
        if cleaned.is_empty() {
            return Self::default();
        }
        FormatList(cleaned.split(',').map(str::to_string).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any non-empty token occurs anywhere in `name`
    pub fn contained_in(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|token| !token.is_empty() && name.contains(token.as_str()))
    }

    /// True if `name` ends with any non-empty token
    pub fn suffix_of(&self, name: &str) -> bool {
        self.0
            .iter()
            .any(|token| !token.is_empty() && name.ends_with(token.as_str()))
    }
}

impl std::fmt::Display for FormatList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// An external application offered for one kind of file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppAssociation {
    pub kind: FileKind,
    pub name: String,
    pub executable: String,
}

impl AppAssociation {
    /// Parses a single `type,name,executable` line
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut fields = clean_newline(line).splitn(3, ',');
        let kind = FileKind::from_tag(fields.next()?)?;
        let name = fields.next()?.to_string();
        let executable = fields.next()?.to_string();
        if executable.is_empty() {
            return None;
        }
        Some(AppAssociation {
            kind,
            name,
            executable,
        })
    }
}

/// Parses every well-formed association line, skipping the rest
pub fn parse_app_associations(text: &str) -> Vec<AppAssociation> {
    text.lines()
        .filter_map(|line| {
            let parsed = AppAssociation::parse_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                debug!(line, "skipping malformed application line");
            }
            parsed
        })
        .collect()
}

/// Resolves the config directory: explicit flag, environment, user config dir, then `./config`
pub fn resolve_config_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(dir);
    }
    dirs::config_dir()
        .map(|dir| dir.join("print-queue"))
        .unwrap_or_else(|| PathBuf::from("config"))
}

/// The Downloads folder, used when no home path is configured or a directory is missing
pub fn fallback_home_path() -> PathBuf {
    dirs::download_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Downloads")))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expands a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Read-modify-write access to the config directory
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: ConfigFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Reads a config file with its trailing newline removed.
    /// Absent files yield `None`; other read failures are logged and treated as absent.
    pub fn read(&self, file: ConfigFile) -> Option<String> {
        let path = self.path_of(file);
        match fs::read_to_string(&path) {
            Ok(contents) => Some(clean_newline(&contents).to_string()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read config file");
                None
            }
        }
    }

    pub fn tracked_formats(&self) -> FormatList {
        self.read_formats(ConfigFile::TrackedFormats)
    }

    pub fn part_formats(&self) -> FormatList {
        self.read_formats(ConfigFile::PartFormats)
    }

    pub fn laser_formats(&self) -> FormatList {
        self.read_formats(ConfigFile::LaserFormats)
    }

    fn read_formats(&self, file: ConfigFile) -> FormatList {
        self.read(file)
            .map(|text| FormatList::parse(&text))
            .unwrap_or_default()
    }

    pub fn applications(&self) -> Vec<AppAssociation> {
        self.read(ConfigFile::Applications)
            .map(|text| parse_app_associations(&text))
            .unwrap_or_default()
    }

    /// Builds a classifier from the three format files
    pub fn classifier(&self) -> Classifier {
        Classifier::new(
            self.tracked_formats(),
            self.part_formats(),
            self.laser_formats(),
        )
    }

    /// The configured home directory, or the Downloads folder when unset
    pub fn home_path(&self) -> PathBuf {
        match self.read(ConfigFile::HomePath) {
            Some(raw) => {
                let normalized = raw.replace('\\', "/");
                let trimmed = clean_newline(&normalized);
                if trimmed.is_empty() {
                    fallback_home_path()
                } else {
                    expand_tilde(trimmed)
                }
            }
            None => fallback_home_path(),
        }
    }

    /// Directory listed when the requested one is missing: the home path if it
    /// exists, otherwise the Downloads folder
    pub fn fallback_dir(&self) -> PathBuf {
        let home = self.home_path();
        if home.is_dir() {
            home
        } else {
            fallback_home_path()
        }
    }

    pub fn file_manager_command(&self) -> Option<String> {
        self.read(ConfigFile::FileManagerCommand)
            .filter(|cmd| !cmd.trim().is_empty())
    }

    /// Writes `contents` when it is non-empty and differs from what is stored.
    /// Returns whether the file was written.
    pub fn save_if_changed(&self, file: ConfigFile, contents: &str) -> Result<bool> {
        let contents = clean_newline(contents);
        if contents.is_empty() {
            return Ok(false);
        }
        if self.read(file).as_deref() == Some(contents) {
            return Ok(false);
        }

        fs::create_dir_all(&self.dir).map_err(|e| {
            QueueError::ConfigError(format!(
                "Failed to create config directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        fs::write(self.path_of(file), contents).map_err(|e| {
            QueueError::ConfigError(format!("Failed to write {}: {}", file.file_name(), e))
        })?;

        info!(file = file.file_name(), "saved configuration");
        Ok(true)
    }

    pub fn set_home_path(&self, path: &Path) -> Result<bool> {
        self.save_if_changed(ConfigFile::HomePath, &path.to_string_lossy())
    }

    pub fn save_part_formats(&self, formats: &str) -> Result<bool> {
        self.save_if_changed(ConfigFile::PartFormats, formats)
    }

    pub fn save_laser_formats(&self, formats: &str) -> Result<bool> {
        self.save_if_changed(ConfigFile::LaserFormats, formats)
    }

    pub fn save_app_list(&self, apps: &str) -> Result<bool> {
        self.save_if_changed(ConfigFile::Applications, apps)
    }

    /// Creates the config directory and any missing file with starter contents.
    /// Returns the files that were created.
    pub fn init_defaults(&self) -> Result<Vec<ConfigFile>> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            QueueError::ConfigError(format!(
                "Failed to create config directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let mut created = Vec::new();
        for file in ConfigFile::ALL {
            let Some(contents) = file.default_contents() else {
                continue;
            };
            let path = self.path_of(file);
            if path.exists() {
                continue;
            }
            fs::write(&path, contents)?;
            created.push(file);
        }
        Ok(created)
    }

    /// Opens the current contents of a config file in the user's editor and
    /// saves the result through [`ConfigStore::save_if_changed`], so an
    /// emptied buffer leaves the file alone. Returns whether it was written.
    pub fn edit_file(&self, file: ConfigFile) -> Result<bool> {
        self.edit_with(file, |current| edit::edit(current))
    }

    /// Runs `editor` on the current contents (or the starter contents when the
    /// file is absent) and saves what it returns
    pub fn edit_with<F>(&self, file: ConfigFile, editor: F) -> Result<bool>
    where
        F: FnOnce(&str) -> io::Result<String>,
    {
        let current = self
            .read(file)
            .or_else(|| file.default_contents().map(str::to_string))
            .unwrap_or_default();
        let edited = editor(&current).map_err(|e| {
            QueueError::ConfigError(format!("Failed to edit {}: {}", file.file_name(), e))
        })?;
        self.save_if_changed(file, &edited)
    }
}
