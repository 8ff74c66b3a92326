// CLI module for argument parsing and configuration

use crate::config::{resolve_config_dir, ConfigFile};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Print queue browser - work through a folder of part and laser files
///
/// Opens part (3D model) and laser (vector) files with configured applications
/// and hides each file once it has been sent off.
#[derive(Parser, Debug, Clone)]
#[command(name = "print-queue")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Args {
    /// Directory to browse
    ///
    /// If not specified, starts at the configured home path.
    pub directory: Option<PathBuf>,

    /// Directory holding the configuration files
    #[arg(long = "config-dir", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Show hidden, unrecognized and completed entries
    #[arg(long = "hidden", action = ArgAction::SetTrue, global = true)]
    pub show_hidden: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the entries the browser would show
    List {
        /// Directory to list (defaults to the home path)
        directory: Option<PathBuf>,

        /// Emit JSON instead of plain text
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Report whether files are part files, laser files or unrecognized
    Classify {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Copy a file into its folder's .complete directory
    Complete {
        file: PathBuf,

        /// Only mark the file if its name contains a tracked format
        #[arg(long = "tracked-only", action = ArgAction::SetTrue)]
        tracked_only: bool,
    },
    /// Write starter configuration files that do not exist yet
    Init,
    /// Open a configuration file in $EDITOR
    Edit {
        #[arg(value_enum)]
        setting: SettingArg,
    },
}

/// Configuration files that can be edited from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingArg {
    /// Formats marked complete by `complete --tracked-only`
    Formats,
    /// Part file formats
    PartFormats,
    /// Laser file formats
    LaserFormats,
    /// Application list
    Apps,
    /// Home path
    Home,
    /// File manager command
    FileManager,
}

impl From<SettingArg> for ConfigFile {
    fn from(setting: SettingArg) -> Self {
        match setting {
            SettingArg::Formats => ConfigFile::TrackedFormats,
            SettingArg::PartFormats => ConfigFile::PartFormats,
            SettingArg::LaserFormats => ConfigFile::LaserFormats,
            SettingArg::Apps => ConfigFile::Applications,
            SettingArg::Home => ConfigFile::HomePath,
            SettingArg::FileManager => ConfigFile::FileManagerCommand,
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors.
    /// A missing directory is allowed; the browser falls back to the Downloads folder.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(ref dir) = self.directory {
            if dir.is_file() {
                return Err(format!("Path is not a directory: {}", dir.display()));
            }
        }

        if let Some(ref dir) = self.config_dir {
            if dir.is_file() {
                return Err(format!("Config directory is a file: {}", dir.display()));
            }
        }

        if let Some(Command::Complete { ref file, .. }) = self.command {
            if !file.is_file() {
                return Err(format!("File does not exist: {}", file.display()));
            }
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory: Option<PathBuf>,
    pub config_dir: PathBuf,
    pub show_hidden: bool,
    pub command: Option<Command>,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            config_dir: resolve_config_dir(args.config_dir.as_deref()),
            directory: args.directory,
            show_hidden: args.show_hidden,
            command: args.command,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("print-queue").chain(args.iter().copied())).unwrap()
    }

    mod args_tests {
        use super::*;

        #[test]
        fn test_no_arguments() {
            let args = parse(&[]);
            assert!(args.directory.is_none());
            assert!(args.command.is_none());
            assert!(!args.show_hidden);
        }

        #[test]
        fn test_directory_and_flags() {
            let args = parse(&["/srv/queue", "--hidden", "--config-dir", "/etc/pq"]);
            assert_eq!(args.directory, Some(PathBuf::from("/srv/queue")));
            assert!(args.show_hidden);
            assert_eq!(args.config_dir, Some(PathBuf::from("/etc/pq")));
        }

        #[test]
        fn test_list_subcommand() {
            let args = parse(&["list", "/srv/queue", "--json"]);
            assert_eq!(
                args.command,
                Some(Command::List {
                    directory: Some(PathBuf::from("/srv/queue")),
                    json: true,
                })
            );
        }

        #[test]
        fn test_global_hidden_after_subcommand() {
            let args = parse(&["list", "--hidden"]);
            assert!(args.show_hidden);
        }

        #[test]
        fn test_classify_requires_files() {
            assert!(Args::try_parse_from(["print-queue", "classify"]).is_err());
        }

        #[test]
        fn test_edit_setting_names() {
            let args = parse(&["edit", "part-formats"]);
            assert_eq!(
                args.command,
                Some(Command::Edit {
                    setting: SettingArg::PartFormats
                })
            );
            assert_eq!(
                ConfigFile::from(SettingArg::FileManager),
                ConfigFile::FileManagerCommand
            );
        }

        #[test]
        fn test_validate_missing_directory_is_allowed() {
            let args = parse(&["/nonexistent/path/12345"]);
            assert!(args.validate().is_ok());
        }

        #[test]
        fn test_validate_rejects_file_as_directory() {
            let temp_dir = TempDir::new().unwrap();
            let file = temp_dir.path().join("model.stl");
            std::fs::write(&file, b"x").unwrap();

            let args = parse(&[file.to_str().unwrap()]);
            let result = args.validate();

            assert!(result.unwrap_err().contains("not a directory"));
        }

        #[test]
        fn test_validate_complete_requires_file() {
            let args = parse(&["complete", "/nonexistent/model.stl"]);
            assert!(args.validate().unwrap_err().contains("does not exist"));
        }
    }

    mod config_tests {
        use super::*;

        #[test]
        fn test_app_config_from_args() {
            let args = parse(&["/srv/queue", "--config-dir", "/etc/pq", "--hidden"]);

            let config: AppConfig = args.into();

            assert_eq!(config.directory, Some(PathBuf::from("/srv/queue")));
            assert_eq!(config.config_dir, PathBuf::from("/etc/pq"));
            assert!(config.show_hidden);
            assert!(config.command.is_none());
        }
    }
}
