//! Core file classification, completion tracking and directory listing

pub mod completion;
pub mod lister;
pub mod session;

pub use completion::{completed_names, is_complete, mark_complete, mark_if_tracked, COMPLETE_DIR};
pub use lister::{is_special, list_directory, DirEntry, ListOptions, Listing};
pub use session::{apps_for, OpenOutcome, Session};

use crate::config::FormatList;
use serde::Serialize;
use std::fmt;

/// The two kinds of queue file an application can be associated with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileKind {
    /// 3D model for a printer
    PartFile,
    /// 2D/vector job for a laser cutter
    LaserFile,
}

impl FileKind {
    /// The tag used in the applications config file
    pub fn tag(self) -> &'static str {
        match self {
            FileKind::PartFile => "part-file",
            FileKind::LaserFile => "laser-file",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "part-file" => Some(FileKind::PartFile),
            "laser-file" => Some(FileKind::LaserFile),
            _ => None,
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Matches filenames against the configured format lists.
///
/// Classification uses substring containment, so a token anywhere in the name
/// counts (`model.stl.bak` is a part file). Whitelisting for the listing uses
/// suffix matching instead. Both rules are kept as the tool has always behaved.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    tracked: FormatList,
    part: FormatList,
    laser: FormatList,
}

impl Classifier {
    pub fn new(tracked: FormatList, part: FormatList, laser: FormatList) -> Self {
        Self {
            tracked,
            part,
            laser,
        }
    }

    /// Part formats win over laser formats when both match
    pub fn classify(&self, name: &str) -> Option<FileKind> {
        if self.part.contained_in(name) {
            Some(FileKind::PartFile)
        } else if self.laser.contained_in(name) {
            Some(FileKind::LaserFile)
        } else {
            None
        }
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.tracked.contained_in(name)
    }

    pub fn is_whitelisted(&self, name: &str) -> bool {
        self.part.suffix_of(name) || self.laser.suffix_of(name)
    }

    pub fn part_formats(&self) -> &FormatList {
        &self.part
    }

    pub fn laser_formats(&self) -> &FormatList {
        &self.laser
    }
}
