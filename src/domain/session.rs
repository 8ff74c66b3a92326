use super::{list_directory, Classifier, DirEntry, FileKind, ListOptions, Listing};
use crate::config::AppAssociation;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What happened when the user opened a path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    /// The path was a directory and is now the current path
    Navigated,
    /// The file is a part or laser file; the user picks an application next
    ChooseApp(FileKind),
    /// The file matches no configured format
    Unrecognized,
}

/// Browsing state for one run of the tool
#[derive(Debug)]
pub struct Session {
    pub current_path: PathBuf,
    pub show_hidden: bool,
    pub history: Vec<PathBuf>,
    pub entries: Vec<DirEntry>,
    pub selected: usize,
    classifier: Classifier,
    fallback_dir: PathBuf,
}

impl Session {
    pub fn new(start: PathBuf, classifier: Classifier, fallback_dir: PathBuf) -> Self {
        Self {
            current_path: start,
            show_hidden: false,
            history: Vec::new(),
            entries: Vec::new(),
            selected: 0,
            classifier,
            fallback_dir,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Swaps in a classifier built from freshly edited config
    pub fn set_classifier(&mut self, classifier: Classifier) {
        self.classifier = classifier;
    }

    fn list(&self, path: &Path, show_hidden: bool) -> io::Result<Listing> {
        let options = ListOptions {
            show_hidden,
            fallback_dir: self.fallback_dir.clone(),
        };
        list_directory(path, &self.classifier, &options)
    }

    fn apply(&mut self, listing: Listing) {
        self.current_path = listing.directory;
        self.entries = listing.entries;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    /// Re-lists the current path. A missing directory moves the session to the fallback.
    /// On error the session is left as it was.
    pub fn refresh(&mut self) -> io::Result<()> {
        let listing = self.list(&self.current_path, self.show_hidden)?;
        self.apply(listing);
        Ok(())
    }

    fn navigate(&mut self, path: &Path) -> io::Result<()> {
        debug!(path = %path.display(), "navigating");
        let listing = self.list(path, self.show_hidden)?;
        self.selected = 0;
        self.apply(listing);
        Ok(())
    }

    pub fn go_home(&mut self, home: PathBuf) -> io::Result<()> {
        self.navigate(&home)
    }

    /// Moves to the parent directory and records it in the history
    pub fn go_back(&mut self) -> io::Result<()> {
        let parent = self
            .current_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.current_path.clone());
        self.navigate(&parent)?;
        self.history.push(parent);
        Ok(())
    }

    /// Steps through the history recorded by [`Session::go_back`].
    /// With two or more entries the second-to-last is shown; with one, that one.
    /// The last entry is dropped either way. Empty history does nothing.
    pub fn go_forward(&mut self) -> io::Result<()> {
        let target = match self.history.len() {
            0 => return Ok(()),
            1 => self.history[0].clone(),
            n => self.history[n - 2].clone(),
        };
        self.navigate(&target)?;
        self.history.pop();
        Ok(())
    }

    /// Directories become the current path; files are classified
    pub fn open_path(&mut self, path: &Path) -> io::Result<OpenOutcome> {
        if path.is_dir() {
            self.navigate(path)?;
            return Ok(OpenOutcome::Navigated);
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Ok(match self.classifier.classify(&name) {
            Some(kind) => OpenOutcome::ChooseApp(kind),
            None => OpenOutcome::Unrecognized,
        })
    }

    pub fn toggle_hidden(&mut self) -> io::Result<()> {
        let listing = self.list(&self.current_path, !self.show_hidden)?;
        self.show_hidden = !self.show_hidden;
        self.apply(listing);
        Ok(())
    }

    pub fn next(&mut self) {
        if self.selected < self.entries.len().saturating_sub(1) {
            self.selected += 1;
        }
    }

    pub fn previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
    }

    pub fn selected_entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.selected)
    }
}

/// Applications configured for `kind`, in config order
pub fn apps_for(kind: FileKind, apps: &[AppAssociation]) -> Vec<&AppAssociation> {
    apps.iter().filter(|app| app.kind == kind).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatList;
    use crate::domain::mark_complete;
    use std::fs;
    use tempfile::TempDir;

    fn classifier() -> Classifier {
        Classifier::new(
            FormatList::parse(".stl,.svg"),
            FormatList::parse(".stl,.3mf"),
            FormatList::parse(".svg"),
        )
    }

    fn session_at(dir: &Path) -> Session {
        let mut session = Session::new(dir.to_path_buf(), classifier(), dir.to_path_buf());
        session.refresh().unwrap();
        session
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_refresh_lists_current_path() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.stl"), b"x").unwrap();
            fs::write(temp_dir.path().join("b.txt"), b"x").unwrap();

            let session = session_at(temp_dir.path());

            assert_eq!(session.entries.len(), 1);
            assert_eq!(session.selected_entry().unwrap().name, "a.stl");
        }

        #[test]
        fn test_refresh_missing_directory_moves_to_fallback() {
            let fallback = TempDir::new().unwrap();
            let mut session = Session::new(
                PathBuf::from("/nonexistent/queue"),
                classifier(),
                fallback.path().to_path_buf(),
            );

            session.refresh().unwrap();

            assert_eq!(session.current_path, fallback.path());
        }

        #[test]
        fn test_open_directory_navigates() {
            let temp_dir = TempDir::new().unwrap();
            let jobs = temp_dir.path().join("jobs");
            fs::create_dir(&jobs).unwrap();
            fs::write(jobs.join("cut.svg"), b"x").unwrap();
            let mut session = session_at(temp_dir.path());

            let outcome = session.open_path(&jobs).unwrap();

            assert_eq!(outcome, OpenOutcome::Navigated);
            assert_eq!(session.current_path, jobs);
            assert_eq!(session.entries[0].name, "cut.svg");
        }

        #[test]
        fn test_open_file_classifies() {
            let temp_dir = TempDir::new().unwrap();
            let mut session = session_at(temp_dir.path());

            assert_eq!(
                session.open_path(&temp_dir.path().join("model.stl")).unwrap(),
                OpenOutcome::ChooseApp(FileKind::PartFile)
            );
            assert_eq!(
                session.open_path(&temp_dir.path().join("cut.svg")).unwrap(),
                OpenOutcome::ChooseApp(FileKind::LaserFile)
            );
            assert_eq!(
                session.open_path(&temp_dir.path().join("notes.txt")).unwrap(),
                OpenOutcome::Unrecognized
            );
            assert_eq!(session.current_path, temp_dir.path());
        }

        #[test]
        fn test_back_then_forward() {
            let temp_dir = TempDir::new().unwrap();
            let inner = temp_dir.path().join("a").join("b");
            fs::create_dir_all(&inner).unwrap();
            let mut session = session_at(&inner);

            session.go_back().unwrap();
            assert_eq!(session.current_path, temp_dir.path().join("a"));
            session.go_back().unwrap();
            assert_eq!(session.current_path, temp_dir.path());
            assert_eq!(session.history.len(), 2);

            session.go_forward().unwrap();
            assert_eq!(session.current_path, temp_dir.path().join("a"));
            assert_eq!(session.history.len(), 1);

            session.go_forward().unwrap();
            assert_eq!(session.current_path, temp_dir.path().join("a"));
            assert!(session.history.is_empty());

            // Nothing left to step through
            session.go_forward().unwrap();
            assert_eq!(session.current_path, temp_dir.path().join("a"));
        }

        #[test]
        fn test_failed_navigation_leaves_session_untouched() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.stl"), b"x").unwrap();
            let mut session = Session::new(
                temp_dir.path().to_path_buf(),
                classifier(),
                PathBuf::from("/nonexistent/fallback"),
            );
            session.refresh().unwrap();

            assert!(session.go_home(PathBuf::from("/nonexistent/home")).is_err());

            assert_eq!(session.current_path, temp_dir.path());
            assert_eq!(session.entries.len(), 1);
            assert_eq!(session.entries[0].path, temp_dir.path().join("a.stl"));
        }

        #[test]
        fn test_failed_back_does_not_record_history() {
            let temp_dir = TempDir::new().unwrap();
            let gone = temp_dir.path().join("gone");
            fs::create_dir(&gone).unwrap();
            let mut session = Session::new(
                gone.join("inner"),
                classifier(),
                PathBuf::from("/nonexistent/fallback"),
            );
            fs::remove_dir(&gone).unwrap();

            assert!(session.go_back().is_err());

            assert!(session.history.is_empty());
            assert_eq!(session.current_path, gone.join("inner"));
        }

        #[test]
        fn test_go_home() {
            let temp_dir = TempDir::new().unwrap();
            let home = temp_dir.path().join("home");
            fs::create_dir(&home).unwrap();
            let mut session = session_at(temp_dir.path());

            session.go_home(home.clone()).unwrap();

            assert_eq!(session.current_path, home);
        }
    }

    mod selection_tests {
        use super::*;

        #[test]
        fn test_next_previous_clamp() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.stl"), b"x").unwrap();
            fs::write(temp_dir.path().join("b.stl"), b"x").unwrap();
            let mut session = session_at(temp_dir.path());

            session.previous();
            assert_eq!(session.selected, 0);
            session.next();
            assert_eq!(session.selected, 1);
            session.next();
            assert_eq!(session.selected, 1);
        }

        #[test]
        fn test_selection_clamped_after_refresh() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("a.stl"), b"x").unwrap();
            fs::write(temp_dir.path().join("b.stl"), b"x").unwrap();
            let mut session = session_at(temp_dir.path());
            session.selected = 1;

            mark_complete(&temp_dir.path().join("a.stl")).unwrap();
            mark_complete(&temp_dir.path().join("b.stl")).unwrap();
            session.refresh().unwrap();

            assert!(session.entries.is_empty());
            assert_eq!(session.selected, 0);
            assert!(session.selected_entry().is_none());
        }

        #[test]
        fn test_toggle_hidden() {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join("notes.txt"), b"x").unwrap();
            let mut session = session_at(temp_dir.path());
            assert!(session.entries.is_empty());

            session.toggle_hidden().unwrap();
            assert!(session.show_hidden);
            assert_eq!(session.entries.len(), 1);

            session.toggle_hidden().unwrap();
            assert!(session.entries.is_empty());
        }
    }

    #[test]
    fn test_apps_for_filters_by_kind() {
        let apps = vec![
            AppAssociation::parse_line("part-file,Cura,cura").unwrap(),
            AppAssociation::parse_line("laser-file,Inkscape,inkscape").unwrap(),
            AppAssociation::parse_line("part-file,PrusaSlicer,prusa-slicer").unwrap(),
        ];

        let part_apps = apps_for(FileKind::PartFile, &apps);

        assert_eq!(part_apps.len(), 2);
        assert_eq!(part_apps[0].name, "Cura");
        assert_eq!(part_apps[1].name, "PrusaSlicer");
    }
}
