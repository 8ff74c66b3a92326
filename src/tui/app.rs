//! Browser controller: turns key presses into session, config and launcher calls

use super::input::{handle_key_event, handle_menu_input, handle_text_input, KeyAction, TextInput};
use crate::config::{expand_tilde, AppAssociation, ConfigFile, ConfigStore};
use crate::domain::{apps_for, FileKind, OpenOutcome, Session};
use crate::launcher::{run_application, Launcher};
use crossterm::event::KeyEvent;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Settings menu entries, in display order
pub const SETTINGS: [(ConfigFile, &str); 6] = [
    (ConfigFile::HomePath, "Set home path"),
    (ConfigFile::PartFormats, "Edit part file formats to track"),
    (ConfigFile::LaserFormats, "Edit laser file formats to track"),
    (ConfigFile::Applications, "Manage the list of apps to open with"),
    (ConfigFile::TrackedFormats, "Edit formats marked on completion"),
    (ConfigFile::FileManagerCommand, "Set file manager command"),
];

/// UI view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    /// Main folder listing
    Browsing,
    /// Help overlay visible
    Help,
    /// Picking an application for a part or laser file
    ChooseApp {
        file: PathBuf,
        kind: FileKind,
        apps: Vec<AppAssociation>,
        selected: usize,
    },
    /// Typing a path to open
    GoTo { input: String },
    /// Settings menu
    Settings { selected: usize },
}

/// One-line message shown in the footer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

pub struct App<L: Launcher> {
    pub session: Session,
    pub store: ConfigStore,
    pub view: ViewState,
    pub status: Option<Status>,
    /// Config file the event loop should open in an editor
    pub pending_edit: Option<ConfigFile>,
    pub should_quit: bool,
    launcher: L,
}

impl<L: Launcher> App<L> {
    pub fn new(session: Session, store: ConfigStore, launcher: L) -> Self {
        Self {
            session,
            store,
            view: ViewState::Browsing,
            status: None,
            pending_edit: None,
            should_quit: false,
            launcher,
        }
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status = Some(Status::Info(message.into()));
    }

    fn report<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "action failed");
                self.status = Some(Status::Error(e.to_string()));
                None
            }
        }
    }

    /// Routes a key press according to the current view
    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view.clone() {
            ViewState::Browsing => self.handle_browsing(handle_key_event(key)),
            ViewState::Help => {
                // Any key closes help
                self.view = ViewState::Browsing;
            }
            ViewState::ChooseApp { selected, apps, .. } => {
                self.handle_chooser(handle_menu_input(key), selected, apps.len())
            }
            ViewState::GoTo { input } => self.handle_goto(handle_text_input(key), input),
            ViewState::Settings { selected } => {
                self.handle_settings(handle_menu_input(key), selected)
            }
        }
    }

    pub fn handle_browsing(&mut self, action: KeyAction) {
        self.status = None;
        match action {
            KeyAction::Quit => self.should_quit = true,
            KeyAction::Open => {
                if let Some(path) = self.session.selected_entry().map(|e| e.path.clone()) {
                    self.open(&path);
                }
            }
            KeyAction::Back => {
                let result = self.session.go_back();
                self.report(result);
            }
            KeyAction::Forward => {
                let result = self.session.go_forward();
                self.report(result);
            }
            KeyAction::Home => {
                let home = self.store.home_path();
                let result = self.session.go_home(home);
                self.report(result);
            }
            KeyAction::Next => self.session.next(),
            KeyAction::Previous => self.session.previous(),
            KeyAction::ToggleHidden => {
                let result = self.session.toggle_hidden();
                if self.report(result).is_some() {
                    let state = if self.session.show_hidden { "shown" } else { "hidden" };
                    self.info(format!("Hidden items {}", state));
                }
            }
            KeyAction::GoTo => {
                self.view = ViewState::GoTo {
                    input: String::new(),
                }
            }
            KeyAction::FileManager => {
                let command = self.store.file_manager_command();
                let dir = self.session.current_path.clone();
                let result = self.launcher.open_file_manager(command.as_deref(), &dir);
                self.report(result);
            }
            KeyAction::Refresh => {
                let result = self.session.refresh();
                self.report(result);
            }
            KeyAction::Settings => self.view = ViewState::Settings { selected: 0 },
            KeyAction::Help => self.view = ViewState::Help,
            KeyAction::Cancel | KeyAction::Pick(_) | KeyAction::None => {}
        }
    }

    /// Opens a folder or offers the applications configured for a file
    pub fn open(&mut self, path: &Path) {
        let result = self.session.open_path(path);
        let Some(outcome) = self.report(result) else {
            return;
        };

        match outcome {
            OpenOutcome::Navigated => {}
            OpenOutcome::ChooseApp(kind) => {
                let configured = self.store.applications();
                let apps: Vec<AppAssociation> =
                    apps_for(kind, &configured).into_iter().cloned().collect();
                if apps.is_empty() {
                    self.status = Some(Status::Error(format!(
                        "No applications configured for {}",
                        kind
                    )));
                    return;
                }
                self.view = ViewState::ChooseApp {
                    file: path.to_path_buf(),
                    kind,
                    apps,
                    selected: 0,
                };
            }
            OpenOutcome::Unrecognized => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status = Some(Status::Error(format!("Unrecognized file: {}", name)));
            }
        }
    }

    fn handle_chooser(&mut self, action: KeyAction, selected: usize, count: usize) {
        let choice = match action {
            KeyAction::Next => {
                self.set_menu_selection((selected + 1).min(count.saturating_sub(1)));
                None
            }
            KeyAction::Previous => {
                self.set_menu_selection(selected.saturating_sub(1));
                None
            }
            KeyAction::Open => Some(selected),
            KeyAction::Pick(index) if index < count => Some(index),
            KeyAction::Cancel => {
                self.view = ViewState::Browsing;
                None
            }
            _ => None,
        };

        if let Some(index) = choice {
            self.choose_app(index);
        }
    }

    /// Launches the chosen application, marks the file complete and refreshes
    pub fn choose_app(&mut self, index: usize) {
        let ViewState::ChooseApp { file, apps, .. } =
            std::mem::replace(&mut self.view, ViewState::Browsing)
        else {
            return;
        };
        let Some(app) = apps.get(index) else {
            return;
        };

        let result = run_application(&mut self.launcher, app, &file);
        if self.report(result).is_some() {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.info(format!("Opened {} with {}", name, app.name));
        }
        let result = self.session.refresh();
        self.report(result);
    }

    fn set_menu_selection(&mut self, index: usize) {
        match &mut self.view {
            ViewState::ChooseApp { selected, .. } | ViewState::Settings { selected } => {
                *selected = index
            }
            _ => {}
        }
    }

    fn handle_goto(&mut self, input: TextInput, mut text: String) {
        match input {
            TextInput::Char(c) => {
                text.push(c);
                self.view = ViewState::GoTo { input: text };
            }
            TextInput::Backspace => {
                text.pop();
                self.view = ViewState::GoTo { input: text };
            }
            TextInput::Submit => {
                self.view = ViewState::Browsing;
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    self.open(&expand_tilde(trimmed));
                }
            }
            TextInput::Cancel => self.view = ViewState::Browsing,
            TextInput::None => {}
        }
    }

    fn handle_settings(&mut self, action: KeyAction, selected: usize) {
        let choice = match action {
            KeyAction::Next => {
                self.set_menu_selection((selected + 1).min(SETTINGS.len() - 1));
                None
            }
            KeyAction::Previous => {
                self.set_menu_selection(selected.saturating_sub(1));
                None
            }
            KeyAction::Open => Some(selected),
            KeyAction::Pick(index) if index < SETTINGS.len() => Some(index),
            KeyAction::Cancel => {
                self.view = ViewState::Browsing;
                None
            }
            _ => None,
        };

        if let Some(index) = choice {
            self.pending_edit = Some(SETTINGS[index].0);
        }
    }

    /// Re-reads the format lists after a config edit and re-lists the folder
    pub fn reload_config(&mut self) {
        self.session.set_classifier(self.store.classifier());
        let result = self.session.refresh();
        if self.report(result).is_some() {
            self.info("Configuration reloaded");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{fallback_home_path, FormatList};
    use crate::domain::{is_complete, Classifier};
    use crate::error::{QueueError, Result};
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::fs;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingLauncher {
        launched: Vec<(String, PathBuf)>,
        file_managers: Vec<(Option<String>, PathBuf)>,
    }

    impl Launcher for RecordingLauncher {
        fn launch(&mut self, program: &str, file: &Path) -> Result<()> {
            if program == "missing-app" {
                return Err(QueueError::LaunchError {
                    program: program.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            self.launched.push((program.to_string(), file.to_path_buf()));
            Ok(())
        }

        fn open_file_manager(&mut self, command: Option<&str>, dir: &Path) -> Result<()> {
            self.file_managers
                .push((command.map(str::to_string), dir.to_path_buf()));
            Ok(())
        }
    }

    struct Fixture {
        queue: TempDir,
        _config: TempDir,
        app: App<RecordingLauncher>,
    }

    fn fixture(apps: &str) -> Fixture {
        let queue = TempDir::new().unwrap();
        let config = TempDir::new().unwrap();
        let store = ConfigStore::open(config.path());
        store.save_part_formats(".stl,.3mf").unwrap();
        store.save_laser_formats(".svg").unwrap();
        store.save_app_list(apps).unwrap();
        store.set_home_path(queue.path()).unwrap();

        fs::write(queue.path().join("model.stl"), b"solid").unwrap();
        fs::write(queue.path().join("cut.svg"), b"<svg/>").unwrap();
        fs::create_dir(queue.path().join("jobs")).unwrap();

        let mut session = Session::new(
            queue.path().to_path_buf(),
            store.classifier(),
            fallback_home_path(),
        );
        session.refresh().unwrap();

        Fixture {
            app: App::new(session, store, RecordingLauncher::default()),
            queue,
            _config: config,
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn select(app: &mut App<RecordingLauncher>, name: &str) {
        app.session.selected = app
            .session
            .entries
            .iter()
            .position(|e| e.name == name)
            .unwrap();
    }

    mod open_tests {
        use super::*;

        #[test]
        fn test_open_part_file_offers_part_apps() {
            let mut f = fixture("part-file,Cura,cura\nlaser-file,Inkscape,inkscape");
            select(&mut f.app, "model.stl");

            f.app.handle_key(key(KeyCode::Enter));

            match &f.app.view {
                ViewState::ChooseApp { kind, apps, .. } => {
                    assert_eq!(*kind, FileKind::PartFile);
                    assert_eq!(apps.len(), 1);
                    assert_eq!(apps[0].name, "Cura");
                }
                other => panic!("expected app chooser, got {:?}", other),
            }
        }

        #[test]
        fn test_choose_app_launches_marks_and_hides() {
            let mut f = fixture("laser-file,Inkscape,inkscape");
            select(&mut f.app, "cut.svg");

            f.app.handle_key(key(KeyCode::Enter));
            f.app.handle_key(key(KeyCode::Enter));

            assert_eq!(f.app.view, ViewState::Browsing);
            assert_eq!(
                f.app.launcher().launched,
                vec![("inkscape".to_string(), f.queue.path().join("cut.svg"))]
            );
            assert!(is_complete(f.queue.path(), "cut.svg"));
            assert!(!f.app.session.entries.iter().any(|e| e.name == "cut.svg"));
            assert!(matches!(f.app.status, Some(Status::Info(_))));
        }

        #[test]
        fn test_pick_by_number() {
            let mut f = fixture("part-file,Cura,cura\npart-file,PrusaSlicer,prusa-slicer");
            select(&mut f.app, "model.stl");

            f.app.handle_key(key(KeyCode::Enter));
            f.app.handle_key(key(KeyCode::Char('2')));

            assert_eq!(f.app.launcher().launched[0].0, "prusa-slicer");
        }

        #[test]
        fn test_failed_launch_reports_error_and_keeps_file() {
            let mut f = fixture("part-file,Missing,missing-app");
            select(&mut f.app, "model.stl");

            f.app.handle_key(key(KeyCode::Enter));
            f.app.handle_key(key(KeyCode::Enter));

            assert!(matches!(f.app.status, Some(Status::Error(_))));
            assert!(!is_complete(f.queue.path(), "model.stl"));
            assert!(f.app.session.entries.iter().any(|e| e.name == "model.stl"));
        }

        #[test]
        fn test_no_apps_configured() {
            let mut f = fixture("laser-file,Inkscape,inkscape");
            select(&mut f.app, "model.stl");

            f.app.handle_key(key(KeyCode::Enter));

            assert_eq!(f.app.view, ViewState::Browsing);
            assert_eq!(
                f.app.status,
                Some(Status::Error(
                    "No applications configured for part-file".to_string()
                ))
            );
        }

        #[test]
        fn test_chooser_cancel() {
            let mut f = fixture("part-file,Cura,cura");
            select(&mut f.app, "model.stl");

            f.app.handle_key(key(KeyCode::Enter));
            f.app.handle_key(key(KeyCode::Esc));

            assert_eq!(f.app.view, ViewState::Browsing);
            assert!(f.app.launcher().launched.is_empty());
        }

        #[test]
        fn test_open_directory() {
            let mut f = fixture("part-file,Cura,cura");
            select(&mut f.app, "jobs");

            f.app.handle_key(key(KeyCode::Enter));

            assert_eq!(f.app.session.current_path, f.queue.path().join("jobs"));
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_goto_typed_path() {
            let mut f = fixture("part-file,Cura,cura");
            let target = f.queue.path().join("jobs");

            f.app.handle_key(key(KeyCode::Char('g')));
            for c in target.to_string_lossy().chars() {
                f.app.handle_key(key(KeyCode::Char(c)));
            }
            f.app.handle_key(key(KeyCode::Enter));

            assert_eq!(f.app.view, ViewState::Browsing);
            assert_eq!(f.app.session.current_path, target);
        }

        #[test]
        fn test_goto_backspace_and_cancel() {
            let mut f = fixture("part-file,Cura,cura");

            f.app.handle_key(key(KeyCode::Char('g')));
            f.app.handle_key(key(KeyCode::Char('a')));
            f.app.handle_key(key(KeyCode::Char('b')));
            f.app.handle_key(key(KeyCode::Backspace));
            assert_eq!(
                f.app.view,
                ViewState::GoTo {
                    input: "a".to_string()
                }
            );

            f.app.handle_key(key(KeyCode::Esc));
            assert_eq!(f.app.view, ViewState::Browsing);
        }

        #[test]
        fn test_home_uses_configured_path() {
            let mut f = fixture("part-file,Cura,cura");
            select(&mut f.app, "jobs");
            f.app.handle_key(key(KeyCode::Enter));

            f.app.handle_key(key(KeyCode::Char('~')));

            assert_eq!(f.app.session.current_path, f.queue.path());
        }

        #[test]
        fn test_file_manager_uses_current_path() {
            let mut f = fixture("part-file,Cura,cura");
            f.app.store.save_if_changed(ConfigFile::FileManagerCommand, "thunar").unwrap();

            f.app.handle_key(key(KeyCode::Char('o')));

            assert_eq!(
                f.app.launcher().file_managers,
                vec![(Some("thunar".to_string()), f.queue.path().to_path_buf())]
            );
        }

        #[test]
        fn test_help_closes_on_any_key() {
            let mut f = fixture("part-file,Cura,cura");
            f.app.handle_key(key(KeyCode::Char('?')));
            assert_eq!(f.app.view, ViewState::Help);

            f.app.handle_key(key(KeyCode::Char('x')));
            assert_eq!(f.app.view, ViewState::Browsing);
        }

        #[test]
        fn test_quit() {
            let mut f = fixture("part-file,Cura,cura");
            f.app.handle_key(key(KeyCode::Char('q')));
            assert!(f.app.should_quit);
        }
    }

    mod settings_tests {
        use super::*;

        #[test]
        fn test_settings_selection_requests_edit() {
            let mut f = fixture("part-file,Cura,cura");

            f.app.handle_key(key(KeyCode::Char('s')));
            f.app.handle_key(key(KeyCode::Down));
            f.app.handle_key(key(KeyCode::Enter));

            assert_eq!(f.app.pending_edit, Some(ConfigFile::PartFormats));
        }

        #[test]
        fn test_reload_config_applies_new_formats() {
            let mut f = fixture("part-file,Cura,cura");
            fs::write(f.queue.path().join("bracket.obj"), b"o").unwrap();
            assert!(!f.app.session.entries.iter().any(|e| e.name == "bracket.obj"));

            f.app.store.save_part_formats(".stl,.obj").unwrap();
            f.app.reload_config();

            assert!(f.app.session.entries.iter().any(|e| e.name == "bracket.obj"));
        }

        #[test]
        fn test_reload_restores_emptied_classifier() {
            let mut f = fixture("part-file,Cura,cura");
            f.app.session.set_classifier(Classifier::new(
                FormatList::default(),
                FormatList::default(),
                FormatList::default(),
            ));
            f.app.session.refresh().unwrap();
            assert!(f.app.session.entries.iter().all(|e| e.is_dir));

            f.app.reload_config();
            assert!(f.app.session.entries.iter().any(|e| e.name == "model.stl"));
        }
    }
}
