use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Represents the result of handling a key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Quit the application
    Quit,
    /// Open the selected entry (enter a folder, choose an app for a file)
    Open,
    /// Go to the parent folder
    Back,
    /// Step through the back history
    Forward,
    /// Go to the configured home path
    Home,
    /// Move selection down
    Next,
    /// Move selection up
    Previous,
    /// Show or hide hidden, unrecognized and completed entries
    ToggleHidden,
    /// Type a path to open
    GoTo,
    /// Open the current folder in the file manager
    FileManager,
    /// Re-read the current folder
    Refresh,
    /// Open the settings menu
    Settings,
    /// Toggle help overlay
    Help,
    /// Close the current overlay
    Cancel,
    /// Pick the n-th item of a menu (0-based)
    Pick(usize),
    /// No action
    None,
}

/// Maps keyboard events to actions in the main browser
pub fn handle_key_event(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        // Quit: q or Ctrl+C
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Quit,

        // Open: Enter, Right arrow or l
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Right, KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::Open,

        // Back: Backspace, Left arrow or h
        (KeyCode::Backspace, KeyModifiers::NONE) => KeyAction::Back,
        (KeyCode::Left, KeyModifiers::NONE) => KeyAction::Back,
        (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::Back,

        (KeyCode::Char('f'), KeyModifiers::NONE) => KeyAction::Forward,
        (KeyCode::Char('~'), _) => KeyAction::Home,

        // Navigation
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,

        (KeyCode::Char('.'), KeyModifiers::NONE) => KeyAction::ToggleHidden,
        (KeyCode::Char('g'), KeyModifiers::NONE) => KeyAction::GoTo,
        (KeyCode::Char('o'), KeyModifiers::NONE) => KeyAction::FileManager,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Refresh,
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::Settings,

        // Help: ? (some terminals report it with SHIFT)
        (KeyCode::Char('?'), _) => KeyAction::Help,

        _ => KeyAction::None,
    }
}

/// Maps keyboard events inside a menu overlay (application chooser, settings)
pub fn handle_menu_input(key: KeyEvent) -> KeyAction {
    match (key.code, key.modifiers) {
        (KeyCode::Enter, KeyModifiers::NONE) => KeyAction::Open,
        (KeyCode::Down, KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Up, KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::Next,
        (KeyCode::Char('k'), KeyModifiers::NONE) => KeyAction::Previous,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            KeyAction::Pick(c as usize - '1' as usize)
        }
        (KeyCode::Esc, KeyModifiers::NONE) => KeyAction::Cancel,
        (KeyCode::Char('q'), KeyModifiers::NONE) => KeyAction::Cancel,
        _ => KeyAction::None,
    }
}

/// Result of a key press in the go-to-path prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextInput {
    Char(char),
    Backspace,
    Submit,
    Cancel,
    None,
}

/// Maps keyboard events while typing a path
pub fn handle_text_input(key: KeyEvent) -> TextInput {
    match key.code {
        KeyCode::Enter => TextInput::Submit,
        KeyCode::Esc => TextInput::Cancel,
        KeyCode::Backspace => TextInput::Backspace,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => TextInput::Cancel,
        KeyCode::Char(c) => TextInput::Char(c),
        _ => TextInput::None,
    }
}
