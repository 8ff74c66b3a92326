// TUI module for rendering the terminal interface
pub mod app;
pub mod colors;
pub mod helpers;
pub mod input;

// Re-exports
pub use app::{App, Status, ViewState, SETTINGS};
pub use colors::*;
pub use helpers::{format_file_size, truncate_text};
pub use input::{handle_key_event, handle_menu_input, handle_text_input, KeyAction, TextInput};

use crate::config::ConfigStore;
use crate::domain::{DirEntry, FileKind, Session};
use crate::launcher::Launcher;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Longest name shown in the listing before it is cut with `...`
const MAX_NAME_CHARS: usize = 48;

/// Renders the browser and whatever overlay the current view needs
pub fn render<L: Launcher>(frame: &mut Frame, app: &App<L>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with current path
            Constraint::Min(0),    // Listing
            Constraint::Length(3), // Footer / status
        ])
        .split(frame.area());

    render_header(frame, chunks[0], &app.session);
    render_listing(frame, chunks[1], &app.session);
    render_footer(frame, chunks[2], app.status.as_ref());

    match &app.view {
        ViewState::Browsing => {}
        ViewState::Help => render_help_overlay(frame),
        ViewState::ChooseApp {
            file,
            kind,
            apps,
            selected,
        } => {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let labels: Vec<String> = apps.iter().map(|a| a.name.clone()).collect();
            render_menu_overlay(
                frame,
                " Choose Application ",
                &format!("{} ({})", truncate_text(&name, MAX_NAME_CHARS), kind),
                &labels,
                *selected,
            );
        }
        ViewState::GoTo { input } => render_goto_overlay(frame, input),
        ViewState::Settings { selected } => render_settings_overlay(frame, &app.store, *selected),
    }
}

/// Renders the header with the current path and hidden-items state
fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let hidden = if session.show_hidden {
        Span::styled("  [showing hidden]", Style::default().fg(ACCENT_HIGHLIGHT))
    } else {
        Span::raw("")
    };

    let line = Line::from(vec![
        Span::styled(
            session.current_path.display().to_string(),
            Style::default()
                .fg(TEXT_PRIMARY)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({} items)", session.entries.len()),
            Style::default().fg(TEXT_SECONDARY),
        ),
        hidden,
    ]);

    let header = Paragraph::new(line).block(
        Block::default()
            .title(" Print Queue ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER_COLOR)),
    );

    frame.render_widget(header, area);
}

fn entry_item(entry: &DirEntry) -> ListItem<'static> {
    let name = truncate_text(&entry.name, MAX_NAME_CHARS);
    let (label, color) = if entry.is_dir {
        (format!("{}/", name), DIRECTORY_COLOR)
    } else {
        match entry.kind {
            Some(FileKind::PartFile) => (name, PART_FILE_COLOR),
            Some(FileKind::LaserFile) => (name, LASER_FILE_COLOR),
            None => (name, TEXT_SECONDARY),
        }
    };

    let mut spans = vec![Span::styled(label, Style::default().fg(color))];
    if !entry.is_dir {
        spans.push(Span::styled(
            format!("  {}", format_file_size(entry.size)),
            Style::default().fg(TEXT_SECONDARY),
        ));
    }
    if entry.completed {
        spans.push(Span::styled(
            "  ✓ complete",
            Style::default().fg(ACCENT_SECONDARY),
        ));
    }
    ListItem::new(Line::from(spans))
}

/// Renders the folder listing with the selected row highlighted
fn render_listing(frame: &mut Frame, area: Rect, session: &Session) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER_COLOR));

    if session.entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Nothing left in this folder",
                Style::default().fg(TEXT_SECONDARY),
            )),
            Line::from(Span::styled(
                "Press . to show hidden and completed items",
                Style::default().fg(TEXT_SECONDARY),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = session.entries.iter().map(entry_item).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(BG_DARK)
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default().with_selected(Some(session.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Renders key hints, or the status message when there is one
fn render_footer(frame: &mut Frame, area: Rect, status: Option<&Status>) {
    let line = match status {
        Some(Status::Info(message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(ACCENT_SECONDARY),
        )),
        Some(Status::Error(message)) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(ACCENT_PRIMARY),
        )),
        None => Line::from(vec![
            Span::styled("⏎ ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Open", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("⌫ ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Back", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("~ ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Home", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("g ", Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::styled("Go to", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("? ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Help", Style::default().fg(TEXT_SECONDARY)),
            Span::raw("  │  "),
            Span::styled("q ", Style::default().fg(TEXT_SECONDARY)),
            Span::styled("Quit", Style::default().fg(TEXT_SECONDARY)),
        ]),
    };

    let footer = Paragraph::new(line)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(BORDER_COLOR)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(footer, area);
}

fn overlay_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(ACCENT_HIGHLIGHT))
        .style(Style::default().bg(BG_DARK))
}

/// Renders the help overlay
pub fn render_help_overlay(frame: &mut Frame) {
    let help_area = centered_rect(60, 70, frame.area());
    frame.render_widget(Clear, help_area);

    let block = overlay_block(" Help ");
    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let shortcut = |keys: &'static str, description: &'static str| {
        Line::from(vec![
            Span::styled(format!("{:>12}  ", keys), Style::default().fg(ACCENT_HIGHLIGHT)),
            Span::raw(description),
        ])
    };

    let help_lines = vec![
        Line::from(""),
        shortcut("⏎ / → / l", "Open folder or choose app"),
        shortcut("⌫ / ← / h", "Parent folder"),
        shortcut("f", "Forward"),
        shortcut("~", "Home folder"),
        shortcut("↑↓ / j k", "Move selection"),
        shortcut("g", "Go to path"),
        shortcut(".", "Show hidden items"),
        shortcut("o", "Open file manager"),
        shortcut("r", "Refresh"),
        shortcut("s", "Settings"),
        shortcut("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Opening a file with an app copies it into .complete",
            Style::default().fg(TEXT_SECONDARY),
        )),
    ];

    let paragraph = Paragraph::new(help_lines).style(Style::default().fg(TEXT_PRIMARY));
    frame.render_widget(paragraph, inner);
}

/// Renders a numbered menu with a subtitle, used for app choice and settings
pub fn render_menu_overlay(
    frame: &mut Frame,
    title: &str,
    subtitle: &str,
    items: &[String],
    selected: usize,
) {
    let height = (items.len() as u16 + 6).min(frame.area().height);
    let area = centered_fixed_height(60, height, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0), Constraint::Length(1)])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            subtitle.to_string(),
            Style::default().fg(TEXT_SECONDARY),
        ))
        .alignment(Alignment::Center),
        chunks[0],
    );

    let list_items: Vec<ListItem> = items
        .iter()
        .enumerate()
        .map(|(i, label)| ListItem::new(format!("{}. {}", i + 1, label)))
        .collect();
    let list = List::new(list_items)
        .style(Style::default().fg(TEXT_PRIMARY))
        .highlight_style(
            Style::default()
                .fg(ACCENT_HIGHLIGHT)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, chunks[1], &mut state);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "⏎ select  │  Esc cancel",
            Style::default().fg(TEXT_SECONDARY),
        ))
        .alignment(Alignment::Center),
        chunks[2],
    );
}

fn render_settings_overlay(frame: &mut Frame, store: &ConfigStore, selected: usize) {
    let labels: Vec<String> = SETTINGS.iter().map(|(_, label)| label.to_string()).collect();
    let subtitle = format!("Current home: {}", store.home_path().display());
    render_menu_overlay(frame, " Settings ", &subtitle, &labels, selected);
}

/// Renders the go-to-path prompt
pub fn render_goto_overlay(frame: &mut Frame, input: &str) {
    let area = centered_fixed_height(70, 5, frame.area());
    frame.render_widget(Clear, area);

    let block = overlay_block(" Go To ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = if input.is_empty() {
        Line::from(Span::styled(
            "Input file path",
            Style::default().fg(TEXT_SECONDARY),
        ))
    } else {
        Line::from(vec![
            Span::styled(input.to_string(), Style::default().fg(TEXT_PRIMARY)),
            Span::styled("█", Style::default().fg(ACCENT_HIGHLIGHT)),
        ])
    };
    frame.render_widget(Paragraph::new(vec![Line::from(""), text]), inner);
}

/// Helper to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centered rect with a fixed number of rows
fn centered_fixed_height(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
