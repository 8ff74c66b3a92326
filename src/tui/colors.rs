//! Color palette for the browser

use ratatui::style::Color;

pub const BG_DARK: Color = Color::Rgb(24, 26, 33);
pub const BORDER_COLOR: Color = Color::Rgb(88, 94, 110);
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 223, 228);
pub const TEXT_SECONDARY: Color = Color::Rgb(140, 146, 160);

/// Errors and warnings in the status line
pub const ACCENT_PRIMARY: Color = Color::Rgb(229, 92, 92);
/// Successful actions
pub const ACCENT_SECONDARY: Color = Color::Rgb(120, 200, 120);
/// Titles and selection
pub const ACCENT_HIGHLIGHT: Color = Color::Rgb(97, 175, 239);

pub const DIRECTORY_COLOR: Color = Color::Rgb(229, 192, 123);
pub const PART_FILE_COLOR: Color = Color::Rgb(198, 120, 221);
pub const LASER_FILE_COLOR: Color = Color::Rgb(86, 182, 194);
