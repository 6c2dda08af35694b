//! Color constants for the terminal user interface.

use ratatui::style::{Color, Modifier, Style};

use crate::fields::{Priority, Status};

pub const GRAY: Color = Color::Rgb(108, 117, 125);
pub const BLUE: Color = Color::Rgb(0, 123, 255);
pub const GREEN: Color = Color::Rgb(40, 167, 69);
pub const AMBER: Color = Color::Rgb(255, 193, 7);
pub const RED: Color = Color::Rgb(220, 53, 69);
/// Focused borders and active form fields
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Confirmation and alert dialogs
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);

/// Badge background for a task status.
pub fn status_color(status: Status) -> Color {
    match status {
        Status::Pending => GRAY,
        Status::InProgress => BLUE,
        Status::Completed => GREEN,
    }
}

/// Badge background for a task priority.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => GREEN,
        Priority::Medium => AMBER,
        Priority::High => RED,
    }
}

/// Style for a badge with the given background; amber needs dark text.
pub fn badge_style(bg: Color) -> Style {
    let fg = match bg {
        AMBER | GOLD => Color::Rgb(20, 20, 20),
        _ => Color::White,
    };
    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
}
